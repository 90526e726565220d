//! FDTD vacuum chamber: a 1-D scalar field between hard walls.
//!
//! # Field equation
//!
//!   ∂²φ/∂t² + γ ∂φ/∂t = c² ∂²φ/∂x² − V(x,t) φ + ξ(x,t)
//!
//! discretised with the leapfrog (Störmer–Verlet) scheme and an implicit,
//! trapezoidal-in-velocity damping term:
//!
//!   φⁿ⁺¹ (1 + γdt/2) = 2φⁿ − φⁿ⁻¹ (1 − γdt/2) + dt² (c²∇²φⁿ − Vφⁿ + ξⁿ)
//!
//! The damping is diagonal in space, so φⁿ⁺¹ follows by a pointwise
//! division. With γ = 0 and ξ = 0 this is exactly the undamped update
//!
//!   φⁿ⁺¹ = 2φⁿ − φⁿ⁻¹ + dt² (c²∇²φⁿ − Vφⁿ)
//!
//! The scheme is explicit and only conditionally stable; no CFL check is
//! made. An unstable `dt` shows up as growing or non-finite telemetry.
//!
//! # Telemetry
//!
//! Every step records, from the pre-update field φⁿ:
//! - back-reaction force on the potential source: F = −Σ φ² ∂V/∂x dx
//! - field energy: ½ Σ [(∂φ/∂t)² + c²(∂φ/∂x)² + Vφ²] dx, with
//!   ∂φ/∂t ≈ (φⁿ⁺¹ − φⁿ⁻¹)/(2dt)
//!
//! # Walls
//!
//! φ₀ = φ_{nx−1} = 0 after every step and after every initialisation.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use crate::error::{Result, SimError};
use crate::grid::Grid;
use crate::noise::ThermalBath;
use crate::stencil::{gradient_into, laplacian_into};
use crate::telemetry::Telemetry;
use crate::units::DEFAULT_DT;

/// Chamber construction parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChamberConfig {
    /// Grid samples
    pub nx: usize,
    /// Spatial step
    pub dx: f64,
    /// Timestep of the damped integrator
    pub dt: f64,
    /// Viscous damping rate γ
    pub gamma: f64,
    /// Bath temperature (k_B = 1)
    pub temperature: f64,
    /// Seed of the chamber's thermal-noise generator
    pub seed: u64,
}

impl Default for ChamberConfig {
    /// Static-barrier baseline: 1000 samples over a 100-unit chamber,
    /// dt = 0.05 (Courant number 0.5 at c = 1), no bath.
    fn default() -> Self {
        Self {
            nx: 1000,
            dx: 0.1,
            dt: DEFAULT_DT,
            gamma: 0.0,
            temperature: 0.0,
            seed: 42,
        }
    }
}

impl ChamberConfig {
    /// Damped chamber for temperature sweeps (γ = 0.02, starts cold).
    pub fn langevin() -> Self {
        Self {
            gamma: 0.02,
            ..Self::default()
        }
    }

    /// High-Q, hot bath: γ = 0.001, T = 0.05, dt = 0.02.
    pub fn high_q() -> Self {
        Self {
            dt: 0.02,
            gamma: 0.001,
            temperature: 0.05,
            ..Self::default()
        }
    }

    pub fn grid(&self) -> Result<Grid> {
        Grid::new(self.nx, self.dx)
    }

    pub fn bath(&self) -> Result<ThermalBath> {
        ThermalBath::new(self.gamma, self.temperature, self.dt)
    }
}

/// Reusable per-step work arrays.
#[derive(Debug, Clone)]
struct Scratch {
    laplacian: Vec<f64>,
    grad_v: Vec<f64>,
    grad_phi: Vec<f64>,
    noise: Vec<f64>,
}

impl Scratch {
    fn new(nx: usize) -> Self {
        Self {
            laplacian: vec![0.0; nx],
            grad_v: vec![0.0; nx],
            grad_phi: vec![0.0; nx],
            noise: vec![0.0; nx],
        }
    }
}

/// A 1-D scalar field chamber with an optional Langevin bath.
///
/// The undamped chamber is the same type with a silent bath; there is one
/// integrator, parameterised by `(γ, T, dt)`.
#[derive(Debug, Clone)]
pub struct VacuumChamber {
    grid: Grid,
    phi: Vec<f64>,
    phi_prev: Vec<f64>,
    phi_next: Vec<f64>,
    bath: ThermalBath,
    rng: StdRng,
    telemetry: Telemetry,
    scratch: Scratch,
}

impl VacuumChamber {
    /// Undamped, noiseless chamber with the field at rest at zero.
    ///
    /// [`step_damped`](Self::step_damped) on this chamber advances by
    /// [`DEFAULT_DT`].
    pub fn new(grid: Grid) -> Self {
        Self::build(grid, ThermalBath::silent(), 0)
    }

    /// Chamber coupled to `bath`, drawing its thermal forcing from a
    /// generator seeded with `seed`.
    pub fn with_bath(grid: Grid, bath: ThermalBath, seed: u64) -> Self {
        Self::build(grid, bath, seed)
    }

    pub fn from_config(config: &ChamberConfig) -> Result<Self> {
        Ok(Self::with_bath(config.grid()?, config.bath()?, config.seed))
    }

    fn build(grid: Grid, bath: ThermalBath, seed: u64) -> Self {
        let nx = grid.nx();
        log::debug!(
            "vacuum chamber: nx={} dx={} gamma={} T={} dt={} noise_scale={:.3e}",
            nx,
            grid.dx(),
            bath.gamma(),
            bath.temperature(),
            bath.dt(),
            bath.noise_scale()
        );
        Self {
            grid,
            phi: vec![0.0; nx],
            phi_prev: vec![0.0; nx],
            phi_next: vec![0.0; nx],
            bath,
            rng: StdRng::seed_from_u64(seed),
            telemetry: Telemetry::new(),
            scratch: Scratch::new(nx),
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn bath(&self) -> &ThermalBath {
        &self.bath
    }

    /// Current field φⁿ
    pub fn phi(&self) -> &[f64] {
        &self.phi
    }

    /// Previous field φⁿ⁻¹
    pub fn phi_prev(&self) -> &[f64] {
        &self.phi_prev
    }

    pub fn telemetry(&self) -> &Telemetry {
        &self.telemetry
    }

    /// Mutable telemetry, for driver-side series such as mirror position.
    pub fn telemetry_mut(&mut self) -> &mut Telemetry {
        &mut self.telemetry
    }

    /// Number of completed steps.
    pub fn steps(&self) -> usize {
        self.telemetry.len()
    }

    /// Replace the field with zero-mean Gaussian noise of spread `sigma`
    /// drawn from its own generator seeded with `seed`, at rest
    /// (φⁿ⁻¹ = φⁿ).
    pub fn seed_vacuum_noise(&mut self, seed: u64, sigma: f64) -> Result<()> {
        let normal = Normal::new(0.0, sigma)
            .map_err(|_| SimError::InvalidParameter { name: "sigma", value: sigma })?;
        let mut rng = StdRng::seed_from_u64(seed);
        for p in self.phi.iter_mut() {
            *p = normal.sample(&mut rng);
        }
        self.clamp_walls();
        self.phi_prev.copy_from_slice(&self.phi);
        Ok(())
    }

    /// Replace the field with a Gaussian pulse at rest.
    pub fn seed_gaussian_pulse(&mut self, center: f64, width: f64, amplitude: f64) {
        let grid = self.grid;
        for (i, p) in self.phi.iter_mut().enumerate() {
            let u = grid.x(i) - center;
            *p = amplitude * (-u * u / (2.0 * width * width)).exp();
        }
        self.clamp_walls();
        self.phi_prev.copy_from_slice(&self.phi);
    }

    /// Set both time levels explicitly. The wall samples are forced to zero.
    pub fn set_state(&mut self, phi: &[f64], phi_prev: &[f64]) -> Result<()> {
        self.grid.check_len(phi.len())?;
        self.grid.check_len(phi_prev.len())?;
        self.phi.copy_from_slice(phi);
        self.phi_prev.copy_from_slice(phi_prev);
        self.clamp_walls();
        Ok(())
    }

    fn clamp_walls(&mut self) {
        let last = self.grid.nx() - 1;
        for field in [&mut self.phi, &mut self.phi_prev] {
            field[0] = 0.0;
            field[last] = 0.0;
        }
    }

    /// Advance one undamped, noiseless leapfrog step of size `dt`.
    ///
    /// The bath, if any, is ignored.
    pub fn step(&mut self, dt: f64, c: f64, v_potential: &[f64]) -> Result<()> {
        self.integrate(dt, c, v_potential, 0.0, false)
    }

    /// Advance one step of the Langevin equation with the chamber's bath:
    /// timestep `bath.dt()`, implicit damping γ and FDT noise.
    pub fn step_damped(&mut self, c: f64, v_potential: &[f64]) -> Result<()> {
        let dt = self.bath.dt();
        let gamma = self.bath.gamma();
        let noisy = self.bath.is_stochastic();
        self.integrate(dt, c, v_potential, gamma, noisy)
    }

    /// Damped step that also accounts for the work done by switching the
    /// potential from `v_old` to `v_new` while the field is present:
    ///
    ///   W = ½ Σ φ² (V_new − V_old) dx
    ///
    /// evaluated on the pre-step field. With no previous potential the work
    /// is zero. The work is appended to the switching-work telemetry.
    ///
    /// The step is a [`step_damped`](Self::step_damped) step, so it advances
    /// by `bath.dt()`. A chamber built with [`new`](Self::new) has a silent
    /// bath and steps by [`DEFAULT_DT`]; build it with
    /// [`with_bath`](Self::with_bath) or [`from_config`](Self::from_config)
    /// to choose another timestep.
    pub fn step_with_switching_work(
        &mut self,
        c: f64,
        v_new: &[f64],
        v_old: Option<&[f64]>,
    ) -> Result<f64> {
        self.grid.check_len(v_new.len())?;
        let work = match v_old {
            Some(v_old) => {
                self.grid.check_len(v_old.len())?;
                0.5 * self
                    .phi
                    .iter()
                    .zip(v_new.iter().zip(v_old))
                    .map(|(p, (vn, vo))| p * p * (vn - vo))
                    .sum::<f64>()
                    * self.grid.dx()
            }
            None => 0.0,
        };
        self.step_damped(c, v_new)?;
        self.telemetry.record_switching_work(work);
        Ok(work)
    }

    fn integrate(
        &mut self,
        dt: f64,
        c: f64,
        v_potential: &[f64],
        gamma: f64,
        noisy: bool,
    ) -> Result<()> {
        self.grid.check_len(v_potential.len())?;
        let nx = self.grid.nx();
        let dx = self.grid.dx();
        let c2 = c * c;
        let dt2 = dt * dt;
        let damp_plus = 1.0 + gamma * dt / 2.0;
        let damp_minus = 1.0 - gamma * dt / 2.0;

        if noisy {
            self.bath.sample_into(&mut self.rng, &mut self.scratch.noise);
        }
        laplacian_into(&self.phi, dx, &mut self.scratch.laplacian);

        let phi = &self.phi;
        let prev = &self.phi_prev;
        let lap = &self.scratch.laplacian;
        let noise = &self.scratch.noise;
        for i in 1..nx - 1 {
            let mut forces = c2 * lap[i] - v_potential[i] * phi[i];
            if noisy {
                forces += noise[i];
            }
            self.phi_next[i] = (2.0 * phi[i] - prev[i] * damp_minus + dt2 * forces) / damp_plus;
        }
        self.phi_next[0] = 0.0;
        self.phi_next[nx - 1] = 0.0;

        gradient_into(v_potential, dx, &mut self.scratch.grad_v);
        let force = -self
            .phi
            .iter()
            .zip(&self.scratch.grad_v)
            .map(|(p, g)| p * p * g)
            .sum::<f64>()
            * dx;

        gradient_into(&self.phi, dx, &mut self.scratch.grad_phi);
        let inv_2dt = 1.0 / (2.0 * dt);
        let mut density = 0.0;
        for i in 0..nx {
            let dphi_dt = (self.phi_next[i] - self.phi_prev[i]) * inv_2dt;
            let dphi_dx = self.scratch.grad_phi[i];
            density += dphi_dt * dphi_dt
                + c2 * dphi_dx * dphi_dx
                + v_potential[i] * self.phi[i] * self.phi[i];
        }
        let energy = 0.5 * density * dx;

        log::trace!(
            "step {}: force={:.6e} energy={:.6e}",
            self.telemetry.len(),
            force,
            energy
        );
        self.telemetry.record_step(force, energy);

        // φⁿ⁻¹ ← φⁿ, φⁿ ← φⁿ⁺¹; the old φⁿ⁻¹ becomes scratch.
        std::mem::swap(&mut self.phi_prev, &mut self.phi);
        std::mem::swap(&mut self.phi, &mut self.phi_next);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{net_impulse, EnsembleStats};
    use crate::potential::gaussian_barrier;

    fn walls_are_zero(chamber: &VacuumChamber) -> bool {
        let phi = chamber.phi();
        phi[0] == 0.0 && phi[phi.len() - 1] == 0.0
    }

    #[test]
    fn walls_stay_clamped_for_every_integrator() {
        let grid = Grid::new(200, 0.1).unwrap();
        let v = gaussian_barrier(&grid, 7.0, 1.5, 20.0);

        let mut plain = VacuumChamber::new(grid);
        plain.seed_vacuum_noise(3, 0.01).unwrap();
        assert!(walls_are_zero(&plain));

        let bath = ThermalBath::new(0.05, 0.2, 0.05).unwrap();
        let mut noisy = VacuumChamber::with_bath(grid, bath, 11);
        noisy.seed_vacuum_noise(3, 0.01).unwrap();

        for _ in 0..300 {
            plain.step(0.05, 1.0, &v).unwrap();
            noisy.step_damped(1.0, &v).unwrap();
            assert!(walls_are_zero(&plain));
            assert!(walls_are_zero(&noisy));
        }
    }

    #[test]
    fn free_pulse_conserves_energy() {
        let grid = Grid::new(400, 0.1).unwrap();
        let mut chamber = VacuumChamber::new(grid);
        chamber.seed_gaussian_pulse(grid.center(), 2.0, 1.0);
        let v = vec![0.0; grid.nx()];
        for _ in 0..1500 {
            chamber.step(0.05, 1.0, &v).unwrap();
        }
        let drift = chamber.telemetry().energy_drift().unwrap();
        assert!(drift < 0.05, "energy drift {} exceeds discretisation error", drift);
        assert!(chamber.phi().iter().all(|p| p.is_finite()));
    }

    #[test]
    fn zero_bath_damped_step_is_bit_identical_to_undamped() {
        let grid = Grid::new(150, 0.1).unwrap();
        let v = gaussian_barrier(&grid, grid.center(), 2.0, 30.0);
        let dt = 0.04;

        let mut plain = VacuumChamber::new(grid);
        let mut damped = VacuumChamber::with_bath(grid, ThermalBath::none(dt).unwrap(), 99);
        plain.seed_vacuum_noise(5, 0.01).unwrap();
        damped.seed_vacuum_noise(5, 0.01).unwrap();

        for _ in 0..200 {
            plain.step(dt, 1.0, &v).unwrap();
            damped.step_damped(1.0, &v).unwrap();
        }
        assert_eq!(plain.phi(), damped.phi());
        assert_eq!(plain.phi_prev(), damped.phi_prev());
        assert_eq!(plain.telemetry().mirror_force, damped.telemetry().mirror_force);
        assert_eq!(plain.telemetry().total_energy, damped.telemetry().total_energy);
    }

    #[test]
    fn damping_dissipates_field_energy() {
        let grid = Grid::new(400, 0.1).unwrap();
        let bath = ThermalBath::new(0.1, 0.0, 0.05).unwrap();
        let mut chamber = VacuumChamber::with_bath(grid, bath, 0);
        chamber.seed_gaussian_pulse(grid.center(), 2.0, 1.0);
        let v = vec![0.0; grid.nx()];
        for _ in 0..1000 {
            chamber.step_damped(1.0, &v).unwrap();
        }
        let energy = &chamber.telemetry().total_energy;
        let (first, last) = (energy[0], energy[energy.len() - 1]);
        assert!(last < 0.05 * first, "energy {} -> {} not dissipated", first, last);
    }

    #[test]
    fn thermal_runs_reproduce_from_seed() {
        let config = ChamberConfig {
            nx: 120,
            temperature: 0.1,
            gamma: 0.05,
            ..ChamberConfig::default()
        };
        let v = vec![0.0; config.nx];
        let run = |seed: u64| {
            let mut chamber =
                VacuumChamber::from_config(&ChamberConfig { seed, ..config.clone() }).unwrap();
            for _ in 0..50 {
                chamber.step_damped(1.0, &v).unwrap();
            }
            chamber.phi().to_vec()
        };
        assert_eq!(run(1), run(1));
        assert_ne!(run(1), run(2));
    }

    #[test]
    fn thermal_bath_heats_a_cold_field() {
        let config = ChamberConfig {
            nx: 200,
            temperature: 0.05,
            gamma: 0.02,
            ..ChamberConfig::default()
        };
        let mut chamber = VacuumChamber::from_config(&config).unwrap();
        let v = vec![0.0; config.nx];
        for _ in 0..500 {
            chamber.step_damped(1.0, &v).unwrap();
        }
        let last = *chamber.telemetry().total_energy.last().unwrap();
        assert!(last > 0.0, "bath should inject energy, got {}", last);
    }

    #[test]
    fn mismatched_potential_is_rejected() {
        let grid = Grid::new(10, 0.1).unwrap();
        let mut chamber = VacuumChamber::new(grid);
        let err = chamber.step(0.05, 1.0, &[0.0; 9]).unwrap_err();
        assert_eq!(err, SimError::LengthMismatch { expected: 10, actual: 9 });
        assert_eq!(chamber.steps(), 0);
        assert!(chamber.set_state(&[0.0; 10], &[0.0; 3]).is_err());
    }

    #[test]
    fn force_follows_potential_slope_under_the_field() {
        // Field sits on the rising (left) flank of the barrier, where ∂V/∂x > 0.
        let grid = Grid::new(101, 0.1).unwrap();
        let v = gaussian_barrier(&grid, 5.0, 1.0, 10.0);
        let mut phi = vec![0.0; grid.nx()];
        for p in phi.iter_mut().take(45).skip(35) {
            *p = 0.1;
        }
        let mut chamber = VacuumChamber::new(grid);
        chamber.set_state(&phi, &phi).unwrap();
        chamber.step(0.01, 1.0, &v).unwrap();

        let grad = crate::stencil::gradient(&v, grid.dx());
        let expected: f64 = -(35..45).map(|i| 0.01 * grad[i]).sum::<f64>() * grid.dx();
        let force = chamber.telemetry().mirror_force[0];
        assert!(force < 0.0, "force {} should oppose the rising flank", force);
        assert!((force - expected).abs() < 1e-12);
    }

    #[test]
    fn switching_work_measures_potential_change_under_the_field() {
        let grid = Grid::new(50, 0.2).unwrap();
        let mut chamber = VacuumChamber::new(grid);
        chamber.seed_gaussian_pulse(grid.center(), 1.0, 0.5);
        let norm: f64 = chamber.phi().iter().map(|p| p * p).sum::<f64>() * grid.dx();

        let v_old = vec![1.0; grid.nx()];
        let v_new = vec![1.5; grid.nx()];
        let first = chamber.step_with_switching_work(1.0, &v_old, None).unwrap();
        assert_eq!(first, 0.0);

        let norm_now: f64 = chamber.phi().iter().map(|p| p * p).sum::<f64>() * grid.dx();
        let work = chamber
            .step_with_switching_work(1.0, &v_new, Some(&v_old))
            .unwrap();
        assert!((work - 0.25 * norm_now).abs() < 1e-12);
        assert!(norm > 0.0);

        let unchanged = chamber
            .step_with_switching_work(1.0, &v_new, Some(&v_new))
            .unwrap();
        assert_eq!(unchanged, 0.0);
        assert_eq!(chamber.telemetry().switching_work.len(), 3);
        assert_eq!(chamber.steps(), 3);
    }

    #[test]
    fn switching_work_on_a_plain_chamber_steps_by_default_dt() {
        let grid = Grid::new(120, 0.1).unwrap();
        let v_old = gaussian_barrier(&grid, 5.0, 1.0, 10.0);
        let v_new = gaussian_barrier(&grid, 6.0, 1.0, 10.0);

        let mut plain = VacuumChamber::new(grid);
        let mut switched = VacuumChamber::new(grid);
        plain.seed_vacuum_noise(8, 0.01).unwrap();
        switched.seed_vacuum_noise(8, 0.01).unwrap();
        assert_eq!(switched.bath().dt(), DEFAULT_DT);

        plain.step(DEFAULT_DT, 1.0, &v_new).unwrap();
        switched
            .step_with_switching_work(1.0, &v_new, Some(&v_old))
            .unwrap();
        assert_eq!(plain.phi(), switched.phi());
        assert_eq!(plain.telemetry().total_energy, switched.telemetry().total_energy);
    }

    #[test]
    fn static_barrier_single_seed_does_not_thrust() {
        let config = ChamberConfig::default();
        let grid = config.grid().unwrap();
        let v = gaussian_barrier(&grid, grid.center(), 5.0, 50.0);

        let mut chamber = VacuumChamber::new(grid);
        chamber.seed_vacuum_noise(42, 0.001).unwrap();
        for _ in 0..2000 {
            chamber.step(config.dt, 1.0, &v).unwrap();
        }
        let j = net_impulse(&chamber.telemetry().mirror_force, config.dt);
        assert!(j.abs() < 1e-4, "static barrier impulse {:.3e}", j);
    }

    #[test]
    fn static_barrier_baseline_does_not_thrust() {
        let config = ChamberConfig::default();
        let grid = config.grid().unwrap();
        let v = gaussian_barrier(&grid, grid.center(), 5.0, 50.0);

        // Seeds other than 42 scatter at the 1e-4 level; the ensemble mean
        // stays well inside it.
        let impulses: Vec<f64> = (0..16)
            .map(|k| {
                let mut chamber = VacuumChamber::new(grid);
                chamber.seed_vacuum_noise(42 + k, 0.001).unwrap();
                for _ in 0..2000 {
                    chamber.step(config.dt, 1.0, &v).unwrap();
                }
                net_impulse(&chamber.telemetry().mirror_force, config.dt)
            })
            .collect();

        for &j in &impulses {
            assert!(j.is_finite() && j.abs() < 1e-3, "single-run impulse {} out of range", j);
        }
        let stats = EnsembleStats::from_samples(&impulses);
        assert!(
            stats.mean.abs() < 1e-4,
            "ensemble impulse {:.3e} ± {:.3e} indicates thrust",
            stats.mean,
            stats.std
        );
    }
}
