//! Derived observables: flux conservation, recoil, directional asymmetry.

use num_complex::Complex64;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::config::{FloquetConfig, Incident};
use super::solver::{solve, FloquetSolution};
use crate::error::{Result, SimError};
use crate::units::{PHOTON_ROCKET_BOUND, POWER_FLOOR, UNITARITY_TOLERANCE};

/// |Σ_open (R_n + T_n) − 1|
///
/// Logs a warning when the residual exceeds [`UNITARITY_TOLERANCE`].
pub fn unitarity_residual(solution: &FloquetSolution) -> f64 {
    let residual = (solution.total_reflected() + solution.total_transmitted() - 1.0).abs();
    if residual > UNITARITY_TOLERANCE {
        log::warn!(
            "flux not conserved for {} incidence: residual {:.3e} > {:.0e}",
            solution.incident,
            residual,
            UNITARITY_TOLERANCE
        );
    }
    residual
}

/// Transmitted power and momentum in each direction and the resulting
/// steady-state recoil on the scatterer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluxRecoil {
    /// P→ = Σ T_L,n E_n
    pub power_right: f64,
    /// p→ = Σ T_L,n Re k_n
    pub momentum_right: f64,
    /// P← = Σ T_R,n E_n
    pub power_left: f64,
    /// p← = Σ T_R,n Re k_n
    pub momentum_left: f64,
    /// F = p→ − p←
    pub net_force: f64,
    /// F / (P→ + P←), zero below [`POWER_FLOOR`]
    pub force_to_power: f64,
}

impl FluxRecoil {
    /// A reactionless drive cannot beat a photon rocket: F/P ≤ 1 (c = 1).
    pub fn within_photon_rocket_bound(&self) -> bool {
        self.force_to_power <= PHOTON_ROCKET_BOUND
    }
}

fn power_and_momentum(solution: &FloquetSolution) -> (f64, f64) {
    solution
        .channels
        .iter()
        .zip(&solution.transmitted_flux)
        .filter(|(ch, _)| ch.is_open())
        .fold((0.0, 0.0), |(p, q), (ch, tf)| (p + tf * ch.energy, q + tf * ch.k.re))
}

/// Recoil from a pair of left- and right-incidence solutions of `config`.
pub fn flux_and_recoil(
    config: &FloquetConfig,
    left: &FloquetSolution,
    right: &FloquetSolution,
) -> Result<FluxRecoil> {
    if left.incident != Incident::Left || right.incident != Incident::Right {
        return Err(SimError::InvalidFloquetConfig(format!(
            "recoil needs left and right incidence, got {} and {}",
            left.incident, right.incident
        )));
    }
    let m = config.channel_count();
    if left.channels.len() != m || right.channels.len() != m {
        return Err(SimError::InvalidFloquetConfig(format!(
            "solutions have {}/{} channels, config has {}",
            left.channels.len(),
            right.channels.len(),
            m
        )));
    }

    let (power_right, momentum_right) = power_and_momentum(left);
    let (power_left, momentum_left) = power_and_momentum(right);
    let net_force = momentum_right - momentum_left;
    let total_power = power_right + power_left;
    let force_to_power = if total_power > POWER_FLOOR {
        net_force / total_power
    } else {
        0.0
    };
    Ok(FluxRecoil {
        power_right,
        momentum_right,
        power_left,
        momentum_left,
        net_force,
        force_to_power,
    })
}

/// Total transmission from each side and its difference δσ = T_L − T_R.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Asymmetry {
    pub phase: f64,
    pub left_transmission: f64,
    pub right_transmission: f64,
    pub delta_sigma: f64,
}

pub fn directional_asymmetry(config: &FloquetConfig) -> Result<Asymmetry> {
    let left = solve(config, Incident::Left)?;
    let right = solve(config, Incident::Right)?;
    unitarity_residual(&left);
    unitarity_residual(&right);
    let (tl, tr) = (left.total_transmitted(), right.total_transmitted());
    Ok(Asymmetry {
        phase: config.phase,
        left_transmission: tl,
        right_transmission: tr,
        delta_sigma: tl - tr,
    })
}

/// δσ at each drive phase, in input order.
pub fn phase_sweep(config: &FloquetConfig, phases: &[f64]) -> Result<Vec<Asymmetry>> {
    let at = |&phase: &f64| directional_asymmetry(&config.clone().with_phase(phase));
    #[cfg(feature = "parallel")]
    {
        phases.par_iter().map(at).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        phases.iter().map(at).collect()
    }
}

/// δσ(g₁) with a straight-line fit over the weak-drive points.
#[derive(Debug, Clone, PartialEq)]
pub struct AmplitudeScaling {
    pub g1_values: Vec<f64>,
    pub delta_sigma: Vec<f64>,
    pub slope: f64,
    pub intercept: f64,
    /// RMS residual of the fit
    pub rms_residual: f64,
    /// RMS residual below 1% of slope·g₁ at the last fitted point
    pub is_linear: bool,
}

/// Points used for the weak-drive fit.
pub const LINEAR_FIT_POINTS: usize = 4;

/// `count` evenly spaced drive amplitudes from 0 to 1.5·g₁.
pub fn amplitude_grid(g1: f64, count: usize) -> Vec<f64> {
    let top = 1.5 * g1;
    match count {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => (0..count)
            .map(|k| top * k as f64 / (count - 1) as f64)
            .collect(),
    }
}

/// Least-squares line y = slope·x + intercept.
pub fn fit_line(x: &[f64], y: &[f64]) -> (f64, f64) {
    let n = x.len().min(y.len()) as f64;
    if n == 0.0 {
        return (0.0, 0.0);
    }
    let mx = x.iter().sum::<f64>() / n;
    let my = y.iter().sum::<f64>() / n;
    let (sxy, sxx) = x
        .iter()
        .zip(y)
        .fold((0.0, 0.0), |(sxy, sxx), (xi, yi)| {
            (sxy + (xi - mx) * (yi - my), sxx + (xi - mx) * (xi - mx))
        });
    let slope = if sxx > 0.0 { sxy / sxx } else { 0.0 };
    (slope, my - slope * mx)
}

/// Sweep the drive amplitude at fixed g₀ and test weak-drive linearity.
pub fn amplitude_scaling(config: &FloquetConfig, g1_values: &[f64]) -> Result<AmplitudeScaling> {
    if g1_values.len() < LINEAR_FIT_POINTS {
        return Err(SimError::InvalidFloquetConfig(format!(
            "amplitude scaling needs at least {} drive amplitudes, got {}",
            LINEAR_FIT_POINTS,
            g1_values.len()
        )));
    }
    let delta_sigma = g1_values
        .iter()
        .map(|&g1| {
            directional_asymmetry(&config.clone().with_drive(config.g0, g1)).map(|a| a.delta_sigma)
        })
        .collect::<Result<Vec<f64>>>()?;

    let xs = &g1_values[..LINEAR_FIT_POINTS];
    let ys = &delta_sigma[..LINEAR_FIT_POINTS];
    let (slope, intercept) = fit_line(xs, ys);
    let rms_residual = (xs
        .iter()
        .zip(ys)
        .map(|(x, y)| (y - (slope * x + intercept)).powi(2))
        .sum::<f64>()
        / LINEAR_FIT_POINTS as f64)
        .sqrt();
    let is_linear = rms_residual < 0.01 * (slope * xs[LINEAR_FIT_POINTS - 1]).abs();

    Ok(AmplitudeScaling {
        g1_values: g1_values.to_vec(),
        delta_sigma,
        slope,
        intercept,
        rms_residual,
        is_linear,
    })
}

/// Closed-form `(r, t)` for two static deltas of strength `g` separated by
/// `a`, at wavenumber `k`:
///
///   β = g/(2ik),  t = 1/((1−β)² − β²e^{2ika}),  r = t(1 − β + βe^{2ika}) − 1
pub fn static_two_delta(k: f64, g: f64, a: f64) -> (Complex64, Complex64) {
    let one = Complex64::new(1.0, 0.0);
    let beta = Complex64::new(g, 0.0) / Complex64::new(0.0, 2.0 * k);
    let p2 = Complex64::from_polar(1.0, 2.0 * k * a);
    let t = one / ((one - beta) * (one - beta) - beta * beta * p2);
    let r = t * (one - beta + beta * p2) - one;
    (r, t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::PI;

    #[test]
    fn in_phase_drive_has_no_asymmetry_or_recoil() {
        let cfg = FloquetConfig::default().with_phase(0.0);
        let asym = directional_asymmetry(&cfg).unwrap();
        assert!(asym.delta_sigma.abs() < 1e-9, "δσ = {}", asym.delta_sigma);

        let left = solve(&cfg, Incident::Left).unwrap();
        let right = solve(&cfg, Incident::Right).unwrap();
        let recoil = flux_and_recoil(&cfg, &left, &right).unwrap();
        assert!(recoil.net_force.abs() < 1e-9);
        assert!(recoil.power_right > 0.0 && recoil.power_left > 0.0);
    }

    #[test]
    fn phase_reversal_flips_asymmetry() {
        let sweep = phase_sweep(&FloquetConfig::default(), &[PI / 2.0, -PI / 2.0]).unwrap();
        let (plus, minus) = (sweep[0].delta_sigma, sweep[1].delta_sigma);
        assert!((plus - 0.0716).abs() < 1e-3, "δσ(+π/2) = {}", plus);
        assert!(plus > 0.0 && minus < 0.0);
        assert!((plus + minus).abs() < 1e-6, "δσ(±π/2) not antisymmetric: {} {}", plus, minus);
        assert_eq!(sweep[1].phase, -PI / 2.0);
    }

    #[test]
    fn sweep_matches_pointwise_solves() {
        let cfg = FloquetConfig::default().with_sidebands(2);
        let phases = [0.0, PI / 4.0, PI / 2.0, 3.0 * PI / 4.0, PI];
        let sweep = phase_sweep(&cfg, &phases).unwrap();
        assert_eq!(sweep.len(), phases.len());
        for (a, &phi) in sweep.iter().zip(&phases) {
            let direct = directional_asymmetry(&cfg.clone().with_phase(phi)).unwrap();
            assert_eq!(a, &direct);
        }
    }

    #[test]
    fn recoil_respects_photon_rocket_bound() {
        let cfg = FloquetConfig::default();
        let left = solve(&cfg, Incident::Left).unwrap();
        let right = solve(&cfg, Incident::Right).unwrap();
        let recoil = flux_and_recoil(&cfg, &left, &right).unwrap();
        assert!(recoil.within_photon_rocket_bound(), "F/P = {}", recoil.force_to_power);
        assert!(recoil.force_to_power.abs() <= 1.0);
        assert!(flux_and_recoil(&cfg, &right, &left).is_err());
        let small = cfg.clone().with_sidebands(1);
        assert!(flux_and_recoil(&small, &left, &right).is_err());
    }

    #[test]
    fn unitarity_residual_is_tiny_for_converged_solve() {
        let sol = solve(&FloquetConfig::default(), Incident::Right).unwrap();
        assert!(unitarity_residual(&sol) < UNITARITY_TOLERANCE);
    }

    #[test]
    fn amplitude_scaling_starts_from_a_reciprocal_point() {
        let cfg = FloquetConfig::default().with_sidebands(2);
        let grid = amplitude_grid(cfg.g1, 6);
        assert_eq!(grid.len(), 6);
        assert_eq!(grid[0], 0.0);
        assert!((grid[5] - 2.25).abs() < 1e-12);

        let scaling = amplitude_scaling(&cfg, &grid).unwrap();
        assert_eq!(scaling.delta_sigma.len(), 6);
        assert!(scaling.delta_sigma[0].abs() < 1e-9, "no drive, δσ = {}", scaling.delta_sigma[0]);
        assert!(scaling.rms_residual >= 0.0);
        assert!(amplitude_scaling(&cfg, &grid[..3]).is_err());
    }

    #[test]
    fn line_fit_and_linearity_verdict() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let (m, b) = fit_line(&x, &[1.0, 3.0, 5.0, 7.0]);
        assert!((m - 2.0).abs() < 1e-12 && (b - 1.0).abs() < 1e-12);
        assert_eq!(fit_line(&[], &[]), (0.0, 0.0));
        assert_eq!(fit_line(&[1.0, 1.0], &[0.0, 2.0]), (0.0, 1.0));
    }

    #[test]
    fn closed_form_two_delta() {
        let (r, t) = static_two_delta(1.5, 2.0, 2.0);
        assert!((t - Complex64::new(0.40475, -0.49822)).norm() < 1e-4);
        assert!((r - Complex64::new(-0.65742, -0.39466)).norm() < 1e-4);
        assert!((r.norm_sqr() + t.norm_sqr() - 1.0).abs() < 1e-12);
        let (r0, t0) = static_two_delta(1.5, 0.0, 2.0);
        assert!(r0.norm() < 1e-15 && (t0 - 1.0).norm() < 1e-15);
    }
}
