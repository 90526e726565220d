//! Potential profiles V(x) for driving the chamber.
//!
//! The chamber sees its "mirror" only through V(x,t) in the field equation.
//! A solid mirror is a tall Gaussian barrier; a Floquet pump is a pair of
//! Gaussian couplers whose strengths are modulated in time.

use crate::error::{Result, SimError};
use crate::grid::Grid;

/// Gaussian barrier height·exp(−(x−center)²/2width²) sampled on `grid`.
pub fn gaussian_barrier(grid: &Grid, center: f64, width: f64, height: f64) -> Vec<f64> {
    let mut v = vec![0.0; grid.nx()];
    fill_gaussian(grid, center, width, height, &mut v);
    v
}

fn fill_gaussian(grid: &Grid, center: f64, width: f64, height: f64, out: &mut [f64]) {
    let inv = 1.0 / (2.0 * width * width);
    for (i, v) in out.iter_mut().enumerate() {
        let u = grid.x(i) - center;
        *v = height * (-u * u * inv).exp();
    }
}

/// Two Gaussian couplers with fixed shapes and independent strengths.
#[derive(Debug, Clone)]
pub struct CouplerPair {
    profile_a: Vec<f64>,
    profile_b: Vec<f64>,
}

impl CouplerPair {
    pub fn new(grid: &Grid, positions: (f64, f64), widths: (f64, f64)) -> Self {
        Self {
            profile_a: gaussian_barrier(grid, positions.0, widths.0, 1.0),
            profile_b: gaussian_barrier(grid, positions.1, widths.1, 1.0),
        }
    }

    /// Equal-width couplers placed symmetrically about the chamber center.
    pub fn centered(grid: &Grid, separation: f64, width: f64) -> Self {
        let c = grid.center();
        Self::new(
            grid,
            (c - separation / 2.0, c + separation / 2.0),
            (width, width),
        )
    }

    /// Couplers normalised to unit area, Σ profile·dx = 1, so that g is the
    /// integrated strength of a delta-like coupler.
    ///
    /// Fails if either profile has no weight on the grid.
    pub fn unit_area(grid: &Grid, positions: (f64, f64), widths: (f64, f64)) -> Result<Self> {
        let mut pair = Self::new(grid, positions, widths);
        normalise(&mut pair.profile_a, grid.dx(), positions.0)?;
        normalise(&mut pair.profile_b, grid.dx(), positions.1)?;
        Ok(pair)
    }

    /// [`unit_area`](Self::unit_area) couplers placed symmetrically about
    /// the chamber center.
    pub fn centered_unit_area(grid: &Grid, separation: f64, width: f64) -> Result<Self> {
        let c = grid.center();
        Self::unit_area(
            grid,
            (c - separation / 2.0, c + separation / 2.0),
            (width, width),
        )
    }

    /// V = g_a·profile_a + g_b·profile_b
    pub fn potential(&self, g_a: f64, g_b: f64) -> Vec<f64> {
        let mut v = vec![0.0; self.profile_a.len()];
        self.potential_into(g_a, g_b, &mut v);
        v
    }

    /// Write V = g_a·profile_a + g_b·profile_b into `out`.
    pub fn potential_into(&self, g_a: f64, g_b: f64, out: &mut [f64]) {
        for ((v, a), b) in out.iter_mut().zip(&self.profile_a).zip(&self.profile_b) {
            *v = g_a * a + g_b * b;
        }
    }
}

fn normalise(profile: &mut [f64], dx: f64, position: f64) -> Result<()> {
    let area = profile.iter().sum::<f64>() * dx;
    if !(area > 0.0 && area.is_finite()) {
        return Err(SimError::InvalidParameter { name: "coupler position", value: position });
    }
    profile.iter_mut().for_each(|p| *p /= area);
    Ok(())
}

/// Harmonic coupling g(t) = g0 + g1·cos(Ωt + phase).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CouplingDrive {
    pub g0: f64,
    pub g1: f64,
    pub phase: f64,
}

impl CouplingDrive {
    /// Fully modulated drive g(t) = g·[1 + cos(Ωt + phase)], never negative.
    pub fn full_depth(g: f64, phase: f64) -> Self {
        Self { g0: g, g1: g, phase }
    }

    pub fn at(&self, omega: f64, t: f64) -> f64 {
        self.g0 + self.g1 * (omega * t + self.phase).cos()
    }
}

/// Cubic ease 3p² − 2p³ on [0, 1].
pub fn smoothstep(p: f64) -> f64 {
    3.0 * p * p - 2.0 * p * p * p
}

/// Asymmetric mirror stroke: rest, fast excursion at low coupling, slow
/// return at full coupling, rest.
///
/// Times are in steps. Displacement is added to the rest position.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SawtoothStroke {
    pub amplitude: f64,
    pub start: usize,
    pub rise: usize,
    pub fall: usize,
    /// Coupling while moving out
    pub slip_coupling: f64,
    /// Coupling at rest and while moving back
    pub grip_coupling: f64,
}

impl Default for SawtoothStroke {
    fn default() -> Self {
        Self {
            amplitude: 15.0,
            start: 500,
            rise: 100,
            fall: 1000,
            slip_coupling: 0.1,
            grip_coupling: 1.0,
        }
    }
}

impl SawtoothStroke {
    /// `(displacement, coupling)` at step `step`.
    pub fn at(&self, step: usize) -> (f64, f64) {
        let out_end = self.start + self.rise;
        let back_end = out_end + self.fall;
        if step < self.start {
            (0.0, self.grip_coupling)
        } else if step < out_end {
            let p = (step - self.start) as f64 / self.rise as f64;
            (self.amplitude * smoothstep(p), self.slip_coupling)
        } else if step < back_end {
            let p = (step - out_end) as f64 / self.fall as f64;
            (self.amplitude * (1.0 - smoothstep(p)), self.grip_coupling)
        } else {
            (0.0, self.grip_coupling)
        }
    }
}
