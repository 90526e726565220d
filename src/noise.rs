//! Viscous damping and fluctuation-dissipation-compliant thermal forcing.
//!
//! The chamber field obeys the Langevin wave equation
//!
//!   ∂²φ/∂t² + γ ∂φ/∂t − c² ∂²φ/∂x² = −V(x,t) φ + ξ(x,t)
//!
//! where ξ is white noise. For the bath to describe a temperature T the
//! fluctuation-dissipation theorem fixes the per-step noise amplitude:
//!
//!   σ_ξ = √(2 γ k_B T / dt)
//!
//! A bath with either γ = 0 or T = 0 injects no noise. The undamped,
//! deterministic chamber is the `ThermalBath::none()` bath.

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::error::{Result, SimError};
use crate::units::{thermal_energy, DEFAULT_DT};

/// Damping rate, temperature and timestep of a Langevin bath.
///
/// `noise_scale` is derived once in [`ThermalBath::new`] and the fields are
/// private, so it always satisfies the FDT relation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThermalBath {
    gamma: f64,
    temperature: f64,
    dt: f64,
    noise_scale: f64,
}

/// FDT noise amplitude σ = √(2γk_BT/dt), zero unless γ > 0 and T > 0.
pub fn fdt_noise_scale(gamma: f64, temperature: f64, dt: f64) -> f64 {
    if gamma > 0.0 && temperature > 0.0 {
        (2.0 * gamma * thermal_energy(temperature) / dt).sqrt()
    } else {
        0.0
    }
}

impl ThermalBath {
    pub fn new(gamma: f64, temperature: f64, dt: f64) -> Result<Self> {
        if !gamma.is_finite() || gamma < 0.0 {
            return Err(SimError::InvalidParameter { name: "gamma", value: gamma });
        }
        if !temperature.is_finite() || temperature < 0.0 {
            return Err(SimError::InvalidParameter {
                name: "temperature",
                value: temperature,
            });
        }
        if !dt.is_finite() || dt <= 0.0 {
            return Err(SimError::InvalidParameter { name: "dt", value: dt });
        }
        Ok(Self {
            gamma,
            temperature,
            dt,
            noise_scale: fdt_noise_scale(gamma, temperature, dt),
        })
    }

    /// No damping, no noise. `dt` is only a default for [`crate::chamber::VacuumChamber::step_damped`].
    pub fn none(dt: f64) -> Result<Self> {
        Self::new(0.0, 0.0, dt)
    }

    /// Silent bath at [`DEFAULT_DT`].
    pub fn silent() -> Self {
        Self {
            gamma: 0.0,
            temperature: 0.0,
            dt: DEFAULT_DT,
            noise_scale: 0.0,
        }
    }

    /// Viscous damping rate γ
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Bath temperature (k_B = 1)
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Timestep the noise amplitude was calibrated for
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Standard deviation of the per-sample forcing ξ
    pub fn noise_scale(&self) -> f64 {
        self.noise_scale
    }

    pub fn is_stochastic(&self) -> bool {
        self.noise_scale > 0.0
    }

    /// Fill `out` with one independent draw of the forcing field.
    ///
    /// Leaves `out` zeroed and does not touch `rng` when the bath is
    /// deterministic, so seeded runs without noise stay reproducible.
    pub fn sample_into<R: Rng>(&self, rng: &mut R, out: &mut [f64]) {
        match Normal::new(0.0, self.noise_scale) {
            Ok(normal) if self.is_stochastic() => {
                for xi in out.iter_mut() {
                    *xi = normal.sample(rng);
                }
            }
            _ => out.iter_mut().for_each(|xi| *xi = 0.0),
        }
    }
}

// ─── Kani formal verification harnesses ─────────────────────────────────────
#[cfg(kani)]
mod kani_proofs {
    use super::*;

    /// Prove the FDT amplitude never panics and is never negative.
    #[kani::proof]
    fn fdt_noise_scale_non_negative() {
        let gamma: f64 = kani::any();
        let temperature: f64 = kani::any();
        let dt: f64 = kani::any();
        kani::assume(gamma.is_finite() && temperature.is_finite());
        kani::assume(dt.is_finite() && dt > 0.0);
        let sigma = fdt_noise_scale(gamma, temperature, dt);
        assert!(!(sigma < 0.0));
    }
}
