//! Simulation units and shared thresholds.
//!
//! Both engines work in natural units: the field integrator uses k_B = 1 so
//! that "temperature" is an energy, and the Floquet model uses ℏ = 2m = 1 so
//! that E = k². The photon-rocket bound F/P ≤ 1 assumes c = 1.

/// Boltzmann constant in simulation units.
pub const KB: f64 = 1.0;

/// Pi
pub const PI: f64 = std::f64::consts::PI;

/// Baseline field timestep: Courant number 0.5 at c = 1, dx = 0.1.
pub const DEFAULT_DT: f64 = 0.05;

/// Largest acceptable flux-conservation error for a Floquet solution.
pub const UNITARITY_TOLERANCE: f64 = 1e-6;

/// Net impulse magnitude above which a run is flagged as thrusting.
pub const IMPULSE_THRESHOLD: f64 = 1e-4;

/// Force-to-power ratio of a perfectly collimated photon rocket (c = 1).
pub const PHOTON_ROCKET_BOUND: f64 = 1.0;

/// Total power below which a force-to-power ratio is reported as zero.
pub const POWER_FLOOR: f64 = 1e-12;

/// Thermal energy k_B·T
pub fn thermal_energy(temperature: f64) -> f64 {
    KB * temperature
}

/// Wavenumber of a free channel at energy `e` (ℏ = 2m = 1).
/// Only meaningful for `e > 0`.
pub fn wavenumber(e: f64) -> f64 {
    e.sqrt()
}

// ─── Kani formal verification harnesses ─────────────────────────────────────
#[cfg(kani)]
mod kani_proofs {
    use super::*;

    /// Prove thermal_energy never panics for any f64 input.
    #[kani::proof]
    fn thermal_energy_no_panic() {
        let t: f64 = kani::any();
        let _ = thermal_energy(t);
    }

    /// Prove all thresholds are positive and finite.
    #[kani::proof]
    fn thresholds_are_valid() {
        assert!(UNITARITY_TOLERANCE > 0.0 && UNITARITY_TOLERANCE.is_finite());
        assert!(IMPULSE_THRESHOLD > 0.0 && IMPULSE_THRESHOLD.is_finite());
        assert!(PHOTON_ROCKET_BOUND > 0.0 && PHOTON_ROCKET_BOUND.is_finite());
        assert!(POWER_FLOOR > 0.0 && POWER_FLOOR.is_finite());
    }
}
