//! Impulse integration and run statistics.
//!
//! The thrust question reduces to one number per run, the net impulse
//!
//!   J = ∫ F(t) dt
//!
//! on the mirror force series. A run is "thrusting" when |J| exceeds
//! [`IMPULSE_THRESHOLD`]. For noisy runs the single number is paired with
//! its standard error so that J can be compared against the noise floor.

use crate::units::IMPULSE_THRESHOLD;

/// Trapezoidal integral of uniformly spaced samples.
pub fn trapezoid(y: &[f64], dx: f64) -> f64 {
    if y.len() < 2 {
        return 0.0;
    }
    let inner: f64 = y[1..y.len() - 1].iter().sum();
    dx * (0.5 * (y[0] + y[y.len() - 1]) + inner)
}

/// Trapezoidal integral of `y` over the (possibly non-uniform) abscissa `x`.
///
/// Only the common prefix of the two slices is used.
pub fn trapezoid_xy(y: &[f64], x: &[f64]) -> f64 {
    y.windows(2)
        .zip(x.windows(2))
        .map(|(yw, xw)| 0.5 * (yw[0] + yw[1]) * (xw[1] - xw[0]))
        .sum()
}

/// Net impulse J = ∫F dt of a force series sampled every `dt`.
pub fn net_impulse(force: &[f64], dt: f64) -> f64 {
    trapezoid(force, dt)
}

/// Whether an impulse is distinguishable from zero.
pub fn is_thrusting(impulse: f64) -> bool {
    impulse.abs() > IMPULSE_THRESHOLD
}

fn mean_and_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, var.sqrt())
}

fn ratio(signal: f64, noise: f64) -> f64 {
    if noise > 0.0 {
        signal.abs() / noise
    } else if signal != 0.0 {
        f64::INFINITY
    } else {
        0.0
    }
}

/// Impulse accumulated after the transient, with its noise floor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteadyStateImpulse {
    /// ⟨F⟩·dt·N over the kept samples
    pub impulse: f64,
    /// Mean force
    pub mean_force: f64,
    /// Standard error of the mean force, σ_F/√N
    pub std_error: f64,
    /// |⟨F⟩| / std_error
    pub snr: f64,
    /// Number of samples kept
    pub samples: usize,
}

impl SteadyStateImpulse {
    /// Drop the first ⌊len·transient_fraction⌋ samples of `force`, then
    /// integrate the rest as a rectangle sum.
    pub fn from_force(force: &[f64], dt: f64, transient_fraction: f64) -> Self {
        let skip = ((force.len() as f64) * transient_fraction.clamp(0.0, 1.0)).floor() as usize;
        let kept = &force[skip.min(force.len())..];
        let (mean, std) = mean_and_std(kept);
        let n = kept.len();
        let std_error = if n > 0 { std / (n as f64).sqrt() } else { 0.0 };
        Self {
            impulse: mean * dt * n as f64,
            mean_force: mean,
            std_error,
            snr: ratio(mean, std_error),
            samples: n,
        }
    }

    pub fn is_thrusting(&self) -> bool {
        is_thrusting(self.impulse)
    }
}

/// Spread of one observable over independent realisations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnsembleStats {
    pub mean: f64,
    /// Population standard deviation
    pub std: f64,
    /// |mean| / std
    pub snr: f64,
    pub count: usize,
}

impl EnsembleStats {
    pub fn from_samples(values: &[f64]) -> Self {
        let (mean, std) = mean_and_std(values);
        Self {
            mean,
            std,
            snr: ratio(mean, std),
            count: values.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trapezoid_integrates_linear_exactly() {
        let dx = 0.1;
        let y: Vec<f64> = (0..11).map(|i| 2.0 * i as f64 * dx).collect();
        assert!((trapezoid(&y, dx) - 1.0).abs() < 1e-12);
        let x: Vec<f64> = (0..11).map(|i| i as f64 * dx).collect();
        assert!((trapezoid_xy(&y, &x) - 1.0).abs() < 1e-12);
        assert_eq!(trapezoid(&[3.0], dx), 0.0);
        assert_eq!(trapezoid_xy(&[], &[]), 0.0);
    }

    #[test]
    fn trapezoid_xy_handles_uneven_spacing() {
        let x = [0.0, 0.5, 2.0];
        let y = [1.0, 1.0, 1.0];
        assert!((trapezoid_xy(&y, &x) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn antisymmetric_force_has_no_net_impulse() {
        let force: Vec<f64> = (0..=100)
            .map(|k| (2.0 * std::f64::consts::PI * k as f64 / 100.0).sin())
            .collect();
        let j = net_impulse(&force, 0.01);
        assert!(j.abs() < 1e-12, "impulse {} should vanish", j);
        assert!(!is_thrusting(j));
        assert!(is_thrusting(2e-4));
        assert!(is_thrusting(-2e-4));
    }

    #[test]
    fn steady_state_drops_transient() {
        let mut force = vec![100.0; 25];
        force.extend(std::iter::repeat(0.5).take(75));
        let ss = SteadyStateImpulse::from_force(&force, 0.1, 0.25);
        assert_eq!(ss.samples, 75);
        assert!((ss.impulse - 0.5 * 0.1 * 75.0).abs() < 1e-12);
        assert_eq!(ss.std_error, 0.0);
        assert!(ss.snr.is_infinite());
        assert!(ss.is_thrusting());
    }

    #[test]
    fn steady_state_noise_floor_is_standard_error() {
        let force: Vec<f64> = (0..400).map(|k| if k % 2 == 0 { 1.0 } else { -1.0 }).collect();
        let ss = SteadyStateImpulse::from_force(&force, 0.05, 0.0);
        assert_eq!(ss.mean_force, 0.0);
        assert!((ss.std_error - 1.0 / 20.0).abs() < 1e-12);
        assert_eq!(ss.snr, 0.0);
    }

    #[test]
    fn empty_series_is_quiet() {
        let ss = SteadyStateImpulse::from_force(&[], 0.1, 0.5);
        assert_eq!(ss.samples, 0);
        assert_eq!(ss.impulse, 0.0);
        let stats = EnsembleStats::from_samples(&[]);
        assert_eq!(stats.count, 0);
        assert_eq!(stats.snr, 0.0);
    }

    #[test]
    fn ensemble_stats_use_population_std() {
        let stats = EnsembleStats::from_samples(&[1.0, 3.0]);
        assert_eq!(stats.mean, 2.0);
        assert_eq!(stats.std, 1.0);
        assert_eq!(stats.snr, 2.0);
        assert_eq!(stats.count, 2);
    }
}
