//! Phase-sensitive (lock-in) detection of a periodic force component.
//!
//! A pump driven at Ω should leave a coherent component of the mirror force
//! at Ω even when its DC impulse is buried in thermal noise. Projecting the
//! force onto quadrature references after the transient,
//!
//!   I_sin = (2/T) ∫ F(t) sin(Ωt + θ) dt
//!   I_cos = (2/T) ∫ F(t) cos(Ωt + θ) dt
//!
//! recovers F = A sin(Ωt + θ + ψ) as A = √(I_sin² + I_cos²) and
//! ψ = atan2(I_cos, I_sin).

use crate::analysis::trapezoid_xy;
use crate::units::PI;

/// Quadrature components of a lock-in measurement.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LockIn {
    /// Projection on sin(Ωt + θ)
    pub i_sin: f64,
    /// Projection on cos(Ωt + θ)
    pub i_cos: f64,
    /// Samples that survived the transient cut
    pub samples: usize,
}

impl LockIn {
    pub fn amplitude(&self) -> f64 {
        self.i_sin.hypot(self.i_cos)
    }

    /// Phase ψ of F = A sin(Ωt + θ + ψ), in (−π, π].
    pub fn phase(&self) -> f64 {
        self.i_cos.atan2(self.i_sin)
    }
}

/// Lock-in projection of `force` sampled at `time` (same length, ascending).
///
/// Samples with `t < transient_time` are discarded. Fewer than two kept
/// samples, or a zero integration window, give zero components.
pub fn lock_in(
    force: &[f64],
    time: &[f64],
    omega: f64,
    transient_time: f64,
    phase_offset: f64,
) -> LockIn {
    let (t, f): (Vec<f64>, Vec<f64>) = time
        .iter()
        .zip(force)
        .filter(|(t, _)| **t >= transient_time)
        .map(|(t, f)| (*t, *f))
        .unzip();

    let window = match (t.first(), t.last()) {
        (Some(first), Some(last)) => last - first,
        _ => 0.0,
    };
    if window <= 0.0 {
        return LockIn {
            samples: t.len(),
            ..LockIn::default()
        };
    }

    let weighted = |reference: fn(f64) -> f64| -> Vec<f64> {
        t.iter()
            .zip(&f)
            .map(|(ti, fi)| fi * reference(omega * ti + phase_offset))
            .collect()
    };
    let scale = 2.0 / window;
    LockIn {
        i_sin: scale * trapezoid_xy(&weighted(f64::sin), &t),
        i_cos: scale * trapezoid_xy(&weighted(f64::cos), &t),
        samples: t.len(),
    }
}

/// Drive period 2π/Ω.
pub fn drive_period(omega: f64) -> f64 {
    2.0 * PI / omega
}

/// Time after `cycles` drive periods.
pub fn transient_time(omega: f64, cycles: u32) -> f64 {
    drive_period(omega) * cycles as f64
}

/// `n` sample times k·dt.
pub fn uniform_times(n: usize, dt: f64) -> Vec<f64> {
    (0..n).map(|k| k as f64 * dt).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recovers_amplitude_and_phase_of_a_sinusoid() {
        let (omega, dt) = (1.0, 0.02);
        let n = (transient_time(omega, 20) / dt) as usize;
        let time = uniform_times(n, dt);
        let force: Vec<f64> = time.iter().map(|t| 0.7 * (omega * t + 0.4).sin()).collect();

        let li = lock_in(&force, &time, omega, transient_time(omega, 5), 0.0);
        assert!((li.amplitude() - 0.7).abs() < 0.01 * 0.7, "amplitude {}", li.amplitude());
        assert!((li.phase() - 0.4).abs() < 0.01, "phase {}", li.phase());
        assert!(li.samples < n);
    }

    #[test]
    fn rejects_off_frequency_and_dc() {
        let dt = 0.01;
        let time = uniform_times((transient_time(1.0, 30) / dt) as usize, dt);
        let force: Vec<f64> = time.iter().map(|t| 0.3 + (3.0 * t).sin()).collect();
        let li = lock_in(&force, &time, 1.0, 0.0, 0.0);
        assert!(li.amplitude() < 0.02, "leaked amplitude {}", li.amplitude());
    }

    #[test]
    fn phase_offset_rotates_the_reference() {
        let dt = 0.01;
        let time = uniform_times((transient_time(1.0, 10) / dt) as usize, dt);
        let force: Vec<f64> = time.iter().map(|t| t.sin()).collect();
        let li = lock_in(&force, &time, 1.0, 0.0, 0.5);
        assert!((li.phase() + 0.5).abs() < 0.02, "phase {}", li.phase());
        assert!((li.amplitude() - 1.0).abs() < 0.02);
    }

    #[test]
    fn degenerate_windows_are_zero() {
        let time = uniform_times(10, 0.1);
        let force = vec![1.0; 10];
        assert_eq!(lock_in(&force, &time, 1.0, 5.0, 0.0).amplitude(), 0.0);
        let single = lock_in(&force, &time, 1.0, 0.9, 0.0);
        assert_eq!(single.samples, 1);
        assert_eq!(single.amplitude(), 0.0);
        assert_eq!(lock_in(&[], &[], 1.0, 0.0, 0.0), LockIn::default());
    }

    #[test]
    fn period_helpers() {
        assert!((drive_period(2.0) - PI).abs() < 1e-15);
        assert!((transient_time(1.0, 5) - 10.0 * PI).abs() < 1e-12);
        assert_eq!(uniform_times(3, 0.5), vec![0.0, 0.5, 1.0]);
    }
}
