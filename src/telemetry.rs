//! Per-step chamber telemetry.

use crate::analysis;

/// Append-only time series recorded by a [`crate::chamber::VacuumChamber`].
///
/// `mirror_force` and `total_energy` get exactly one entry per completed
/// step. `switching_work` gets one entry per switching-work step and
/// `mirror_position` is filled by the driver.
#[derive(Debug, Clone, Default)]
pub struct Telemetry {
    /// Back-reaction force on the potential source, −Σφ²∂V/∂x·dx
    pub mirror_force: Vec<f64>,
    /// Discretised field Hamiltonian
    pub total_energy: Vec<f64>,
    /// Barrier/mirror center recorded by the driver
    pub mirror_position: Vec<f64>,
    /// Work done on the field by switching the potential, ½Σφ²ΔV·dx
    pub switching_work: Vec<f64>,
}

impl Telemetry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve room for `steps` more force/energy samples.
    pub fn with_capacity(steps: usize) -> Self {
        Self {
            mirror_force: Vec::with_capacity(steps),
            total_energy: Vec::with_capacity(steps),
            mirror_position: Vec::new(),
            switching_work: Vec::new(),
        }
    }

    pub(crate) fn record_step(&mut self, force: f64, energy: f64) {
        self.mirror_force.push(force);
        self.total_energy.push(energy);
    }

    pub(crate) fn record_switching_work(&mut self, work: f64) {
        self.switching_work.push(work);
    }

    pub fn record_mirror_position(&mut self, x: f64) {
        self.mirror_position.push(x);
    }

    /// Completed steps
    pub fn len(&self) -> usize {
        self.mirror_force.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mirror_force.is_empty()
    }

    /// Trapezoidal time integral of the back-reaction force.
    pub fn net_impulse(&self, dt: f64) -> f64 {
        analysis::net_impulse(&self.mirror_force, dt)
    }

    /// Total switching work injected by the driver.
    pub fn total_switching_work(&self) -> f64 {
        self.switching_work.iter().sum()
    }

    /// Largest relative deviation of the energy series from its first sample.
    ///
    /// Returns `None` for an empty series or a zero initial energy.
    pub fn energy_drift(&self) -> Option<f64> {
        let e0 = *self.total_energy.first()?;
        if e0 == 0.0 {
            return None;
        }
        let (lo, hi) = self
            .total_energy
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &e| (lo.min(e), hi.max(e)));
        Some((hi - lo) / e0.abs())
    }

    /// Time axis t_k = k·dt for the recorded steps.
    pub fn times(&self, dt: f64) -> Vec<f64> {
        (0..self.len()).map(|k| k as f64 * dt).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn force_and_energy_stay_paired() {
        let mut t = Telemetry::with_capacity(4);
        t.record_step(1.0, 10.0);
        t.record_step(-1.0, 11.0);
        assert_eq!(t.len(), 2);
        assert_eq!(t.mirror_force, vec![1.0, -1.0]);
        assert_eq!(t.total_energy, vec![10.0, 11.0]);
        assert_eq!(t.times(0.5), vec![0.0, 0.5]);
    }

    #[test]
    fn energy_drift_is_relative_spread() {
        let mut t = Telemetry::new();
        assert_eq!(t.energy_drift(), None);
        for e in [2.0, 2.1, 1.9, 2.0] {
            t.record_step(0.0, e);
        }
        let drift = t.energy_drift().unwrap();
        assert!((drift - 0.1).abs() < 1e-12, "drift = {}", drift);
    }

    #[test]
    fn switching_work_accumulates() {
        let mut t = Telemetry::new();
        t.record_switching_work(0.25);
        t.record_switching_work(-0.05);
        assert!((t.total_switching_work() - 0.2).abs() < 1e-12);
    }
}
