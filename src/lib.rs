//! # Vacuum Thrust Simulator
//!
//! Two independent engines for testing whether a driven boundary can extract
//! net momentum from a fluctuating field:
//!
//! ```text
//! VacuumChamber (time domain)
//!   1-D scalar field, leapfrog FDTD, hard walls
//!   ↓ optional Langevin bath (γ, T) with FDT noise
//!   ↓ per-step force on the potential + field energy
//!   ↓ net impulse / lock-in at the drive frequency
//!
//! Floquet solver (frequency domain)
//!   two delta couplers driven at Ω, sidebands n = −N..=N
//!   ↓ dense matching system, LU solve
//!   ↓ R_n, T_n, flux conservation, δσ = T_L − T_R, recoil F/P
//! ```
//!
//! ## Null hypotheses
//!
//! - A static barrier in a symmetric chamber produces no net impulse.
//! - A driven scatterer conserves flux, and its recoil never beats a photon
//!   rocket (F/P ≤ 1).
//! - Asymmetric transmission requires a drive phase; δσ flips with φ.
//!
//! ## References
//!
//! - Taflove & Hagness (2005), "Computational Electrodynamics: The
//!   Finite-Difference Time-Domain Method"
//! - Kubo (1966), "The fluctuation-dissipation theorem"
//! - Li & Reichl (1999), "Floquet scattering through a time-periodic
//!   potential"
//! - Moskalets & Büttiker (2002), "Floquet scattering theory of quantum
//!   pumps"

pub mod analysis;
pub mod chamber;
pub mod error;
pub mod floquet;
pub mod grid;
pub mod lockin;
pub mod noise;
pub mod potential;
pub mod stencil;
pub mod telemetry;
pub mod units;

pub use error::{Result, SimError};

/// Common imports for drivers.
pub mod prelude {
    pub use crate::analysis::{is_thrusting, net_impulse, EnsembleStats, SteadyStateImpulse};
    pub use crate::chamber::{ChamberConfig, VacuumChamber};
    pub use crate::error::{Result, SimError};
    pub use crate::floquet::{
        directional_asymmetry, flux_and_recoil, phase_sweep, solve, unitarity_residual,
        FloquetConfig, FloquetSolution, Incident,
    };
    pub use crate::grid::Grid;
    pub use crate::lockin::{lock_in, LockIn};
    pub use crate::noise::ThermalBath;
    pub use crate::potential::{gaussian_barrier, CouplerPair, CouplingDrive, SawtoothStroke};
    pub use crate::telemetry::Telemetry;
}
