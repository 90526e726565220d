//! Floquet multichannel scattering off two harmonically driven couplers.
//!
//! # Model
//!
//! A particle with E = k² (ℏ = 2m = 1) meets delta couplers at x = 0 and
//! x = a whose strengths oscillate at Ω:
//!
//!   −ψ'' + [g_1(t)δ(x) + g_2(t)δ(x − a)] ψ = i ∂ψ/∂t
//!   g_j(t) = g0 + g1 cos(Ωt + φ_j),   φ_1 = 0, φ_2 = φ
//!
//! The drive couples energy sidebands E_n = E₀ + nΩ. Truncating to
//! n ∈ −N..=N gives a dense 4M × 4M linear system (M = 2N + 1) for the
//! reflected, transmitted and interior amplitudes of every channel.
//!
//! # Reciprocity
//!
//! With φ = 0 the scatterer is mirror-symmetric and transmits equally from
//! both sides. A phase offset breaks time-reversal symmetry of the drive
//! and makes δσ = T_L − T_R non-zero, odd in φ. Flux leaving through open
//! channels carries momentum; the net recoil is bounded by a photon rocket
//! (F/P ≤ 1).

mod assembly;
mod config;
mod observables;
mod solver;

pub use assembly::{Block, Boundary, Condition, Row, SystemBuilder};
pub use config::{Channel, FloquetConfig, Harmonics, Incident};
pub use observables::{
    amplitude_grid, amplitude_scaling, directional_asymmetry, fit_line, flux_and_recoil,
    phase_sweep, static_two_delta, unitarity_residual, AmplitudeScaling, Asymmetry, FluxRecoil,
    LINEAR_FIT_POINTS,
};
pub use solver::{solve, FloquetSolution};
