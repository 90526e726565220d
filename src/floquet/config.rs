//! Floquet problem definition: drive, geometry and channel ladder.

use std::fmt;
use std::str::FromStr;

use num_complex::Complex64;

use crate::error::{Result, SimError};
use crate::units::{wavenumber, PI};

/// Two harmonically driven delta couplers at x = 0 and x = a.
///
/// Coupler strengths are g(t) = g0 + g1·cos(Ωt + φ), with φ = 0 at x = 0
/// and φ = `phase` at x = a. Units: ℏ = 2m = 1, so E = k².
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FloquetConfig {
    /// Incident energy E₀ (> 0)
    pub e0: f64,
    /// Drive frequency Ω
    pub omega: f64,
    /// Sideband truncation N; channels n = −N..=N
    pub n_sidebands: usize,
    /// Coupler separation a (> 0)
    pub separation: f64,
    /// Static coupling g₀
    pub g0: f64,
    /// Drive amplitude g₁
    pub g1: f64,
    /// Drive phase of the second coupler
    pub phase: f64,
}

impl Default for FloquetConfig {
    /// k₀ = 1.5 incident on a 2-unit cavity, four sidebands, quadrature drive.
    fn default() -> Self {
        Self {
            e0: 2.25,
            omega: 1.0,
            n_sidebands: 4,
            separation: 2.0,
            g0: 2.0,
            g1: 1.5,
            phase: PI / 2.0,
        }
    }
}

impl FloquetConfig {
    pub fn with_phase(mut self, phase: f64) -> Self {
        self.phase = phase;
        self
    }

    pub fn with_drive(mut self, g0: f64, g1: f64) -> Self {
        self.g0 = g0;
        self.g1 = g1;
        self
    }

    pub fn with_sidebands(mut self, n_sidebands: usize) -> Self {
        self.n_sidebands = n_sidebands;
        self
    }

    pub fn validate(&self) -> Result<()> {
        let finite = [
            ("e0", self.e0),
            ("omega", self.omega),
            ("separation", self.separation),
            ("g0", self.g0),
            ("g1", self.g1),
            ("phase", self.phase),
        ];
        if let Some((name, value)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(SimError::InvalidFloquetConfig(format!(
                "{} must be finite, got {}",
                name, value
            )));
        }
        if self.e0 <= 0.0 {
            return Err(SimError::InvalidFloquetConfig(format!(
                "incident energy must be positive, got {}",
                self.e0
            )));
        }
        if self.separation <= 0.0 {
            return Err(SimError::InvalidFloquetConfig(format!(
                "coupler separation must be positive, got {}",
                self.separation
            )));
        }
        Ok(())
    }

    /// M = 2N + 1
    pub fn channel_count(&self) -> usize {
        2 * self.n_sidebands + 1
    }

    /// Incident wavenumber k₀ = √E₀.
    pub fn k0(&self) -> f64 {
        wavenumber(self.e0)
    }

    /// Channel ladder in order n = −N..=N.
    pub fn channels(&self) -> Vec<Channel> {
        let n = self.n_sidebands as isize;
        (-n..=n)
            .map(|order| Channel::new(order, self.e0 + order as f64 * self.omega))
            .collect()
    }

    /// Fourier harmonics of the coupler at x = 0.
    pub fn origin_coupler(&self) -> Harmonics {
        Harmonics::cosine(self.g0, self.g1, 0.0)
    }

    /// Fourier harmonics of the coupler at x = a.
    pub fn far_coupler(&self) -> Harmonics {
        Harmonics::cosine(self.g0, self.g1, self.phase)
    }
}

/// One Floquet sideband.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Channel {
    /// Sideband order n
    pub order: isize,
    /// E_n = E₀ + nΩ
    pub energy: f64,
    /// √E_n when open, i√(−E_n) when evanescent
    pub k: Complex64,
}

impl Channel {
    pub fn new(order: isize, energy: f64) -> Self {
        let k = if energy > 0.0 {
            Complex64::new(wavenumber(energy), 0.0)
        } else {
            Complex64::new(0.0, (-energy).sqrt())
        };
        Self { order, energy, k }
    }

    /// Propagating (carries flux to infinity).
    pub fn is_open(&self) -> bool {
        self.energy > 0.0
    }

    /// E_n = 0 exactly: k = 0, neither propagating nor decaying.
    pub fn is_threshold(&self) -> bool {
        self.energy == 0.0
    }
}

/// First-order Fourier coefficients g_m, m ∈ {−1, 0, 1}, of a periodic
/// coupling. They mix sidebands as (g⋆ψ)_n = Σ_m g_m ψ_{n−m}.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Harmonics {
    coefficients: [(isize, Complex64); 3],
}

impl Harmonics {
    /// g0 + g1·cos(Ωt + phase) ↦ {0: g0, ±1: ½g1·e^{±i·phase}}
    pub fn cosine(g0: f64, g1: f64, phase: f64) -> Self {
        let half = 0.5 * g1;
        Self {
            coefficients: [
                (-1, Complex64::from_polar(half, -phase)),
                (0, Complex64::new(g0, 0.0)),
                (1, Complex64::from_polar(half, phase)),
            ],
        }
    }

    /// `(m, g_m)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (isize, Complex64)> + '_ {
        self.coefficients.iter().copied()
    }
}

/// Side from which the unit-amplitude wave in channel n = 0 arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Incident {
    Left,
    Right,
}

impl fmt::Display for Incident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Incident::Left => write!(f, "left"),
            Incident::Right => write!(f, "right"),
        }
    }
}

impl FromStr for Incident {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "left" => Ok(Incident::Left),
            "right" => Ok(Incident::Right),
            other => Err(SimError::UnknownIncident(other.to_string())),
        }
    }
}
