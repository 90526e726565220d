//! Uniform 1-D grid.

use crate::error::{Result, SimError};

/// Immutable sampling of the chamber: `nx` points spaced by `dx`.
///
/// Sample `i` sits at `x_i = i·dx`. The two end samples are the hard walls.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Grid {
    nx: usize,
    dx: f64,
}

impl Grid {
    /// Smallest grid with at least one interior sample.
    pub const MIN_POINTS: usize = 3;

    pub fn new(nx: usize, dx: f64) -> Result<Self> {
        if nx < Self::MIN_POINTS || !dx.is_finite() || dx <= 0.0 {
            return Err(SimError::InvalidGrid { nx, dx });
        }
        Ok(Self { nx, dx })
    }

    /// Number of samples
    pub fn nx(&self) -> usize {
        self.nx
    }

    /// Spatial step
    pub fn dx(&self) -> f64 {
        self.dx
    }

    /// Physical extent x_{nx-1} - x_0
    pub fn length(&self) -> f64 {
        (self.nx - 1) as f64 * self.dx
    }

    /// Chamber center, nx·dx/2.
    pub fn center(&self) -> f64 {
        self.nx as f64 * self.dx / 2.0
    }

    /// Coordinate of sample `i`.
    #[inline]
    pub fn x(&self, i: usize) -> f64 {
        i as f64 * self.dx
    }

    /// All sample coordinates.
    pub fn coordinates(&self) -> Vec<f64> {
        (0..self.nx).map(|i| self.x(i)).collect()
    }

    /// Fail unless `len` matches the number of samples.
    pub(crate) fn check_len(&self, len: usize) -> Result<()> {
        if len != self.nx {
            return Err(SimError::LengthMismatch {
                expected: self.nx,
                actual: len,
            });
        }
        Ok(())
    }
}
