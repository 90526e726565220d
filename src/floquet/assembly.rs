//! Block-structured assembly of the matching equations.
//!
//! Unknowns are laid out `[r | t | A | B]`, each block holding one amplitude
//! per channel in ladder order. Equations are laid out per boundary and
//! channel: at x = 0 rows `2i` (continuity) and `2i + 1` (derivative jump),
//! at x = a rows `2M + 2i` and `2M + 2i + 1`. Callers address entries by
//! `(Boundary, Condition, channel)` and `(Block, channel)` only.

use nalgebra::{DMatrix, DVector};
use num_complex::Complex64;

/// Amplitude block of the unknown vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Block {
    /// r: reflected amplitudes
    Reflected,
    /// t: transmitted amplitudes
    Transmitted,
    /// A: right-moving amplitudes between the couplers
    Forward,
    /// B: left-moving amplitudes between the couplers
    Backward,
}

impl Block {
    fn offset(self) -> usize {
        match self {
            Block::Reflected => 0,
            Block::Transmitted => 1,
            Block::Forward => 2,
            Block::Backward => 3,
        }
    }
}

/// Coupler location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// x = 0
    Origin,
    /// x = a
    Far,
}

/// Matching condition at a coupler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// ψ(x⁺) = ψ(x⁻)
    Continuity,
    /// ψ'(x⁺) − ψ'(x⁻) = (g⋆ψ)(x)
    Jump,
}

/// One equation of the linear system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Row {
    pub boundary: Boundary,
    pub condition: Condition,
    pub channel: usize,
}

impl Row {
    pub fn new(boundary: Boundary, condition: Condition, channel: usize) -> Self {
        Self { boundary, condition, channel }
    }
}

/// Dense `4M × 4M` system under construction.
#[derive(Debug, Clone)]
pub struct SystemBuilder {
    channels: usize,
    matrix: DMatrix<Complex64>,
    rhs: DVector<Complex64>,
}

impl SystemBuilder {
    pub fn new(channels: usize) -> Self {
        let dim = 4 * channels;
        Self {
            channels,
            matrix: DMatrix::zeros(dim, dim),
            rhs: DVector::zeros(dim),
        }
    }

    pub fn dim(&self) -> usize {
        4 * self.channels
    }

    fn row_index(&self, row: Row) -> usize {
        debug_assert!(row.channel < self.channels);
        let base = match row.boundary {
            Boundary::Origin => 0,
            Boundary::Far => 2 * self.channels,
        };
        let cond = match row.condition {
            Condition::Continuity => 0,
            Condition::Jump => 1,
        };
        base + 2 * row.channel + cond
    }

    fn column_index(&self, block: Block, channel: usize) -> usize {
        debug_assert!(channel < self.channels);
        block.offset() * self.channels + channel
    }

    /// Accumulate `value` into the coefficient of `(block, channel)` in `row`.
    pub fn add(&mut self, row: Row, block: Block, channel: usize, value: Complex64) {
        let (r, c) = (self.row_index(row), self.column_index(block, channel));
        self.matrix[(r, c)] += value;
    }

    /// Accumulate `value` into the right-hand side of `row`.
    pub fn source(&mut self, row: Row, value: Complex64) {
        let r = self.row_index(row);
        self.rhs[r] += value;
    }

    pub fn finish(self) -> (DMatrix<Complex64>, DVector<Complex64>) {
        (self.matrix, self.rhs)
    }
}

/// Slice of a solved unknown vector belonging to `block`.
pub fn block_of(x: &DVector<Complex64>, block: Block, channels: usize) -> Vec<Complex64> {
    let start = block.offset() * channels;
    x.rows(start, channels).iter().copied().collect()
}
