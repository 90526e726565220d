//! Finite-difference operators on a uniform 1-D grid.
//!
//! # Laplacian
//!
//!   ∇²φ_i ≈ (φ_{i+1} − 2φ_i + φ_{i−1}) / dx²
//!
//! Neighbours outside the grid are zero ghost cells, matching the hard-wall
//! (Dirichlet) condition the chamber imposes. The end samples are clamped to
//! zero after every update, so the end values of the Laplacian never reach
//! the field.
//!
//! # Gradient
//!
//! Second-order central differences in the interior and first-order
//! one-sided differences at the two ends:
//!
//!   ∂f/∂x|_0 ≈ (f_1 − f_0)/dx,   ∂f/∂x|_i ≈ (f_{i+1} − f_{i−1})/(2dx),
//!   ∂f/∂x|_{n−1} ≈ (f_{n−1} − f_{n−2})/dx

/// Write the hard-wall Laplacian of `phi` into `out`.
///
/// `out` must be as long as `phi`; the chamber sizes its scratch buffers
/// from the grid.
pub(crate) fn laplacian_into(phi: &[f64], dx: f64, out: &mut [f64]) {
    assert_eq!(phi.len(), out.len(), "laplacian: length mismatch");
    let n = phi.len();
    if n == 0 {
        return;
    }
    let inv_dx2 = 1.0 / (dx * dx);
    for i in 0..n {
        let left = if i > 0 { phi[i - 1] } else { 0.0 };
        let right = if i + 1 < n { phi[i + 1] } else { 0.0 };
        out[i] = (right - 2.0 * phi[i] + left) * inv_dx2;
    }
}

/// Hard-wall Laplacian of `phi`.
pub fn laplacian(phi: &[f64], dx: f64) -> Vec<f64> {
    let mut out = vec![0.0; phi.len()];
    laplacian_into(phi, dx, &mut out);
    out
}

/// Write the gradient of `f` into `out`.
///
/// Needs at least two samples; shorter inputs produce zeros. `out` must be
/// as long as `f`.
pub(crate) fn gradient_into(f: &[f64], dx: f64, out: &mut [f64]) {
    assert_eq!(f.len(), out.len(), "gradient: length mismatch");
    let n = f.len();
    if n < 2 {
        out.iter_mut().for_each(|g| *g = 0.0);
        return;
    }
    out[0] = (f[1] - f[0]) / dx;
    for i in 1..n - 1 {
        out[i] = (f[i + 1] - f[i - 1]) / (2.0 * dx);
    }
    out[n - 1] = (f[n - 1] - f[n - 2]) / dx;
}

/// Gradient of `f` sampled with spacing `dx`.
pub fn gradient(f: &[f64], dx: f64) -> Vec<f64> {
    let mut out = vec![0.0; f.len()];
    gradient_into(f, dx, &mut out);
    out
}
