//! Matching-condition solve for the driven two-coupler scatterer.

use num_complex::Complex64;

use super::assembly::{block_of, Block, Boundary, Condition, Row, SystemBuilder};
use super::config::{Channel, FloquetConfig, Harmonics, Incident};
use crate::error::{Result, SimError};

/// Scattering amplitudes and channel fluxes for one incident side.
#[derive(Debug, Clone)]
pub struct FloquetSolution {
    pub incident: Incident,
    pub channels: Vec<Channel>,
    /// Incident wavenumber k₀
    pub k0: f64,
    pub r: Vec<Complex64>,
    pub t: Vec<Complex64>,
    /// Right-moving amplitudes between the couplers
    pub forward: Vec<Complex64>,
    /// Left-moving amplitudes between the couplers
    pub backward: Vec<Complex64>,
    /// R_n = (Re k_n / k₀)|r_n|², 0 for closed channels
    pub reflected_flux: Vec<f64>,
    /// T_n = (Re k_n / k₀)|t_n|², 0 for closed channels
    pub transmitted_flux: Vec<f64>,
}

impl FloquetSolution {
    pub fn total_reflected(&self) -> f64 {
        self.reflected_flux.iter().sum()
    }

    pub fn total_transmitted(&self) -> f64 {
        self.transmitted_flux.iter().sum()
    }

    /// Amplitudes of the elastic (n = 0) channel.
    pub fn elastic(&self) -> (Complex64, Complex64) {
        let i = self.channels.len() / 2;
        (self.r[i], self.t[i])
    }
}

fn flux(channel: &Channel, amplitude: Complex64, k0: f64) -> f64 {
    if channel.is_open() {
        channel.k.re / k0 * amplitude.norm_sqr()
    } else {
        0.0
    }
}

/// Interior basis of one channel sampled at a coupler: values and slopes of
/// the `Forward` and `Backward` basis functions.
///
/// For k ≠ 0 the pair is e^{ikx}, e^{−ikx}. At threshold (k = 0) both
/// exponentials reduce to 1, so the pair becomes 1, x.
#[derive(Debug, Clone, Copy)]
struct InteriorBasis {
    value: (Complex64, Complex64),
    slope: (Complex64, Complex64),
}

impl InteriorBasis {
    fn at(channel: &Channel, x: f64) -> Self {
        if channel.is_threshold() {
            let (zero, one) = (Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0));
            return Self {
                value: (one, Complex64::new(x, 0.0)),
                slope: (zero, one),
            };
        }
        let ik = Complex64::i() * channel.k;
        let (ep, em) = ((ik * x).exp(), (-ik * x).exp());
        Self {
            value: (ep, em),
            slope: (ik * ep, -ik * em),
        }
    }
}

/// Subtract (g⋆ψ)_n at a coupler from the jump row of channel `i`.
///
/// `basis[j]` is channel j's interior basis at the coupler position.
fn convolve(
    sys: &mut SystemBuilder,
    row: Row,
    order: isize,
    n_sidebands: isize,
    coupler: &Harmonics,
    basis: &[InteriorBasis],
) {
    for (m, g) in coupler.iter() {
        let source = order - m;
        if source < -n_sidebands || source > n_sidebands {
            continue;
        }
        let j = (source + n_sidebands) as usize;
        let (fa, fb) = basis[j].value;
        sys.add(row, Block::Forward, j, -g * fa);
        sys.add(row, Block::Backward, j, -g * fb);
    }
}

/// Solve the truncated Floquet matching problem for a unit wave in channel
/// n = 0 arriving from `incident`.
///
/// Regions: I (x < 0), II (0 < x < a), III (x > a). Between the couplers
/// ψ_n = A_n e^{ik_n x} + B_n e^{−ik_n x}, or A_n + B_n x for a channel at
/// threshold (E_n = 0). For left incidence region I holds
/// δ_{n0}e^{ikx} + r_n e^{−ikx} and region III t_n e^{ikx}; for right
/// incidence region I holds t_n e^{−ikx} and region III
/// δ_{n0}e^{−ikx} + r_n e^{ikx}.
pub fn solve(config: &FloquetConfig, incident: Incident) -> Result<FloquetSolution> {
    config.validate()?;
    let channels = config.channels();
    let m = channels.len();
    let n = config.n_sidebands as isize;
    let a = config.separation;
    let k0 = config.k0();
    let i1 = Complex64::i();
    let one = Complex64::new(1.0, 0.0);

    let origin_coupler = config.origin_coupler();
    let far_coupler = config.far_coupler();
    let basis_at = |x: f64| -> Vec<InteriorBasis> {
        channels.iter().map(|ch| InteriorBasis::at(ch, x)).collect()
    };
    let at_origin = basis_at(0.0);
    let at_far = basis_at(a);

    log::debug!(
        "floquet solve: {} channels ({} open), incident from {}, phase={:.4}",
        m,
        channels.iter().filter(|c| c.is_open()).count(),
        incident,
        config.phase
    );

    let mut sys = SystemBuilder::new(m);
    for (i, ch) in channels.iter().enumerate() {
        let ik = i1 * ch.k;
        let delta = if ch.order == 0 { one } else { Complex64::new(0.0, 0.0) };
        let ep = (ik * a).exp();
        let em = (-ik * a).exp();

        let c0 = Row::new(Boundary::Origin, Condition::Continuity, i);
        let j0 = Row::new(Boundary::Origin, Condition::Jump, i);
        let ca = Row::new(Boundary::Far, Condition::Continuity, i);
        let ja = Row::new(Boundary::Far, Condition::Jump, i);

        // Interior wave, identical for both incident sides:
        // +ψ_II(0), +ψ'_II(0), +ψ_II(a), −ψ'_II(a).
        let (origin, far) = (at_origin[i], at_far[i]);
        sys.add(c0, Block::Forward, i, origin.value.0);
        sys.add(c0, Block::Backward, i, origin.value.1);
        sys.add(j0, Block::Forward, i, origin.slope.0);
        sys.add(j0, Block::Backward, i, origin.slope.1);
        sys.add(ca, Block::Forward, i, far.value.0);
        sys.add(ca, Block::Backward, i, far.value.1);
        sys.add(ja, Block::Forward, i, -far.slope.0);
        sys.add(ja, Block::Backward, i, -far.slope.1);

        match incident {
            Incident::Left => {
                // ψ_I(0) = δ + r, ψ'_I(0) = ik(δ − r)
                sys.add(c0, Block::Reflected, i, -one);
                sys.source(c0, delta);
                sys.add(j0, Block::Reflected, i, ik);
                sys.source(j0, ik * delta);
                // ψ_III(a) = t e^{ika}, ψ'_III(a) = ik t e^{ika}
                sys.add(ca, Block::Transmitted, i, -ep);
                sys.add(ja, Block::Transmitted, i, ik * ep);
            }
            Incident::Right => {
                // ψ_I(0) = t, ψ'_I(0) = −ik t
                sys.add(c0, Block::Transmitted, i, -one);
                sys.add(j0, Block::Transmitted, i, ik);
                // ψ_III(a) = δe^{−ika} + r e^{ika}, ψ'_III(a) = ik(r e^{ika} − δe^{−ika})
                sys.add(ca, Block::Reflected, i, -ep);
                sys.source(ca, delta * em);
                sys.add(ja, Block::Reflected, i, ik * ep);
                sys.source(ja, ik * delta * em);
            }
        }

        convolve(&mut sys, j0, ch.order, n, &origin_coupler, &at_origin);
        convolve(&mut sys, ja, ch.order, n, &far_coupler, &at_far);
    }

    let dim = sys.dim();
    let (matrix, rhs) = sys.finish();
    let x = matrix
        .lu()
        .solve(&rhs)
        .ok_or(SimError::SingularSystem { dim })?;

    let r = block_of(&x, Block::Reflected, m);
    let t = block_of(&x, Block::Transmitted, m);
    let reflected_flux = channels.iter().zip(&r).map(|(c, &a)| flux(c, a, k0)).collect();
    let transmitted_flux = channels.iter().zip(&t).map(|(c, &a)| flux(c, a, k0)).collect();

    Ok(FloquetSolution {
        incident,
        k0,
        r,
        t,
        forward: block_of(&x, Block::Forward, m),
        backward: block_of(&x, Block::Backward, m),
        reflected_flux,
        transmitted_flux,
        channels,
    })
}
