//! Leading-order loop amplitudes for `H → γγ`.
//!
//! With `τ = m_H² / (4 m²)` for a particle of mass `m` running in the loop:
//!
//! ```text
//! f(τ)     = arcsin²(√τ)                               τ ≤ 1
//!          = -¼ (ln((1 + β)/(1 - β)) - iπ)²,  β = √(1 - 1/τ)   τ > 1
//! A_½(τ)   = 2 (τ + (τ - 1) f(τ)) / τ²
//! A_1(τ)   = -(2τ² + 3τ + 3 (2τ - 1) f(τ)) / τ²
//! ```
//!
//! The diphoton rate, normalized to the SM, is the squared modulus of the
//! coupling-weighted sum of the top, bottom and W amplitudes divided by the
//! same sum at SM couplings.

use std::f64::consts::PI;

use num_complex::Complex;

/// Top quark pole mass (GeV).
pub const M_TOP: f64 = 172.5;
/// W boson mass (GeV).
pub const M_W: f64 = 80.398;

/// Colour factor × charge² for up-type quarks.
const NC_QU2: f64 = 3.0 * (2.0 / 3.0) * (2.0 / 3.0);
/// Colour factor × charge² for down-type quarks.
const NC_QD2: f64 = 3.0 * (1.0 / 3.0) * (1.0 / 3.0);

fn tau(m_h: f64, m: f64) -> f64 {
    m_h * m_h / (4.0 * m * m)
}

fn f(tau: f64) -> Complex<f64> {
    if tau <= 1.0 {
        let v = tau.sqrt().asin();
        Complex::new(v * v, 0.0)
    } else {
        let beta = (1.0 - 1.0 / tau).sqrt();
        let z = Complex::new(((1.0 + beta) / (1.0 - beta)).ln(), -PI);
        -0.25 * z * z
    }
}

/// Spin-½ (fermion) loop amplitude.
pub fn amp_spin_half(tau: f64) -> Complex<f64> {
    2.0 * (tau + (tau - 1.0) * f(tau)) / (tau * tau)
}

/// Spin-1 (vector boson) loop amplitude.
pub fn amp_spin_one(tau: f64) -> Complex<f64> {
    -(2.0 * tau * tau + 3.0 * tau + 3.0 * (2.0 * tau - 1.0) * f(tau)) / (tau * tau)
}

/// Coupling scale factors entering the diphoton loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiphotonCouplings {
    pub ct: f64,
    pub cb: f64,
    pub cw: f64,
    /// Extra contribution added directly to the amplitude.
    pub x: f64,
}

/// `|ct·A_t + cb·A_b + cW·A_W + X|² / |A_t + A_b + A_W|²`.
pub fn diphoton_scale(m_h: f64, m_b: f64, c: DiphotonCouplings) -> f64 {
    let a_t = NC_QU2 * amp_spin_half(tau(m_h, M_TOP));
    let a_b = NC_QD2 * amp_spin_half(tau(m_h, m_b));
    let a_w = amp_spin_one(tau(m_h, M_W));

    let scaled = c.ct * a_t + c.cb * a_b + c.cw * a_w + c.x;
    let sm = a_t + a_b + a_w;
    scaled.norm_sqr() / sm.norm_sqr()
}
