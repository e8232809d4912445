//! Hydrogen orbital wavefunctions in closed form.
//!
//! The angular part is evaluated by brute-force expansion of Rodrigues'
//! formula, which loses precision for l > 6. The simulation never exceeds
//! n = 6, so l ≤ 5 in practice.

use crate::constants::GROUND_ORBIT_RADIUS;

/// Highest l for which the Legendre expansion is trusted.
pub const MAX_STABLE_L: u8 = 6;

/// Unnormalized wavefunction value ψ(n, l, m) at radius `r` and polar angle θ.
pub fn wavefunction(n: u8, l: u8, m: i8, r: f64, cos_theta: f64) -> f64 {
    laguerre(n, l, r) * legendre(l, m.unsigned_abs(), cos_theta)
}

/// Probability density |ψ|², the quantity a density plot displays.
pub fn probability_density(n: u8, l: u8, m: i8, r: f64, cos_theta: f64) -> f64 {
    let psi = wavefunction(n, l, m, r, cos_theta);
    psi * psi
}

/// Radial part: generalized Laguerre series times `r^l · e^(−r / (n·a))`.
pub fn laguerre(n: u8, l: u8, r: f64) -> f64 {
    assert!(n >= 1 && l < n, "laguerre requires 0 <= l < n (n={n}, l={l})");
    let n = f64::from(n);
    let l_int = i32::from(l);
    let l = f64::from(l);
    // Orbit radius over n², i.e. the ground radius in simulation units.
    let a = GROUND_ORBIT_RADIUS;
    let na = n * a;

    let multiplier = r.powi(l_int) * (-r / na).exp();
    let b0 = 2.0 * na.powf(-1.5);
    let limit = (n - l - 1.0) as i32;

    let mut bj = b0;
    let mut sum = b0;
    for j in 1..=limit {
        let jf = f64::from(j);
        bj *= (2.0 / na) * ((jf + l - n) / (jf * (jf + 2.0 * l + 1.0)));
        sum += bj * r.powi(j);
    }
    multiplier * sum
}

/// Associated Legendre function P_l^m(x) with the Condon–Shortley phase.
pub fn legendre(l: u8, m: u8, x: f64) -> f64 {
    assert!(
        l <= MAX_STABLE_L,
        "associated Legendre expansion is unstable for l > {MAX_STABLE_L} (l={l})"
    );
    assert!(m <= l, "|m| must not exceed l (l={l}, m={m})");

    // Coefficients of (x² − 1)^l, lowest power first.
    let mut coefficients = vec![1.0];
    for _ in 0..l {
        coefficients = multiply(&coefficients, &[-1.0, 0.0, 1.0]);
    }
    for _ in 0..(l + m) {
        coefficients = differentiate(&coefficients);
    }
    let sum = evaluate(&coefficients, x);

    let phase = if m % 2 == 0 { 1.0 } else { -1.0 };
    let sine_power = (1.0 - x * x).max(0.0).powf(f64::from(m) / 2.0);
    let normalization = 2f64.powi(i32::from(l)) * factorial(l);
    phase * sine_power * sum / normalization
}

fn multiply(a: &[f64], b: &[f64]) -> Vec<f64> {
    let mut product = vec![0.0; a.len() + b.len() - 1];
    for (i, &ai) in a.iter().enumerate() {
        for (j, &bj) in b.iter().enumerate() {
            product[i + j] += ai * bj;
        }
    }
    product
}

fn differentiate(coefficients: &[f64]) -> Vec<f64> {
    if coefficients.len() <= 1 {
        return vec![0.0];
    }
    coefficients
        .iter()
        .enumerate()
        .skip(1)
        .map(|(power, &c)| c * power as f64)
        .collect()
}

fn evaluate(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}

fn factorial(k: u8) -> f64 {
    (1..=u32::from(k)).map(f64::from).product()
}
