// 2-vector and 2x2 matrix helpers over complex amplitudes.

use crate::complex::{self, ONE, ZERO};
use crate::error::{Result, SimError};
use log::warn;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A 2x2 complex matrix, row-major.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix2(pub [[Complex64; 2]; 2]);

impl Matrix2 {
    pub const IDENTITY: Matrix2 = Matrix2([[ONE, ZERO], [ZERO, ONE]]);

    /// Entry at (row, col). Out-of-range indices read as zero.
    pub fn entry(&self, row: usize, col: usize) -> Complex64 {
        self.0
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(ZERO)
    }

    pub fn dagger(&self) -> Matrix2 {
        let m = &self.0;
        Matrix2([
            [complex::conj(m[0][0]), complex::conj(m[1][0])],
            [complex::conj(m[0][1]), complex::conj(m[1][1])],
        ])
    }

    pub fn mul(&self, other: &Matrix2) -> Matrix2 {
        let mut out = [[ZERO; 2]; 2];
        for (row, out_row) in out.iter_mut().enumerate() {
            for (col, cell) in out_row.iter_mut().enumerate() {
                *cell = (0..2).fold(ZERO, |acc, k| {
                    complex::add(acc, complex::mul(self.entry(row, k), other.entry(k, col)))
                });
            }
        }
        Matrix2(out)
    }

    pub fn approx_eq(&self, other: &Matrix2, tol: f64) -> bool {
        self.0
            .iter()
            .flatten()
            .zip(other.0.iter().flatten())
            .all(|(a, b)| (a.re - b.re).abs() < tol && (a.im - b.im).abs() < tol)
    }
}

/// Single qubit state: amplitudes for |0> and |1>.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StateVector {
    pub amps: [Complex64; 2],
}

impl StateVector {
    pub const fn new(a: Complex64, b: Complex64) -> Self {
        StateVector { amps: [a, b] }
    }

    /// |0>
    pub const fn zero() -> Self {
        StateVector::new(ONE, ZERO)
    }

    /// |1>
    pub const fn one() -> Self {
        StateVector::new(ZERO, ONE)
    }

    pub fn alpha(&self) -> Complex64 {
        self.amps[0]
    }

    pub fn beta(&self) -> Complex64 {
        self.amps[1]
    }

    /// Squared magnitudes (P(0), P(1)).
    pub fn probabilities(&self) -> [f64; 2] {
        [complex::mag_sq(self.amps[0]), complex::mag_sq(self.amps[1])]
    }

    pub fn norm(&self) -> f64 {
        norm(self)
    }

    pub fn is_normalized(&self, tol: f64) -> bool {
        let [p0, p1] = self.probabilities();
        (p0 + p1 - 1.0).abs() < tol
    }

    pub fn is_finite(&self) -> bool {
        self.amps.iter().all(|a| a.re.is_finite() && a.im.is_finite())
    }

    pub fn approx_eq(&self, other: &StateVector, tol: f64) -> bool {
        self.amps
            .iter()
            .zip(other.amps.iter())
            .all(|(a, b)| (a.re - b.re).abs() < tol && (a.im - b.im).abs() < tol)
    }
}

impl Default for StateVector {
    fn default() -> Self {
        StateVector::zero()
    }
}

impl fmt::Display for StateVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prec = f.precision().unwrap_or(4);
        let [a, b] = self.amps;
        write!(
            f,
            "({:.p$} {} {:.p$}i)|0> + ({:.p$} {} {:.p$}i)|1>",
            a.re,
            if a.im < 0.0 { '-' } else { '+' },
            a.im.abs(),
            b.re,
            if b.im < 0.0 { '-' } else { '+' },
            b.im.abs(),
            p = prec
        )
    }
}

/// <u|v> = sum of conj(u_k) * v_k
pub fn inner(u: &StateVector, v: &StateVector) -> Complex64 {
    u.amps
        .iter()
        .zip(v.amps.iter())
        .fold(ZERO, |acc, (a, b)| complex::add(acc, complex::mul(complex::conj(*a), *b)))
}

pub fn mat_vec(m: &Matrix2, v: &StateVector) -> StateVector {
    let mut out = [ZERO; 2];
    for (row, slot) in out.iter_mut().enumerate() {
        *slot = (0..2).fold(ZERO, |acc, col| {
            complex::add(acc, complex::mul(m.entry(row, col), v.amps[col]))
        });
    }
    StateVector { amps: out }
}

// hypot based, so large amplitudes do not overflow through the squares
pub fn norm(v: &StateVector) -> f64 {
    v.amps[0].norm().hypot(v.amps[1].norm())
}

/// Scales `v` to unit norm, or returns `ZeroNorm` when there is nothing to scale.
///
/// Only an exactly zero or non-finite vector is rejected. The vector is first divided
/// by its largest component so neither huge nor tiny amplitudes lose the direction.
pub fn try_normalize(v: &StateVector) -> Result<StateVector> {
    let largest = v
        .amps
        .iter()
        .flat_map(|a| [a.re.abs(), a.im.abs()])
        .fold(0.0f64, f64::max);
    if largest == 0.0 || !largest.is_finite() || !v.is_finite() {
        return Err(SimError::ZeroNorm);
    }
    let scaled = StateVector {
        amps: [v.amps[0] / largest, v.amps[1] / largest],
    };
    let n = norm(&scaled);
    Ok(StateVector {
        amps: [scaled.amps[0] / n, scaled.amps[1] / n],
    })
}

/// Scales `v` to unit norm. A zero (or non-finite) vector comes back unchanged.
pub fn normalize(v: &StateVector) -> StateVector {
    match try_normalize(v) {
        Ok(out) => out,
        Err(_) => {
            warn!("normalize: norm of {} is zero or non-finite, state left unchanged", v);
            *v
        }
    }
}
