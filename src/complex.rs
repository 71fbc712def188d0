// complex arithmetic primitives used by the gate table and the bloch projection.
// all functions are pure and total over finite inputs.

use num_complex::Complex64;

pub const ZERO: Complex64 = Complex64::new(0.0, 0.0);
pub const ONE: Complex64 = Complex64::new(1.0, 0.0);
pub const I: Complex64 = Complex64::new(0.0, 1.0);

#[inline]
pub fn add(a: Complex64, b: Complex64) -> Complex64 {
    Complex64::new(a.re + b.re, a.im + b.im)
}

#[inline]
pub fn sub(a: Complex64, b: Complex64) -> Complex64 {
    Complex64::new(a.re - b.re, a.im - b.im)
}

// (a+bi)(c+di) = (ac-bd) + (ad+bc)i
#[inline]
pub fn mul(a: Complex64, b: Complex64) -> Complex64 {
    Complex64::new(a.re * b.re - a.im * b.im, a.re * b.im + a.im * b.re)
}

#[inline]
pub fn scale(a: Complex64, k: f64) -> Complex64 {
    Complex64::new(a.re * k, a.im * k)
}

#[inline]
pub fn conj(a: Complex64) -> Complex64 {
    Complex64::new(a.re, -a.im)
}

// squared magnitude, re^2 + im^2
#[inline]
pub fn mag_sq(a: Complex64) -> f64 {
    a.re * a.re + a.im * a.im
}

// argument in (-pi, pi], atan2(0, 0) = 0 for the zero amplitude
#[inline]
pub fn arg(a: Complex64) -> f64 {
    a.arg()
}

// e^(i * angle), used for the phase gates
#[inline]
pub fn from_phase(angle: f64) -> Complex64 {
    Complex64::new(angle.cos(), angle.sin())
}
