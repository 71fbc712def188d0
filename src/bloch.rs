//! Bloch sphere projection for single qubit states
//!
//! A normalized state a|0> + b|1> maps to polar angle theta = 2*acos(|a|) and
//! azimuth phi = arg(b) - arg(a), and from there to a point on the unit sphere.
//! |0> sits at the north pole (z = 1), |1> at the south pole (z = -1).

use crate::complex;
use crate::linalg::StateVector;
use serde::{Deserialize, Serialize};
use std::fmt;

// tolerance for naming a point after one of the six axis states
const POLE_TOLERANCE: f64 = 0.01;

/// Spherical angles plus the matching cartesian point on the unit sphere.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlochPoint {
    /// Polar angle in [0, pi]
    pub theta: f64,
    /// Relative phase arg(b) - arg(a), in (-2pi, 2pi)
    pub phi: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl BlochPoint {
    pub fn from_angles(theta: f64, phi: f64) -> Self {
        BlochPoint {
            theta,
            phi,
            x: theta.sin() * phi.cos(),
            y: theta.sin() * phi.sin(),
            z: theta.cos(),
        }
    }

    /// Name of the axis state this point sits on, if any.
    pub fn describe(&self) -> Option<&'static str> {
        let near = |v: f64, target: f64| (v - target).abs() < POLE_TOLERANCE;
        if near(self.z, 1.0) {
            Some("|0> (north pole)")
        } else if near(self.z, -1.0) {
            Some("|1> (south pole)")
        } else if near(self.x, 1.0) {
            Some("|+> (+x axis)")
        } else if near(self.x, -1.0) {
            Some("|-> (-x axis)")
        } else if near(self.y, 1.0) {
            Some("|+i> (+y axis)")
        } else if near(self.y, -1.0) {
            Some("|-i> (-y axis)")
        } else {
            None
        }
    }
}

impl fmt::Display for BlochPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = f.precision().unwrap_or(4);
        write!(
            f,
            "theta={:.p$} phi={:.p$} (x={:.p$}, y={:.p$}, z={:.p$})",
            self.theta,
            self.phi,
            self.x,
            self.y,
            self.z,
            p = p
        )
    }
}

/// Projects a normalized state onto the Bloch sphere.
///
/// |a| is clamped into [-1, 1] before acos so rounding drift cannot produce NaN.
pub fn bloch_point(state: &StateVector) -> BlochPoint {
    let a = state.alpha();
    let b = state.beta();
    let theta = 2.0 * a.norm().clamp(-1.0, 1.0).acos();
    let phi = complex::arg(b) - complex::arg(a);
    BlochPoint::from_angles(theta, phi)
}
