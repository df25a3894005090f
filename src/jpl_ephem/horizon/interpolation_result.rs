//! State vector returned by ephemeris queries.
//!
//! Overview
//! -----------------
//! [`StateVector`] always carries a **position** and optionally a
//! **velocity**, depending on the caller's request.
//!
//! Units
//! -----------------
//! * `position`: kilometers (km)
//! * `velocity`: kilometers per day (km/day)
//!
//! Use [`StateVector::to_au`] with the file's own AU value to switch to AU and
//! AU/day.
//!
//! Arithmetic semantics
//! -----------------
//! Addition/subtraction are component-wise. The optional velocity propagates
//! **only when present on both operands**; otherwise it is dropped to avoid
//! silently mixing partial information. Negation and scalar products keep it.
//!
//! The [`NutationAngles`] and [`LibrationAngles`] containers play the same
//! role for the two angular targets.

use nalgebra::{Vector2, Vector3};
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Position and optional velocity of a body relative to an origin.
///
/// Fields
/// -----------------
/// * `position` — Cartesian position (km), ICRF/J2000 equatorial axes.
/// * `velocity` — Optional Cartesian velocity (km/day).
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct StateVector {
    pub position: Vector3<f64>,
    pub velocity: Option<Vector3<f64>>,
}

impl StateVector {
    /// The zero state, with a zero velocity when `with_velocity` is set.
    pub fn zero(with_velocity: bool) -> Self {
        StateVector {
            position: Vector3::zeros(),
            velocity: with_velocity.then(Vector3::zeros),
        }
    }

    /// Convert the state to AU-based units.
    ///
    /// Arguments
    /// -----------------
    /// * `au_km` — Length of the astronomical unit in km, usually
    ///   [`DeEphemeris::au_km`](crate::jpl_ephem::horizon::horizon_data::DeEphemeris::au_km).
    #[must_use = "`.to_au()` returns a new StateVector; assign or use it"]
    pub fn to_au(&self, au_km: f64) -> Self {
        self / au_km
    }

    /// Euclidean distance of the position, in the vector's units.
    pub fn distance(&self) -> f64 {
        self.position.norm()
    }
}

fn combine(
    a: Option<Vector3<f64>>,
    b: Option<Vector3<f64>>,
    op: impl Fn(Vector3<f64>, Vector3<f64>) -> Vector3<f64>,
) -> Option<Vector3<f64>> {
    match (a, b) {
        (Some(v1), Some(v2)) => Some(op(v1, v2)),
        _ => None,
    }
}

impl Add for StateVector {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        &self + &other
    }
}

impl Add for &StateVector {
    type Output = StateVector;

    fn add(self, other: Self) -> Self::Output {
        StateVector {
            position: self.position + other.position,
            velocity: combine(self.velocity, other.velocity, |a, b| a + b),
        }
    }
}

impl Sub for StateVector {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        &self - &other
    }
}

impl Sub for &StateVector {
    type Output = StateVector;

    fn sub(self, other: Self) -> Self::Output {
        StateVector {
            position: self.position - other.position,
            velocity: combine(self.velocity, other.velocity, |a, b| a - b),
        }
    }
}

impl Neg for StateVector {
    type Output = Self;

    fn neg(self) -> Self::Output {
        StateVector {
            position: -self.position,
            velocity: self.velocity.map(|v| -v),
        }
    }
}

impl Mul<f64> for StateVector {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        StateVector {
            position: self.position * rhs,
            velocity: self.velocity.map(|v| v * rhs),
        }
    }
}

impl Div<f64> for StateVector {
    type Output = Self;

    fn div(self, rhs: f64) -> Self::Output {
        &self / rhs
    }
}

impl Div<f64> for &StateVector {
    type Output = StateVector;

    fn div(self, rhs: f64) -> Self::Output {
        StateVector {
            position: self.position / rhs,
            velocity: self.velocity.map(|v| v / rhs),
        }
    }
}

/// Nutation in longitude and obliquity.
///
/// Fields
/// -----------------
/// * `angles` — `(Δψ, Δε)` in radians.
/// * `rates` — Optional `(dΔψ/dt, dΔε/dt)` in radians/day.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct NutationAngles {
    pub angles: Vector2<f64>,
    pub rates: Option<Vector2<f64>>,
}

impl NutationAngles {
    pub fn longitude(&self) -> f64 {
        self.angles.x
    }

    pub fn obliquity(&self) -> f64 {
        self.angles.y
    }
}

/// Lunar mantle libration Euler angles `(φ, θ, ψ)` in radians, with optional
/// rates in radians/day.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct LibrationAngles {
    pub angles: Vector3<f64>,
    pub rates: Option<Vector3<f64>>,
}
