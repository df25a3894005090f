//! JPL validation points (`testpo.405`, `testpo.440`, …).
//!
//! Every DE solution is published with a text file of reference values that
//! JPL computed from the same solution. A free-form preamble ends with a line
//! holding `EOT`; every following line reads
//!
//! ```text
//! 405  1996.01.17 2450100.50  1 11  2      0.123456789012345678
//! ```
//!
//! that is the DE number, the calendar date, the Julian Day (TDB), the target,
//! the center, the coordinate index and the value.
//!
//! Targets and centers follow JPL's numbering: 1–9 Mercury to Pluto, 10 Moon,
//! 11 Sun, 12 solar-system barycenter, 13 Earth–Moon barycenter, 14 nutation,
//! 15 libration. Coordinates 1–3 are positions in AU and 4–6 velocities in
//! AU/day. Nutation gives `Δψ, Δε` then their rates, libration the three angles
//! then their rates, in radians and radians/day.
use std::{
    io::{Read, Seek},
    str::FromStr,
};

use crate::ephem_errors::EphemError;

use super::{horizon_data::DeEphemeris, horizon_ids::Body};

/// One line of a validation file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TestPoint {
    pub de_number: i32,
    pub jd: f64,
    pub target: u8,
    pub center: u8,
    pub coordinate: usize,
    pub value: f64,
}

/// What a [`TestPoint`] measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestQuantity {
    State { body: Body, center: Body },
    Nutation,
    Libration,
}

fn body_from_jpl_number(number: u8) -> Option<Body> {
    let body = match number {
        1 => Body::Mercury,
        2 => Body::Venus,
        3 => Body::Earth,
        4 => Body::Mars,
        5 => Body::Jupiter,
        6 => Body::Saturn,
        7 => Body::Uranus,
        8 => Body::Neptune,
        9 => Body::Pluto,
        10 => Body::Moon,
        11 => Body::Sun,
        12 => Body::SolarSystemBarycenter,
        13 => Body::EarthMoonBarycenter,
        _ => return None,
    };
    Some(body)
}

fn field<T: FromStr>(fields: &[&str], index: usize, line: &str) -> Result<T, EphemError> {
    fields
        .get(index)
        .and_then(|raw| raw.replace(['D', 'd'], "E").parse().ok())
        .ok_or_else(|| EphemError::Format(format!("malformed test point line: {line:?}")))
}

impl FromStr for TestPoint {
    type Err = EphemError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 7 {
            return Err(EphemError::Format(format!(
                "expected 7 fields in test point line, found {}: {line:?}",
                fields.len()
            )));
        }
        Ok(TestPoint {
            de_number: field(&fields, 0, line)?,
            jd: field(&fields, 2, line)?,
            target: field(&fields, 3, line)?,
            center: field(&fields, 4, line)?,
            coordinate: field(&fields, 5, line)?,
            value: field(&fields, 6, line)?,
        })
    }
}

/// Points listed after the `EOT` marker of a validation file.
pub fn parse_test_points(text: &str) -> Result<Vec<TestPoint>, EphemError> {
    let mut lines = text.lines();
    if !lines.by_ref().any(|line| line.trim() == "EOT") {
        return Err(EphemError::Format("no EOT marker in test point file".into()));
    }
    lines
        .filter(|line| !line.trim().is_empty())
        .map(str::parse)
        .collect()
}

impl TestPoint {
    pub fn quantity(&self) -> Result<TestQuantity, EphemError> {
        match self.target {
            14 => Ok(TestQuantity::Nutation),
            15 => Ok(TestQuantity::Libration),
            target => {
                let unknown = |number: u8| {
                    EphemError::Format(format!("unsupported JPL body number {number}"))
                };
                let body = body_from_jpl_number(target).ok_or_else(|| unknown(target))?;
                let center = body_from_jpl_number(self.center).ok_or_else(|| unknown(self.center))?;
                Ok(TestQuantity::State { body, center })
            }
        }
    }

    fn bad_coordinate(&self) -> EphemError {
        EphemError::Format(format!(
            "coordinate {} out of range for target {}",
            self.coordinate, self.target
        ))
    }
}

impl<R: Read + Seek> DeEphemeris<R> {
    /// Value of `point` computed from this file, in the units of the
    /// validation file (AU and AU/day for states).
    pub fn evaluate_test_point(&mut self, point: &TestPoint) -> Result<f64, EphemError> {
        let index = point
            .coordinate
            .checked_sub(1)
            .ok_or_else(|| point.bad_coordinate())?;

        match point.quantity()? {
            TestQuantity::State { body, center } => {
                if index >= 6 {
                    return Err(point.bad_coordinate());
                }
                let state = self.body_state(body, center, point.jd, index >= 3)?;
                let km = if index < 3 {
                    state.position[index]
                } else {
                    state
                        .velocity
                        .map(|velocity| velocity[index - 3])
                        .ok_or_else(|| point.bad_coordinate())?
                };
                Ok(km / self.au_km())
            }
            TestQuantity::Nutation => {
                let nutation = self.nutation(point.jd, index >= 2)?;
                match index {
                    0 | 1 => Ok(nutation.angles[index]),
                    2 | 3 => nutation
                        .rates
                        .map(|rates| rates[index - 2])
                        .ok_or_else(|| point.bad_coordinate()),
                    _ => Err(point.bad_coordinate()),
                }
            }
            TestQuantity::Libration => {
                let libration = self.libration(point.jd, index >= 3)?;
                match index {
                    0..=2 => Ok(libration.angles[index]),
                    3..=5 => libration
                        .rates
                        .map(|rates| rates[index - 3])
                        .ok_or_else(|| point.bad_coordinate()),
                    _ => Err(point.bad_coordinate()),
                }
            }
        }
    }
}
