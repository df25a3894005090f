//! Resolution of public bodies onto the stored Chebyshev series.
//!
//! Earth and the barycentric Moon are not stored in a DE file. The file
//! holds the Earth–Moon barycenter (barycentric) and the geocentric Moon, and
//! the two derived bodies follow from the Earth/Moon mass ratio `μ`:
//!
//! ```text
//! Earth = EMB − Moon_geo / (1 + μ)
//! Moon  = EMB + Moon_geo · μ / (1 + μ)
//! ```
//!
//! Every body maps to exactly one [`CombinationRule`]; the rule does not depend
//! on the date.
use nalgebra::{Vector2, Vector3};

use crate::ephem_errors::EphemError;

use super::{
    block_cache::LoadedBlock,
    horizon_header::HorizonHeader,
    horizon_ids::{Body, Target},
    horizon_records::HorizonRecord,
    interpolation_result::{LibrationAngles, NutationAngles, StateVector},
};

/// How the barycentric state of a [`Body`] is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombinationRule {
    /// The origin of the barycentric frame: always zero.
    Barycenter,
    /// A series stored in the file, already barycentric.
    Stored(Target),
    Earth,
    Moon,
    EarthMoonBarycenter,
}

impl Body {
    pub fn combination_rule(self) -> CombinationRule {
        match self {
            Body::SolarSystemBarycenter => CombinationRule::Barycenter,
            Body::Sun => CombinationRule::Stored(Target::Sun),
            Body::Mercury => CombinationRule::Stored(Target::Mercury),
            Body::Venus => CombinationRule::Stored(Target::Venus),
            Body::Earth => CombinationRule::Earth,
            Body::Moon => CombinationRule::Moon,
            Body::EarthMoonBarycenter => CombinationRule::EarthMoonBarycenter,
            Body::Mars => CombinationRule::Stored(Target::Mars),
            Body::Jupiter => CombinationRule::Stored(Target::Jupiter),
            Body::Saturn => CombinationRule::Stored(Target::Saturn),
            Body::Uranus => CombinationRule::Stored(Target::Uranus),
            Body::Neptune => CombinationRule::Stored(Target::Neptune),
            Body::Pluto => CombinationRule::Stored(Target::Pluto),
        }
    }
}

/// Barycentric Earth from the barycentric EMB and the geocentric Moon.
pub fn earth_from(emb: &StateVector, moon_geo: &StateVector, earth_moon_ratio: f64) -> StateVector {
    emb - &(moon_geo / (1.0 + earth_moon_ratio))
}

/// Barycentric Moon from the barycentric EMB and the geocentric Moon.
pub fn moon_from(emb: &StateVector, moon_geo: &StateVector, earth_moon_ratio: f64) -> StateVector {
    emb + &(*moon_geo * (earth_moon_ratio / (1.0 + earth_moon_ratio)))
}

/// Evaluates bodies and angular targets from one loaded block.
///
/// A resolver is built per query, after the block cache made the block
/// covering the date resident, so every stored series of a query comes from
/// the same block.
#[derive(Debug, Clone, Copy)]
pub struct TargetResolver<'a> {
    header: &'a HorizonHeader,
    block: LoadedBlock<'a>,
}

impl<'a> TargetResolver<'a> {
    pub fn new(header: &'a HorizonHeader, block: LoadedBlock<'a>) -> Self {
        TargetResolver { header, block }
    }

    fn record(&self, target: Target) -> Result<HorizonRecord<'a>, EphemError> {
        let layout = self.header.layout(target);
        if !layout.is_present() {
            return Err(EphemError::Unavailable(target));
        }
        HorizonRecord::select(
            self.block.coefficients,
            layout,
            self.block.fraction,
            self.header.block_interval(),
        )
    }

    /// Raw state of a stored position target (km, km/day).
    ///
    /// The geocentric Moon is returned as stored, every other target is
    /// barycentric. Nutation and libration hold angles and are rejected with
    /// [`EphemError::Format`]; use [`Self::nutation`] and [`Self::libration`].
    pub fn stored(&self, target: Target, with_velocity: bool) -> Result<StateVector, EphemError> {
        if !target.is_position() {
            return Err(EphemError::Format(format!(
                "{target:?} is an angular series, not a position"
            )));
        }
        let (position, velocity) = self.record(target)?.interpolate::<3>(with_velocity)?;
        Ok(StateVector {
            position: Vector3::from(position),
            velocity: velocity.map(Vector3::from),
        })
    }

    /// Barycentric state of `body`, following its [`CombinationRule`].
    pub fn barycentric(&self, body: Body, with_velocity: bool) -> Result<StateVector, EphemError> {
        let ratio = self.header.earth_moon_ratio();
        match body.combination_rule() {
            CombinationRule::Barycenter => Ok(StateVector::zero(with_velocity)),
            CombinationRule::Stored(target) => self.stored(target, with_velocity),
            CombinationRule::EarthMoonBarycenter => {
                self.stored(Target::EarthMoonBarycenter, with_velocity)
            }
            CombinationRule::Earth => {
                let emb = self.stored(Target::EarthMoonBarycenter, with_velocity)?;
                let moon_geo = self.stored(Target::Moon, with_velocity)?;
                Ok(earth_from(&emb, &moon_geo, ratio))
            }
            CombinationRule::Moon => {
                let emb = self.stored(Target::EarthMoonBarycenter, with_velocity)?;
                let moon_geo = self.stored(Target::Moon, with_velocity)?;
                Ok(moon_from(&emb, &moon_geo, ratio))
            }
        }
    }

    /// State of `body` relative to `origin`.
    ///
    /// Both sides are resolved to barycentric and subtracted, except for the
    /// Earth/Moon pair which uses the stored geocentric Moon directly. Since
    /// `a − b` and `b − a` round to opposite values, swapping `body` and
    /// `origin` negates the result exactly.
    pub fn state(
        &self,
        body: Body,
        origin: Body,
        with_velocity: bool,
    ) -> Result<StateVector, EphemError> {
        if body == origin {
            return Ok(StateVector::zero(with_velocity));
        }
        match (body, origin) {
            (Body::Moon, Body::Earth) => self.stored(Target::Moon, with_velocity),
            (Body::Earth, Body::Moon) => Ok(-self.stored(Target::Moon, with_velocity)?),
            _ => {
                let body_state = self.barycentric(body, with_velocity)?;
                let origin_state = self.barycentric(origin, with_velocity)?;
                Ok(body_state - origin_state)
            }
        }
    }

    /// Nutation angles `(Δψ, Δε)` in radians, rates in radians/day.
    pub fn nutation(&self, with_rates: bool) -> Result<NutationAngles, EphemError> {
        let (angles, rates) = self.record(Target::Nutation)?.interpolate::<2>(with_rates)?;
        Ok(NutationAngles {
            angles: Vector2::from(angles),
            rates: rates.map(Vector2::from),
        })
    }

    /// Lunar libration Euler angles in radians, rates in radians/day.
    pub fn libration(&self, with_rates: bool) -> Result<LibrationAngles, EphemError> {
        let (angles, rates) = self.record(Target::Libration)?.interpolate::<3>(with_rates)?;
        Ok(LibrationAngles {
            angles: Vector3::from(angles),
            rates: rates.map(Vector3::from),
        })
    }

    /// TT − TDB in seconds, rate in seconds/day.
    pub fn time_difference(&self, with_rate: bool) -> Result<(f64, Option<f64>), EphemError> {
        let layout = self.header.time_difference_layout();
        if !layout.is_present() {
            return Err(EphemError::TimeDifferenceUnavailable);
        }
        let record = HorizonRecord::select(
            self.block.coefficients,
            layout,
            self.block.fraction,
            self.header.block_interval(),
        )?;
        let ([value], rate) = record.interpolate::<1>(with_rate)?;
        Ok((value, rate.map(|[rate]| rate)))
    }
}
