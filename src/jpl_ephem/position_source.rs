//! Position sources for coordinate-reduction code.
//!
//! Precession, aberration or light-time formulas only need "the state of
//! something at a date". [`PositionSource`] is that capability. It is
//! implemented by:
//!
//! * [`BarycentricQuery`] — a body relative to the Solar System barycenter,
//! * [`GeocentricQuery`] — a body relative to the Earth,
//! * any `FnMut(JulianDate, bool) -> Result<StateVector, EphemError>` closure.
//!
//! The two query adapters are generic over an [`EphemerisProvider`], either a
//! single [`DeEphemeris`] or an [`EphemerisRegistry`] choosing the file by
//! date, and are monomorphised: no boxing, no dynamic dispatch.
use std::io::{Read, Seek};

use crate::{
    constants::{LIGHT_TIME_MAX_ITERATIONS, LIGHT_TIME_TOLERANCE, VLIGHT_KM_DAY},
    ephem_errors::EphemError,
    time::JulianDate,
};

use super::{
    horizon::{horizon_data::DeEphemeris, horizon_ids::Body, interpolation_result::StateVector},
    registry::EphemerisRegistry,
};

/// Something that yields a state vector (km, km/day) for a date.
pub trait PositionSource {
    fn state(&mut self, jd: JulianDate, with_velocity: bool) -> Result<StateVector, EphemError>;
}

impl<F> PositionSource for F
where
    F: FnMut(JulianDate, bool) -> Result<StateVector, EphemError>,
{
    fn state(&mut self, jd: JulianDate, with_velocity: bool) -> Result<StateVector, EphemError> {
        self(jd, with_velocity)
    }
}

/// Body states relative to an arbitrary origin.
pub trait EphemerisProvider {
    fn body_state(
        &mut self,
        body: Body,
        origin: Body,
        jd: JulianDate,
        with_velocity: bool,
    ) -> Result<StateVector, EphemError>;
}

impl<R: Read + Seek> EphemerisProvider for DeEphemeris<R> {
    fn body_state(
        &mut self,
        body: Body,
        origin: Body,
        jd: JulianDate,
        with_velocity: bool,
    ) -> Result<StateVector, EphemError> {
        DeEphemeris::body_state(self, body, origin, jd, with_velocity)
    }
}

impl<R: Read + Seek> EphemerisProvider for EphemerisRegistry<R> {
    fn body_state(
        &mut self,
        body: Body,
        origin: Body,
        jd: JulianDate,
        with_velocity: bool,
    ) -> Result<StateVector, EphemError> {
        EphemerisRegistry::body_state(self, body, origin, jd, with_velocity)
    }
}

impl<P: EphemerisProvider + ?Sized> EphemerisProvider for &mut P {
    fn body_state(
        &mut self,
        body: Body,
        origin: Body,
        jd: JulianDate,
        with_velocity: bool,
    ) -> Result<StateVector, EphemError> {
        (**self).body_state(body, origin, jd, with_velocity)
    }
}

/// Barycentric state of one body.
#[derive(Debug)]
pub struct BarycentricQuery<P> {
    provider: P,
    body: Body,
}

impl<P: EphemerisProvider> BarycentricQuery<P> {
    pub fn new(provider: P, body: Body) -> Self {
        BarycentricQuery { provider, body }
    }

    pub fn body(&self) -> Body {
        self.body
    }

    pub fn into_inner(self) -> P {
        self.provider
    }
}

impl<P: EphemerisProvider> PositionSource for BarycentricQuery<P> {
    fn state(&mut self, jd: JulianDate, with_velocity: bool) -> Result<StateVector, EphemError> {
        self.provider
            .body_state(self.body, Body::SolarSystemBarycenter, jd, with_velocity)
    }
}

/// Geocentric state of one body.
#[derive(Debug)]
pub struct GeocentricQuery<P> {
    provider: P,
    body: Body,
}

impl<P: EphemerisProvider> GeocentricQuery<P> {
    pub fn new(provider: P, body: Body) -> Self {
        GeocentricQuery { provider, body }
    }

    pub fn body(&self) -> Body {
        self.body
    }

    pub fn into_inner(self) -> P {
        self.provider
    }
}

impl<P: EphemerisProvider> PositionSource for GeocentricQuery<P> {
    fn state(&mut self, jd: JulianDate, with_velocity: bool) -> Result<StateVector, EphemError> {
        self.provider
            .body_state(self.body, Body::Earth, jd, with_velocity)
    }
}

/// Result of [`light_time_corrected`].
///
/// Fields
/// -----------------
/// * `state` — Target at the emission date relative to the observer at the
///   reception date (km, km/day).
/// * `light_time` — Propagation delay in days.
/// * `iterations` — Evaluations of the target needed to converge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightTimeSolution {
    pub state: StateVector,
    pub light_time: f64,
    pub iterations: usize,
}

/// Solve the light-time equation `τ = |target(t − τ) − observer(t)| / c`.
///
/// The iteration starts from `τ = 0` and stops when two successive values
/// differ by less than [`LIGHT_TIME_TOLERANCE`] days.
///
/// Arguments
/// -----------------
/// * `target` — Source for the observed body.
/// * `observer` — Source for the observer, in the same frame as `target`.
/// * `jd` — Reception date.
/// * `with_velocity` — Also return the relative velocity.
///
/// Errors
/// ----------
/// * [`EphemError::LightTimeNotConverged`] after
///   [`LIGHT_TIME_MAX_ITERATIONS`] evaluations without convergence.
/// * Any error of the two sources.
pub fn light_time_corrected<T, O>(
    target: &mut T,
    observer: &mut O,
    jd: JulianDate,
    with_velocity: bool,
) -> Result<LightTimeSolution, EphemError>
where
    T: PositionSource + ?Sized,
    O: PositionSource + ?Sized,
{
    let observer_state = observer.state(jd, with_velocity)?;
    let mut light_time = 0.0;

    for iteration in 1..=LIGHT_TIME_MAX_ITERATIONS {
        let relative = &target.state(jd.offset(-light_time), with_velocity)? - &observer_state;
        let next = relative.distance() / VLIGHT_KM_DAY;
        let converged = (next - light_time).abs() < LIGHT_TIME_TOLERANCE;
        light_time = next;
        if converged {
            return Ok(LightTimeSolution {
                state: relative,
                light_time,
                iterations: iteration,
            });
        }
    }

    log::warn!("light-time iteration did not converge at JD {}", jd.value());
    Err(EphemError::LightTimeNotConverged {
        iterations: LIGHT_TIME_MAX_ITERATIONS,
    })
}

#[cfg(test)]
mod test_position_source {
    use std::io::Cursor;

    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    use super::*;
    use crate::{jpl_ephem::horizon::horizon_data::LoadOptions, unit_test_global::SyntheticDe};

    fn ephem(de: &SyntheticDe) -> DeEphemeris<Cursor<Vec<u8>>> {
        DeEphemeris::from_reader(Cursor::new(de.build()), LoadOptions::default()).unwrap()
    }

    /// Accepts any source, the way external reduction code would.
    fn sample<S: PositionSource>(source: &mut S, jd: f64) -> StateVector {
        source.state(jd.into(), true).unwrap()
    }

    #[test]
    fn test_adapters_match_direct_queries() {
        let de = SyntheticDe::default();
        let jd = de.start_jd + 33.3;
        let mut direct = ephem(&de);
        let expected_bary = direct
            .body_state(Body::Mars, Body::SolarSystemBarycenter, jd, true)
            .unwrap();
        let expected_geo = direct.body_state(Body::Mars, Body::Earth, jd, true).unwrap();

        let mut file = ephem(&de);
        let mut bary = BarycentricQuery::new(&mut file, Body::Mars);
        assert_eq!(bary.body(), Body::Mars);
        assert_eq!(sample(&mut bary, jd), expected_bary);

        let mut registry = EphemerisRegistry::new();
        registry.register(ephem(&de));
        let mut geo = GeocentricQuery::new(registry, Body::Mars);
        assert_eq!(sample(&mut geo, jd), expected_geo);
        assert_eq!(geo.into_inner().len(), 1);
    }

    #[test]
    fn test_closure_source() {
        let mut calls = 0;
        let mut fixed = |_: JulianDate, _: bool| -> Result<StateVector, EphemError> {
            calls += 1;
            Ok(StateVector {
                position: Vector3::new(1.0, 2.0, 3.0),
                velocity: None,
            })
        };
        let state = sample(&mut fixed, 2_451_545.0);
        assert_eq!(state.position, Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_light_time_static_target() {
        // a target 1 AU away that does not move: τ = 1 AU / c after one step
        let au = crate::constants::AU;
        let mut target = |_: JulianDate, _: bool| -> Result<StateVector, EphemError> {
            Ok(StateVector {
                position: Vector3::new(au, 0.0, 0.0),
                velocity: None,
            })
        };
        let mut observer =
            |_: JulianDate, _: bool| -> Result<StateVector, EphemError> { Ok(StateVector::zero(false)) };

        let solution =
            light_time_corrected(&mut target, &mut observer, 2_451_545.0.into(), false).unwrap();
        assert_relative_eq!(solution.light_time, au / VLIGHT_KM_DAY, max_relative = 1e-15);
        assert_eq!(solution.iterations, 2);
        assert_eq!(solution.state.position.x, au);
    }

    #[test]
    fn test_light_time_moving_target() {
        let de = SyntheticDe::default();
        let mut file = ephem(&de);
        let mut registry = EphemerisRegistry::new();
        registry.register(ephem(&de));

        let mut target = BarycentricQuery::new(&mut file, Body::Saturn);
        let mut observer = BarycentricQuery::new(registry, Body::Earth);
        let jd = JulianDate::new(de.start_jd + 60.0, 0.25);
        let solution = light_time_corrected(&mut target, &mut observer, jd, true).unwrap();

        assert!(solution.iterations <= LIGHT_TIME_MAX_ITERATIONS);
        assert!(solution.state.velocity.is_some());
        let delay = solution.state.distance() / VLIGHT_KM_DAY;
        assert!((delay - solution.light_time).abs() < 1e-6);
    }

    #[test]
    fn test_light_time_not_converged() {
        // each evaluation moves the target one light-day further away
        let mut steps = 0.0;
        let mut runaway = |_: JulianDate, _: bool| -> Result<StateVector, EphemError> {
            steps += 1.0;
            Ok(StateVector {
                position: Vector3::new(steps * VLIGHT_KM_DAY, 0.0, 0.0),
                velocity: None,
            })
        };
        let mut observer =
            |_: JulianDate, _: bool| -> Result<StateVector, EphemError> { Ok(StateVector::zero(false)) };

        let err = light_time_corrected(&mut runaway, &mut observer, 2_451_545.0.into(), false)
            .unwrap_err();
        assert_eq!(
            err,
            EphemError::LightTimeNotConverged {
                iterations: LIGHT_TIME_MAX_ITERATIONS
            }
        );
    }
}
