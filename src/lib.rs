//! # dephem
//!
//! Reader for the JPL DE binary ephemerides (DE200, DE405, DE406, DE4xx Linux
//! distribution). Given a file, `dephem` evaluates the stored Chebyshev series
//! to return positions and velocities of the Sun, the Moon and the planets,
//! plus nutation and lunar libration angles when the file carries them.
//!
//! ```rust,no_run
//! use dephem::jpl_ephem::{Body, DeEphemeris, LoadOptions};
//!
//! # fn main() -> Result<(), dephem::ephem_errors::EphemError> {
//! let mut de405 = DeEphemeris::open("de405/lnxp1600p2200.405", LoadOptions::default())?;
//! let mercury = de405.body_state(Body::Mercury, Body::Earth, 2_450_100.5, true)?;
//! println!("{:?} km", mercury.position);
//! # Ok(())
//! # }
//! ```
pub mod constants;
pub mod ephem_errors;
pub mod jpl_ephem;
pub mod time;
