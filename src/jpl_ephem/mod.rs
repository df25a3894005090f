//! JPL DE fundamental ephemerides.
//!
//! * [`horizon`] — the binary DE reader: header, block cache, Chebyshev
//!   evaluation and body resolution.
//! * [`registry`] — several files ordered by preference, selected by date.
//! * [`position_source`] — adapters exposing body states to reduction code.
//! * [`download_jpl_file`] — resolution of `"horizon:DE405"` style sources to
//!   files on disk, with optional download.
pub mod download_jpl_file;
pub mod horizon;
pub mod position_source;
pub mod registry;

pub use horizon::{
    horizon_data::{DeEphemeris, LoadOptions},
    horizon_ids::{Body, Target},
    interpolation_result::{LibrationAngles, NutationAngles, StateVector},
};
pub use position_source::{BarycentricQuery, EphemerisProvider, GeocentricQuery, PositionSource};
pub use registry::EphemerisRegistry;
