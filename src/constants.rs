//! # Constants and type definitions for dephem
//!
//! This module centralizes the **physical constants**, the **fixed offsets of the
//! JPL DE binary header**, and the **Julian Day alias** used throughout the crate.
//!
//! ## Overview
//!
//! - Unit conversions (days ↔ seconds, AU ↔ km)
//! - Binary layout constants of the DE header record
//! - The Julian Day type alias

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// Number of seconds in a Julian day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Astronomical Unit in kilometers (IAU 2012), used when a file does not carry its own
pub const AU: f64 = 149_597_870.7;

/// Speed of light in km/s
pub const VLIGHT: f64 = 2.99792458e5;

/// Speed of light in km/day
pub const VLIGHT_KM_DAY: f64 = VLIGHT * SECONDS_PER_DAY;

/// Conversion factor between Julian Date and Modified Julian Date
pub const JDTOMJD: f64 = 2400000.5;

// -------------------------------------------------------------------------------------------------
// JPL DE binary layout
// -------------------------------------------------------------------------------------------------

/// Number of title records at the top of the header
pub const TITLE_COUNT: usize = 3;

/// Width of one title record (14 Fortran CHAR*6 words)
pub const TITLE_LEN: usize = 84;

/// Width of one constant name (Fortran CHAR*6)
pub const CONSTANT_NAME_LEN: usize = 6;

/// Constant names stored in the fixed part of the header
pub const OLD_MAX_CONSTANTS: usize = 400;

/// Upper bound accepted for NCON, well above every published DE file
pub const MAX_CONSTANTS: usize = 4_000;

/// Byte offset of the `[start, end, interval]` triple
pub const HEADER_DATES_OFFSET: usize = TITLE_COUNT * TITLE_LEN + OLD_MAX_CONSTANTS * CONSTANT_NAME_LEN;

/// Byte offset of the first layout row (Mercury)
pub const HEADER_LAYOUT_OFFSET: usize = 2696;

/// Length of the fixed part of the header, up to and including the libration row
pub const HEADER_FIXED_LEN: usize = 2856;

/// Bytes of one `(offset, coefficients, sub-intervals)` layout row
pub const LAYOUT_ROW_LEN: usize = 12;

/// Offset (1-based, in doubles) of the first coefficient after the block dates
pub const FIRST_COEFFICIENT_OFFSET: usize = 3;

/// Upper bound on the number of doubles in one block
pub const MAX_COEFFICIENTS_PER_BLOCK: usize = 1 << 16;

/// Upper bound on the coefficients of one component in one sub-interval
pub const MAX_COEFFICIENTS_PER_COMPONENT: usize = 64;

/// Upper bound on the number of sub-intervals of one target
pub const MAX_SUB_INTERVALS: usize = 64;

// -------------------------------------------------------------------------------------------------
// Light-time iteration
// -------------------------------------------------------------------------------------------------

/// Convergence tolerance on the light-time, in days
pub const LIGHT_TIME_TOLERANCE: f64 = 1e-8;

/// Hard cap on light-time iterations
pub const LIGHT_TIME_MAX_ITERATIONS: usize = 10;

// -------------------------------------------------------------------------------------------------
// Type alias
// -------------------------------------------------------------------------------------------------

/// Julian Day (TDB)
pub type JulianDay = f64;

