use thiserror::Error;

use crate::jpl_ephem::horizon::horizon_ids::Target;

#[derive(Error, Debug)]
pub enum EphemError {
    #[error("Inconsistent JPL ephemeris file: {0}")]
    Format(String),

    #[error("Julian day {jd} is outside the ephemeris coverage [{start}, {end}]")]
    OutOfRange { jd: f64, start: f64, end: f64 },

    #[error("No registered ephemeris covers Julian day {jd} ({registered} registered)")]
    NoEphemerisCovers { jd: f64, registered: usize },

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Target {0:?} is not available in this ephemeris file")]
    Unavailable(Target),

    #[error("This ephemeris file carries no TT-TDB series")]
    TimeDifferenceUnavailable,

    #[error("Light-time iteration did not converge after {iterations} iterations")]
    LightTimeNotConverged { iterations: usize },

    #[error("Unknown body name: {0}")]
    UnknownBody(String),

    #[error("Invalid JPL ephemeris file source: {0}")]
    InvalidJPLEphemFileSource(String),

    #[error("Invalid JPL ephemeris file version: {0}")]
    InvalidJPLEphemFileVersion(String),

    #[error("Base dir creation error for JPL ephemeris file: {0}")]
    UnableToCreateBaseDir(String),

    #[error("UTF-8 Path error: {0}")]
    Utf8PathError(String),

    #[error("JPL File not found at: {0}")]
    JPLFileNotFound(String),

    #[cfg(feature = "jpl-download")]
    #[error("HTTP reqwest error: {0}")]
    ReqwestError(#[from] reqwest::Error),
}

impl EphemError {
    /// `true` for both the per-file and the registry-level coverage failures.
    pub fn is_out_of_range(&self) -> bool {
        matches!(
            self,
            EphemError::OutOfRange { .. } | EphemError::NoEphemerisCovers { .. }
        )
    }
}

impl PartialEq for EphemError {
    fn eq(&self, other: &Self) -> bool {
        use EphemError::*;
        match (self, other) {
            (Format(a), Format(b)) => a == b,
            (
                OutOfRange {
                    jd: a,
                    start: s1,
                    end: e1,
                },
                OutOfRange {
                    jd: b,
                    start: s2,
                    end: e2,
                },
            ) => a == b && s1 == s2 && e1 == e2,
            (
                NoEphemerisCovers {
                    jd: a,
                    registered: n1,
                },
                NoEphemerisCovers {
                    jd: b,
                    registered: n2,
                },
            ) => a == b && n1 == n2,
            (Unavailable(a), Unavailable(b)) => a == b,
            (TimeDifferenceUnavailable, TimeDifferenceUnavailable) => true,
            (LightTimeNotConverged { iterations: a }, LightTimeNotConverged { iterations: b }) => {
                a == b
            }
            (UnknownBody(a), UnknownBody(b)) => a == b,
            (InvalidJPLEphemFileSource(a), InvalidJPLEphemFileSource(b)) => a == b,
            (InvalidJPLEphemFileVersion(a), InvalidJPLEphemFileVersion(b)) => a == b,
            (UnableToCreateBaseDir(a), UnableToCreateBaseDir(b)) => a == b,
            (Utf8PathError(a), Utf8PathError(b)) => a == b,
            (JPLFileNotFound(a), JPLFileNotFound(b)) => a == b,

            // io and http errors carry no comparable payload: same variant is enough
            (IoError(_), IoError(_)) => true,
            #[cfg(feature = "jpl-download")]
            (ReqwestError(_), ReqwestError(_)) => true,

            _ => false,
        }
    }
}
