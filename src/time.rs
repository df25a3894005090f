//! Two-part Julian Day input.
//!
//! A single `f64` Julian Day near 2.45e6 only resolves about 40 µs. Callers that
//! need more precision pass the date as a pair `(day0, day1)`, typically a
//! whole/half day and a fraction, and every consumer of [`JulianDate`] works on
//! the normalised split returned by [`JulianDate::split`] so that the fractional
//! part never gets absorbed into the large integer part.
use hifitime::{Epoch, DAYS_PER_CENTURY, NANOSECONDS_PER_DAY};

use crate::constants::{JulianDay, JDTOMJD};

/// Julian Day (TDB) given as the sum `day0 + day1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JulianDate {
    pub day0: JulianDay,
    pub day1: JulianDay,
}

impl JulianDate {
    pub fn new(day0: JulianDay, day1: JulianDay) -> Self {
        JulianDate { day0, day1 }
    }

    /// Total Julian Day, `day0 + day1`.
    pub fn value(&self) -> JulianDay {
        self.day0 + self.day1
    }

    /// Modified Julian Day, computed on the split to keep the fraction intact.
    pub fn to_mjd(&self) -> f64 {
        let (whole, fraction) = self.split();
        (whole - JDTOMJD) + fraction
    }

    /// Normalised `(whole, fraction)` decomposition with `whole` integral and
    /// `fraction ∈ [0, 1)`.
    ///
    /// The integer and fractional parts of both halves are summed separately,
    /// then the carry of the fractional sum moves into the whole part.
    pub fn split(&self) -> (f64, f64) {
        let w0 = self.day0.floor();
        let w1 = self.day1.floor();
        let fraction = (self.day0 - w0) + (self.day1 - w1);
        let carry = fraction.floor();
        (w0 + w1 + carry, fraction - carry)
    }

    /// Shift the date by `days`, applied to the fine part.
    pub fn offset(&self, days: f64) -> Self {
        JulianDate {
            day0: self.day0,
            day1: self.day1 + days,
        }
    }
}

impl From<JulianDay> for JulianDate {
    fn from(jd: JulianDay) -> Self {
        JulianDate { day0: jd, day1: 0.0 }
    }
}

impl From<(JulianDay, JulianDay)> for JulianDate {
    fn from((day0, day1): (JulianDay, JulianDay)) -> Self {
        JulianDate { day0, day1 }
    }
}

impl From<Epoch> for JulianDate {
    /// Convert an epoch to a TDB Julian Day split into whole days and fraction.
    ///
    /// The split is taken on the integer centuries and nanoseconds of the TDB
    /// duration, so the fraction keeps nanosecond resolution.
    fn from(epoch: Epoch) -> Self {
        let (centuries, nanoseconds) = epoch.to_jde_tdb_duration().to_parts();
        let whole_days = nanoseconds / NANOSECONDS_PER_DAY;
        let remainder = nanoseconds % NANOSECONDS_PER_DAY;
        JulianDate {
            day0: f64::from(centuries) * DAYS_PER_CENTURY + whole_days as f64,
            day1: remainder as f64 / NANOSECONDS_PER_DAY as f64,
        }
    }
}
