//! Published DE solutions and their Linux distribution files.
//!
//! JPL serves the binary DE files under `.../eph/planets/Linux/`, one
//! directory per solution, e.g. `de405/lnxp1600p2200.405`.
//! [`JPLHorizonVersion`] maps the usual labels (`"DE405"`, `"DE440"`, …) to
//! those relative paths.
//!
//! Typical use
//! -----------------
//! ```rust
//! use std::str::FromStr;
//! use dephem::jpl_ephem::horizon::horizon_version::JPLHorizonVersion;
//!
//! let v = JPLHorizonVersion::from_str("DE405").unwrap();
//! assert_eq!(v.get_filename(), "de405/lnxp1600p2200.405");
//! assert_eq!(v.file_name(), "lnxp1600p2200.405");
//! assert_eq!(v.de_number(), 405);
//! ```
use std::{fmt, str::FromStr};

/// Enumerates supported JPL DE ephemeris solutions.
///
/// Some have a `t` suffix (e.g. `DE430t`, `DE440t`), a distribution that also
/// carries a TT−TDB series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum JPLHorizonVersion {
    DE102,
    DE200,
    DE202,
    DE403,
    DE405,
    DE406,
    DE410,
    DE413,
    DE414,
    DE418,
    DE421,
    DE422,
    DE423,
    DE430,
    DE430t,
    DE431,
    DE440,
    DE440t,
    DE441,
}

impl JPLHorizonVersion {
    pub const ALL: [JPLHorizonVersion; 19] = [
        JPLHorizonVersion::DE102,
        JPLHorizonVersion::DE200,
        JPLHorizonVersion::DE202,
        JPLHorizonVersion::DE403,
        JPLHorizonVersion::DE405,
        JPLHorizonVersion::DE406,
        JPLHorizonVersion::DE410,
        JPLHorizonVersion::DE413,
        JPLHorizonVersion::DE414,
        JPLHorizonVersion::DE418,
        JPLHorizonVersion::DE421,
        JPLHorizonVersion::DE422,
        JPLHorizonVersion::DE423,
        JPLHorizonVersion::DE430,
        JPLHorizonVersion::DE430t,
        JPLHorizonVersion::DE431,
        JPLHorizonVersion::DE440,
        JPLHorizonVersion::DE440t,
        JPLHorizonVersion::DE441,
    ];

    /// Path of the binary file relative to the Linux distribution directory.
    ///
    /// Return
    /// ----------
    /// * A fragment such as `de440/linux_p1550p2650.440`, to be appended to a
    ///   base URL or directory.
    pub fn get_filename(&self) -> &'static str {
        match self {
            JPLHorizonVersion::DE102 => "de102/lnxm1410p3002.102",
            JPLHorizonVersion::DE200 => "de200/lnxm1600p2170.200",
            JPLHorizonVersion::DE202 => "de202/lnxp1900p2050.202",
            JPLHorizonVersion::DE403 => "de403/lnxp1600p2200.403",
            JPLHorizonVersion::DE405 => "de405/lnxp1600p2200.405",
            JPLHorizonVersion::DE406 => "de406/lnxm3000p3000.406",
            JPLHorizonVersion::DE410 => "de410/lnxp1960p2020.410",
            JPLHorizonVersion::DE413 => "de413/lnxp1900p2050.413",
            JPLHorizonVersion::DE414 => "de414/lnxp1600p2200.414",
            JPLHorizonVersion::DE418 => "de418/lnxp1900p2050.418",
            JPLHorizonVersion::DE421 => "de421/lnxp1900p2053.421",
            JPLHorizonVersion::DE422 => "de422/lnxm3000p3000.422",
            JPLHorizonVersion::DE423 => "de423/lnxp1800p2200.423",
            JPLHorizonVersion::DE430 => "de430/linux_p1550p2650.430",
            JPLHorizonVersion::DE430t => "de430t/linux_p1550p2650.430t",
            JPLHorizonVersion::DE431 => "de431/lnxm13000p17000.431",
            JPLHorizonVersion::DE440 => "de440/linux_p1550p2650.440",
            JPLHorizonVersion::DE440t => "de440t/linux_p1550p2650.440t",
            JPLHorizonVersion::DE441 => "de441/linux_m13000p17000.441",
        }
    }

    /// File name without the solution directory, used for the local cache.
    pub fn file_name(&self) -> &'static str {
        let path = self.get_filename();
        path.rsplit_once('/').map_or(path, |(_, name)| name)
    }

    /// Path of the `testpo` validation file published next to the binary file.
    pub fn test_points_filename(&self) -> String {
        let path = self.get_filename();
        let (dir, name) = path.rsplit_once('/').unwrap_or(("", path));
        let extension = name.rsplit_once('.').map_or(name, |(_, ext)| ext);
        format!("{dir}/testpo.{extension}")
    }

    /// DE number written in the header of the file.
    pub fn de_number(&self) -> i32 {
        match self {
            JPLHorizonVersion::DE102 => 102,
            JPLHorizonVersion::DE200 => 200,
            JPLHorizonVersion::DE202 => 202,
            JPLHorizonVersion::DE403 => 403,
            JPLHorizonVersion::DE405 => 405,
            JPLHorizonVersion::DE406 => 406,
            JPLHorizonVersion::DE410 => 410,
            JPLHorizonVersion::DE413 => 413,
            JPLHorizonVersion::DE414 => 414,
            JPLHorizonVersion::DE418 => 418,
            JPLHorizonVersion::DE421 => 421,
            JPLHorizonVersion::DE422 => 422,
            JPLHorizonVersion::DE423 => 423,
            JPLHorizonVersion::DE430 | JPLHorizonVersion::DE430t => 430,
            JPLHorizonVersion::DE431 => 431,
            JPLHorizonVersion::DE440 | JPLHorizonVersion::DE440t => 440,
            JPLHorizonVersion::DE441 => 441,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            JPLHorizonVersion::DE102 => "DE102",
            JPLHorizonVersion::DE200 => "DE200",
            JPLHorizonVersion::DE202 => "DE202",
            JPLHorizonVersion::DE403 => "DE403",
            JPLHorizonVersion::DE405 => "DE405",
            JPLHorizonVersion::DE406 => "DE406",
            JPLHorizonVersion::DE410 => "DE410",
            JPLHorizonVersion::DE413 => "DE413",
            JPLHorizonVersion::DE414 => "DE414",
            JPLHorizonVersion::DE418 => "DE418",
            JPLHorizonVersion::DE421 => "DE421",
            JPLHorizonVersion::DE422 => "DE422",
            JPLHorizonVersion::DE423 => "DE423",
            JPLHorizonVersion::DE430 => "DE430",
            JPLHorizonVersion::DE430t => "DE430t",
            JPLHorizonVersion::DE431 => "DE431",
            JPLHorizonVersion::DE440 => "DE440",
            JPLHorizonVersion::DE440t => "DE440t",
            JPLHorizonVersion::DE441 => "DE441",
        }
    }
}

impl fmt::Display for JPLHorizonVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Parse a [`JPLHorizonVersion`] from its label, ignoring the case of the
/// `DE` prefix (`"DE440"`, `"de440"`, `"DE440t"`).
impl FromStr for JPLHorizonVersion {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        JPLHorizonVersion::ALL
            .iter()
            .copied()
            .find(|v| v.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Invalid JPL Horizon version: {s}"))
    }
}
