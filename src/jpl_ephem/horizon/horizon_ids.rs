use std::{fmt, str::FromStr};

use crate::ephem_errors::EphemError;

/// Series physically stored in a JPL DE binary file, in file order.
///
/// The discriminant is the row of the target in the header layout table.
/// Earth and the barycentric Moon are not stored: see [`Body`] for the public
/// identifiers and [`super::target_resolver::CombinationRule`] for how the
/// derived bodies are built.
///
/// Conversions
/// -----------
/// * Use [`TryFrom<u8>`] to convert a raw layout row into a `Target`.
/// * Use [`From<Target>`] to recover the row index (`u8`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Target {
    Mercury = 0,
    Venus = 1,
    EarthMoonBarycenter = 2,
    Mars = 3,
    Jupiter = 4,
    Saturn = 5,
    Uranus = 6,
    Neptune = 7,
    Pluto = 8,
    /// Geocentric Moon
    Moon = 9,
    Sun = 10,
    Nutation = 11,
    Libration = 12,
}

impl Target {
    /// Number of stored targets.
    pub const COUNT: usize = 13;

    /// Every target, in layout-table order.
    pub const ALL: [Target; Target::COUNT] = [
        Target::Mercury,
        Target::Venus,
        Target::EarthMoonBarycenter,
        Target::Mars,
        Target::Jupiter,
        Target::Saturn,
        Target::Uranus,
        Target::Neptune,
        Target::Pluto,
        Target::Moon,
        Target::Sun,
        Target::Nutation,
        Target::Libration,
    ];

    /// Components per sub-interval: Δψ/Δε for nutation, three otherwise.
    pub fn component_count(self) -> usize {
        match self {
            Target::Nutation => 2,
            _ => 3,
        }
    }

    /// Whether the series holds a position in km, as opposed to angles.
    pub fn is_position(self) -> bool {
        !matches!(self, Target::Nutation | Target::Libration)
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl TryFrom<u8> for Target {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Target::ALL
            .get(value as usize)
            .copied()
            .ok_or_else(|| format!("Invalid target row: {value}"))
    }
}

impl From<Target> for u8 {
    fn from(target: Target) -> Self {
        target as u8
    }
}

/// Public body identifiers accepted by position queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Body {
    SolarSystemBarycenter,
    Sun,
    Mercury,
    Venus,
    Earth,
    Moon,
    EarthMoonBarycenter,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
}

impl Body {
    pub const ALL: [Body; 13] = [
        Body::SolarSystemBarycenter,
        Body::Sun,
        Body::Mercury,
        Body::Venus,
        Body::Earth,
        Body::Moon,
        Body::EarthMoonBarycenter,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
        Body::Uranus,
        Body::Neptune,
        Body::Pluto,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Body::SolarSystemBarycenter => "SolarSystemBarycenter",
            Body::Sun => "Sun",
            Body::Mercury => "Mercury",
            Body::Venus => "Venus",
            Body::Earth => "Earth",
            Body::Moon => "Moon",
            Body::EarthMoonBarycenter => "EarthMoonBarycenter",
            Body::Mars => "Mars",
            Body::Jupiter => "Jupiter",
            Body::Saturn => "Saturn",
            Body::Uranus => "Uranus",
            Body::Neptune => "Neptune",
            Body::Pluto => "Pluto",
        }
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Case-insensitive parse of a body name; `SSB` and `EMB` are accepted as
/// short forms.
impl FromStr for Body {
    type Err = EphemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "ssb" => return Ok(Body::SolarSystemBarycenter),
            "emb" => return Ok(Body::EarthMoonBarycenter),
            _ => {}
        }
        Body::ALL
            .iter()
            .copied()
            .find(|body| body.name().to_ascii_lowercase() == lower)
            .ok_or_else(|| EphemError::UnknownBody(s.to_string()))
    }
}
