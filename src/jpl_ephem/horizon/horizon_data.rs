use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufReader, Read, Seek},
};

use camino::Utf8Path;

use crate::{
    constants::TITLE_COUNT,
    ephem_errors::EphemError,
    jpl_ephem::download_jpl_file::{EphemFilePath, EphemFileSource},
    time::JulianDate,
};

use super::{
    block_cache::CoefficientBlockCache,
    horizon_header::{ByteOrder, CoefficientLayout, HorizonHeader},
    horizon_ids::{Body, Target},
    interpolation_result::{LibrationAngles, NutationAngles, StateVector},
    target_resolver::TargetResolver,
};

/// Options applied when a DE file is opened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Keep the name → value table of the constant record.
    pub retain_constants: bool,
}

impl LoadOptions {
    pub fn with_constants() -> Self {
        LoadOptions {
            retain_constants: true,
        }
    }
}

/// One opened DE binary ephemeris.
///
/// The header is decoded once and never changes. Coefficient blocks are read
/// lazily through a private two-slot cache, which is why every query takes
/// `&mut self`: a `DeEphemeris` belongs to one query context at a time, and
/// sharing one between threads needs an external `Mutex`.
///
/// Queries
/// --------
/// * [`DeEphemeris::body_state`] — position (km) and optional velocity (km/day)
///   of a body relative to an origin.
/// * [`DeEphemeris::nutation`] / [`DeEphemeris::libration`] — angular targets.
///
/// Dates are Julian Days (TDB) given as anything convertible to
/// [`JulianDate`]: a single `f64`, a `(day0, day1)` pair, or a
/// `hifitime::Epoch`.
#[derive(Debug)]
pub struct DeEphemeris<R = BufReader<File>> {
    header: HorizonHeader,
    cache: CoefficientBlockCache<R>,
}

impl DeEphemeris<BufReader<File>> {
    /// Open a DE file from disk.
    pub fn open<P: AsRef<Utf8Path>>(path: P, options: LoadOptions) -> Result<Self, EphemError> {
        let path = path.as_ref();
        log::info!("opening DE file {path}");
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file), options)
    }

    /// Resolve a source (`"horizon:DE405"`, `"path:…"`) and open the file.
    pub fn from_source(source: &EphemFileSource, options: LoadOptions) -> Result<Self, EphemError> {
        let file_path = EphemFilePath::get_ephemeris_file(source)?;
        let ephem = Self::open(file_path.path(), options)?;
        if let EphemFilePath::JPLHorizon(_, version) = &file_path {
            if version.de_number() != ephem.de_number() {
                log::warn!(
                    "{} declares DE{} but was resolved as {version}",
                    file_path,
                    ephem.de_number()
                );
            }
        }
        Ok(ephem)
    }
}

impl<R: Read + Seek> DeEphemeris<R> {
    /// Decode the header of `reader` and wrap it with an empty block cache.
    pub fn from_reader(mut reader: R, options: LoadOptions) -> Result<Self, EphemError> {
        let header = HorizonHeader::read(&mut reader, options.retain_constants)?;
        let cache = CoefficientBlockCache::new(reader, &header);
        Ok(DeEphemeris { header, cache })
    }

    fn resolver(&mut self, jd: JulianDate) -> Result<TargetResolver<'_>, EphemError> {
        let block = self.cache.load(jd)?;
        Ok(TargetResolver::new(&self.header, block))
    }

    /// State of `body` relative to `origin`.
    ///
    /// Arguments
    /// -----------------
    /// * `body`, `origin` — Any pair of [`Body`]; equal bodies give a zero state.
    /// * `jd` — Julian Day (TDB).
    /// * `with_velocity` — Also compute the velocity.
    ///
    /// Return
    /// ----------
    /// * Position in km and velocity in km/day, ICRF axes.
    ///
    /// Errors
    /// ----------
    /// * [`EphemError::OutOfRange`] — `jd` outside the file.
    /// * [`EphemError::IoError`] / [`EphemError::Format`] — the block could not
    ///   be read.
    pub fn body_state(
        &mut self,
        body: Body,
        origin: Body,
        jd: impl Into<JulianDate>,
        with_velocity: bool,
    ) -> Result<StateVector, EphemError> {
        self.resolver(jd.into())?.state(body, origin, with_velocity)
    }

    /// Nutation angles `(Δψ, Δε)` at `jd`.
    ///
    /// Fails with [`EphemError::Unavailable`] without reading the file when the
    /// layout marks nutation absent.
    pub fn nutation(
        &mut self,
        jd: impl Into<JulianDate>,
        with_rates: bool,
    ) -> Result<NutationAngles, EphemError> {
        self.require(Target::Nutation)?;
        self.resolver(jd.into())?.nutation(with_rates)
    }

    /// Lunar libration angles at `jd`.
    pub fn libration(
        &mut self,
        jd: impl Into<JulianDate>,
        with_rates: bool,
    ) -> Result<LibrationAngles, EphemError> {
        self.require(Target::Libration)?;
        self.resolver(jd.into())?.libration(with_rates)
    }

    /// TT − TDB in seconds at `jd`, with its rate in seconds/day.
    ///
    /// Only the DE4xxt files carry the series; the others fail with
    /// [`EphemError::TimeDifferenceUnavailable`] without reading the file.
    pub fn time_difference(
        &mut self,
        jd: impl Into<JulianDate>,
        with_rate: bool,
    ) -> Result<(f64, Option<f64>), EphemError> {
        if !self.header.time_difference_layout().is_present() {
            return Err(EphemError::TimeDifferenceUnavailable);
        }
        self.resolver(jd.into())?.time_difference(with_rate)
    }

    fn require(&self, target: Target) -> Result<(), EphemError> {
        if self.header.layout(target).is_present() {
            Ok(())
        } else {
            Err(EphemError::Unavailable(target))
        }
    }

    pub fn cache(&self) -> &CoefficientBlockCache<R> {
        &self.cache
    }
}

impl<R> DeEphemeris<R> {
    pub fn header(&self) -> &HorizonHeader {
        &self.header
    }

    /// `true` when `jd` lies in `[start_jd, end_jd]`.
    pub fn covers(&self, jd: impl Into<JulianDate>) -> bool {
        let (whole, fraction) = jd.into().split();
        self.header.covers(whole + fraction)
    }

    pub fn start_jd(&self) -> f64 {
        self.header.start_jd()
    }

    pub fn end_jd(&self) -> f64 {
        self.header.end_jd()
    }

    pub fn block_interval(&self) -> f64 {
        self.header.block_interval()
    }

    pub fn au_km(&self) -> f64 {
        self.header.au_km()
    }

    pub fn earth_moon_ratio(&self) -> f64 {
        self.header.earth_moon_ratio()
    }

    pub fn de_number(&self) -> i32 {
        self.header.de_number()
    }

    pub fn titles(&self) -> &[String; TITLE_COUNT] {
        self.header.titles()
    }

    pub fn constant_names(&self) -> &[String] {
        self.header.constant_names()
    }

    pub fn constants(&self) -> Option<&BTreeMap<String, f64>> {
        self.header.constants()
    }

    pub fn constant(&self, name: &str) -> Option<f64> {
        self.header.constant(name)
    }

    pub fn layout(&self, target: Target) -> &CoefficientLayout {
        self.header.layout(target)
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.header.byte_order()
    }
}
