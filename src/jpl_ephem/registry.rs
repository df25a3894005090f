//! Ordered collection of opened DE files.
//!
//! Applications often combine several solutions: a short, precise file for the
//! dates they care about and a long, coarser one as a fallback. The registry
//! keeps them in registration order and answers each query with the first file
//! whose validity interval contains the date, so the preferred files must be
//! registered first.
//!
//! The registry is an ordinary value owned by the application; there is no
//! implicit default instance.
use std::{
    fs::File,
    io::{BufReader, Read, Seek},
};

use crate::{ephem_errors::EphemError, time::JulianDate};

use super::horizon::{
    horizon_data::DeEphemeris,
    horizon_ids::Body,
    interpolation_result::{LibrationAngles, NutationAngles, StateVector},
};

#[derive(Debug)]
pub struct EphemerisRegistry<R = BufReader<File>> {
    entries: Vec<DeEphemeris<R>>,
}

impl<R> Default for EphemerisRegistry<R> {
    fn default() -> Self {
        EphemerisRegistry {
            entries: Vec::new(),
        }
    }
}

impl<R: Read + Seek> EphemerisRegistry<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a file. No deduplication is performed.
    ///
    /// Return
    /// ----------
    /// * The index of the new entry.
    pub fn register(&mut self, ephem: DeEphemeris<R>) -> usize {
        log::info!(
            "registered DE{} (JD {} .. {}) at position {}",
            ephem.de_number(),
            ephem.start_jd(),
            ephem.end_jd(),
            self.entries.len()
        );
        self.entries.push(ephem);
        self.entries.len() - 1
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&DeEphemeris<R>> {
        self.entries.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut DeEphemeris<R>> {
        self.entries.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DeEphemeris<R>> {
        self.entries.iter()
    }

    /// Index of the first registered file covering `jd`, bounds inclusive.
    ///
    /// Errors
    /// ----------
    /// * [`EphemError::NoEphemerisCovers`] — empty registry or no file covers
    ///   `jd`.
    pub fn select_index(&self, jd: impl Into<JulianDate>) -> Result<usize, EphemError> {
        let jd = jd.into();
        self.entries
            .iter()
            .position(|ephem| ephem.covers(jd))
            .ok_or_else(|| EphemError::NoEphemerisCovers {
                jd: jd.value(),
                registered: self.entries.len(),
            })
    }

    /// First registered file covering `jd`.
    pub fn select_for(&mut self, jd: impl Into<JulianDate>) -> Result<&mut DeEphemeris<R>, EphemError> {
        let index = self.select_index(jd)?;
        Ok(&mut self.entries[index])
    }

    /// [`DeEphemeris::body_state`] on the file selected for `jd`.
    pub fn body_state(
        &mut self,
        body: Body,
        origin: Body,
        jd: impl Into<JulianDate>,
        with_velocity: bool,
    ) -> Result<StateVector, EphemError> {
        let jd = jd.into();
        self.select_for(jd)?.body_state(body, origin, jd, with_velocity)
    }

    pub fn nutation(
        &mut self,
        jd: impl Into<JulianDate>,
        with_rates: bool,
    ) -> Result<NutationAngles, EphemError> {
        let jd = jd.into();
        self.select_for(jd)?.nutation(jd, with_rates)
    }

    pub fn libration(
        &mut self,
        jd: impl Into<JulianDate>,
        with_rates: bool,
    ) -> Result<LibrationAngles, EphemError> {
        let jd = jd.into();
        self.select_for(jd)?.libration(jd, with_rates)
    }
}

#[cfg(test)]
mod test_registry {
    use std::io::Cursor;

    use super::*;
    use crate::{jpl_ephem::horizon::horizon_data::LoadOptions, unit_test_global::SyntheticDe};

    fn ephem(de: &SyntheticDe) -> DeEphemeris<Cursor<Vec<u8>>> {
        DeEphemeris::from_reader(Cursor::new(de.build()), LoadOptions::default()).unwrap()
    }

    #[test]
    fn test_empty_registry() {
        let mut registry = EphemerisRegistry::<Cursor<Vec<u8>>>::new();
        assert!(registry.is_empty());
        assert_eq!(
            registry.select_for(2_451_545.0).unwrap_err(),
            EphemError::NoEphemerisCovers {
                jd: 2_451_545.0,
                registered: 0
            }
        );
    }

    #[test]
    fn test_first_registered_wins() {
        let narrow = SyntheticDe {
            block_count: 2,
            ..SyntheticDe::default()
        };
        let wide = SyntheticDe {
            start_jd: narrow.start_jd - 64.0,
            block_count: 8,
            ..SyntheticDe::default()
        };

        let mut registry = EphemerisRegistry::new();
        assert_eq!(registry.register(ephem(&narrow)), 0);
        assert_eq!(registry.register(ephem(&wide)), 1);
        assert_eq!(registry.len(), 2);

        // covered by both
        assert_eq!(registry.select_index(narrow.start_jd + 10.0), Ok(0));
        // only the fallback
        assert_eq!(registry.select_index(narrow.start_jd - 10.0), Ok(1));
        assert_eq!(registry.select_index(narrow.end_jd() + 10.0), Ok(1));

        let selected = registry.select_for(narrow.start_jd + 10.0).unwrap();
        assert_eq!(selected.end_jd(), narrow.end_jd());
    }

    #[test]
    fn test_inclusive_bounds() {
        let de = SyntheticDe::default();
        let mut registry = EphemerisRegistry::new();
        registry.register(ephem(&de));

        assert!(registry.select_for(de.start_jd).is_ok());
        assert!(registry.select_for(de.end_jd()).is_ok());
        let err = registry.select_for(de.end_jd() + 1e-6).unwrap_err();
        assert!(err.is_out_of_range());
        assert!(registry.select_for(de.start_jd - 1e-6).is_err());
    }

    #[test]
    fn test_queries_follow_selection() {
        let de = SyntheticDe::default();
        let mut registry = EphemerisRegistry::new();
        registry.register(ephem(&de));

        let jd = de.start_jd + 17.0;
        let from_registry = registry
            .body_state(Body::Jupiter, Body::Sun, jd, true)
            .unwrap();
        let direct = registry
            .get_mut(0)
            .unwrap()
            .body_state(Body::Jupiter, Body::Sun, jd, true)
            .unwrap();
        assert_eq!(from_registry, direct);
        assert_eq!(registry.get(0).unwrap().cache().reads(), 1);

        assert!(registry.nutation(jd, false).is_ok());
        assert!(registry.libration(jd, true).is_ok());
        assert!(registry
            .body_state(Body::Jupiter, Body::Sun, de.end_jd() + 1.0, false)
            .unwrap_err()
            .is_out_of_range());
    }
}
