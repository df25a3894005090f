//! Two-slot cache of coefficient blocks.
//!
//! A DE file stores one block of `coefficients_per_block` doubles per
//! `block_interval` days. Queries cluster in time, and a sequence of queries
//! typically walks across a block boundary and back, so the cache keeps the
//! two most recently validated blocks. On a miss the least recently validated
//! slot is replaced after a complete, successful read; a failed read leaves
//! both slots untouched.
use std::io::{Read, Seek, SeekFrom};

use nom::{multi::count, Parser};

use crate::{ephem_errors::EphemError, time::JulianDate};

use super::horizon_header::{parse_f64, ByteOrder, HorizonHeader};

/// Tolerance when checking a block's stored start date against its index.
const BLOCK_DATE_TOLERANCE: f64 = 1e-6;

/// Geometry needed to address blocks, copied from the header.
#[derive(Debug, Clone, Copy, PartialEq)]
struct BlockGeometry {
    start_jd: f64,
    end_jd: f64,
    block_interval: f64,
    block_count: usize,
    coefficients_per_block: usize,
    data_offset: u64,
    byte_order: ByteOrder,
}

#[derive(Debug, Clone, PartialEq)]
struct CachedBlock {
    index: usize,
    coefficients: Vec<f64>,
}

/// Block returned by [`CoefficientBlockCache::load`].
///
/// Fields
/// -----------------
/// * `index` — 0-based block number from the start of the file.
/// * `fraction` — Position of the requested date inside the block, ∈ \[0, 1\].
/// * `coefficients` — The whole block, including the two leading dates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadedBlock<'a> {
    pub index: usize,
    pub fraction: f64,
    pub coefficients: &'a [f64],
}

/// Cache owning the storage handle and at most two decoded blocks.
#[derive(Debug)]
pub struct CoefficientBlockCache<R> {
    reader: R,
    geometry: BlockGeometry,
    slots: [Option<CachedBlock>; 2],
    last_validated: usize,
    reads: usize,
}

impl<R: Read + Seek> CoefficientBlockCache<R> {
    pub fn new(reader: R, header: &HorizonHeader) -> Self {
        CoefficientBlockCache {
            reader,
            geometry: BlockGeometry {
                start_jd: header.start_jd(),
                end_jd: header.end_jd(),
                block_interval: header.block_interval(),
                block_count: header.block_count(),
                coefficients_per_block: header.coefficients_per_block(),
                data_offset: header.data_offset(),
                byte_order: header.byte_order(),
            },
            slots: [None, None],
            last_validated: 0,
            reads: 0,
        }
    }

    /// Locate the block containing `jd` and the fractional position inside it.
    ///
    /// The date is split into whole days and fraction before subtracting the
    /// file start so the fraction keeps its full precision. The end date of the
    /// file belongs to the last block.
    ///
    /// Return
    /// ----------
    /// * `(index, fraction)` or [`EphemError::OutOfRange`].
    pub fn locate(&self, jd: JulianDate) -> Result<(usize, f64), EphemError> {
        let geo = &self.geometry;
        let (whole, fraction) = jd.split();
        let total = whole + fraction;
        if !(total >= geo.start_jd && total <= geo.end_jd) {
            return Err(EphemError::OutOfRange {
                jd: total,
                start: geo.start_jd,
                end: geo.end_jd,
            });
        }

        let elapsed_whole = whole - geo.start_jd;
        let index = ((elapsed_whole + fraction) / geo.block_interval).floor() as usize;
        let index = index.min(geo.block_count - 1);

        let block_start = index as f64 * geo.block_interval;
        let within = ((elapsed_whole - block_start) + fraction) / geo.block_interval;
        Ok((index, within.clamp(0.0, 1.0)))
    }

    /// `[start, end)` Julian Days covered by block `index`.
    pub fn block_bounds(&self, index: usize) -> (f64, f64) {
        let geo = &self.geometry;
        let start = geo.start_jd + index as f64 * geo.block_interval;
        (start, start + geo.block_interval)
    }

    /// Make the block covering `jd` resident and return it.
    ///
    /// A hit performs no I/O. A miss performs exactly one read of
    /// `coefficients_per_block` doubles.
    ///
    /// Errors
    /// ----------
    /// * [`EphemError::OutOfRange`] — `jd` outside the file.
    /// * [`EphemError::IoError`] — storage failure or short read.
    /// * [`EphemError::Format`] — the block's stored start date does not match
    ///   its position in the file.
    pub fn load(&mut self, jd: JulianDate) -> Result<LoadedBlock<'_>, EphemError> {
        let (index, fraction) = self.locate(jd)?;

        let slot = match self.find_slot(index) {
            Some(slot) => slot,
            None => {
                let coefficients = self.read_block(index)?;
                let slot = self.victim_slot();
                self.slots[slot] = Some(CachedBlock {
                    index,
                    coefficients,
                });
                slot
            }
        };
        self.last_validated = slot;

        let block = self.slots[slot]
            .as_ref()
            .map(|cached| cached.coefficients.as_slice())
            .unwrap_or_default();

        Ok(LoadedBlock {
            index,
            fraction,
            coefficients: block,
        })
    }

    fn find_slot(&self, index: usize) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|cached| cached.index == index))
    }

    /// Empty slot first, otherwise the one not validated last.
    fn victim_slot(&self) -> usize {
        self.slots
            .iter()
            .position(Option::is_none)
            .unwrap_or(1 - self.last_validated)
    }

    fn read_block(&mut self, index: usize) -> Result<Vec<f64>, EphemError> {
        let geo = self.geometry;
        let record_len = geo.coefficients_per_block * 8;
        let offset = geo.data_offset + (index * record_len) as u64;

        log::debug!("reading DE block {index} at byte offset {offset}");
        self.reader.seek(SeekFrom::Start(offset))?;
        let mut buffer = vec![0u8; record_len];
        self.reader.read_exact(&mut buffer)?;
        self.reads += 1;

        let (_, coefficients) = count(parse_f64(geo.byte_order.endianness()), geo.coefficients_per_block)
            .parse(buffer.as_slice())
            .map_err(|err| EphemError::Format(format!("block {index}: {err}")))?;

        let (expected_start, _) = self.block_bounds(index);
        if (coefficients[0] - expected_start).abs() > BLOCK_DATE_TOLERANCE {
            return Err(EphemError::Format(format!(
                "block {index} starts at JD {} instead of {expected_start}",
                coefficients[0]
            )));
        }
        Ok(coefficients)
    }

    /// Number of block reads performed so far.
    pub fn reads(&self) -> usize {
        self.reads
    }

    /// Indices of the resident blocks, slot order.
    pub fn cached_blocks(&self) -> [Option<usize>; 2] {
        [
            self.slots[0].as_ref().map(|cached| cached.index),
            self.slots[1].as_ref().map(|cached| cached.index),
        ]
    }

    /// Drop both resident blocks.
    pub fn clear(&mut self) {
        self.slots = [None, None];
        self.last_validated = 0;
    }
}
