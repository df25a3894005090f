//! Header record of a JPL DE binary ephemeris.
//!
//! The first record of a DE file (Linux distribution, e.g. `lnxp1600p2200.405`)
//! is a Fortran unformatted dump with no byte-order marker:
//!
//! ```text
//! offset  content
//!      0  TTL   3 × CHAR*84   titles
//!    252  CNAM  400 × CHAR*6  constant names
//!   2652  SS    3 × f64       start JD, end JD, block interval (days)
//!   2676  NCON  i32           number of constants
//!   2680  AU    f64           astronomical unit (km)
//!   2688  EMRAT f64           Earth/Moon mass ratio
//!   2696  IPT   12 × 3 × i32  layout rows, Mercury .. Nutation
//!   2840  NUMDE i32           DE number
//!   2844  LPT   3 × i32       libration layout row
//!   2856  CNAM  (NCON-400) × CHAR*6, only when NCON > 400
//!      …  IPT   3 × i32           TT−TDB layout row, after the extra names
//! ```
//!
//! Each layout row is `(offset, coefficients per component, sub-intervals)`,
//! the offset being 1-based in doubles within a block. The record size is not
//! stored: it follows from the layout as the last coefficient of the farthest
//! target. Record 1 holds the constant values, data blocks start at record 2.
//!
//! The DE430t/DE440t files append a one-component TT−TDB series after the
//! libration series. Its row is only trusted when the offset continues the
//! block right after the other targets; in files without the series the same
//! bytes are zero padding.
//!
//! Byte order is detected by decoding in native order first and checking the
//! result for consistency; on failure the header is decoded again swapped.
use std::{
    collections::BTreeMap,
    io::{ErrorKind, Read, Seek, SeekFrom},
};

use nom::{
    bytes::complete::take,
    multi::count,
    number::{
        complete::{f64 as endian_f64, i32 as endian_i32},
        Endianness,
    },
    IResult, Parser,
};

use crate::{
    constants::{
        CONSTANT_NAME_LEN, FIRST_COEFFICIENT_OFFSET, HEADER_FIXED_LEN, LAYOUT_ROW_LEN,
        MAX_COEFFICIENTS_PER_BLOCK, MAX_COEFFICIENTS_PER_COMPONENT, MAX_CONSTANTS,
        MAX_SUB_INTERVALS, OLD_MAX_CONSTANTS, TITLE_COUNT, TITLE_LEN,
    },
    ephem_errors::EphemError,
};

use super::horizon_ids::Target;

/// Byte order of the numeric fields of a DE file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    Little,
    Big,
}

impl ByteOrder {
    pub fn native() -> Self {
        if cfg!(target_endian = "little") {
            ByteOrder::Little
        } else {
            ByteOrder::Big
        }
    }

    pub fn swapped(self) -> Self {
        match self {
            ByteOrder::Little => ByteOrder::Big,
            ByteOrder::Big => ByteOrder::Little,
        }
    }

    pub(crate) fn endianness(self) -> Endianness {
        match self {
            ByteOrder::Little => Endianness::Little,
            ByteOrder::Big => Endianness::Big,
        }
    }
}

/// Where a target's coefficients live inside a block.
///
/// Fields
/// -----------------
/// * `offset` — 0-based index of the first coefficient in the block (the file
///   stores it 1-based; the two block dates occupy indices 0 and 1).
/// * `coefficients_per_component` — Chebyshev terms per component.
/// * `component_count` — 3 for vectors and libration, 2 for nutation, 1 for
///   TT−TDB.
/// * `sub_interval_count` — Sub-intervals the block is split into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CoefficientLayout {
    pub offset: usize,
    pub coefficients_per_component: usize,
    pub component_count: usize,
    pub sub_interval_count: usize,
}

impl CoefficientLayout {
    /// A target with zero coefficients or zero sub-intervals is absent.
    pub fn is_present(&self) -> bool {
        self.coefficients_per_component > 0 && self.sub_interval_count > 0
    }

    /// Doubles used by one sub-interval.
    pub fn sub_interval_len(&self) -> usize {
        self.coefficients_per_component * self.component_count
    }

    /// One past the last coefficient of this target, or `0` when absent.
    pub fn end(&self) -> usize {
        if self.is_present() {
            self.offset + self.sub_interval_len() * self.sub_interval_count
        } else {
            0
        }
    }
}

/// Decoded header of a DE file.
#[derive(Debug, Clone, PartialEq)]
pub struct HorizonHeader {
    pub(crate) titles: [String; TITLE_COUNT],
    pub(crate) de_number: i32,
    pub(crate) start_jd: f64,
    pub(crate) end_jd: f64,
    pub(crate) block_interval: f64,
    pub(crate) au_km: f64,
    pub(crate) earth_moon_ratio: f64,
    pub(crate) layouts: [CoefficientLayout; Target::COUNT],
    pub(crate) time_difference: CoefficientLayout,
    pub(crate) coefficients_per_block: usize,
    pub(crate) byte_order: ByteOrder,
    pub(crate) constant_names: Vec<String>,
    pub(crate) constants: Option<BTreeMap<String, f64>>,
}

/// Fixed-record fields before validation.
#[derive(Debug)]
struct RawHeader {
    titles: [String; TITLE_COUNT],
    names: Vec<String>,
    dates: [f64; 3],
    ncon: i32,
    au_km: f64,
    emrat: f64,
    rows: [[i32; 3]; Target::COUNT],
    de_number: i32,
}

fn parse_text(len: usize) -> impl FnMut(&[u8]) -> IResult<&[u8], String> {
    move |input: &[u8]| {
        let (rest, raw) = take(len).parse(input)?;
        Ok((rest, String::from_utf8_lossy(raw).trim().to_string()))
    }
}

pub(crate) fn parse_f64(endian: Endianness) -> impl FnMut(&[u8]) -> IResult<&[u8], f64> {
    move |input: &[u8]| endian_f64(endian).parse(input)
}

fn parse_i32(endian: Endianness) -> impl FnMut(&[u8]) -> IResult<&[u8], i32> {
    move |input: &[u8]| endian_i32(endian).parse(input)
}

fn parse_row(endian: Endianness, mut input: &[u8]) -> IResult<&[u8], [i32; 3]> {
    let mut row = [0i32; 3];
    for slot in &mut row {
        let (rest, val) = parse_i32(endian)(input)?;
        *slot = val;
        input = rest;
    }
    Ok((input, row))
}

/// Decode the fixed 2856-byte part of the header in the given byte order.
fn parse_fixed(input: &[u8], endian: Endianness) -> IResult<&[u8], RawHeader> {
    let (input, titles) = count(parse_text(TITLE_LEN), TITLE_COUNT).parse(input)?;
    let (input, names) = count(parse_text(CONSTANT_NAME_LEN), OLD_MAX_CONSTANTS).parse(input)?;

    let (input, start) = parse_f64(endian)(input)?;
    let (input, end) = parse_f64(endian)(input)?;
    let (input, interval) = parse_f64(endian)(input)?;
    let (input, ncon) = parse_i32(endian)(input)?;
    let (input, au_km) = parse_f64(endian)(input)?;
    let (mut input, emrat) = parse_f64(endian)(input)?;

    let mut rows = [[0i32; 3]; Target::COUNT];
    for row in rows.iter_mut().take(Target::Libration.index()) {
        let (rest, parsed) = parse_row(endian, input)?;
        *row = parsed;
        input = rest;
    }
    let (input, de_number) = parse_i32(endian)(input)?;
    let (input, libration) = parse_row(endian, input)?;
    rows[Target::Libration.index()] = libration;

    let titles = [titles[0].clone(), titles[1].clone(), titles[2].clone()];

    Ok((
        input,
        RawHeader {
            titles,
            names,
            dates: [start, end, interval],
            ncon,
            au_km,
            emrat,
            rows,
            de_number,
        },
    ))
}

impl RawHeader {
    /// Check the decoded values and derive the block geometry.
    ///
    /// Byte-swapped garbage fails at least one of these checks in practice:
    /// swapped doubles come out denormal, huge or NaN, swapped small integers
    /// come out above the layout bounds.
    fn validate(&self) -> Result<([CoefficientLayout; Target::COUNT], usize), String> {
        let [start, end, interval] = self.dates;
        if !(start.is_finite() && end.is_finite() && interval.is_finite()) {
            return Err("non-finite validity interval".into());
        }
        if start >= end {
            return Err(format!("start JD {start} is not before end JD {end}"));
        }
        if interval <= 0.0 {
            return Err(format!("non-positive block interval {interval}"));
        }
        let blocks = (end - start) / interval;
        if (blocks - blocks.round()).abs() > 1e-6 || blocks.round() < 1.0 {
            return Err(format!(
                "validity interval is not a whole number of {interval}-day blocks"
            ));
        }
        if !(self.au_km.is_finite() && self.au_km > 0.0) {
            return Err(format!("invalid AU value {}", self.au_km));
        }
        if !(self.emrat.is_finite() && self.emrat > 0.0) {
            return Err(format!("invalid Earth/Moon mass ratio {}", self.emrat));
        }
        if self.ncon < 0 || self.ncon as usize > MAX_CONSTANTS {
            return Err(format!("invalid constant count {}", self.ncon));
        }

        let mut layouts = [CoefficientLayout::default(); Target::COUNT];
        for (target, row) in Target::ALL.iter().zip(self.rows.iter()) {
            layouts[target.index()] =
                layout_from_row(&format!("{target:?}"), target.component_count(), *row)?;
        }

        let coefficients_per_block = layouts.iter().map(CoefficientLayout::end).max().unwrap_or(0);
        if coefficients_per_block <= FIRST_COEFFICIENT_OFFSET {
            return Err("layout table describes no stored target".into());
        }
        if coefficients_per_block > MAX_COEFFICIENTS_PER_BLOCK {
            return Err(format!(
                "block size {coefficients_per_block} exceeds the format maximum"
            ));
        }
        if coefficients_per_block * 8 < HEADER_FIXED_LEN {
            return Err(format!(
                "record size {} is smaller than the header",
                coefficients_per_block * 8
            ));
        }
        Ok((layouts, coefficients_per_block))
    }
}

fn layout_from_row(
    what: &str,
    component_count: usize,
    row: [i32; 3],
) -> Result<CoefficientLayout, String> {
    let [offset, ncf, nsub] = row;
    if ncf < 0 || nsub < 0 || offset < 0 {
        return Err(format!("negative layout entry for {what}: {row:?}"));
    }
    let (offset, ncf, nsub) = (offset as usize, ncf as usize, nsub as usize);
    if ncf == 0 || nsub == 0 {
        return Ok(CoefficientLayout {
            offset: offset.saturating_sub(1),
            coefficients_per_component: 0,
            component_count,
            sub_interval_count: 0,
        });
    }
    if offset < FIRST_COEFFICIENT_OFFSET
        || offset > MAX_COEFFICIENTS_PER_BLOCK
        || ncf > MAX_COEFFICIENTS_PER_COMPONENT
        || nsub > MAX_SUB_INTERVALS
    {
        return Err(format!("layout entry for {what} out of bounds: {row:?}"));
    }
    Ok(CoefficientLayout {
        offset: offset - 1,
        coefficients_per_component: ncf,
        component_count,
        sub_interval_count: nsub,
    })
}

/// Layout of the TT−TDB series from the row following the extra constant
/// names.
///
/// The row is accepted only when it starts right after the last coefficient
/// of the other targets (`coefficients_per_block`, 0-based); anything else is
/// padding of a file without the series.
fn time_difference_from_row(
    row: [i32; 3],
    coefficients_per_block: usize,
) -> Result<CoefficientLayout, String> {
    let absent = CoefficientLayout {
        offset: coefficients_per_block,
        component_count: 1,
        ..CoefficientLayout::default()
    };
    if row == [0; 3] {
        return Ok(absent);
    }
    if usize::try_from(row[0]).ok() != Some(coefficients_per_block + 1) {
        log::debug!("ignoring TT-TDB row {row:?}: the block ends at {coefficients_per_block}");
        return Ok(absent);
    }
    layout_from_row("TT-TDB", 1, row)
}

/// Read exactly `buf.len()` bytes, mapping a premature end of file to a
/// format error: a file shorter than its own header is not a DE file.
fn read_header_bytes<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<(), EphemError> {
    reader.read_exact(buf).map_err(|err| match err.kind() {
        ErrorKind::UnexpectedEof => EphemError::Format("truncated header record".into()),
        _ => EphemError::IoError(err),
    })
}

impl HorizonHeader {
    /// Decode the header of a DE file.
    ///
    /// Arguments
    /// -----------------
    /// * `reader` — Storage holding the whole file; the decoder seeks to 0.
    /// * `retain_constants` — Also read record 1 and keep the name → value table.
    ///
    /// Return
    /// ----------
    /// * The decoded header, or [`EphemError::Format`] when the header is
    ///   inconsistent in both byte orders.
    pub fn read<R: Read + Seek>(
        reader: &mut R,
        retain_constants: bool,
    ) -> Result<Self, EphemError> {
        reader.seek(SeekFrom::Start(0))?;
        let mut fixed = vec![0u8; HEADER_FIXED_LEN];
        read_header_bytes(reader, &mut fixed)?;

        let native = ByteOrder::native();
        let (byte_order, raw, layouts, coefficients_per_block) =
            match Self::decode_fixed(&fixed, native) {
                Ok((raw, layouts, ncoeff)) => (native, raw, layouts, ncoeff),
                Err(native_reason) => {
                    let swapped = native.swapped();
                    match Self::decode_fixed(&fixed, swapped) {
                        Ok((raw, layouts, ncoeff)) => {
                            log::warn!(
                                "DE header decoded in {swapped:?} byte order (native order failed: {native_reason})"
                            );
                            (swapped, raw, layouts, ncoeff)
                        }
                        Err(swapped_reason) => {
                            return Err(EphemError::Format(format!(
                                "header inconsistent in both byte orders ({native:?}: {native_reason}; {swapped:?}: {swapped_reason})"
                            )))
                        }
                    }
                }
            };

        let ncon = raw.ncon as usize;
        let mut coefficients_per_block = coefficients_per_block;
        let mut constant_names: Vec<String> = raw.names.into_iter().take(ncon).collect();
        let mut time_difference = CoefficientLayout {
            offset: coefficients_per_block,
            component_count: 1,
            ..CoefficientLayout::default()
        };

        if ncon > OLD_MAX_CONSTANTS {
            let extra_count = ncon - OLD_MAX_CONSTANTS;
            let extra_len = extra_count * CONSTANT_NAME_LEN + LAYOUT_ROW_LEN;
            if HEADER_FIXED_LEN + extra_len > coefficients_per_block * 8 {
                return Err(EphemError::Format(format!(
                    "{ncon} constant names do not fit in a {}-byte record",
                    coefficients_per_block * 8
                )));
            }
            let mut extra = vec![0u8; extra_len];
            read_header_bytes(reader, &mut extra)?;
            let (rest, names) = count(parse_text(CONSTANT_NAME_LEN), extra_count)
                .parse(extra.as_slice())
                .map_err(|err| EphemError::Format(format!("constant names: {err}")))?;
            constant_names.extend(names);

            let (_, row) = parse_row(byte_order.endianness(), rest)
                .map_err(|err| EphemError::Format(format!("TT-TDB layout row: {err}")))?;
            time_difference =
                time_difference_from_row(row, coefficients_per_block).map_err(EphemError::Format)?;
            if time_difference.is_present() {
                coefficients_per_block = time_difference.end();
                if coefficients_per_block > MAX_COEFFICIENTS_PER_BLOCK {
                    return Err(EphemError::Format(format!(
                        "block size {coefficients_per_block} exceeds the format maximum"
                    )));
                }
            }
        }
        let record_len = coefficients_per_block * 8;

        let constants = if retain_constants {
            if ncon > coefficients_per_block {
                return Err(EphemError::Format(format!(
                    "{ncon} constant values do not fit in one record"
                )));
            }
            reader.seek(SeekFrom::Start(record_len as u64))?;
            let mut values = vec![0u8; ncon * 8];
            reader.read_exact(&mut values)?;
            let endian = byte_order.endianness();
            let (_, values) = count(parse_f64(endian), ncon)
                .parse(values.as_slice())
                .map_err(|err| EphemError::Format(format!("constant values: {err}")))?;
            Some(
                constant_names
                    .iter()
                    .cloned()
                    .zip(values)
                    .collect::<BTreeMap<_, _>>(),
            )
        } else {
            None
        };

        let [start_jd, end_jd, block_interval] = raw.dates;
        log::info!(
            "decoded DE{} header: JD {start_jd} .. {end_jd}, {block_interval}-day blocks of {coefficients_per_block} coefficients, {byte_order:?} endian",
            raw.de_number
        );

        Ok(HorizonHeader {
            titles: raw.titles,
            de_number: raw.de_number,
            start_jd,
            end_jd,
            block_interval,
            au_km: raw.au_km,
            earth_moon_ratio: raw.emrat,
            layouts,
            time_difference,
            coefficients_per_block,
            byte_order,
            constant_names,
            constants,
        })
    }

    fn decode_fixed(
        fixed: &[u8],
        byte_order: ByteOrder,
    ) -> Result<(RawHeader, [CoefficientLayout; Target::COUNT], usize), String> {
        let (_, raw) = parse_fixed(fixed, byte_order.endianness())
            .map_err(|err| format!("nom parsing error: {err}"))?;
        let (layouts, ncoeff) = raw.validate()?;
        Ok((raw, layouts, ncoeff))
    }

    pub fn titles(&self) -> &[String; TITLE_COUNT] {
        &self.titles
    }

    pub fn de_number(&self) -> i32 {
        self.de_number
    }

    pub fn start_jd(&self) -> f64 {
        self.start_jd
    }

    pub fn end_jd(&self) -> f64 {
        self.end_jd
    }

    pub fn block_interval(&self) -> f64 {
        self.block_interval
    }

    pub fn au_km(&self) -> f64 {
        self.au_km
    }

    pub fn earth_moon_ratio(&self) -> f64 {
        self.earth_moon_ratio
    }

    pub fn layout(&self, target: Target) -> &CoefficientLayout {
        &self.layouts[target.index()]
    }

    /// Layout of the TT−TDB series (seconds), absent outside the DE4xxt files.
    pub fn time_difference_layout(&self) -> &CoefficientLayout {
        &self.time_difference
    }

    pub fn coefficients_per_block(&self) -> usize {
        self.coefficients_per_block
    }

    /// Size of one record (header, constants or data block) in bytes.
    pub fn record_len(&self) -> usize {
        self.coefficients_per_block * 8
    }

    /// Byte offset of the first data block.
    pub fn data_offset(&self) -> u64 {
        2 * self.record_len() as u64
    }

    /// Number of data blocks between `start_jd` and `end_jd`.
    pub fn block_count(&self) -> usize {
        ((self.end_jd - self.start_jd) / self.block_interval).round() as usize
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    pub fn constant_names(&self) -> &[String] {
        &self.constant_names
    }

    /// Retained constant table, `None` unless requested at load time.
    pub fn constants(&self) -> Option<&BTreeMap<String, f64>> {
        self.constants.as_ref()
    }

    pub fn constant(&self, name: &str) -> Option<f64> {
        self.constants.as_ref()?.get(name).copied()
    }

    /// `true` when `jd` lies in the inclusive validity interval.
    pub fn covers(&self, jd: f64) -> bool {
        jd >= self.start_jd && jd <= self.end_jd
    }
}

#[cfg(test)]
mod test_horizon_header {
    use std::io::Cursor;

    use super::*;
    use crate::{
        constants::{HEADER_DATES_OFFSET, HEADER_LAYOUT_OFFSET},
        unit_test_global::{SyntheticDe, TT_TDB_CONSTANT_COUNT},
    };

    #[test]
    fn test_decode_native_header() {
        let de = SyntheticDe::default();
        let header = HorizonHeader::read(&mut Cursor::new(de.build()), false).unwrap();

        assert_eq!(header.de_number(), 405);
        assert_eq!(header.start_jd(), de.start_jd);
        assert_eq!(header.end_jd(), de.end_jd());
        assert_eq!(header.block_interval(), 32.0);
        assert_eq!(header.au_km(), 149_597_870.691);
        assert_eq!(header.earth_moon_ratio(), 81.30056);
        assert_eq!(header.coefficients_per_block(), 1018);
        assert_eq!(header.record_len(), 8144);
        assert_eq!(header.data_offset(), 16288);
        assert_eq!(header.block_count(), de.block_count);
        assert_eq!(header.byte_order(), ByteOrder::native());
        assert_eq!(header.titles()[0], "Synthetic DE405-layout test file");
        assert_eq!(header.constants(), None);
        assert_eq!(header.constant_names().len(), 3);

        assert_eq!(
            *header.layout(Target::Mercury),
            CoefficientLayout {
                offset: 2,
                coefficients_per_component: 14,
                component_count: 3,
                sub_interval_count: 4,
            }
        );
        assert_eq!(
            *header.layout(Target::Nutation),
            CoefficientLayout {
                offset: 818,
                coefficients_per_component: 10,
                component_count: 2,
                sub_interval_count: 4,
            }
        );
        assert_eq!(header.layout(Target::Libration).offset, 898);
    }

    #[test]
    fn test_decode_swapped_header() {
        let native = SyntheticDe::default();
        let swapped = SyntheticDe {
            byte_order: ByteOrder::native().swapped(),
            ..SyntheticDe::default()
        };
        let a = HorizonHeader::read(&mut Cursor::new(native.build()), true).unwrap();
        let b = HorizonHeader::read(&mut Cursor::new(swapped.build()), true).unwrap();

        assert_eq!(b.byte_order(), ByteOrder::native().swapped());
        assert_eq!(a.start_jd(), b.start_jd());
        assert_eq!(a.end_jd(), b.end_jd());
        assert_eq!(a.layouts, b.layouts);
        assert_eq!(a.constants(), b.constants());
    }

    #[test]
    fn test_retained_constants() {
        let de = SyntheticDe::default();
        let header = HorizonHeader::read(&mut Cursor::new(de.build()), true).unwrap();
        let constants = header.constants().unwrap();
        assert_eq!(constants.len(), 3);
        assert_eq!(header.constant("EMRAT"), Some(81.30056));
        assert_eq!(header.constant("AU"), Some(149_597_870.691));
        assert_eq!(header.constant("DENUM"), Some(405.0));
        assert_eq!(header.constant("CLIGHT"), None);
    }

    #[test]
    fn test_time_difference_row_extends_record() {
        let de = SyntheticDe {
            tt_tdb: true,
            ..SyntheticDe::default()
        };
        let header = HorizonHeader::read(&mut Cursor::new(de.build()), true).unwrap();

        assert_eq!(header.coefficients_per_block(), 1122);
        assert_eq!(header.record_len(), 8976);
        assert_eq!(header.data_offset(), 17952);
        assert_eq!(
            *header.time_difference_layout(),
            CoefficientLayout {
                offset: 1018,
                coefficients_per_component: 13,
                component_count: 1,
                sub_interval_count: 8,
            }
        );
        assert_eq!(header.layout(Target::Libration).end(), 1018);
        assert_eq!(header.constant_names().len(), TT_TDB_CONSTANT_COUNT);
        assert_eq!(header.constant_names()[405], "K0405");
        assert_eq!(header.constant("K0409"), Some(409.0));
        assert_eq!(header.constant("AU"), Some(149_597_870.691));
    }

    #[test]
    fn test_padding_after_extra_names_is_not_a_row() {
        let de = SyntheticDe {
            tt_tdb: true,
            ..SyntheticDe::default()
        };
        let row_at = HEADER_FIXED_LEN + (TT_TDB_CONSTANT_COUNT - OLD_MAX_CONSTANTS) * CONSTANT_NAME_LEN;

        // zero padding, as in files without the series
        let mut zeroed = de.build();
        zeroed[row_at..row_at + LAYOUT_ROW_LEN].fill(0);
        let header = HorizonHeader::read(&mut Cursor::new(zeroed), false).unwrap();
        assert!(!header.time_difference_layout().is_present());
        assert_eq!(header.coefficients_per_block(), 1018);
        assert_eq!(header.constant_names().len(), TT_TDB_CONSTANT_COUNT);

        // a row that does not continue the block is ignored
        let mut detached = de.build();
        detached[row_at..row_at + 4].copy_from_slice(&de.byte_order_i32(5));
        let header = HorizonHeader::read(&mut Cursor::new(detached), false).unwrap();
        assert!(!header.time_difference_layout().is_present());
        assert_eq!(header.coefficients_per_block(), 1018);
    }

    #[test]
    fn test_no_time_difference_below_fixed_name_count() {
        let de = SyntheticDe::default();
        let header = HorizonHeader::read(&mut Cursor::new(de.build()), false).unwrap();
        assert!(!header.time_difference_layout().is_present());
        assert_eq!(header.time_difference_layout().component_count, 1);
    }

    #[test]
    fn test_absent_libration_layout() {
        let de = SyntheticDe {
            with_libration: false,
            ..SyntheticDe::default()
        };
        let header = HorizonHeader::read(&mut Cursor::new(de.build()), false).unwrap();
        assert!(!header.layout(Target::Libration).is_present());
        assert!(header.layout(Target::Nutation).is_present());
        assert_eq!(header.coefficients_per_block(), 898);
    }

    #[test]
    fn test_inconsistent_dates_rejected() {
        let de = SyntheticDe::default();
        let mut bytes = de.build();
        // swap start and end so that start > end in both orders
        let (start, end) = (HEADER_DATES_OFFSET, HEADER_DATES_OFFSET + 8);
        let first: Vec<u8> = bytes[start..start + 8].to_vec();
        let second: Vec<u8> = bytes[end..end + 8].to_vec();
        bytes[start..start + 8].copy_from_slice(&second);
        bytes[end..end + 8].copy_from_slice(&first);

        let err = HorizonHeader::read(&mut Cursor::new(bytes), false).unwrap_err();
        assert!(matches!(err, EphemError::Format(_)));
    }

    #[test]
    fn test_layout_out_of_block_rejected() {
        let de = SyntheticDe::default();
        let mut bytes = de.build();
        // Mercury coefficient count far above the format bound
        let pos = HEADER_LAYOUT_OFFSET + 4;
        bytes[pos..pos + 4].copy_from_slice(&de.byte_order_i32(100_000));
        let err = HorizonHeader::read(&mut Cursor::new(bytes), false).unwrap_err();
        assert!(matches!(err, EphemError::Format(_)));
    }

    #[test]
    fn test_truncated_file() {
        let bytes = vec![0u8; 1000];
        let err = HorizonHeader::read(&mut Cursor::new(bytes), false).unwrap_err();
        assert_eq!(err, EphemError::Format("truncated header record".into()));
    }

    #[test]
    fn test_covers_inclusive_bounds() {
        let de = SyntheticDe::default();
        let header = HorizonHeader::read(&mut Cursor::new(de.build()), false).unwrap();
        assert!(header.covers(header.start_jd()));
        assert!(header.covers(header.end_jd()));
        assert!(!header.covers(header.end_jd() + 1e-6));
        assert!(!header.covers(header.start_jd() - 1e-6));
    }

    #[test]
    fn test_layout_end() {
        let absent = CoefficientLayout {
            offset: 1018,
            coefficients_per_component: 0,
            component_count: 3,
            sub_interval_count: 0,
        };
        assert!(!absent.is_present());
        assert_eq!(absent.end(), 0);

        let moon = CoefficientLayout {
            offset: 440,
            coefficients_per_component: 13,
            component_count: 3,
            sub_interval_count: 8,
        };
        assert_eq!(moon.sub_interval_len(), 39);
        assert_eq!(moon.end(), 752);
    }
}
