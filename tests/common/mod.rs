#![allow(dead_code)]

use std::io::Cursor;

use camino::Utf8PathBuf;
use dephem::jpl_ephem::{
    horizon::{horizon_header::ByteOrder, horizon_ids::Target},
    DeEphemeris, LoadOptions,
};

/// DE405 layout rows, `(offset, coefficients, sub-intervals)`.
pub const DE405_LAYOUT: [[i32; 3]; 13] = [
    [3, 14, 4],
    [171, 10, 2],
    [231, 13, 2],
    [309, 11, 1],
    [342, 8, 1],
    [366, 7, 1],
    [387, 6, 1],
    [405, 6, 1],
    [423, 6, 1],
    [441, 13, 8],
    [753, 11, 2],
    [819, 10, 4],
    [899, 10, 4],
];

pub const COEFFICIENTS_PER_BLOCK: usize = 1018;

/// Builds DE405-shaped files in memory.
///
/// The coefficients are smooth-looking but arbitrary: each is a function of
/// the block, the position in the block and the file's `seed`, so two files
/// with different seeds give different states for the same date.
#[derive(Debug, Clone)]
pub struct DeFileBuilder {
    pub de_number: i32,
    pub start_jd: f64,
    pub block_count: usize,
    pub byte_order: ByteOrder,
    pub seed: f64,
}

impl Default for DeFileBuilder {
    fn default() -> Self {
        DeFileBuilder {
            de_number: 405,
            start_jd: 2_450_064.5,
            block_count: 6,
            byte_order: ByteOrder::native(),
            seed: 1.0,
        }
    }
}

impl DeFileBuilder {
    pub fn end_jd(&self) -> f64 {
        self.start_jd + 32.0 * self.block_count as f64
    }

    fn f64_bytes(&self, value: f64) -> [u8; 8] {
        match self.byte_order {
            ByteOrder::Little => value.to_le_bytes(),
            ByteOrder::Big => value.to_be_bytes(),
        }
    }

    fn i32_bytes(&self, value: i32) -> [u8; 4] {
        match self.byte_order {
            ByteOrder::Little => value.to_le_bytes(),
            ByteOrder::Big => value.to_be_bytes(),
        }
    }

    /// Leading term of each component is large, higher terms decay quickly.
    fn coefficient(&self, block: usize, index: usize) -> f64 {
        let row = DE405_LAYOUT
            .iter()
            .enumerate()
            .filter(|(_, [offset, ..])| (*offset as usize - 1) <= index)
            .last()
            .map(|(row, [offset, ncf, _])| (row, index - (*offset as usize - 1), *ncf as usize));
        match row {
            Some((row, rel, ncf)) => {
                let degree = rel % ncf;
                let component = (rel / ncf) % Target::ALL[row].component_count();
                let scale = if row >= Target::Nutation.index() { 1e-3 } else { 1e7 };
                let phase = self.seed + block as f64 * 0.37 + component as f64 * 1.3 + row as f64;
                scale * (1.0 + 0.5 * phase.sin()) / 10f64.powi(2 * degree as i32)
            }
            None => 0.0,
        }
    }

    pub fn build(&self) -> Vec<u8> {
        let record_len = COEFFICIENTS_PER_BLOCK * 8;
        let mut bytes = Vec::with_capacity(record_len * (2 + self.block_count));

        let titles = [
            format!("JPL Planetary Ephemeris DE{}/LE{}", self.de_number, self.de_number),
            format!("Start Epoch: JED= {}", self.start_jd),
            format!("Final Epoch: JED= {}", self.end_jd()),
        ];
        for title in &titles {
            bytes.extend(format!("{title:<84}").as_bytes());
        }
        let names = ["DENUM", "AU", "EMRAT", "CLIGHT"];
        for i in 0..400 {
            bytes.extend(format!("{:<6}", names.get(i).unwrap_or(&"")).as_bytes());
        }
        for value in [self.start_jd, self.end_jd(), 32.0] {
            bytes.extend(self.f64_bytes(value));
        }
        bytes.extend(self.i32_bytes(names.len() as i32));
        bytes.extend(self.f64_bytes(149_597_870.691));
        bytes.extend(self.f64_bytes(81.30056));
        for row in &DE405_LAYOUT[..12] {
            for value in row {
                bytes.extend(self.i32_bytes(*value));
            }
        }
        bytes.extend(self.i32_bytes(self.de_number));
        for value in &DE405_LAYOUT[12] {
            bytes.extend(self.i32_bytes(*value));
        }
        bytes.resize(record_len, 0);

        for value in [self.de_number as f64, 149_597_870.691, 81.30056, 299_792.458] {
            bytes.extend(self.f64_bytes(value));
        }
        bytes.resize(2 * record_len, 0);

        for block in 0..self.block_count {
            let block_start = self.start_jd + 32.0 * block as f64;
            bytes.extend(self.f64_bytes(block_start));
            bytes.extend(self.f64_bytes(block_start + 32.0));
            for index in 2..COEFFICIENTS_PER_BLOCK {
                bytes.extend(self.f64_bytes(self.coefficient(block, index)));
            }
        }
        bytes
    }

    pub fn open(&self) -> DeEphemeris<Cursor<Vec<u8>>> {
        DeEphemeris::from_reader(Cursor::new(self.build()), LoadOptions::with_constants())
            .expect("synthetic DE file should decode")
    }

    /// Write the file under the system temp directory.
    pub fn write_temp(&self, name: &str) -> Utf8PathBuf {
        let dir = Utf8PathBuf::from_path_buf(std::env::temp_dir()).expect("UTF-8 temp dir");
        let path = dir.join(format!("dephem_{}_{name}", std::process::id()));
        std::fs::write(&path, self.build()).expect("temp file should be writable");
        path
    }
}
