//! Reader for the binary JPL DE files (`lnxp1600p2200.405` and alike).
//!
//! The files are distributed by JPL under `.../eph/planets/Linux/`. Each one is
//! a sequence of fixed-size records of `f64`:
//!
//! ```text
//! +--------------------------------------------------------------+
//! | record 0  header: titles, constant names, dates, AU, EMRAT,  |
//! |           layout table (offset, coefficients, sub-intervals) |
//! +--------------------------------------------------------------+
//! | record 1  constant values                                    |
//! +--------------------------------------------------------------+
//! | record 2  block 0: [jd_start, jd_end, coefficients ...]      |
//! | record 3  block 1                                            |
//! |   ...     one block per `block_interval` days                |
//! +--------------------------------------------------------------+
//! ```
//!
//! Inside a block, every target owns `sub_interval_count` consecutive
//! sub-intervals, each holding its components one after the other, each
//! component a Chebyshev series of `coefficients_per_component` terms.
//!
//! Modules, leaf first:
//!
//! - [`horizon_header`] — header decoding and byte-order detection.
//! - [`block_cache`] — two-slot cache of coefficient blocks.
//! - [`chebyshev`] — series and derivative evaluation.
//! - [`horizon_records`] — one target's sub-interval inside a block.
//! - [`target_resolver`] — public bodies as combinations of stored targets.
//! - [`horizon_data`] — [`DeEphemeris`](horizon_data::DeEphemeris), the query
//!   surface of one file.
//! - [`horizon_ids`], [`horizon_version`], [`interpolation_result`] — identifiers,
//!   published solutions and result types.
//! - [`test_points`] — JPL's `testpo` validation files.
pub mod block_cache;
pub mod chebyshev;
pub mod horizon_data;
pub mod horizon_header;
pub mod horizon_ids;
pub mod horizon_records;
pub mod horizon_version;
pub mod interpolation_result;
pub mod target_resolver;
pub mod test_points;
