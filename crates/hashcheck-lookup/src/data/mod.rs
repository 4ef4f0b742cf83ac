//! Immutable data types for batch lookups.
//!
//! Configuration, rate-limit figures, and the per-file/per-run result types
//! passed between the layers of the crate.

pub mod options;
pub mod rate;
pub mod record;

pub use options::{ClientOptions, MAX_BATCH_SIZE, MAX_RETRIES, VerifyOptions};
pub use rate::{RateHeaders, RateSnapshot};
pub use record::{FileRecord, LookupResult, Stats, Verdict};
