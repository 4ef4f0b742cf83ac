//! Rate-limited batch lookups of file digests against a remote catalog.
//!
//! # Architecture
//!
//! This crate follows the three-layer pattern:
//! - [`data`] - Immutable configuration and result types
//! - [`core`] - Pure transformations and the adaptive budget governor
//! - [`effects`] - Network, console, and background-task I/O
//!
//! # Key Features
//!
//! - **Adaptive budget**: a token bucket retuned from `x-ratelimit-*` headers
//!   and penalised on HTTP 429
//! - **Bounded retries**: throttled batches are retried with the same digests
//!   a fixed number of times, then fail
//! - **Lock-free progress**: the throughput ticker shares only atomics with
//!   the dispatch path

pub mod core;
pub mod data;
pub mod effects;
mod error;

pub use self::core::{BudgetGovernor, GovernorPolicy, LookupRequest, partition};
pub use self::data::{
    ClientOptions, FileRecord, LookupResult, MAX_BATCH_SIZE, MAX_RETRIES, RateHeaders, RateSnapshot, Stats, Verdict, VerifyOptions,
};
pub use self::effects::{
    BatchVerifier, LookupClient, LookupResponse, MemorySink, Orchestrator, ProgressHandle, ProgressMonitor, RunReport,
    StatusSink, TermSink, Tone,
};

#[cfg(feature = "reqwest")]
pub use self::effects::ReqwestClient;

pub use self::error::{LookupError, Result};
