//! I/O: the HTTP seam, console output, the progress ticker, and the
//! verifier/orchestrator that drive requests through the governor.

mod http;
mod monitor;
mod orchestrator;
mod sink;
mod verifier;

pub use http::{LookupClient, LookupResponse};
pub use monitor::{ProgressCounters, ProgressHandle, ProgressMonitor, Sample};
pub use orchestrator::{Orchestrator, RunReport};
pub use sink::{MemorySink, StatusSink, TermSink, Tone};
pub use verifier::BatchVerifier;

#[cfg(feature = "reqwest")]
pub use http::ReqwestClient;
