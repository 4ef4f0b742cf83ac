//! Pure transformations and admission control.
//!
//! Nothing here performs network or file I/O. The governor only reads the
//! clock and sleeps.

mod governor;
mod partition;
mod response;

pub use governor::{BudgetGovernor, GovernorPolicy};
pub use partition::partition;
pub use response::{LookupRequest, StatusClass, classify_status, known_digests};
