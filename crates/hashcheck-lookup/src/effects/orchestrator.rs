use std::path::PathBuf;
use std::time::Duration;

use tokio::time::Instant;

use crate::core::partition;
use crate::data::{RateSnapshot, Stats};
use crate::effects::http::LookupClient;
use crate::effects::verifier::BatchVerifier;
use crate::error::{LookupError, Result};

/// Outcome of a whole run, produced even when a batch failed fatally.
#[derive(Debug)]
pub struct RunReport {
    pub stats:   Stats,
    /// Files handed to the run.
    pub total:   usize,
    pub elapsed: Duration,
    /// Last-known rate budget, possibly stale or entirely unknown.
    pub rate:    RateSnapshot,
    /// The error that stopped the run early, if any.
    pub error:   Option<LookupError>,
}

impl RunReport {
    /// Files classified per second over the whole run.
    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 { self.stats.classified() as f64 / secs } else { 0.0 }
    }

    pub fn is_complete(&self) -> bool { self.error.is_none() && self.stats.classified() == self.total as u64 }

    pub fn into_result(self) -> Result<Stats> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.stats),
        }
    }
}

/// Sequential driver: partitions the input and feeds one batch at a time
/// through the [`BatchVerifier`].
pub struct Orchestrator<C: LookupClient> {
    verifier: BatchVerifier<C>,
}

impl<C: LookupClient> Orchestrator<C> {
    pub fn new(verifier: BatchVerifier<C>) -> Self { Self { verifier } }

    pub fn verifier(&self) -> &BatchVerifier<C> { &self.verifier }

    /// Verify `files` in input order, stopping at the first fatal batch error.
    ///
    /// Statistics gathered before the failure are kept in the report.
    pub async fn run(&mut self, files: &[PathBuf]) -> RunReport {
        let started = Instant::now();
        let total = files.len();
        let progress = self.verifier.progress().clone();
        let mut stats = Stats::default();
        let mut error = None;

        progress.set_pending(total as u64);
        let batches = partition(files, self.verifier.options().batch_size);
        tracing::debug!(files = total, batches = batches.len(), "starting run");

        for (index, batch) in batches.into_iter().enumerate() {
            match self.verifier.check_batch(batch).await {
                Ok(result) => stats.merge(&result),
                Err(e) => {
                    tracing::error!(batch = index, files = batch.len(), error = %e, "batch failed; stopping run");
                    error = Some(e);
                    break;
                }
            }
            progress.set_pending((total as u64).saturating_sub(stats.classified()));
        }

        RunReport {
            stats,
            total,
            elapsed: started.elapsed(),
            rate: self.verifier.rate_snapshot(),
            error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throughput_handles_zero_elapsed() {
        let report = RunReport {
            stats:   Stats {
                confirmed: 3,
                ..Stats::default()
            },
            total:   3,
            elapsed: Duration::ZERO,
            rate:    RateSnapshot::default(),
            error:   None,
        };
        assert_eq!(report.throughput(), 0.0);
        assert!(report.is_complete());
    }

    #[test]
    fn test_into_result_surfaces_error() {
        let report = RunReport {
            stats:   Stats::default(),
            total:   10,
            elapsed: Duration::from_secs(4),
            rate:    RateSnapshot::default(),
            error:   Some(LookupError::RetriesExhausted { attempts: 3 }),
        };
        assert!(!report.is_complete());
        assert!(matches!(report.into_result(), Err(LookupError::RetriesExhausted { attempts: 3 })));
    }
}
