use std::path::{Path, PathBuf};
use std::sync::Arc;

use hashcheck_verify::{Digest, digest_file};
use tokio::time::Instant;

use crate::core::{BudgetGovernor, LookupRequest, StatusClass, classify_status, known_digests};
use crate::data::{FileRecord, LookupResult, RateHeaders, RateSnapshot, Verdict, VerifyOptions};
use crate::effects::http::{LookupClient, LookupResponse};
use crate::effects::monitor::ProgressHandle;
use crate::effects::sink::Tone;
use crate::error::{LookupError, Result};

/// Checks groups of files against the remote catalog, one request per group.
///
/// Every request passes through the shared [`BudgetGovernor`]. Throttling
/// responses penalise the governor and retry the same digests after a fixed
/// cooldown, at most `max_retries` times.
pub struct BatchVerifier<C: LookupClient> {
    client:   C,
    governor: Arc<BudgetGovernor>,
    progress: ProgressHandle,
    options:  VerifyOptions,
    snapshot: RateSnapshot,
}

impl<C: LookupClient> BatchVerifier<C> {
    pub fn new(client: C, governor: Arc<BudgetGovernor>, progress: ProgressHandle, options: VerifyOptions) -> Self {
        Self {
            client,
            governor,
            progress,
            options,
            snapshot: RateSnapshot::default(),
        }
    }

    pub fn options(&self) -> &VerifyOptions { &self.options }

    pub fn client(&self) -> &C { &self.client }

    pub fn governor(&self) -> &Arc<BudgetGovernor> { &self.governor }

    pub fn progress(&self) -> &ProgressHandle { &self.progress }

    /// Last rate-limit figures seen on any response.
    pub fn rate_snapshot(&self) -> RateSnapshot { self.snapshot }

    /// Classify every file in `files` with a single lookup request.
    ///
    /// Returns one entry per input path, in input order. Unreadable files are
    /// classified [`Verdict::Unreadable`] without affecting the rest of the
    /// batch; a non-throttling error status classifies the whole batch as
    /// [`Verdict::Rejected`].
    ///
    /// # Errors
    ///
    /// - [`LookupError::RetriesExhausted`] when the service is still throttling
    ///   after `max_retries` retries
    /// - [`LookupError::Transport`] when a request cannot be completed
    /// - [`LookupError::BatchTooLarge`] when `files` exceeds the batch size
    pub async fn check_batch(&mut self, files: &[PathBuf]) -> Result<LookupResult> {
        if files.is_empty() {
            return Ok(LookupResult::new());
        }
        if files.len() > self.options.batch_size {
            return Err(LookupError::BatchTooLarge {
                len: files.len(),
                max: self.options.batch_size,
            });
        }

        let started = Instant::now();
        let digests = self.digest_all(files).await?;
        let records: Vec<FileRecord> = digests
            .iter()
            .filter_map(|(path, digest)| {
                digest.as_ref().map(|digest| FileRecord {
                    path:   path.clone(),
                    digest: digest.clone(),
                })
            })
            .collect();

        if records.is_empty() {
            return Ok(self.resolve(digests, 0, |_| Verdict::Unreadable));
        }

        let request = LookupRequest::for_records(&records, self.options.algorithm);
        let max_retries = self.options.max_retries;
        let attempts = max_retries.saturating_add(1);

        for attempt in 0..=max_retries {
            let made = attempt.saturating_add(1);
            self.governor.acquire().await;
            tracing::debug!(
                files = files.len(),
                hashes = request.hashes.len(),
                attempt,
                rate = self.governor.refill_rate(),
                "sending lookup"
            );

            let response = self
                .client
                .lookup(&request)
                .await
                .map_err(|e| LookupError::Transport(e.to_string()))?;
            self.observe(&response.rate);

            match classify_status(response.status) {
                StatusClass::Success => {
                    let result = self.resolve_success(digests, &response, attempt);
                    tracing::debug!(
                        files = result.len(),
                        confirmed = result.confirmed(),
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "batch resolved"
                    );
                    return Ok(result);
                }
                StatusClass::Throttled => {
                    self.governor.penalty();
                    if attempt == max_retries {
                        tracing::warn!(attempts = made, "throttled; retry budget exhausted");
                        break;
                    }
                    tracing::warn!(
                        attempt = made,
                        max_retries,
                        cooldown_ms = self.options.throttle_cooldown.as_millis() as u64,
                        "throttled; backing off"
                    );
                    self.progress.println(
                        Tone::Error,
                        &format!("[429 RATE LIMIT] Retrying ({made}/{max_retries})..."),
                    );
                    tokio::time::sleep(self.options.throttle_cooldown).await;
                }
                StatusClass::Refused => {
                    let status = response.status;
                    tracing::warn!(status, files = files.len(), "lookup refused; batch unconfirmed");
                    self.progress.println(Tone::Error, &format!("[HTTP {status}]"));
                    return Ok(self.resolve(digests, attempt, |_| Verdict::Rejected { status }));
                }
            }
        }

        Err(LookupError::RetriesExhausted { attempts })
    }

    /// Probe the service once and fold its rate headers into the snapshot.
    pub async fn refresh_rate_snapshot(&mut self) -> Result<RateSnapshot> {
        self.governor.acquire().await;
        let response = self
            .client
            .probe()
            .await
            .map_err(|e| LookupError::Transport(e.to_string()))?;
        tracing::debug!(status = response.status, "probe answered");
        self.observe(&response.rate);
        Ok(self.snapshot)
    }

    fn observe(&mut self, rate: &RateHeaders) {
        self.snapshot.observe(rate);
        if let (Some(limit), Some(remaining)) = (self.snapshot.limit, rate.remaining) {
            self.governor.update_from_remaining(limit, remaining);
        }
    }

    async fn digest_all(&self, files: &[PathBuf]) -> Result<Vec<(PathBuf, Option<Digest>)>> {
        let algorithm = self.options.algorithm;
        let paths = files.to_vec();
        let digests = tokio::task::spawn_blocking(move || {
            paths
                .into_iter()
                .map(|path| {
                    let digest = match digest_file(&path, algorithm) {
                        Ok(digest) => Some(digest),
                        Err(e) => {
                            tracing::warn!(path = %path.display(), error = %e, "cannot digest file");
                            None
                        }
                    };
                    (path, digest)
                })
                .collect::<Vec<_>>()
        })
        .await?;
        Ok(digests)
    }

    fn resolve_success(
        &self,
        digests: Vec<(PathBuf, Option<Digest>)>,
        response: &LookupResponse,
        retries: u32,
    ) -> LookupResult {
        match known_digests(&response.body) {
            Some(known) => self.resolve(digests, retries, |digest| {
                if known.contains(digest.as_str()) {
                    Verdict::Confirmed
                } else {
                    Verdict::NotFound
                }
            }),
            None => {
                tracing::warn!(bytes = response.body.len(), "lookup answered with a non-object body");
                self.resolve(digests, retries, |_| Verdict::Malformed)
            }
        }
    }

    /// Turn digests into verdicts, printing and counting each file once.
    fn resolve(
        &self,
        digests: Vec<(PathBuf, Option<Digest>)>,
        retries: u32,
        verdict_for: impl Fn(&Digest) -> Verdict,
    ) -> LookupResult {
        let entries = digests
            .into_iter()
            .map(|(path, digest)| {
                let verdict = digest.as_ref().map_or(Verdict::Unreadable, &verdict_for);
                self.progress
                    .println(tone(&verdict), &format!("[{verdict}] {}", display_name(&path)));
                self.progress.increment_completed();
                (path, verdict)
            })
            .collect();
        LookupResult::with_retries(entries, retries)
    }
}

fn tone(verdict: &Verdict) -> Tone {
    match verdict {
        Verdict::Confirmed => Tone::Ok,
        Verdict::NotFound => Tone::Warn,
        _ => Tone::Error,
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
