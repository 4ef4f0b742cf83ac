use std::time::Duration;

use hashcheck_verify::DigestAlgorithm;

/// Hard upper bound on files per lookup request.
pub const MAX_BATCH_SIZE: usize = 100;

/// Upper bound on retries after throttling for one batch.
pub const MAX_RETRIES: u32 = 100;

/// Configuration for batch verification.
///
/// # Examples
///
/// ```
/// use hashcheck_lookup::VerifyOptions;
/// use std::time::Duration;
///
/// let options = VerifyOptions::default()
///     .batch_size(1)
///     .max_retries(3)
///     .throttle_cooldown(Duration::from_millis(500));
/// assert_eq!(options.batch_size, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyOptions {
    /// Files per request, at most [`MAX_BATCH_SIZE`]. A size of 1 gives the
    /// one-file-at-a-time behaviour.
    ///
    /// Default: 100
    pub batch_size: usize,

    /// Retries after a throttling response before the batch fails.
    ///
    /// - Only HTTP 429 is retried
    /// - Total attempts = 1 (initial) + max_retries
    ///
    /// Default: 5
    pub max_retries: u32,

    /// Fixed wait after a throttling response, on top of the governor penalty.
    ///
    /// Default: 2s
    pub throttle_cooldown: Duration,

    /// Hash function used for every digest in a run.
    ///
    /// Default: sha1
    pub algorithm: DigestAlgorithm,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self {
            batch_size:        MAX_BATCH_SIZE,
            max_retries:       5,
            throttle_cooldown: Duration::from_secs(2),
            algorithm:         DigestAlgorithm::Sha1,
        }
    }
}

impl VerifyOptions {
    /// Set the batch size, clamped to `1..=MAX_BATCH_SIZE`.
    pub fn batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.clamp(1, MAX_BATCH_SIZE);
        self
    }

    /// Set the retry budget, capped at [`MAX_RETRIES`].
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries.min(MAX_RETRIES);
        self
    }

    pub fn throttle_cooldown(mut self, cooldown: Duration) -> Self {
        self.throttle_cooldown = cooldown;
        self
    }

    pub fn algorithm(mut self, algorithm: DigestAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }
}

/// Transport settings for [`ReqwestClient`](crate::ReqwestClient).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    /// Bulk lookup endpoint (`POST`).
    pub endpoint:        String,
    /// Any cheap `GET` that carries rate-limit headers.
    pub probe_url:       String,
    pub user_agent:      String,
    pub connect_timeout: Duration,
    /// Whole-request timeout so a hung connection cannot stall a run.
    pub request_timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            endpoint:        "https://api.modrinth.com/v2/version_files".to_string(),
            probe_url:       "https://api.modrinth.com/v2/project/sodium".to_string(),
            user_agent:      concat!("hashcheck/", env!("CARGO_PKG_VERSION")).to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}
