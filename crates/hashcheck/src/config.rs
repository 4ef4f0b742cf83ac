use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail, ensure};
use hashcheck_lookup::{ClientOptions, MAX_BATCH_SIZE, MAX_RETRIES, VerifyOptions};
use hashcheck_verify::DigestAlgorithm;
use serde::Deserialize;

use crate::cli::CheckArgs;

/// Settings for a run, read from an optional TOML file.
///
/// Every field has a default, so an empty file is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub endpoint:             String,
    pub probe_url:            String,
    pub user_agent:           String,
    pub algorithm:            DigestAlgorithm,
    pub batch_size:           usize,
    pub max_retries:          u32,
    pub throttle_cooldown_ms: u64,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    /// Extensions to check, without the dot. Empty means every file.
    pub extensions:           Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        let client = ClientOptions::default();
        let verify = VerifyOptions::default();
        Self {
            endpoint:             client.endpoint,
            probe_url:            client.probe_url,
            user_agent:           concat!("hashcheck/", env!("CARGO_PKG_VERSION")).to_string(),
            algorithm:            verify.algorithm,
            batch_size:           verify.batch_size,
            max_retries:          verify.max_retries,
            throttle_cooldown_ms: verify.throttle_cooldown.as_millis() as u64,
            request_timeout_secs: client.request_timeout.as_secs(),
            connect_timeout_secs: client.connect_timeout.as_secs(),
            extensions:           Vec::new(),
        }
    }
}

impl Config {
    /// Read `path` if given, otherwise fall back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text =
            std::fs::read_to_string(path).with_context(|| format!("failed to read config {}", path.display()))?;
        let config = Self::from_toml(&text).with_context(|| format!("invalid config {}", path.display()))?;
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 || self.batch_size > MAX_BATCH_SIZE {
            bail!("batch_size must be between 1 and {MAX_BATCH_SIZE}, got {}", self.batch_size);
        }
        ensure!(
            self.max_retries <= MAX_RETRIES,
            "max_retries must be at most {MAX_RETRIES}, got {}",
            self.max_retries
        );
        ensure!(self.request_timeout_secs > 0, "request_timeout_secs must be positive");
        ensure!(self.connect_timeout_secs > 0, "connect_timeout_secs must be positive");
        ensure!(!self.endpoint.is_empty(), "endpoint must not be empty");
        Ok(())
    }

    /// Fold `check` flags over the file values; flags win.
    pub fn apply_check_args(&mut self, args: &CheckArgs) -> Result<()> {
        if let Some(size) = args.batch_size {
            self.batch_size = size;
        }
        if args.legacy {
            self.batch_size = 1;
        }
        if let Some(algorithm) = args.algorithm {
            self.algorithm = algorithm;
        }
        if let Some(retries) = args.max_retries {
            self.max_retries = retries;
        }
        if !args.ext.is_empty() {
            self.extensions = args.ext.clone();
        }
        self.validate()
    }

    pub fn verify_options(&self) -> VerifyOptions {
        VerifyOptions::default()
            .batch_size(self.batch_size)
            .max_retries(self.max_retries)
            .throttle_cooldown(Duration::from_millis(self.throttle_cooldown_ms))
            .algorithm(self.algorithm)
    }

    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            endpoint:        self.endpoint.clone(),
            probe_url:       self.probe_url.clone(),
            user_agent:      self.user_agent.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }
}
