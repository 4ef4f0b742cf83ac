#![allow(dead_code)]

use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use hashcheck_lookup::{
    BatchVerifier, BudgetGovernor, LookupClient, LookupRequest, LookupResponse, MemorySink, ProgressMonitor,
    RateHeaders, VerifyOptions,
};
use hashcheck_verify::{DigestAlgorithm, digest_file};

#[derive(Debug)]
pub struct ScriptError(pub String);

impl std::fmt::Display for ScriptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.0) }
}

impl std::error::Error for ScriptError {}

/// Replays queued responses, then repeats `fallback` (or fails) once empty.
#[derive(Default)]
pub struct ScriptedClient {
    queue:    Mutex<VecDeque<LookupResponse>>,
    fallback: Option<LookupResponse>,
    requests: Mutex<Vec<LookupRequest>>,
}

impl ScriptedClient {
    pub fn new(responses: impl IntoIterator<Item = LookupResponse>) -> Self {
        Self {
            queue: Mutex::new(responses.into_iter().collect()),
            ..Self::default()
        }
    }

    pub fn repeating(response: LookupResponse) -> Self {
        Self {
            fallback: Some(response),
            ..Self::default()
        }
    }

    pub fn then_repeat(mut self, response: LookupResponse) -> Self {
        self.fallback = Some(response);
        self
    }

    pub fn requests(&self) -> Vec<LookupRequest> { self.requests.lock().unwrap().clone() }

    fn next(&self) -> Result<LookupResponse, ScriptError> {
        let queued = self.queue.lock().unwrap().pop_front();
        queued
            .or_else(|| self.fallback.clone())
            .ok_or_else(|| ScriptError("script exhausted".to_string()))
    }
}

impl LookupClient for ScriptedClient {
    type Error = ScriptError;

    async fn lookup(&self, request: &LookupRequest) -> Result<LookupResponse, Self::Error> {
        self.requests.lock().unwrap().push(request.clone());
        self.next()
    }

    async fn probe(&self) -> Result<LookupResponse, Self::Error> { self.next() }
}

/// Answers from a fixed set of known digests, like the real catalog.
#[derive(Default)]
pub struct CatalogClient {
    known:    HashSet<String>,
    requests: Mutex<Vec<LookupRequest>>,
}

impl CatalogClient {
    pub fn new(known: impl IntoIterator<Item = String>) -> Self {
        Self {
            known:    known.into_iter().collect(),
            requests: Mutex::default(),
        }
    }

    pub fn requests(&self) -> Vec<LookupRequest> { self.requests.lock().unwrap().clone() }
}

impl LookupClient for CatalogClient {
    type Error = ScriptError;

    async fn lookup(&self, request: &LookupRequest) -> Result<LookupResponse, Self::Error> {
        self.requests.lock().unwrap().push(request.clone());
        let hits: Vec<&String> = request.hashes.iter().filter(|h| self.known.contains(*h)).collect();
        Ok(LookupResponse::new(200, found_body(hits)).with_rate(rate(300, 299, 60)))
    }

    async fn probe(&self) -> Result<LookupResponse, Self::Error> {
        Ok(LookupResponse::new(200, "{}").with_rate(rate(300, 299, 60)))
    }
}

pub fn rate(limit: u32, remaining: u32, reset: u64) -> RateHeaders {
    RateHeaders {
        limit:     Some(limit),
        remaining: Some(remaining),
        reset:     Some(reset),
    }
}

/// A 200 body listing `digests` as recognised.
pub fn found_body<S: AsRef<str>>(digests: impl IntoIterator<Item = S>) -> String {
    let map: serde_json::Map<String, serde_json::Value> = digests
        .into_iter()
        .map(|d| (d.as_ref().to_string(), serde_json::json!({ "project_id": "abc" })))
        .collect();
    serde_json::Value::Object(map).to_string()
}

pub fn throttled() -> LookupResponse { LookupResponse::new(429, "") }

/// Write `n` files with distinct contents, named `mod-000.jar`, ...
pub fn write_files(dir: &Path, n: usize) -> Vec<PathBuf> {
    (0..n)
        .map(|i| {
            let path = dir.join(format!("mod-{i:03}.jar"));
            std::fs::write(&path, format!("contents of mod {i}")).unwrap();
            path
        })
        .collect()
}

pub fn sha1(path: &Path) -> String { digest_file(path, DigestAlgorithm::Sha1).unwrap().into_string() }

pub fn fast_options() -> VerifyOptions { VerifyOptions::default().max_retries(5) }

pub fn verifier<C: LookupClient>(client: C, options: VerifyOptions) -> (BatchVerifier<C>, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    let monitor = ProgressMonitor::new(sink.clone());
    let verifier = BatchVerifier::new(client, Arc::new(BudgetGovernor::default()), monitor.handle(), options);
    (verifier, sink)
}
