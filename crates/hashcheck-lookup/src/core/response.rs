use std::collections::HashSet;

use serde::Serialize;

use hashcheck_verify::DigestAlgorithm;

use crate::data::FileRecord;

/// Body of a bulk lookup: `{ "hashes": [...], "algorithm": "sha1" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupRequest {
    pub hashes:    Vec<String>,
    pub algorithm: DigestAlgorithm,
}

impl LookupRequest {
    /// Build a request for `records`, sending each distinct digest once.
    pub fn for_records(records: &[FileRecord], algorithm: DigestAlgorithm) -> Self {
        let mut seen = HashSet::with_capacity(records.len());
        let hashes = records
            .iter()
            .map(|r| r.digest.as_str())
            .filter(|h| seen.insert(*h))
            .map(str::to_string)
            .collect();
        Self { hashes, algorithm }
    }
}

/// How the verifier should treat a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Success,
    Throttled,
    Refused,
}

pub fn classify_status(status: u16) -> StatusClass {
    match status {
        200 => StatusClass::Success,
        429 => StatusClass::Throttled,
        _ => StatusClass::Refused,
    }
}

/// Digests the service recognised: the key set of the response object.
///
/// Values are ignored. Returns `None` when the body is not a JSON object.
pub fn known_digests(body: &str) -> Option<HashSet<String>> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let object = value.as_object()?;
    Some(object.keys().map(|k| k.to_ascii_lowercase()).collect())
}
