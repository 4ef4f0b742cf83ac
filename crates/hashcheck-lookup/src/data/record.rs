use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use hashcheck_verify::Digest;

/// A file paired with its digest for the lifetime of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub path:   PathBuf,
    pub digest: Digest,
}

/// Terminal classification of one file.
///
/// Only [`Verdict::Confirmed`] counts as found; every other variant is an
/// unconfirmed file, kept distinct so the operator can see why.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The catalog recognises the digest.
    Confirmed,
    /// The catalog answered and does not know the digest.
    NotFound,
    /// The service refused the batch with a non-throttling status.
    Rejected { status: u16 },
    /// The local file could not be read, so no digest was sent.
    Unreadable,
    /// The service answered 200 with a body that was not a digest map.
    Malformed,
}

impl Verdict {
    pub fn is_found(&self) -> bool { matches!(self, Verdict::Confirmed) }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Confirmed => write!(f, "OK"),
            Verdict::NotFound => write!(f, "NOT FOUND"),
            Verdict::Rejected { status } => write!(f, "HTTP {status}"),
            Verdict::Unreadable => write!(f, "UNREADABLE"),
            Verdict::Malformed => write!(f, "BAD RESPONSE"),
        }
    }
}

/// Per-batch outcome: one verdict per input path, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupResult {
    entries: Vec<(PathBuf, Verdict)>,
    retries: u32,
}

impl LookupResult {
    pub fn new() -> Self { Self::default() }

    pub(crate) fn with_retries(entries: Vec<(PathBuf, Verdict)>, retries: u32) -> Self {
        Self { entries, retries }
    }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Throttling retries the batch needed before it resolved.
    pub fn retries(&self) -> u32 { self.retries }

    /// `Some(found)` for a path that was part of the batch.
    pub fn get(&self, path: impl AsRef<Path>) -> Option<bool> { self.verdict(path).map(|v| v.is_found()) }

    pub fn verdict(&self, path: impl AsRef<Path>) -> Option<&Verdict> {
        let path = path.as_ref();
        self.entries.iter().find(|(p, _)| p == path).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Path, &Verdict)> {
        self.entries.iter().map(|(p, v)| (p.as_path(), v))
    }

    pub fn confirmed(&self) -> usize { self.entries.iter().filter(|(_, v)| v.is_found()).count() }

    pub fn unconfirmed(&self) -> usize { self.len() - self.confirmed() }

    /// Collapse to the plain `path -> found` mapping.
    pub fn into_found_map(self) -> HashMap<PathBuf, bool> {
        self.entries.into_iter().map(|(p, v)| (p, v.is_found())).collect()
    }
}

/// Running totals for one run; counts only ever grow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub confirmed:   u64,
    pub unconfirmed: u64,
    pub batches:     u64,
    pub retries:     u64,
}

impl Stats {
    pub fn merge(&mut self, result: &LookupResult) {
        self.confirmed += result.confirmed() as u64;
        self.unconfirmed += result.unconfirmed() as u64;
        self.retries += u64::from(result.retries());
        self.batches += 1;
    }

    pub fn classified(&self) -> u64 { self.confirmed + self.unconfirmed }
}
