//! Content digests for content-addressed lookups.
//!
//! Computes fixed-length hex digests of local files without enforcing any
//! particular hash function. The algorithm is a runtime value
//! ([`DigestAlgorithm`]) so callers can switch between SHA-1 and SHA-512
//! without changing the shape of the request they build from the result.
//!
//! # Key Features
//!
//! - **Streaming**: files are hashed through a fixed buffer, never loaded whole
//! - **Pluggable**: the minimal [`Hasher`] trait wraps any RustCrypto digest
//! - **Typed digests**: [`Digest`] carries its algorithm alongside the hex text
//!
//! # Example
//!
//! ```
//! use hashcheck_verify::{DigestAlgorithm, digest_reader};
//!
//! let digest = digest_reader(&b"hello world"[..], DigestAlgorithm::Sha1).unwrap();
//! assert_eq!(digest.as_str(), "2aae6c35c94fcfb415dbe95f408b9ce91ee846ed");
//! ```

pub use self::algorithm::DigestAlgorithm;
pub use self::content::{Digest, digest_file, digest_reader};
pub use self::error::{Result, VerificationError};
pub use self::hasher::{DigestHasher, Hasher};
pub use self::reader::HashingReader;

#[cfg(feature = "sha1")]
pub use self::hasher::Sha1Hasher;

#[cfg(feature = "sha2")]
pub use self::hasher::{Sha256Hasher, Sha512Hasher};

mod algorithm;
mod content;
mod error;
mod hasher;
mod reader;
