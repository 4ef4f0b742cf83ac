use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::{Result, VerificationError};
use crate::{DigestAlgorithm, Hasher, HashingReader};

const READ_BUFFER: usize = 8 * 1024;

/// Lowercase hex digest of some content under a known algorithm.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Digest {
    algorithm: DigestAlgorithm,
    hex:       String,
}

impl Digest {
    pub fn from_bytes(algorithm: DigestAlgorithm, bytes: &[u8]) -> Self {
        Self {
            algorithm,
            hex: hex::encode(bytes),
        }
    }

    /// Parse a hex digest, checking length and alphabet for `algorithm`.
    pub fn from_hex(algorithm: DigestAlgorithm, s: &str) -> Result<Self> {
        let s = s.trim();
        let valid = s.len() == algorithm.digest_length() * 2 && s.chars().all(|c| c.is_ascii_hexdigit());
        if !valid {
            return Err(VerificationError::InvalidDigest {
                algorithm: algorithm.as_str(),
                value:     s.to_string(),
            });
        }
        Ok(Self {
            algorithm,
            hex: s.to_ascii_lowercase(),
        })
    }

    pub fn algorithm(&self) -> DigestAlgorithm { self.algorithm }

    pub fn as_str(&self) -> &str { &self.hex }

    pub fn into_string(self) -> String { self.hex }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.hex) }
}

/// Hash everything `reader` yields under `algorithm`.
pub fn digest_reader<R: Read>(reader: R, algorithm: DigestAlgorithm) -> Result<Digest> {
    let bytes = match algorithm {
        #[cfg(feature = "sha1")]
        DigestAlgorithm::Sha1 => drain(reader, crate::Sha1Hasher::new())?,
        #[cfg(feature = "sha2")]
        DigestAlgorithm::Sha256 => drain(reader, crate::Sha256Hasher::new())?,
        #[cfg(feature = "sha2")]
        DigestAlgorithm::Sha512 => drain(reader, crate::Sha512Hasher::new())?,
        #[allow(unreachable_patterns)]
        other => return Err(VerificationError::AlgorithmDisabled(other.as_str())),
    };
    Ok(Digest::from_bytes(algorithm, &bytes))
}

/// Hash the file at `path`, streaming it through a fixed-size buffer.
pub fn digest_file(path: impl AsRef<Path>, algorithm: DigestAlgorithm) -> Result<Digest> {
    let path = path.as_ref();
    let read_err = |source| VerificationError::Read {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(read_err)?;
    let reader = BufReader::with_capacity(READ_BUFFER, file);
    match digest_reader(reader, algorithm) {
        Err(VerificationError::Io(source)) => Err(read_err(source)),
        other => other,
    }
}

fn drain<R: Read, H: Hasher>(reader: R, hasher: H) -> Result<Vec<u8>> {
    Ok(HashingReader::new(reader, hasher).finish()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_hex_validates_length() {
        let ok = Digest::from_hex(DigestAlgorithm::Sha1, "2AAE6C35C94FCFB415DBE95F408B9CE91EE846ED").unwrap();
        assert_eq!(ok.as_str(), "2aae6c35c94fcfb415dbe95f408b9ce91ee846ed");

        assert!(Digest::from_hex(DigestAlgorithm::Sha512, "2aae6c35").is_err());
        assert!(Digest::from_hex(DigestAlgorithm::Sha1, &"z".repeat(40)).is_err());
    }

    #[cfg(feature = "sha1")]
    #[test]
    fn test_digest_file_matches_in_memory_digest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mod.jar");
        let mut file = File::create(&path).unwrap();
        file.write_all(b"hello world").unwrap();
        drop(file);

        let digest = digest_file(&path, DigestAlgorithm::Sha1).unwrap();
        assert_eq!(digest.algorithm(), DigestAlgorithm::Sha1);
        assert_eq!(digest.to_string(), "2aae6c35c94fcfb415dbe95f408b9ce91ee846ed");
    }

    #[cfg(feature = "sha2")]
    #[test]
    fn test_sha512_hex_length() {
        let digest = digest_reader(&b"abc"[..], DigestAlgorithm::Sha512).unwrap();
        assert_eq!(digest.as_str().len(), 128);
    }

    #[test]
    fn test_missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.jar");

        let err = digest_file(&path, DigestAlgorithm::Sha1).unwrap_err();
        assert!(matches!(err, VerificationError::Read { path: p, .. } if p == path));
    }
}
