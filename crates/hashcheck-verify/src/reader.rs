use std::io::{self, Read};

use crate::Hasher;

/// Streaming reader that hashes data as it passes through.
/// Wraps any `Read` source so content is touched exactly once.
pub struct HashingReader<R, H> {
    reader:     R,
    hasher:     H,
    bytes_read: u64,
}

impl<R, H> HashingReader<R, H> {
    pub fn new(reader: R, hasher: H) -> Self {
        Self {
            reader,
            hasher,
            bytes_read: 0,
        }
    }

    pub fn bytes_read(&self) -> u64 { self.bytes_read }
}

impl<R: Read, H: Hasher> HashingReader<R, H> {
    /// Drain the remaining input and return the finished digest.
    pub fn finish(mut self) -> io::Result<Vec<u8>> {
        io::copy(&mut self, &mut io::sink())?;
        Ok(self.hasher.finalize())
    }
}

impl<R: Read, H: Hasher> Read for HashingReader<R, H> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.reader.read(buf)?;
        if n > 0 {
            self.hasher.update(&buf[..n]);
            self.bytes_read += n as u64;
        }
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[cfg(feature = "sha2")]
    use crate::Sha256Hasher;

    #[cfg(feature = "sha2")]
    #[test]
    fn test_hashing_reader_passes_data_through() {
        let data = b"test data for hashing";
        let mut reader = HashingReader::new(Cursor::new(data), Sha256Hasher::new());

        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();

        assert_eq!(out, data);
        assert_eq!(reader.bytes_read(), data.len() as u64);
        assert_eq!(reader.finish().unwrap(), Sha256Hasher::digest(data));
    }

    #[cfg(feature = "sha2")]
    #[test]
    fn test_finish_drains_unread_input() {
        let data = vec![7u8; 20_000];
        let mut reader = HashingReader::new(Cursor::new(&data), Sha256Hasher::new());

        let mut head = [0u8; 16];
        reader.read_exact(&mut head).unwrap();

        assert_eq!(reader.finish().unwrap(), Sha256Hasher::digest(&data));
    }
}
