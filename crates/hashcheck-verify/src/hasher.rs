use digest::Digest as DigestImpl;

/// Incremental hash state fed by [`HashingReader`](crate::HashingReader).
pub trait Hasher: Send {
    fn update(&mut self, data: &[u8]);
    fn finalize(self) -> Vec<u8>;
}

/// Adapter from any RustCrypto [`digest::Digest`] to [`Hasher`].
pub struct DigestHasher<D: DigestImpl + Send>(D);

impl<D: DigestImpl + Send> DigestHasher<D> {
    pub fn new() -> Self { Self(D::new()) }

    pub fn digest(data: &[u8]) -> Vec<u8> { D::digest(data).to_vec() }
}

impl<D: DigestImpl + Send> Default for DigestHasher<D> {
    fn default() -> Self { Self::new() }
}

impl<D: DigestImpl + Send> Hasher for DigestHasher<D> {
    fn update(&mut self, data: &[u8]) { DigestImpl::update(&mut self.0, data); }
    fn finalize(self) -> Vec<u8> { self.0.finalize().to_vec() }
}

#[cfg(feature = "sha1")]
pub type Sha1Hasher = DigestHasher<sha1::Sha1>;

#[cfg(feature = "sha2")]
pub type Sha256Hasher = DigestHasher<sha2::Sha256>;

#[cfg(feature = "sha2")]
pub type Sha512Hasher = DigestHasher<sha2::Sha512>;
