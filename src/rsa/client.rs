use num_bigint::BigUint;
use crate::rsa::config::is_silent;
use crate::rsa::error::Result;
use crate::rsa::keys::PublicKey;
use crate::rsa::parallel::ParallelExponentiator;
use crate::rsa::{bytes_to_elements, hash};

/// Holder of the public key: encrypts and verifies signatures
#[derive(Debug, Clone)]
pub struct Client {
    public: PublicKey,
    exponentiator: ParallelExponentiator,
}

impl Client {
    pub fn new(public: PublicKey) -> Self {
        Self { public, exponentiator: ParallelExponentiator::default() }
    }

    pub fn with_exponentiator(mut self, exponentiator: ParallelExponentiator) -> Self {
        self.exponentiator = exponentiator;
        self
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }

    /// One ciphertext element per input byte
    pub fn encrypt(&self, data: &[u8]) -> Result<Vec<BigUint>> {
        if !is_silent() { println!("Encrypting..."); }
        let values = bytes_to_elements(data, &self.public.n)?;
        let res = self.exponentiator.transform(&values, &self.public.e, &self.public.n)?;
        if !is_silent() { println!("Encrypted."); }
        Ok(res)
    }

    /// Raises every signature element to `e` and compares the result with the
    /// digest of `data`. A mismatch is `Ok(false)`, never an error.
    pub fn verify(&self, data: &[u8], signature: &[BigUint]) -> Result<bool> {
        if !is_silent() { println!("Verifying..."); }
        let n = &self.public.n;
        let verified = if signature.iter().any(|s| s >= n) {
            false
        } else {
            let recovered = self.exponentiator.transform(signature, &self.public.e, n)?;
            let digest = hash(data);
            recovered.len() == digest.len() && recovered.iter().zip(digest.iter()).all(|(r, b)| *r == BigUint::from(*b))
        };
        if !is_silent() {
            println!("{}", if verified { "Verified." } else { "Not verified." });
        }
        Ok(verified)
    }
}
