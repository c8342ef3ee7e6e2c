use num_bigint::BigUint;
use crate::rsa::client::Client;
use crate::rsa::config::{is_silent, Config};
use crate::rsa::error::{Result, RsaError};
use crate::rsa::keys::{KeyGenerator, KeyPair, PrivateKey, PublicKey};
use crate::rsa::parallel::ParallelExponentiator;
use crate::rsa::{bytes_to_elements, elements_to_bytes, hash};

/// Holder of both keys: decrypts and signs
#[derive(Debug, Clone)]
pub struct Owner {
    keys: KeyPair,
    exponentiator: ParallelExponentiator,
}

impl Owner {
    /// Loads the pair behind `generator`, generating and saving it first if needed
    pub fn new(generator: &mut KeyGenerator) -> Result<Self> {
        let keys = generator.generate()?.clone();
        Ok(Self::from_key_pair(keys))
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let mut generator = KeyGenerator::from_config(config)?;
        let exponentiator = ParallelExponentiator::new(config.threads).with_progress(!is_silent());
        Ok(Self::new(&mut generator)?.with_exponentiator(exponentiator))
    }

    pub fn from_key_pair(keys: KeyPair) -> Self {
        Self { keys, exponentiator: ParallelExponentiator::default() }
    }

    pub fn with_exponentiator(mut self, exponentiator: ParallelExponentiator) -> Self {
        self.exponentiator = exponentiator;
        self
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.keys.public
    }

    pub fn private_key(&self) -> &PrivateKey {
        &self.keys.private
    }

    /// Client sharing this owner's public key and worker settings
    pub fn client(&self) -> Client {
        Client::new(self.keys.public.clone()).with_exponentiator(self.exponentiator.clone())
    }

    pub fn decrypt(&self, data: &[BigUint]) -> Result<Vec<BigUint>> {
        if !is_silent() { println!("Decrypting..."); }
        let PrivateKey { n, d } = &self.keys.private;
        if let Some(v) = data.iter().find(|v| *v >= n) {
            return Err(RsaError::ValueOutOfRange { value: v.clone(), modulus: n.clone() });
        }
        let res = self.exponentiator.transform(data, d, n)?;
        if !is_silent() { println!("Decrypted."); }
        Ok(res)
    }

    /// Decrypts and turns each element back into the byte it encrypted
    pub fn decrypt_bytes(&self, data: &[BigUint]) -> Result<Vec<u8>> {
        elements_to_bytes(&self.decrypt(data)?)
    }

    /// Exponentiates each byte of the SHA3-256 digest of `data` with `d`
    pub fn sign(&self, data: &[u8]) -> Result<Vec<BigUint>> {
        if !is_silent() { println!("Signing..."); }
        let PrivateKey { n, d } = &self.keys.private;
        let digest = bytes_to_elements(&hash(data), n)?;
        let res = self.exponentiator.transform(&digest, d, n)?;
        if !is_silent() { println!("Signed."); }
        Ok(res)
    }
}
