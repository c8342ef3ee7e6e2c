use std::path::{Path, PathBuf};
use num_bigint::{BigInt, BigUint};
use num_traits::One;
use crate::rsa::config::{is_silent, sieve_limit, Config};
use crate::rsa::error::{Result, RsaError};
use crate::rsa::keys::{KeyPair, PrivateKey, PublicKey};
use crate::rsa::math::{euler, extended_gcd, mod_inverse};
use crate::rsa::prime_gen::PrimeGenerator;
use crate::rsa::random::{secure, RandomSource};

/// Smallest modulus size accepted: with 8-bit primes every byte value fits below `n`
pub const MIN_KEY_BITS: u64 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Unset,
    Generated,
    Persisted,
    Loaded,
}

/// Produces one key pair per instance, backed by the key files at `path`
/// and `path.pub`.
#[derive(Debug)]
pub struct KeyGenerator {
    path: PathBuf,
    primes: PrimeGenerator,
    max_attempts: Option<u64>,
    state: KeyState,
    pair: Option<KeyPair>,
}

impl KeyGenerator {
    pub fn new<P: AsRef<Path>>(path: P, bits: u64, rounds: u32) -> Result<Self> {
        if bits < MIN_KEY_BITS {
            return Err(RsaError::KeySizeTooSmall { requested: bits, minimum: MIN_KEY_BITS });
        }
        Ok(Self {
            path: path.as_ref().to_path_buf(),
            primes: PrimeGenerator::new(bits / 2, rounds, sieve_limit(bits)),
            max_attempts: None,
            state: KeyState::Unset,
            pair: None,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(KeyGenerator::new(&config.key, config.bits, config.rounds)?.with_max_attempts(config.max_attempts()))
    }

    /// Caps every candidate search (each prime and the public exponent)
    pub fn with_max_attempts(mut self, max_attempts: Option<u64>) -> Self {
        self.max_attempts = max_attempts;
        self.primes = self.primes.with_max_attempts(max_attempts);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn state(&self) -> KeyState {
        self.state
    }

    pub fn key_pair(&self) -> Option<&KeyPair> {
        self.pair.as_ref()
    }

    pub fn generate(&mut self) -> Result<&KeyPair> {
        self.generate_with(&mut secure())
    }

    /// Loads the persisted pair, or generates and persists a fresh one when
    /// none exists. A pair already held by this instance is returned as is.
    pub fn generate_with<R: RandomSource + ?Sized>(&mut self, rng: &mut R) -> Result<&KeyPair> {
        if self.pair.is_none() {
            match KeyPair::load(&self.path) {
                Ok(pair) => {
                    if !is_silent() { println!("Keys loaded from {}", self.path.display()); }
                    self.pair = Some(pair);
                    self.state = KeyState::Loaded;
                }
                Err(e) if e.is_not_found() => {
                    let pair = self.generate_key(rng)?;
                    self.state = KeyState::Generated;
                    if !is_silent() { println!("Saving keys to {}", self.path.display()); }
                    if let Err(e) = pair.save(&self.path) {
                        // a lone key file would block every later load
                        let _ = KeyPair::delete(&self.path);
                        self.state = KeyState::Unset;
                        return Err(e);
                    }
                    self.pair = Some(pair);
                    self.state = KeyState::Persisted;
                }
                Err(e) => return Err(e),
            }
        }
        self.pair.as_ref().ok_or_else(|| RsaError::KeyNotFound(self.path.clone()))
    }

    /// Removes the persisted files so the next `generate` starts over
    pub fn delete(&mut self) -> Result<()> {
        KeyPair::delete(&self.path)?;
        self.pair = None;
        self.state = KeyState::Unset;
        Ok(())
    }

    /// Fresh key pair, nothing is read or written
    pub fn generate_key<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Result<KeyPair> {
        if !is_silent() { println!("Generating p and q..."); }
        let p = self.primes.generate_prime(rng)?;
        let mut q = self.primes.generate_prime(rng)?;
        while q == p {
            q = self.primes.generate_prime(rng)?;
        }
        let n = &p * &q;
        let f = euler(&p, &q);
        if !is_silent() { println!("Generating e"); }
        let e = self.choose_exponent(&f, rng)?;
        if !is_silent() { println!("Generating d"); }
        let d = match mod_inverse(&e, &f) {
            Ok(d) => d,
            Err(err) => unreachable!("public exponent was chosen coprime to phi: {}", err),
        };
        self.check_key_set(&d, &e, &f);
        KeyPair::new(PublicKey::new(n.clone(), e), PrivateKey::new(n, d))
    }

    /// Uniform in `[2, f-1]` and coprime to `f`
    fn choose_exponent<R: RandomSource + ?Sized>(&self, f: &BigUint, rng: &mut R) -> Result<BigUint> {
        let (low, f_int) = (BigUint::from(2u32), BigInt::from(f.clone()));
        let mut try_times: u64 = 0;
        loop {
            if self.max_attempts.map_or(false, |max| try_times >= max) {
                return Err(RsaError::KeyGenerationTimeout(try_times));
            }
            try_times += 1;
            let e = rng.next_in_range(&low, f);
            if extended_gcd(&BigInt::from(e.clone()), &f_int).0.is_one() {
                return Ok(e);
            }
        }
    }

    pub fn check_key_set(&self, d: &BigUint, e: &BigUint, f: &BigUint) {
        let res = (d * e) % f;
        assert!(res.is_one(), "(d * e) % f = {} % {} = {}", d * e, f, res);
    }
}
