use chrono::Local;
use num_bigint::BigUint;
use num::Integer;
use num_traits::{One, Zero};
use crate::rsa::config::is_silent;
use crate::rsa::error::{Result, RsaError};
use crate::rsa::math::mod_pow;
use crate::rsa::random::RandomSource;
use crate::rsa::sieve::small_primes;

/// Miller-Rabin with `rounds` random witnesses drawn uniformly from `[2, n-1)`.
///
/// Never rejects a prime. A composite survives a single round with
/// probability at most 1/4.
pub fn is_probable_prime<R: RandomSource + ?Sized>(n: &BigUint, rounds: u32, rng: &mut R) -> bool {
    let two = BigUint::from(2u32);
    if n < &two { return false; }
    if n == &two || n == &BigUint::from(3u32) { return true; }
    if n.is_even() { return false; }
    let n_1 = n - 1u32;
    // n - 1 = 2^s * d with d odd
    let s = n_1.trailing_zeros().unwrap_or(0);
    let d = &n_1 >> s;
    'witness: for _ in 0..rounds {
        let a = rng.next_in_range(&two, &n_1);
        let mut x = mod_pow(&a, &d, n);
        if x.is_one() || x == n_1 { continue; }
        for _ in 1..s {
            x = (&x * &x) % n;
            if x == n_1 { continue 'witness; }
        }
        return false;
    }
    true
}

/// Draws random primes of a fixed bit-length: odd candidates, trial division
/// by a small prime table, then Miller-Rabin.
#[derive(Debug, Clone)]
pub struct PrimeGenerator {
    bits: u64,
    rounds: u32,
    max_attempts: Option<u64>,
    primes: Vec<u64>,
}

impl PrimeGenerator {
    pub fn new(bits: u64, rounds: u32, sieve_limit: usize) -> Self {
        Self { bits, rounds, max_attempts: None, primes: small_primes(sieve_limit) }
    }

    pub fn with_max_attempts(mut self, max_attempts: Option<u64>) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn bits(&self) -> u64 {
        self.bits
    }

    /// Random odd integer with exactly `bits` bits
    fn random_candidate<R: RandomSource + ?Sized>(&self, rng: &mut R) -> BigUint {
        let low = BigUint::one() << (self.bits - 1);
        let high = BigUint::one() << self.bits;
        let mut c = rng.next_in_range(&low, &high);
        c.set_bit(0, true);
        c
    }

    /// False when a small prime whose square does not exceed `c` divides it
    pub fn passes_trial_division(&self, c: &BigUint) -> bool {
        for &p in &self.primes {
            let p = BigUint::from(p);
            if &p * &p > *c { break; }
            if (c % &p).is_zero() { return false; }
        }
        true
    }

    pub fn generate_prime<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Result<BigUint> {
        let start = Local::now().timestamp_millis();
        let mut try_times: u64 = 0;
        loop {
            if let Some(max) = self.max_attempts {
                if try_times >= max {
                    if !is_silent() {
                        println!("Failed generation in {} tries after {} ms", try_times, Local::now().timestamp_millis() - start);
                    }
                    return Err(RsaError::KeyGenerationTimeout(try_times));
                }
            }
            try_times += 1;
            let test = self.random_candidate(rng);
            if !self.passes_trial_division(&test) { continue; }
            if is_probable_prime(&test, self.rounds, rng) {
                if !is_silent() {
                    println!("Done generation in {} tries after {} ms", try_times, Local::now().timestamp_millis() - start);
                }
                return Ok(test);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;
    use num_bigint::BigUint;
    use num_traits::ToPrimitive;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use crate::rsa::config::{CONFIG_DEF, MILLER_RABIN_ROUNDS};
    use crate::rsa::random::FixedSequence;
    use super::*;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(0x5eed)
    }

    fn is_prime_by_division(n: &BigUint) -> bool {
        match n.to_u64() {
            Some(v) if v < 2 => false,
            Some(v) => (2..).take_while(|i: &u64| i * i <= v).all(|i| v % i != 0),
            None => false,
        }
    }

    #[test]
    fn known_primes_pass() {
        let mut r = rng();
        for p in [2u32, 3, 5, 7, 97, 7919, 65537, 2147483647] {
            assert!(is_probable_prime(&BigUint::from(p), MILLER_RABIN_ROUNDS, &mut r), "{} rejected", p);
        }
    }

    #[test]
    fn known_composites_fail() {
        let mut r = rng();
        for c in [0u32, 1, 4, 9, 91, 100, 561, 1105, 1729, 2465, 7917, 25326001] {
            assert!(!is_probable_prime(&BigUint::from(c), MILLER_RABIN_ROUNDS, &mut r), "{} accepted", c);
        }
    }

    #[test]
    fn carmichael_witness() {
        // 2 is a witness for 561 = 3 * 11 * 17
        let mut witnesses = FixedSequence::new(vec![0u32]);
        assert!(!is_probable_prime(&BigUint::from(561u32), 1, &mut witnesses));
    }

    #[test]
    fn strong_liar_fools_one_round() {
        // 2047 = 23 * 89 is a strong pseudoprime to base 2, base 3 exposes it
        let mut liar = FixedSequence::new(vec![0u32]);
        assert!(is_probable_prime(&BigUint::from(2047u32), 1, &mut liar));
        let mut honest = FixedSequence::new(vec![0u32, 1]);
        assert!(!is_probable_prime(&BigUint::from(2047u32), 2, &mut honest));
    }

    #[test]
    fn agrees_with_trial_division() {
        let mut r = rng();
        for v in 0u32..5000 {
            let n = BigUint::from(v);
            assert_eq!(is_probable_prime(&n, MILLER_RABIN_ROUNDS, &mut r), is_prime_by_division(&n), "{}", v);
        }
    }

    #[test]
    fn trial_division_keeps_small_primes() {
        let g = PrimeGenerator::new(8, MILLER_RABIN_ROUNDS, 256);
        assert!(g.passes_trial_division(&BigUint::from(131u32)));
        assert!(g.passes_trial_division(&BigUint::from(251u32)));
        assert!(!g.passes_trial_division(&BigUint::from(221u32)));
        assert!(!g.passes_trial_division(&BigUint::from(169u32)));
    }

    #[test]
    fn gen_prime() -> std::result::Result<(), Box<dyn Error>> {
        let c = CONFIG_DEF.get();
        let mut r = rng();
        for bits in [8u64, 16, 32, 64, 128] {
            let g = PrimeGenerator::new(bits, c.rounds, 1024);
            let prime = g.generate_prime(&mut r)?;
            assert_eq!(prime.bits(), bits);
            assert!(prime.bit(0));
            if bits <= 32 { assert!(is_prime_by_division(&prime)); }
        }
        Ok(())
    }

    #[test]
    fn attempts_cap() {
        let g = PrimeGenerator::new(64, MILLER_RABIN_ROUNDS, 1024).with_max_attempts(Some(0));
        match g.generate_prime(&mut rng()) {
            Err(RsaError::KeyGenerationTimeout(n)) => assert_eq!(n, 0),
            other => panic!("expected timeout, got {:?}", other),
        }
    }
}
