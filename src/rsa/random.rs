use num_bigint::{BigUint, RandBigInt};
use rand::Rng;
use rand::rngs::OsRng;

/// Anything able to hand out a random integer in `[low, high)`.
///
/// Every `rand::Rng` qualifies. Key generation in production draws from the
/// operating system generator, tests plug in seeded generators or a
/// [`FixedSequence`].
pub trait RandomSource {
    fn next_in_range(&mut self, low: &BigUint, high: &BigUint) -> BigUint;
}

impl<R: Rng + ?Sized> RandomSource for R {
    fn next_in_range(&mut self, low: &BigUint, high: &BigUint) -> BigUint {
        self.gen_biguint_range(low, high)
    }
}

pub fn secure() -> OsRng {
    OsRng
}

/// Replays a fixed list of values, folded into the requested range.
#[derive(Debug, Clone)]
pub struct FixedSequence {
    values: Vec<BigUint>,
    cur: usize,
}

impl FixedSequence {
    pub fn new<T: Into<BigUint>>(values: Vec<T>) -> Self {
        Self { values: values.into_iter().map(Into::into).collect(), cur: 0 }
    }
}

impl RandomSource for FixedSequence {
    fn next_in_range(&mut self, low: &BigUint, high: &BigUint) -> BigUint {
        assert!(low < high, "empty range");
        if self.values.is_empty() {
            return low.clone();
        }
        let v = &self.values[self.cur % self.values.len()];
        self.cur += 1;
        low + v % (high - low)
    }
}
