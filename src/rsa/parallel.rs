use std::thread;
use crossbeam_channel::{bounded, Receiver, Sender};
use indicatif::{ProgressBar, ProgressStyle};
use num_bigint::BigUint;
use crate::rsa::config::NUM_THREADS;
use crate::rsa::error::{Result, RsaError};
use crate::rsa::math::mod_pow;

/// Applies `mod_pow` to every element of a batch on a pool of threads that
/// lives for one call. The input is cut into at most `workers` contiguous
/// chunks; results are put back together by chunk index, so the output
/// order always equals the input order.
#[derive(Debug, Clone)]
pub struct ParallelExponentiator {
    workers: usize,
    progress: bool,
}

impl Default for ParallelExponentiator {
    fn default() -> Self {
        Self::new(NUM_THREADS)
    }
}

impl ParallelExponentiator {
    pub fn new(workers: usize) -> Self {
        Self { workers: workers.max(1), progress: false }
    }

    /// Show a progress bar while the batch runs
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Elements per chunk, the last chunk may be shorter
    pub fn chunk_size(&self, len: usize) -> usize {
        ((len + self.workers - 1) / self.workers).max(1)
    }

    pub fn transform(&self, values: &[BigUint], exponent: &BigUint, modulus: &BigUint) -> Result<Vec<BigUint>> {
        if values.is_empty() {
            return Ok(Vec::new());
        }
        let chunks = values.chunks(self.chunk_size(values.len())).collect::<Vec<_>>();
        let threads = chunks.len();
        let pb = match self.progress {
            true => Some(ProgressBar::new(values.len() as u64)),
            false => None,
        };
        if let Some(pb) = &pb {
            if let Ok(style) = ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta})") {
                pb.set_style(style.progress_chars("#>-"));
            }
        }
        let mut res_collect = thread::scope(|scope| {
            let (map_tx, map_rx): (Sender<(usize, &[BigUint])>, Receiver<(usize, &[BigUint])>) = bounded(threads);
            let (reduce_tx, reduce_rx) = bounded::<(usize, Vec<BigUint>)>(threads);
            let handles = (0..threads).map(|_| {
                let r = map_rx.clone();
                let s = reduce_tx.clone();
                scope.spawn(move || {
                    for (index, chunk) in r.iter() {
                        let res = chunk.iter().map(|v| mod_pow(v, exponent, modulus)).collect::<Vec<_>>();
                        if s.send((index, res)).is_err() { break; }
                    }
                })
            }).collect::<Vec<_>>();
            drop(map_rx);
            drop(reduce_tx);
            for (i, chunk) in chunks.iter().enumerate() {
                if map_tx.send((i, *chunk)).is_err() { break; }
            }
            drop(map_tx);
            let mut res_collect = Vec::with_capacity(threads);
            for r in reduce_rx.iter() {
                if let Some(pb) = &pb { pb.inc(r.1.len() as u64); }
                res_collect.push(r);
            }
            let failed = handles.into_iter().map(|h| h.join()).filter(|r| r.is_err()).count();
            if failed > 0 {
                return Err(RsaError::Worker(format!("{} of {} workers panicked", failed, threads)));
            }
            Ok(res_collect)
        })?;
        if let Some(pb) = &pb {
            pb.finish_with_message("Done");
        }
        if res_collect.len() != threads {
            return Err(RsaError::Worker(format!("got {} of {} chunks back", res_collect.len(), threads)));
        }
        res_collect.sort_by_key(|r| r.0);
        if res_collect.iter().enumerate().any(|(i, r)| i != r.0) {
            return Err(RsaError::Worker("chunk results out of sequence".to_string()));
        }
        Ok(res_collect.into_iter().flat_map(|r| r.1).collect())
    }
}

/// One-shot form of [`ParallelExponentiator::transform`]
pub fn transform(values: &[BigUint], exponent: &BigUint, modulus: &BigUint, worker_count: usize) -> Result<Vec<BigUint>> {
    ParallelExponentiator::new(worker_count).transform(values, exponent, modulus)
}

#[cfg(test)]
mod tests {
    use num_bigint::BigUint;
    use num_traits::Zero;
    use proptest::prelude::*;
    use crate::rsa::error::RsaError;
    use crate::rsa::math::mod_pow;
    use super::{transform, ParallelExponentiator};

    fn big(v: u64) -> BigUint {
        BigUint::from(v)
    }

    #[test]
    fn empty_input() {
        assert!(transform(&[], &big(7), &big(187), 4).unwrap().is_empty());
    }

    #[test]
    fn chunking() {
        let p = ParallelExponentiator::new(4);
        assert_eq!(p.chunk_size(10), 3);
        assert_eq!(p.chunk_size(3), 1);
        assert_eq!(p.chunk_size(8), 2);
        assert_eq!(ParallelExponentiator::new(0).workers(), 1);
    }

    #[test]
    fn fewer_values_than_workers() {
        let values = vec![big(2), big(3)];
        let res = transform(&values, &big(3), &big(187), 8).unwrap();
        assert_eq!(res, vec![big(8), big(27)]);
    }

    #[test]
    fn keeps_order() {
        let (e, n) = (big(7), big(187));
        let values = (0..500u64).map(|v| big(v % 187)).collect::<Vec<_>>();
        let expected = values.iter().map(|v| mod_pow(v, &e, &n)).collect::<Vec<_>>();
        for workers in [1, 2, 3, 7, 10, 499, 500, 1000] {
            assert_eq!(transform(&values, &e, &n, workers).unwrap(), expected, "{} workers", workers);
        }
    }

    #[test]
    fn with_progress_bar() {
        let values = (1..50u64).map(big).collect::<Vec<_>>();
        let p = ParallelExponentiator::new(3).with_progress(true);
        assert_eq!(p.transform(&values, &big(1), &big(1000)).unwrap(), values);
    }

    #[test]
    fn worker_panic_fails_whole_batch() {
        let values = (1..20u64).map(big).collect::<Vec<_>>();
        // zero modulus makes mod_pow divide by zero inside every worker
        match transform(&values, &big(3), &BigUint::zero(), 4) {
            Err(RsaError::Worker(_)) => {}
            other => panic!("expected worker failure, got {:?}", other),
        }
    }

    proptest! {
        #[test]
        fn serial_equals_parallel(values in prop::collection::vec(any::<u32>(), 1..200), e in 1u32..1000) {
            let n = big(4294967291);
            let values = values.into_iter().map(|v| big(v as u64)).collect::<Vec<_>>();
            let serial = transform(&values, &big(e as u64), &n, 1).unwrap();
            let parallel = transform(&values, &big(e as u64), &n, 8).unwrap();
            prop_assert_eq!(serial.len(), values.len());
            prop_assert_eq!(serial, parallel);
        }
    }
}
