/// Sieve of Eratosthenes, returns every prime below `limit` in ascending order.
///
/// Only meant as a cheap pre-filter before Miller-Rabin; a big candidate that
/// survives trial division by this table is not known to be prime.
pub fn small_primes(limit: usize) -> Vec<u64> {
    if limit < 3 {
        return Vec::new();
    }
    let mut composite = vec![false; limit];
    let mut primes = Vec::new();
    for i in 2..limit {
        if composite[i] { continue; }
        primes.push(i as u64);
        let mut j = i * i;
        while j < limit {
            composite[j] = true;
            j += i;
        }
    }
    primes
}
