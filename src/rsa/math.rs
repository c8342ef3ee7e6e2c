use num_bigint::{BigInt, BigUint, Sign};
use num::Integer;
use num_traits::{One, Zero};
use crate::rsa::error::{Result, RsaError};

/// Square-and-multiply, every intermediate value is reduced mod `n`.
/// Returns zero when `a` is a multiple of `n`. `n` must not be zero.
pub fn mod_pow(a: &BigUint, q: &BigUint, n: &BigUint) -> BigUint {
    let mut a = a % n;
    if a.is_zero() || n.is_one() {
        return BigUint::zero();
    }
    let mut r = BigUint::one();
    for i in 0..q.bits() {
        if q.bit(i) { r = (r * &a) % n; }
        a = (&a * &a) % n;
    }
    r
}

/// Returns `(g, x, y)` with `g = gcd(a, b) = a*x + b*y`, for `a, b >= 0`.
pub fn extended_gcd(a: &BigInt, b: &BigInt) -> (BigInt, BigInt, BigInt) {
    let (mut x, mut y) = (a.clone(), b.clone());
    let (mut px, mut qx) = (BigInt::one(), BigInt::zero());
    let (mut py, mut qy) = (BigInt::zero(), BigInt::one());
    while !y.is_zero() {
        let (quot, rem) = x.div_rem(&y);
        let (m, n) = (&px - &py * &quot, &qx - &qy * &quot);
        x = std::mem::replace(&mut y, rem);
        px = std::mem::replace(&mut py, m);
        qx = std::mem::replace(&mut qy, n);
    }
    (x, px, qx)
}

/// `x` such that `a*x = 1 (mod m)` and `0 <= x < m`.
pub fn mod_inverse(a: &BigUint, m: &BigUint) -> Result<BigUint> {
    let ma = BigInt::from_biguint(Sign::Plus, a.clone());
    let mm = BigInt::from_biguint(Sign::Plus, m.clone());
    let (g, x, _) = extended_gcd(&ma, &mm);
    if !g.is_one() {
        return Err(RsaError::NoInverse { a: a.clone(), m: m.clone() });
    }
    // mod_floor keeps the result in [0, m) for negative Bezout coefficients
    match x.mod_floor(&mm).to_biguint() {
        Some(x) => Ok(x),
        None => Err(RsaError::NoInverse { a: a.clone(), m: m.clone() }),
    }
}

/// phi(p*q) for distinct primes p, q
pub fn euler(p: &BigUint, q: &BigUint) -> BigUint {
    (p - 1u32) * (q - 1u32)
}
