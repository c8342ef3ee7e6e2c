pub mod key_writer;
pub mod key_reader;
pub mod key_data;
pub mod key_pair;
pub mod key_generator;

pub use key_pair::*;
pub use key_reader::*;
pub use key_writer::*;
pub use key_data::*;
pub use key_generator::*;

use std::fmt::{Display, Formatter};
use std::str::FromStr;
use num_bigint::BigUint;
use num_traits::Zero;
use crate::rsa::error::{Result, RsaError};

/// Public half: modulus and public exponent
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PublicKey {
    pub n: BigUint,
    pub e: BigUint,
}

/// Private half: modulus and private exponent
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PrivateKey {
    pub n: BigUint,
    pub d: BigUint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Public,
    Private,
}

impl Display for KeyKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyKind::Public => write!(f, "PUBLIC"),
            KeyKind::Private => write!(f, "PRIVATE"),
        }
    }
}

const BASE64_SPLIT: usize = 70;

/// base64 of `"<n>;<exponent>"`
fn encode_pair(n: &BigUint, exponent: &BigUint) -> String {
    base64::encode(format!("{};{}", n, exponent))
}

fn decode_pair(data: &str) -> Result<(BigUint, BigUint)> {
    let raw = base64::decode(data.trim()).map_err(|e| RsaError::KeyFormat(format!("bad base64: {}", e)))?;
    let text = String::from_utf8(raw).map_err(|_| RsaError::KeyFormat("payload is not utf-8".to_string()))?;
    let mut parts = text.trim().split(';');
    let (n, exponent) = match (parts.next(), parts.next(), parts.next()) {
        (Some(n), Some(exponent), None) => (n, exponent),
        _ => return Err(RsaError::KeyFormat(format!("expected `n;exponent', got {:?}", text))),
    };
    let parse = |s: &str| BigUint::from_str(s.trim())
        .map_err(|_| RsaError::KeyFormat(format!("not a decimal integer: {:?}", s)));
    let (n, exponent) = (parse(n)?, parse(exponent)?);
    if n.is_zero() {
        return Err(RsaError::KeyFormat("zero modulus".to_string()));
    }
    Ok((n, exponent))
}

/// Width in bytes of one serialized element under modulus `n`
pub fn element_width(n: &BigUint) -> usize {
    ((n.bits() + 7) / 8) as usize
}

impl PublicKey {
    pub fn new(n: BigUint, e: BigUint) -> Self {
        Self { n, e }
    }

    pub fn encode(&self) -> String {
        encode_pair(&self.n, &self.e)
    }

    pub fn decode(data: &str) -> Result<Self> {
        let (n, e) = decode_pair(data)?;
        Ok(Self { n, e })
    }

    pub fn element_width(&self) -> usize {
        element_width(&self.n)
    }
}

impl PrivateKey {
    pub fn new(n: BigUint, d: BigUint) -> Self {
        Self { n, d }
    }

    pub fn encode(&self) -> String {
        encode_pair(&self.n, &self.d)
    }

    pub fn decode(data: &str) -> Result<Self> {
        let (n, d) = decode_pair(data)?;
        Ok(Self { n, d })
    }

    pub fn element_width(&self) -> usize {
        element_width(&self.n)
    }
}

#[cfg(test)]
mod tests {
    use num_bigint::BigUint;
    use super::*;

    #[test]
    fn encode_matches_text_format() {
        let key = PublicKey::new(BigUint::from(187u32), BigUint::from(7u32));
        assert_eq!(key.encode(), "MTg3Ozc=");
        assert_eq!(PublicKey::decode("MTg3Ozc=").unwrap(), key);
    }

    #[test]
    fn decode_tolerates_whitespace() {
        let key = PrivateKey::decode(&(base64::encode("187;23\n") + "\n")).unwrap();
        assert_eq!(key, PrivateKey::new(BigUint::from(187u32), BigUint::from(23u32)));
    }

    #[test]
    fn decode_rejects_garbage() {
        for bad in [
            "%%%".to_string(),
            base64::encode("187"),
            base64::encode("187;23;5"),
            base64::encode("187;x"),
            base64::encode("-187;7"),
            base64::encode("0;7"),
            base64::encode([0xffu8, 0xfe]),
        ] {
            match PublicKey::decode(&bad) {
                Err(RsaError::KeyFormat(_)) => {}
                other => panic!("{:?} decoded to {:?}", bad, other),
            }
        }
    }

    #[test]
    fn widths() {
        assert_eq!(element_width(&BigUint::from(255u32)), 1);
        assert_eq!(element_width(&BigUint::from(256u32)), 2);
        assert_eq!(element_width(&BigUint::from(16899u32)), 2);
        assert_eq!(element_width(&(BigUint::from(1u32) << 64u32)), 9);
    }
}
