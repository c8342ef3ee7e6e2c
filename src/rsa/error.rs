use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::io;
use std::path::PathBuf;
use num_bigint::BigUint;

pub enum RsaError {
    /// Neither key file exists yet; callers are expected to generate a fresh pair
    KeyNotFound(PathBuf),
    /// A persisted key exists but cannot be decoded; never silently regenerated
    KeyFormat(String),
    NoInverse { a: BigUint, m: BigUint },
    KeyGenerationTimeout(u64),
    KeySizeTooSmall { requested: u64, minimum: u64 },
    Worker(String),
    ValueOutOfRange { value: BigUint, modulus: BigUint },
    CiphertextFormat(String),
    Io(io::Error),
}

impl RsaError {
    fn display(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RsaError::KeyNotFound(path) => write!(f, "Key not found at {}", path.display()),
            RsaError::KeyFormat(reason) => write!(f, "Malformed key file: {}", reason),
            RsaError::NoInverse { a, m } => write!(f, "No modular inverse of {} mod {}", a, m),
            RsaError::KeyGenerationTimeout(attempts) => write!(f, "Key generation gave up after {} candidates", attempts),
            RsaError::KeySizeTooSmall { requested, minimum } => write!(f, "Key size {} bits is too small, need at least {}", requested, minimum),
            RsaError::Worker(reason) => write!(f, "Worker failed: {}", reason),
            RsaError::ValueOutOfRange { value, modulus } => write!(f, "Value {} does not fit modulus {}", value, modulus),
            RsaError::CiphertextFormat(reason) => write!(f, "Malformed ciphertext: {}", reason),
            RsaError::Io(e) => write!(f, "IO error: {}", e),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RsaError::KeyNotFound(_))
    }
}

impl Display for RsaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.display(f)
    }
}

impl Debug for RsaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.display(f)
    }
}

impl Error for RsaError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RsaError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for RsaError {
    fn from(e: io::Error) -> Self {
        RsaError::Io(e)
    }
}

pub type Result<T> = std::result::Result<T, RsaError>;
