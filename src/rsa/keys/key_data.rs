use crate::rsa::error::{Result, RsaError};
use crate::rsa::keys::{KeyKind, PrivateKey, PublicKey};

/// One key file: armor lines around the base64 payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyData {
    pub(crate) kind: KeyKind,
    pub(crate) bits: u64,
    pub(crate) payload: String,
}

impl KeyData {
    pub fn header(&self) -> String {
        format!("-----BEGIN RSA-{} {} KEY-----", self.bits, self.kind)
    }

    pub fn footer(&self) -> String {
        format!("-----END RSA-{} {} KEY-----", self.bits, self.kind)
    }

    pub fn from_public(key: &PublicKey) -> Self {
        Self { kind: KeyKind::Public, bits: key.n.bits(), payload: key.encode() }
    }

    pub fn from_private(key: &PrivateKey) -> Self {
        Self { kind: KeyKind::Private, bits: key.n.bits(), payload: key.encode() }
    }

    pub fn to_public(&self) -> Result<PublicKey> {
        self.expect_kind(KeyKind::Public)?;
        PublicKey::decode(&self.payload)
    }

    pub fn to_private(&self) -> Result<PrivateKey> {
        self.expect_kind(KeyKind::Private)?;
        PrivateKey::decode(&self.payload)
    }

    fn expect_kind(&self, kind: KeyKind) -> Result<()> {
        if self.kind != kind {
            return Err(RsaError::KeyFormat(format!("expected a {} key, found a {} key", kind, self.kind)));
        }
        Ok(())
    }

    pub fn info(&self) {
        println!("{} key, {} bits", self.kind, self.bits);
    }
}
