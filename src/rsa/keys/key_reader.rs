use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use crate::rsa::error::{Result, RsaError};
use crate::rsa::keys::KeyKind;
use crate::rsa::keys::key_data::KeyData;

/// Splits a key file into armor lines and base64 body. Files without armor
/// (a bare base64 blob) are accepted too.
pub struct KeyReader {
    pub header: String,
    pub footer: String,
    body: String,
}

impl KeyReader {
    pub fn new<R: Read>(reader: R) -> Result<Self> {
        let mut s = Self { header: "".to_string(), footer: "".to_string(), body: "".to_string() };
        for line in BufReader::new(reader).lines() {
            let line = line.map_err(|e| match e.kind() {
                std::io::ErrorKind::InvalidData => RsaError::KeyFormat("key file is not text".to_string()),
                _ => RsaError::Io(e),
            })?;
            let line = line.trim();
            if line.starts_with('-') {
                if line.contains("END") {
                    s.footer = line.to_string();
                } else {
                    s.header = line.to_string();
                }
            } else {
                s.body.extend(line.chars().filter(|c| !c.is_whitespace()));
            }
        }
        Ok(s)
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Kind announced by the header, if there is one
    pub fn kind(&self) -> Option<KeyKind> {
        if self.header.contains("PRIVATE") {
            Some(KeyKind::Private)
        } else if self.header.contains("PUBLIC") {
            Some(KeyKind::Public)
        } else {
            None
        }
    }

    fn bits(&self) -> Option<u64> {
        let rest = self.header.split("RSA-").nth(1)?;
        rest.split_whitespace().next()?.parse().ok()
    }

    pub fn into_key_data(self, expected: KeyKind) -> Result<KeyData> {
        if self.body.is_empty() {
            return Err(RsaError::KeyFormat("empty key file".to_string()));
        }
        Ok(KeyData {
            kind: self.kind().unwrap_or(expected),
            bits: self.bits().unwrap_or(0),
            payload: self.body,
        })
    }
}

impl KeyData {
    /// `KeyNotFound` when the file does not exist, `KeyFormat` when it cannot be parsed
    pub fn load<P: AsRef<Path>>(path: P, expected: KeyKind) -> Result<KeyData> {
        let path = path.as_ref();
        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(RsaError::KeyNotFound(path.to_path_buf())),
            Err(e) => return Err(RsaError::Io(e)),
        };
        KeyReader::new(file)?.into_key_data(expected)
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;
    use num_bigint::BigUint;
    use crate::rsa::error::RsaError;
    use crate::rsa::keys::{KeyData, KeyKind, KeyReader, PrivateKey, PublicKey};

    #[test]
    fn parse_armored() -> Result<(), Box<dyn Error>> {
        let text = "-----BEGIN RSA-8 PRIVATE KEY-----\nMTg3\nOzIz\n-----END RSA-8 PRIVATE KEY-----\n";
        let reader = KeyReader::new(text.as_bytes())?;
        assert_eq!(reader.kind(), Some(KeyKind::Private));
        assert_eq!(reader.body(), "MTg3OzIz");
        let data = reader.into_key_data(KeyKind::Private)?;
        assert_eq!(data.bits, 8);
        assert_eq!(data.to_private()?, PrivateKey::new(BigUint::from(187u32), BigUint::from(23u32)));
        Ok(())
    }

    #[test]
    fn parse_bare_base64() -> Result<(), Box<dyn Error>> {
        let data = KeyReader::new("MTg3Ozc=".as_bytes())?.into_key_data(KeyKind::Public)?;
        assert_eq!(data.to_public()?, PublicKey::new(BigUint::from(187u32), BigUint::from(7u32)));
        Ok(())
    }

    #[test]
    fn written_key_reads_back() -> Result<(), Box<dyn Error>> {
        let key = PublicKey::new(BigUint::from(3233u32), BigUint::from(17u32));
        let out = KeyData::from_public(&key).write_to(Vec::new())?;
        let data = KeyReader::new(out.as_slice())?.into_key_data(KeyKind::Public)?;
        assert_eq!(data, KeyData::from_public(&key));
        Ok(())
    }

    #[test]
    fn wrong_kind_is_format_error() -> Result<(), Box<dyn Error>> {
        let key = PublicKey::new(BigUint::from(3233u32), BigUint::from(17u32));
        let out = KeyData::from_public(&key).write_to(Vec::new())?;
        let data = KeyReader::new(out.as_slice())?.into_key_data(KeyKind::Private)?;
        assert!(matches!(data.to_private(), Err(RsaError::KeyFormat(_))));
        Ok(())
    }

    #[test]
    fn empty_and_binary_files() {
        assert!(matches!(KeyReader::new("".as_bytes()).and_then(|r| r.into_key_data(KeyKind::Public)), Err(RsaError::KeyFormat(_))));
        let binary: &[u8] = &[0xff, 0x00, 0xfe, 0x80];
        assert!(matches!(KeyReader::new(binary), Err(RsaError::KeyFormat(_))));
    }

    #[test]
    fn missing_file_is_not_found() {
        let path = std::env::temp_dir().join("custom-rsa-no-such-key");
        assert!(matches!(KeyData::load(&path, KeyKind::Public), Err(RsaError::KeyNotFound(_))));
    }
}
