use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;
use crate::rsa::error::Result;
use crate::rsa::keys::BASE64_SPLIT;
use crate::rsa::keys::key_data::KeyData;

/// Buffers base64 text and on flush writes it between the armor lines,
/// wrapped at `BASE64_SPLIT` columns.
pub struct KeyWriter<W: Write> {
    writer: W,
    buffer: Vec<u8>,
    pub header: String,
    pub footer: String,
}

impl From<File> for KeyWriter<File> {
    fn from(f: File) -> Self {
        Self::new(f)
    }
}

impl<W: Write> KeyWriter<W> {
    pub fn new(writer: W) -> Self {
        KeyWriter {
            writer,
            buffer: vec![],
            header: "".to_string(),
            footer: "".to_string(),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Write for KeyWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.header.is_empty() {
            self.writer.write_all(self.header.as_bytes())?;
            self.writer.write_all(b"\n")?;
        }
        for line in self.buffer.chunks(BASE64_SPLIT) {
            self.writer.write_all(line)?;
            self.writer.write_all(b"\n")?;
        }
        if !self.footer.is_empty() {
            self.writer.write_all(self.footer.as_bytes())?;
            self.writer.write_all(b"\n")?;
        }
        self.buffer.clear();
        self.writer.flush()
    }
}

impl KeyData {
    pub fn write_to<W: Write>(&self, writer: W) -> Result<W> {
        let mut key_writer = KeyWriter::new(writer);
        key_writer.header = self.header();
        key_writer.footer = self.footer();
        key_writer.write_all(self.payload.as_bytes())?;
        key_writer.flush()?;
        Ok(key_writer.into_inner())
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        self.write_to(File::create(path)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;
    use num_bigint::BigUint;
    use crate::rsa::keys::{KeyData, PublicKey};

    #[test]
    fn armored_output() -> Result<(), Box<dyn Error>> {
        let key = PublicKey::new(BigUint::from(187u32), BigUint::from(7u32));
        let out = KeyData::from_public(&key).write_to(Vec::new())?;
        let text = String::from_utf8(out)?;
        assert_eq!(text, "-----BEGIN RSA-8 PUBLIC KEY-----\nMTg3Ozc=\n-----END RSA-8 PUBLIC KEY-----\n");
        Ok(())
    }

    #[test]
    fn long_payload_wraps() -> Result<(), Box<dyn Error>> {
        let n = (BigUint::from(1u32) << 1024u32) - 1u32;
        let key = PublicKey::new(n.clone(), n);
        let out = String::from_utf8(KeyData::from_public(&key).write_to(Vec::new())?)?;
        let lines = out.lines().collect::<Vec<_>>();
        assert!(lines.len() > 3);
        assert!(lines[1..lines.len() - 1].iter().all(|l| l.len() <= 70));
        assert_eq!(lines[1].len(), 70);
        Ok(())
    }
}
