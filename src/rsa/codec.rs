use std::io::{Read, Write};
use num_bigint::BigUint;
use std::str::FromStr;
use crate::rsa::error::{Result, RsaError};
use crate::rsa::keys::element_width;

/// On-disk layout of ciphertexts and signatures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Big-endian elements of `ceil(bits(n)/8)` bytes each, no separators
    Binary,
    /// Decimal elements joined by commas
    Text,
}

impl Format {
    pub fn encode(&self, values: &[BigUint], n: &BigUint) -> Result<Vec<u8>> {
        match self {
            Format::Binary => encode_fixed(values, n),
            Format::Text => {
                check_range(values, n)?;
                Ok(encode_text(values).into_bytes())
            }
        }
    }

    pub fn decode(&self, data: &[u8], n: &BigUint) -> Result<Vec<BigUint>> {
        let values = match self {
            Format::Binary => decode_fixed(data, n)?,
            Format::Text => {
                let text = std::str::from_utf8(data).map_err(|_| RsaError::CiphertextFormat("text ciphertext is not utf-8".to_string()))?;
                decode_text(text)?
            }
        };
        if let Some(v) = values.iter().find(|v| *v >= n) {
            return Err(RsaError::CiphertextFormat(format!("element {} is not below the modulus", v)));
        }
        Ok(values)
    }

    pub fn write_to<W: Write>(&self, writer: &mut W, values: &[BigUint], n: &BigUint) -> Result<()> {
        writer.write_all(&self.encode(values, n)?)?;
        writer.flush()?;
        Ok(())
    }

    pub fn read_from<R: Read>(&self, reader: &mut R, n: &BigUint) -> Result<Vec<BigUint>> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        self.decode(&data, n)
    }
}

fn check_range(values: &[BigUint], n: &BigUint) -> Result<()> {
    match values.iter().find(|v| *v >= n) {
        Some(v) => Err(RsaError::ValueOutOfRange { value: v.clone(), modulus: n.clone() }),
        None => Ok(()),
    }
}

pub fn encode_fixed(values: &[BigUint], n: &BigUint) -> Result<Vec<u8>> {
    check_range(values, n)?;
    let width = element_width(n);
    let mut res = Vec::with_capacity(values.len() * width);
    for v in values {
        let bytes = v.to_bytes_be();
        // zero encodes as a single 0 byte, which the padding absorbs
        let bytes = if bytes == [0] { &bytes[1..] } else { &bytes[..] };
        res.resize(res.len() + width - bytes.len(), 0);
        res.extend_from_slice(bytes);
    }
    Ok(res)
}

pub fn decode_fixed(data: &[u8], n: &BigUint) -> Result<Vec<BigUint>> {
    let width = element_width(n);
    if width == 0 || data.len() % width != 0 {
        return Err(RsaError::CiphertextFormat(format!("{} bytes is not a multiple of the {} byte element width", data.len(), width)));
    }
    Ok(data.chunks(width).map(BigUint::from_bytes_be).collect())
}

pub fn encode_text(values: &[BigUint]) -> String {
    values.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(",")
}

pub fn decode_text(text: &str) -> Result<Vec<BigUint>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Vec::new());
    }
    text.split(',')
        .map(|s| BigUint::from_str(s.trim()).map_err(|_| RsaError::CiphertextFormat(format!("not a decimal element: {:?}", s))))
        .collect()
}
