use std::error::Error;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;
use num_bigint::BigUint;
use num_traits::ToPrimitive;
use rand::RngCore;
use sha3::{Digest, Sha3_256};

pub mod config;
pub mod error;
pub mod sieve;
pub mod math;
pub mod random;
pub mod prime_gen;
pub mod keys;
pub mod parallel;
pub mod codec;
pub mod client;
pub mod owner;

use config::*;
use error::{Result, RsaError};
use codec::Format;
use keys::*;

pub use client::Client;
pub use owner::Owner;
pub use parallel::ParallelExponentiator;

/// SHA3-256 of the whole message
pub fn hash(data: &[u8]) -> Vec<u8> {
    Sha3_256::digest(data).to_vec()
}

/// One element per byte; every byte value must be below `n`
pub fn bytes_to_elements(data: &[u8], n: &BigUint) -> Result<Vec<BigUint>> {
    data.iter().map(|b| {
        let v = BigUint::from(*b);
        if &v >= n {
            Err(RsaError::ValueOutOfRange { value: v, modulus: n.clone() })
        } else {
            Ok(v)
        }
    }).collect()
}

pub fn elements_to_bytes(values: &[BigUint]) -> Result<Vec<u8>> {
    values.iter().map(|v| v.to_u8().ok_or_else(|| RsaError::ValueOutOfRange { value: v.clone(), modulus: BigUint::from(256u32) })).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Generate,
    Encrypt,
    Decrypt,
    Sign,
    Verify,
    Test,
}

/// `dir/name.ext` -> `dir/name<suffix>.ext`
pub fn derived_path(input: &str, suffix: &str) -> String {
    let path = Path::new(input);
    let stem = path.file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{}{}.{}", stem, suffix, ext.to_string_lossy()),
        None => format!("{}{}", stem, suffix),
    };
    path.with_file_name(name).to_string_lossy().to_string()
}

impl Config {
    pub fn reader(&self) -> Result<Box<dyn Read>> {
        Ok(match self.input.as_str() {
            "stdin" => Box::new(io::stdin()),
            f => Box::new(File::open(f)?),
        })
    }

    /// Explicit `output`, else a name derived from `input`, else stdout
    pub fn writer(&mut self, suffix: &str) -> Result<Box<dyn Write>> {
        let output = match (self.output.as_str(), self.input.as_str()) {
            ("", "stdin") | ("stdout", _) => "stdout".to_string(),
            ("", input) => derived_path(input, suffix),
            (output, _) => output.to_string(),
        };
        Ok(match output.as_str() {
            "stdout" => {
                self.silent = true;
                set_silent(true);
                Box::new(io::stdout())
            }
            f => Box::new(File::create(f)?),
        })
    }

    pub fn signature_path(&self) -> String {
        match (self.signature.as_str(), self.input.as_str()) {
            ("", "stdin") => "signature.sig".to_string(),
            ("", input) => format!("{}.sig", input),
            (s, _) => s.to_string(),
        }
    }

    pub fn format(&self) -> Format {
        if self.text { Format::Text } else { Format::Binary }
    }

    pub fn run_mode(&self) -> std::result::Result<RunMode, String> {
        match self.mode.as_str() {
            "generate" => Ok(RunMode::Generate),
            "encrypt" | "encode" => Ok(RunMode::Encrypt),
            "decrypt" | "decode" => Ok(RunMode::Decrypt),
            "sign" => Ok(RunMode::Sign),
            "verify" => Ok(RunMode::Verify),
            "test" => Ok(RunMode::Test),
            m => Err(format!("Unknown run mode {:?}! available: generate(default), encrypt, decrypt, sign, verify, test", m)),
        }
    }

    fn read_input(&self) -> Result<Vec<u8>> {
        let mut data = Vec::new();
        self.reader()?.read_to_end(&mut data)?;
        Ok(data)
    }

    /// Runs the selected mode. `Ok(false)` means a signature did not verify
    /// or the self test found a mismatch.
    pub fn run(&mut self) -> std::result::Result<bool, Box<dyn Error>> {
        let mode = self.run_mode()?;
        let owner = Owner::from_config(self)?;
        let n = owner.public_key().n.clone();
        let format = self.format();
        match mode {
            RunMode::Generate => {
                let data = [KeyData::from_public(owner.public_key()), KeyData::from_private(owner.private_key())];
                for key in &data {
                    if !self.silent { key.info(); }
                }
                if !self.silent {
                    println!("n = {}", n);
                    println!("e = {}", owner.public_key().e);
                    let (private, public) = key_paths(&self.key);
                    println!("Key files: {}, {}", private.display(), public.display());
                }
            }
            RunMode::Encrypt => {
                let data = self.read_input()?;
                let encrypted = owner.client().encrypt(&data)?;
                format.write_to(&mut self.writer("_encrypted")?, &encrypted, &n)?;
            }
            RunMode::Decrypt => {
                let encrypted = format.read_from(&mut self.reader()?, &n)?;
                let decrypted = owner.decrypt_bytes(&encrypted)?;
                let mut writer = self.writer("_decrypted")?;
                writer.write_all(&decrypted)?;
                writer.flush()?;
            }
            RunMode::Sign => {
                let data = self.read_input()?;
                let signature = owner.sign(&data)?;
                let path = self.signature_path();
                format.write_to(&mut File::create(&path)?, &signature, &n)?;
                if !self.silent { println!("Signature written to {}", path); }
            }
            RunMode::Verify => {
                let data = self.read_input()?;
                let signature = format.read_from(&mut File::open(self.signature_path())?, &n)?;
                return Ok(owner.client().verify(&data, &signature)?);
            }
            RunMode::Test => return Ok(self.self_test(&owner)?),
        }
        Ok(true)
    }

    /// Pushes a batch of bytes (the input file, or random bytes when reading
    /// stdin) through both file formats and a sign/verify cycle.
    fn self_test(&self, owner: &Owner) -> Result<bool> {
        let n = &owner.public_key().n;
        let data = match self.input.as_str() {
            "stdin" => {
                let mut buf = vec![0u8; 1000];
                random::secure().fill_bytes(&mut buf);
                buf
            }
            _ => self.read_input()?,
        };
        let client = owner.client();
        let encrypted = client.encrypt(&data)?;
        for format in [Format::Binary, Format::Text] {
            let decoded = format.decode(&format.encode(&encrypted, n)?, n)?;
            if decoded != encrypted || owner.decrypt_bytes(&decoded)? != data {
                if !self.silent { println!("Round trip through {:?} format failed", format); }
                return Ok(false);
            }
        }
        let signature = owner.sign(&data)?;
        let mut tampered = data.clone();
        tampered.push(0);
        let pass = client.verify(&data, &signature)? && !client.verify(&tampered, &signature)?;
        if !self.silent { println!("{}", if pass { "Test pass" } else { "Test failed" }); }
        Ok(pass)
    }
}
