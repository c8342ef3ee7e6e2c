use std::path::{Path, PathBuf};
use crate::rsa::error::{Result, RsaError};
use crate::rsa::keys::{KeyData, KeyKind, PrivateKey, PublicKey};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPair {
    pub public: PublicKey,
    pub private: PrivateKey,
}

/// Private key at `path`, public key at `path.pub`
pub fn key_paths<P: AsRef<Path>>(path: P) -> (PathBuf, PathBuf) {
    let private = path.as_ref().to_path_buf();
    let mut public = private.clone().into_os_string();
    public.push(".pub");
    (private, PathBuf::from(public))
}

impl KeyPair {
    pub fn new(public: PublicKey, private: PrivateKey) -> Result<Self> {
        if public.n != private.n {
            return Err(RsaError::KeyFormat("public and private moduli differ".to_string()));
        }
        Ok(Self { public, private })
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let (path_private, path_public) = key_paths(path);
        KeyData::from_private(&self.private).save(path_private)?;
        KeyData::from_public(&self.public).save(path_public)?;
        Ok(())
    }

    /// Fails with `KeyNotFound` only when neither file exists. A lone file
    /// means the pair was damaged and is reported as `KeyFormat`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let (path_private, path_public) = key_paths(path);
        let private = KeyData::load(&path_private, KeyKind::Private);
        let public = KeyData::load(&path_public, KeyKind::Public);
        match (private, public) {
            (Err(RsaError::KeyNotFound(_)), Err(RsaError::KeyNotFound(_))) => Err(RsaError::KeyNotFound(path_private)),
            (Err(RsaError::KeyNotFound(p)), _) | (_, Err(RsaError::KeyNotFound(p))) => {
                Err(RsaError::KeyFormat(format!("incomplete key pair, {} is missing", p.display())))
            }
            (private, public) => KeyPair::new(public?.to_public()?, private?.to_private()?),
        }
    }

    /// Removes both key files, missing files are ignored
    pub fn delete<P: AsRef<Path>>(path: P) -> Result<()> {
        let (path_private, path_public) = key_paths(path);
        for p in [path_private, path_public] {
            match std::fs::remove_file(&p) {
                Err(e) if e.kind() != std::io::ErrorKind::NotFound => return Err(RsaError::Io(e)),
                _ => {}
            }
        }
        Ok(())
    }
}
