pub mod rsa;

pub use crate::rsa::*;
pub use crate::rsa::config::{Config, CONFIG_DEF, SILENT};
pub use crate::rsa::error::RsaError;
pub use crate::rsa::keys::{KeyGenerator, KeyPair, PrivateKey, PublicKey};

#[cfg(test)]
pub(crate) mod test_util {
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static COUNTER: AtomicUsize = AtomicUsize::new(0);

    /// Key path inside a fresh directory, unique per call
    pub fn temp_key_path(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "custom-rsa-{}-{}-{}",
            std::process::id(),
            name,
            COUNTER.fetch_add(1, Ordering::SeqCst)
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir.join("key")
    }
}
