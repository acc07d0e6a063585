//! Pipeline configuration.

use std::path::PathBuf;

use specie_crypto::DEFAULT_KEY_BITS;

/// Where the pipeline keeps its state on disk.
///
/// Everything lives under one data directory: the key pair in `keys/` and
/// the records database at `silo/coins.db`. Constructed by the embedding
/// application and passed to [`crate::Mint::open`].
#[derive(Debug, Clone)]
pub struct MintConfig {
    /// Root directory for keys and the database.
    pub data_dir: PathBuf,
    /// RSA modulus size used if keys must be generated.
    pub key_bits: usize,
}

impl MintConfig {
    /// A configuration rooted at `data_dir` with the default key size.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            key_bits: DEFAULT_KEY_BITS,
        }
    }

    /// Override the key size. Only consulted when generating fresh keys.
    pub fn with_key_bits(mut self, key_bits: usize) -> Self {
        self.key_bits = key_bits;
        self
    }

    /// Directory holding the two key files.
    pub fn key_dir(&self) -> PathBuf {
        self.data_dir.join("keys")
    }

    /// Path of the records database.
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("silo").join("coins.db")
    }
}

impl Default for MintConfig {
    fn default() -> Self {
        Self::new(".")
    }
}
