//! # specie-crypto: Key Provisioning and Payload Sealing
//!
//! Two components:
//!
//! - [`KeyManager`]: owns the on-disk RSA key pair. Constructed once at
//!   process start and injected; the pair is loaded (or generated and
//!   persisted) lazily on first use behind a mutex, so concurrent first
//!   callers cannot race to overwrite key files. After provisioning the
//!   files are only ever read.
//! - [`CryptoBox`]: seals plaintext with the *private* key and opens
//!   ciphertext with the *public* key. The direction is intentional and
//!   load-bearing for compatibility with existing stores; see DESIGN.md
//!   before changing it.
//!
//! ## Crate Policy
//!
//! - Key material is never serialized, logged, or exposed beyond the
//!   returned handles.
//! - No mocking of cryptographic operations in tests; tests use real keys
//!   (small moduli) and real cipher runs.
//! - All failures surface as [`CryptoError`]. No operation ever substitutes
//!   default plaintext for a failed open.

pub mod error;
pub mod keys;
pub mod seal;

pub use error::CryptoError;
pub use keys::{KeyManager, KeyPair, DEFAULT_KEY_BITS, PRIVATE_KEY_FILE, PUBLIC_KEY_FILE};
pub use seal::{open, seal, CryptoBox};
