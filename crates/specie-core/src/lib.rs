//! # specie-core: Foundational Types for Specie
//!
//! This crate is the bedrock of the Specie workspace. It defines the
//! primitives every other crate builds on and depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **`CanonicalBytes` newtype.** All fingerprint computation flows through
//!    `CanonicalBytes::new()`. No raw `serde_json::to_vec()` for digests,
//!    ever. Two call sites serializing "the same" value differently would
//!    silently mint two coins for one submission.
//!
//! 2. **`fingerprint()` accepts only canonical input.** The storage key is
//!    derived from a sorted field list and the jurisdiction identity through
//!    one function, so key stability is a property of the type system rather
//!    than of caller discipline.
//!
//! 3. **Typed field values.** A validator produces a `FieldValue` with
//!    explicit optional attributes, not a bag of casts.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `specie-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug` and `Clone`, and implement
//!   `Serialize`/`Deserialize` where they cross a boundary.

pub mod canonical;
pub mod error;
pub mod field;
pub mod fingerprint;
pub mod identity;
pub mod trivial;

// Re-export primary types for ergonomic imports.
pub use canonical::CanonicalBytes;
pub use error::CanonicalizationError;
pub use field::{FieldDefinition, FieldRole, FieldValue};
pub use fingerprint::{fingerprint, FingerprintField, StorageKey};
pub use identity::JurisdictionIdentity;
pub use trivial::is_trivial;
