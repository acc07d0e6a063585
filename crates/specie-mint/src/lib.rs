//! # specie-mint: The Minting Pipeline
//!
//! Orchestrates the full write path,
//! Bound → Validated → Fingerprinted → Sealed → Stored, and the read path,
//! Looked-up → Opened. Stages run strictly in that order; a failure at any
//! stage halts the pipeline with a typed error or a
//! [`specie_schema::ValidationReport`], and nothing reaches storage unless
//! every earlier stage succeeded.
//!
//! The pipeline owns no policy of its own. What a jurisdiction requires
//! lives in `specie-schema`; how payloads are addressed lives in
//! `specie-core`; sealing and persistence live in `specie-crypto` and
//! `specie-store`. This crate wires them together and holds the line on
//! ordering and atomicity.
//!
//! ```no_run
//! use std::collections::BTreeMap;
//! use specie_mint::{Mint, MintConfig, MintOutcome};
//!
//! let mint = Mint::open(MintConfig::default())?;
//! let mut fields = BTreeMap::new();
//! fields.insert("accountHolderName".into(), "Arthur Buliva".into());
//! fields.insert("accountNumber".into(), "12345678900987654321".into());
//! fields.insert("accountHolderAddress".into(), "Hello world".into());
//!
//! match mint.mint("Kenya", &fields)? {
//!     MintOutcome::Minted { storage_key } => {
//!         let coin = mint.show(storage_key.as_str())?;
//!         assert!(coin.is_some());
//!     }
//!     MintOutcome::Rejected(report) => {
//!         for field in report.invalid_fields() {
//!             eprintln!("{}: {:?}", field.name, field.error_message);
//!         }
//!     }
//! }
//! # Ok::<(), specie_mint::MintError>(())
//! ```

pub mod coin;
pub mod config;
pub mod error;
pub mod pipeline;

pub use coin::{StoredCoin, StoredField};
pub use config::MintConfig;
pub use error::MintError;
pub use pipeline::{Mint, MintOutcome};
