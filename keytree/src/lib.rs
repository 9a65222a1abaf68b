//! # keytree - Hierarchical Deterministic Key Primitives
//!
//! The foundation shared by the `keytree-bip39` and `keytree-bip32` crates:
//! hashing, secp256k1 scalar and point arithmetic, entropy generation,
//! derivation-path parsing and the BIP-44 numbering conventions.
//!
//! ## Features
//!
//! - **Bit-exact**: Interoperates with every BIP-32/39/44 implementation
//! - **Constant-time curve math**: All scalar work goes through `k256`
//! - **Secret hygiene**: Entropy and intermediate secrets zeroize on drop
//!
//! ## Cargo features
//!
//! - `rand` (default): OS-backed [`Entropy::generate`]

#![warn(
    missing_docs,
    rust_2018_idioms,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::doc_markdown,
    clippy::missing_const_for_fn,
    clippy::cast_possible_truncation,
    clippy::unreadable_literal
)]
#![forbid(unsafe_code)]

pub mod bip44;
pub mod curve;
pub mod entropy;
pub mod error;
pub mod hash;
pub mod hdpath;

pub use bip44::{CoinType, KeyKind, Network, Purpose};
pub use entropy::Entropy;
pub use error::{Error, Result};
pub use hdpath::{ChildIndex, DerivationPath};

// Re-export rand_core so downstream RNG bounds resolve to the same trait versions
pub use rand_core;
