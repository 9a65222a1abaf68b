//! # keytree-bip39 - BIP-39 Mnemonic Codec
//!
//! Turns entropy into a checksummed English word sequence and a mnemonic
//! plus passphrase into the 64-byte seed consumed by BIP-32.
//!
//! # Usage
//!
//! ```
//! use keytree::Entropy;
//! use keytree_bip39::{entropy_to_mnemonic, Mnemonic};
//!
//! let entropy = Entropy::from_bytes(&[0u8; 16]).unwrap();
//! let mnemonic = entropy_to_mnemonic(&entropy);
//! assert!(mnemonic.phrase().ends_with("abandon about"));
//!
//! let parsed: Mnemonic = mnemonic.phrase().parse().unwrap();
//! let seed = parsed.to_seed("TREZOR").unwrap();
//! assert_eq!(seed.len(), 64);
//! ```
//!
//! # Features
//!
//! - `rand` (default): [`Mnemonic::generate`] backed by the OS random source

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
    clippy::cast_possible_truncation
)]
#![forbid(unsafe_code)]

mod mnemonic;
pub mod wordlist;

pub use mnemonic::{
    entropy_to_mnemonic, mnemonic_to_seed, validate, Mnemonic, PBKDF2_ROUNDS, SEED_LEN,
    WORD_COUNTS,
};

pub use keytree::{Entropy, Error, Result};
