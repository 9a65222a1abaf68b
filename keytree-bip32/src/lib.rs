//! # keytree-bip32 - BIP-32 Extended Keys
//!
//! Master key generation, private and public child derivation, path
//! derivation and the 82-byte / Base58Check serialization of extended
//! keys, plus an [`HdWallet`] facade for BIP-44 accounts.
//!
//! # Usage
//!
//! ```
//! use keytree::Network;
//! use keytree_bip32::{ExtendedKey, HdWallet};
//!
//! let phrase = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
//! let wallet = HdWallet::from_phrase(phrase, None, Network::Mainnet).unwrap();
//!
//! let xpub = wallet.account_xpub(0).unwrap();
//! let receive = xpub.derive_path_str("0/0").unwrap();
//! assert_eq!(receive, wallet.derive_bip44(0, false, 0).unwrap().to_public());
//!
//! let decoded: ExtendedKey = xpub.to_string().parse().unwrap();
//! assert_eq!(decoded, ExtendedKey::Public(xpub));
//! ```
//!
//! # Features
//!
//! - `rand` (default): [`HdWallet::generate`] from a fresh random mnemonic

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
    clippy::missing_const_for_fn
)]
#![forbid(unsafe_code)]

mod attrs;
mod encoding;
mod extended_key;
mod wallet;
mod xpub;

pub use attrs::ExtendedKeyAttrs;
pub use encoding::{ExtendedKey, KEY_LEN};
pub use extended_key::{ExtendedPrivateKey, MAX_SEED_LEN};
pub use wallet::HdWallet;
pub use xpub::ExtendedPublicKey;

pub use keytree::{ChildIndex, DerivationPath, Error, KeyKind, Network, Result};
