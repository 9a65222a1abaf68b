//! The BIP-39 English word list.
//!
//! Words come from the `bip39` crate. The reverse index is built once on
//! first lookup and is read-only afterwards, so lookups are safe from any
//! thread.

use std::collections::HashMap;
use std::sync::OnceLock;

use bip39::Language;

/// Number of words in the list; every word encodes 11 bits.
pub const WORDLIST_LEN: usize = 2048;

static INDEX: OnceLock<HashMap<&'static str, u16>> = OnceLock::new();

/// All 2048 words in index order.
#[inline]
pub fn words() -> &'static [&'static str; WORDLIST_LEN] {
    Language::English.word_list()
}

/// Word at `index`, if `index < 2048`.
#[inline]
pub fn word(index: u16) -> Option<&'static str> {
    words().get(usize::from(index)).copied()
}

/// Index of `word`. Matching is exact and case-sensitive.
pub fn index_of(word: &str) -> Option<u16> {
    index().get(word).copied()
}

fn index() -> &'static HashMap<&'static str, u16> {
    INDEX.get_or_init(|| {
        words()
            .iter()
            .enumerate()
            .map(|(i, w)| (*w, i as u16))
            .collect()
    })
}
