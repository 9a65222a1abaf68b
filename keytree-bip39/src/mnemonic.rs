//! Entropy ⇄ mnemonic encoding and mnemonic → seed stretching.

use core::fmt;
use core::str::FromStr;

use keytree::hash::{pbkdf2_hmac_sha512, sha256};
use keytree::rand_core::{CryptoRng, RngCore};
use keytree::{Entropy, Error, Result};
use unicode_normalization::UnicodeNormalization;
use zeroize::Zeroizing;

use crate::wordlist;

/// Seed length in bytes.
pub const SEED_LEN: usize = 64;

/// PBKDF2 iteration count for seed derivation.
pub const PBKDF2_ROUNDS: u32 = 2048;

/// Supported mnemonic lengths.
pub const WORD_COUNTS: [usize; 5] = [12, 15, 18, 21, 24];

const SALT_PREFIX: &str = "mnemonic";
const BITS_PER_WORD: usize = 11;

/// A validated BIP-39 mnemonic together with the entropy it encodes.
///
/// The phrase is always single-space separated lowercase words. Both the
/// phrase and the entropy are zeroized on drop.
#[derive(Clone)]
pub struct Mnemonic {
    phrase: Zeroizing<String>,
    entropy: Entropy,
}

impl Mnemonic {
    /// Generate a fresh mnemonic with `word_count` words from the OS random
    /// source.
    #[cfg(feature = "rand")]
    pub fn generate(word_count: usize) -> Result<Self> {
        let entropy = Entropy::generate(entropy_bits(word_count)?)?;
        Ok(entropy_to_mnemonic(&entropy))
    }

    /// Generate a fresh mnemonic with `word_count` words from `rng`.
    pub fn generate_with<R: RngCore + CryptoRng>(rng: &mut R, word_count: usize) -> Result<Self> {
        let entropy = Entropy::generate_with(rng, entropy_bits(word_count)?)?;
        Ok(entropy_to_mnemonic(&entropy))
    }

    /// Encode existing entropy.
    pub fn from_entropy(entropy: &Entropy) -> Self {
        entropy_to_mnemonic(entropy)
    }

    /// Parse and fully validate a phrase, checksum included.
    pub fn parse(phrase: &str) -> Result<Self> {
        let indices = word_indices(phrase)?;
        let entropy = decode(&indices)?;
        Ok(Self {
            phrase: Zeroizing::new(phrase.to_owned()),
            entropy,
        })
    }

    /// The phrase, words separated by single spaces.
    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    /// Iterate over the words.
    pub fn words(&self) -> impl Iterator<Item = &str> + '_ {
        self.phrase.split(' ')
    }

    /// Number of words.
    pub fn word_count(&self) -> usize {
        self.entropy.word_count()
    }

    /// The entropy this mnemonic encodes.
    pub fn to_entropy(&self) -> &Entropy {
        &self.entropy
    }

    /// Stretch the phrase and `passphrase` into a 64-byte seed.
    pub fn to_seed(&self, passphrase: &str) -> Result<Zeroizing<[u8; SEED_LEN]>> {
        mnemonic_to_seed(&self.phrase, passphrase)
    }
}

impl FromStr for Mnemonic {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl PartialEq for Mnemonic {
    fn eq(&self, other: &Self) -> bool {
        self.phrase == other.phrase
    }
}

impl Eq for Mnemonic {}

impl fmt::Debug for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mnemonic({} words)", self.word_count())
    }
}

/// Encode entropy as a mnemonic.
///
/// The entropy bits are followed by the first `bit_len / 32` bits of its
/// SHA-256 and the result is cut MSB-first into 11-bit word indices.
pub fn entropy_to_mnemonic(entropy: &Entropy) -> Mnemonic {
    let bytes = entropy.as_bytes();
    let checksum = sha256(bytes)[0];
    let bit = |pos: usize| {
        let byte = bytes.get(pos / 8).copied().unwrap_or(checksum);
        (byte >> (7 - pos % 8)) & 1
    };

    let word_count = entropy.word_count();
    let mut phrase = Zeroizing::new(String::with_capacity(word_count * 9));
    for i in 0..word_count {
        let index = (0..BITS_PER_WORD).fold(0u16, |acc, b| {
            (acc << 1) | u16::from(bit(i * BITS_PER_WORD + b))
        });
        if i > 0 {
            phrase.push(' ');
        }
        // 11-bit values always index into the 2048-word list
        phrase.push_str(wordlist::words()[usize::from(index)]);
    }

    tracing::debug!(words = word_count, "encoded mnemonic");
    Mnemonic {
        phrase,
        entropy: entropy.clone(),
    }
}

/// Derive the 64-byte seed for `phrase` and `passphrase`.
///
/// The phrase must be well formed (single spaces, no leading or trailing
/// space), have a supported word count and consist of list words. The
/// checksum is not verified, use [`validate`] or [`Mnemonic::parse`] for
/// that. The passphrase is NFKD-normalized and may be empty.
pub fn mnemonic_to_seed(phrase: &str, passphrase: &str) -> Result<Zeroizing<[u8; SEED_LEN]>> {
    word_indices(phrase)?;

    let mut salt = Zeroizing::new(String::from(SALT_PREFIX));
    salt.extend(passphrase.nfkd());

    let seed = Zeroizing::new(pbkdf2_hmac_sha512(
        phrase.as_bytes(),
        salt.as_bytes(),
        PBKDF2_ROUNDS,
    ));
    tracing::debug!(rounds = PBKDF2_ROUNDS, "derived seed from mnemonic");
    Ok(seed)
}

/// Check that `phrase` is a valid mnemonic, checksum included.
pub fn validate(phrase: &str) -> Result<()> {
    Mnemonic::parse(phrase).map(|_| ())
}

fn entropy_bits(word_count: usize) -> Result<usize> {
    if !WORD_COUNTS.contains(&word_count) {
        return Err(Error::InvalidWordCount(word_count));
    }
    Ok(word_count * BITS_PER_WORD * 32 / 33)
}

/// Validate the phrase shape and map each word to its index.
fn word_indices(phrase: &str) -> Result<Vec<u16>> {
    if phrase.is_empty() {
        return Err(Error::MalformedMnemonic("empty phrase"));
    }
    if phrase.starts_with(' ') || phrase.ends_with(' ') {
        return Err(Error::MalformedMnemonic("leading or trailing space"));
    }
    if phrase.contains("  ") {
        return Err(Error::MalformedMnemonic("consecutive spaces"));
    }

    let words: Vec<&str> = phrase.split(' ').collect();
    entropy_bits(words.len())?;

    words
        .iter()
        .map(|w| wordlist::index_of(w).ok_or_else(|| Error::UnknownWord((*w).to_owned())))
        .collect()
}

/// Unpack word indices into entropy and verify the trailing checksum.
fn decode(indices: &[u16]) -> Result<Entropy> {
    let total_bits = indices.len() * BITS_PER_WORD;
    let checksum_bits = total_bits / 33;
    let entropy_len = (total_bits - checksum_bits) / 8;

    // entropy bytes plus one byte holding the checksum bits, MSB-aligned
    let mut bytes = Zeroizing::new(vec![0u8; entropy_len + 1]);
    for (i, &index) in indices.iter().enumerate() {
        for b in 0..BITS_PER_WORD {
            if (index >> (BITS_PER_WORD - 1 - b)) & 1 == 1 {
                let pos = i * BITS_PER_WORD + b;
                bytes[pos / 8] |= 0x80 >> (pos % 8);
            }
        }
    }

    let expected = sha256(&bytes[..entropy_len])[0] >> (8 - checksum_bits);
    let actual = bytes[entropy_len] >> (8 - checksum_bits);
    if expected != actual {
        tracing::debug!("mnemonic checksum mismatch");
        return Err(Error::MnemonicChecksum);
    }
    Entropy::from_bytes(&bytes[..entropy_len])
}
