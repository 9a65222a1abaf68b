//! Validated mnemonic entropy.

use rand_core::{CryptoRng, RngCore};
use zeroize::Zeroizing;

use crate::error::{Error, Result};

/// Smallest supported entropy size in bits.
pub const MIN_BITS: usize = 128;
/// Largest supported entropy size in bits.
pub const MAX_BITS: usize = 256;

/// Check that `bit_len` is a multiple of 32 in `[128, 256]`.
pub fn validate_bit_len(bit_len: usize) -> Result<()> {
    if bit_len % 32 != 0 || bit_len < MIN_BITS || bit_len > MAX_BITS {
        return Err(Error::InvalidEntropyLength(bit_len));
    }
    Ok(())
}

/// Random bytes backing a mnemonic. Zeroized on drop.
#[derive(Clone)]
pub struct Entropy {
    bytes: Zeroizing<Vec<u8>>,
}

impl Entropy {
    /// Generate `bit_len` bits from the operating system CSPRNG.
    ///
    /// A failing random source is reported as [`Error::RandomSource`] and is
    /// never retried.
    #[cfg(feature = "rand")]
    pub fn generate(bit_len: usize) -> Result<Self> {
        Self::generate_with(&mut rand_core::OsRng, bit_len)
    }

    /// Generate `bit_len` bits from the given generator.
    pub fn generate_with<R: RngCore + CryptoRng>(rng: &mut R, bit_len: usize) -> Result<Self> {
        validate_bit_len(bit_len)?;
        let mut bytes = Zeroizing::new(vec![0u8; bit_len / 8]);
        rng.try_fill_bytes(&mut bytes)
            .map_err(|e| Error::RandomSource(e.to_string()))?;
        Ok(Self { bytes })
    }

    /// Wrap caller-supplied entropy, validating its length.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        validate_bit_len(bytes.len() * 8)?;
        Ok(Self {
            bytes: Zeroizing::new(bytes.to_vec()),
        })
    }

    /// Raw entropy bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Entropy size in bits.
    pub fn bit_len(&self) -> usize {
        self.bytes.len() * 8
    }

    /// Number of SHA-256 bits appended as the mnemonic checksum.
    pub fn checksum_bits(&self) -> usize {
        self.bit_len() / 32
    }

    /// Number of words in the mnemonic encoding of this entropy.
    pub fn word_count(&self) -> usize {
        (self.bit_len() + self.checksum_bits()) / 11
    }
}

impl core::fmt::Debug for Entropy {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Entropy({} bits)", self.bit_len())
    }
}
