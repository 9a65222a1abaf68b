//! Error types shared by every keytree crate.

/// Errors that can occur while generating entropy, encoding mnemonics or
/// deriving extended keys.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Entropy bit length is not a multiple of 32 in `[128, 256]`.
    #[error("invalid entropy length {0} bits, must be 128, 160, 192, 224, or 256")]
    InvalidEntropyLength(usize),

    /// Seed is out of bounds or produces an unusable master scalar.
    #[error("invalid seed: {0}")]
    InvalidSeed(&'static str),

    /// Invalid word count for mnemonic.
    #[error("invalid word count {0}, must be 12, 15, 18, 21, or 24")]
    InvalidWordCount(usize),

    /// Mnemonic word is not in the BIP-39 English word list.
    #[error("word \"{0}\" is not in the BIP-39 word list")]
    UnknownWord(String),

    /// Mnemonic is empty or has leading, trailing or repeated spaces.
    #[error("malformed mnemonic: {0}")]
    MalformedMnemonic(&'static str),

    /// Mnemonic checksum bits do not match its entropy.
    #[error("mnemonic checksum does not match its entropy")]
    MnemonicChecksum,

    /// The child index produced `IL >= n` or a zero key and must be skipped.
    #[error("child index {index} yields an invalid key")]
    InvalidChildIndex {
        /// Raw index that failed.
        index: u32,
    },

    /// Hardened derivation was requested from a public key.
    #[error("cannot derive hardened child {index} from a public key")]
    HardenedKeyFromPublic {
        /// Raw hardened index that was requested.
        index: u32,
    },

    /// Derivation would exceed depth 255.
    #[error("cannot derive a key with more than 255 depth")]
    MaxDepthExceeded,

    /// Derivation path is empty or contains an empty segment.
    #[error("invalid derivation path: {0}")]
    InvalidPath(&'static str),

    /// Derivation path segment is not a decimal index below 2^31.
    #[error("invalid derivation path segment \"{0}\"")]
    InvalidPathSegment(String),

    /// Serialized extended key checksum does not match its payload.
    #[error("checksum mismatch")]
    ChecksumMismatch,

    /// Input has the wrong length.
    #[error("invalid length: expected {expected}, got {actual}")]
    InvalidLength {
        /// Expected length in bytes.
        expected: usize,
        /// Actual length in bytes.
        actual: usize,
    },

    /// Serialized key data is not a valid scalar or curve point.
    #[error("invalid key data: {0}")]
    InvalidKeyData(&'static str),

    /// Version bytes are not one of the known extended key versions.
    #[error("unknown extended key version {0:02x?}")]
    UnknownVersion([u8; 4]),

    /// Version bytes belong to the other key kind.
    #[error("version {0:02x?} does not match the key data kind")]
    VersionMismatch([u8; 4]),

    /// Scalar is zero or not below the curve order.
    #[error("invalid private key")]
    InvalidPrivateKey,

    /// Text is not valid Base58 or hex.
    #[error("invalid encoding")]
    InvalidEncoding,

    /// The operating system random source failed.
    #[error("random source failure: {0}")]
    RandomSource(String),

    /// A cryptographic primitive rejected its input.
    #[error("cryptographic primitive failure")]
    Crypto,
}

/// A convenient Result type alias for keytree operations.
pub type Result<T> = core::result::Result<T, Error>;
