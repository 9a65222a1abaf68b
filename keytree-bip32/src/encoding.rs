//! The 82-byte extended key serialization and its Base58Check text form.
//!
//! ```text
//! version(4) | depth(1) | parent fingerprint(4) | child index(4, BE)
//!   | chain code(32) | key data(33) | checksum(4)
//! ```
//!
//! Key data is `0x00 || scalar` for private keys and the compressed point for
//! public keys. The checksum is the first 4 bytes of the double SHA-256 of
//! the first 78 bytes.

use core::fmt;
use core::str::FromStr;

use keytree::hash::double_sha256;
use keytree::{Error, KeyKind, Network, Result};
use zeroize::Zeroizing;

use crate::attrs::ExtendedKeyAttrs;
use crate::extended_key::ExtendedPrivateKey;
use crate::xpub::ExtendedPublicKey;

/// Length of a serialized extended key, checksum included.
pub const KEY_LEN: usize = 82;

const PAYLOAD_LEN: usize = 78;
const KEY_DATA_OFFSET: usize = 45;

/// Decoded fields of a serialized extended key.
pub(crate) struct RawKey {
    pub(crate) network: Network,
    pub(crate) kind: KeyKind,
    pub(crate) attrs: ExtendedKeyAttrs,
    pub(crate) key_data: Zeroizing<[u8; 33]>,
}

/// Serialize key fields and append the checksum.
pub(crate) fn encode(
    version: [u8; 4],
    attrs: &ExtendedKeyAttrs,
    key_data: &[u8; 33],
) -> Zeroizing<[u8; KEY_LEN]> {
    let mut out = Zeroizing::new([0u8; KEY_LEN]);
    out[..4].copy_from_slice(&version);
    out[4] = attrs.depth;
    out[5..9].copy_from_slice(&attrs.parent_fingerprint);
    out[9..13].copy_from_slice(&attrs.child_index.to_be_bytes());
    out[13..KEY_DATA_OFFSET].copy_from_slice(&attrs.chain_code);
    out[KEY_DATA_OFFSET..PAYLOAD_LEN].copy_from_slice(key_data);
    let checksum = double_sha256(&out[..PAYLOAD_LEN]);
    out[PAYLOAD_LEN..].copy_from_slice(&checksum[..4]);
    out
}

/// Check length, checksum, version and the master-key invariant.
///
/// Scalar and point validity are left to the key constructors.
pub(crate) fn decode(bytes: &[u8]) -> Result<RawKey> {
    if bytes.len() != KEY_LEN {
        return Err(Error::InvalidLength {
            expected: KEY_LEN,
            actual: bytes.len(),
        });
    }
    let checksum = double_sha256(&bytes[..PAYLOAD_LEN]);
    if bytes[PAYLOAD_LEN..] != checksum[..4] {
        return Err(Error::ChecksumMismatch);
    }

    let mut version = [0u8; 4];
    version.copy_from_slice(&bytes[..4]);
    let (network, kind) = Network::from_version(version).ok_or(Error::UnknownVersion(version))?;

    let data_kind = match bytes[KEY_DATA_OFFSET] {
        0x00 => KeyKind::Private,
        0x02 | 0x03 => KeyKind::Public,
        _ => return Err(Error::InvalidKeyData("unknown key data prefix")),
    };
    if data_kind != kind {
        return Err(Error::VersionMismatch(version));
    }

    let mut parent_fingerprint = [0u8; 4];
    parent_fingerprint.copy_from_slice(&bytes[5..9]);
    let mut index = [0u8; 4];
    index.copy_from_slice(&bytes[9..13]);
    let mut chain_code = [0u8; 32];
    chain_code.copy_from_slice(&bytes[13..KEY_DATA_OFFSET]);
    let attrs = ExtendedKeyAttrs {
        depth: bytes[4],
        parent_fingerprint,
        child_index: u32::from_be_bytes(index),
        chain_code,
    };
    if attrs.depth == 0 && (attrs.parent_fingerprint != [0; 4] || attrs.child_index != 0) {
        return Err(Error::InvalidKeyData(
            "master key with non-zero parent fingerprint or child index",
        ));
    }

    let mut key_data = Zeroizing::new([0u8; 33]);
    key_data.copy_from_slice(&bytes[KEY_DATA_OFFSET..PAYLOAD_LEN]);
    Ok(RawKey {
        network,
        kind,
        attrs,
        key_data,
    })
}

/// Base58 text of a serialized key.
pub(crate) fn to_base58(bytes: &[u8; KEY_LEN]) -> Zeroizing<String> {
    Zeroizing::new(bs58::encode(bytes).into_string())
}

/// Bytes of a Base58 string. Checksum verification happens in [`decode`].
pub(crate) fn from_base58(s: &str) -> Result<Zeroizing<Vec<u8>>> {
    bs58::decode(s)
        .into_vec()
        .map(Zeroizing::new)
        .map_err(|_| Error::InvalidEncoding)
}

/// Bytes of a hex string.
pub(crate) fn from_hex(s: &str) -> Result<Zeroizing<Vec<u8>>> {
    hex::decode(s)
        .map(Zeroizing::new)
        .map_err(|_| Error::InvalidEncoding)
}

/// An extended key of either kind, as found in serialized form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExtendedKey {
    /// `xprv` / `tprv`.
    Private(ExtendedPrivateKey),
    /// `xpub` / `tpub`.
    Public(ExtendedPublicKey),
}

impl ExtendedKey {
    /// Decode 82 bytes, dispatching on the key data prefix.
    pub fn deserialize(bytes: &[u8]) -> Result<Self> {
        let raw = decode(bytes)?;
        match raw.kind {
            KeyKind::Private => ExtendedPrivateKey::from_raw(&raw).map(Self::Private),
            KeyKind::Public => ExtendedPublicKey::from_raw(&raw).map(Self::Public),
        }
    }

    /// Decode a hex string of the 82-byte serialization.
    pub fn from_hex(s: &str) -> Result<Self> {
        Self::deserialize(&from_hex(s)?)
    }

    /// The 82-byte serialization.
    pub fn serialize(&self) -> Zeroizing<[u8; KEY_LEN]> {
        match self {
            Self::Private(key) => key.serialize(),
            Self::Public(key) => Zeroizing::new(key.serialize()),
        }
    }

    /// Which kind of key this is.
    pub fn kind(&self) -> KeyKind {
        match self {
            Self::Private(_) => KeyKind::Private,
            Self::Public(_) => KeyKind::Public,
        }
    }

    /// Network the key belongs to.
    pub fn network(&self) -> Network {
        match self {
            Self::Private(key) => key.network(),
            Self::Public(key) => key.network(),
        }
    }

    /// Tree position and chain code.
    pub fn attrs(&self) -> &ExtendedKeyAttrs {
        match self {
            Self::Private(key) => key.attrs(),
            Self::Public(key) => key.attrs(),
        }
    }

    /// The public half, neutering a private key.
    pub fn to_public(&self) -> ExtendedPublicKey {
        match self {
            Self::Private(key) => key.to_public(),
            Self::Public(key) => key.clone(),
        }
    }

    /// Derive a child; hardened indices need a private key.
    pub fn derive_child(&self, index: u32) -> Result<Self> {
        match self {
            Self::Private(key) => key.derive_child(index).map(Self::Private),
            Self::Public(key) => key.derive_child(index).map(Self::Public),
        }
    }
}

impl From<ExtendedPrivateKey> for ExtendedKey {
    fn from(key: ExtendedPrivateKey) -> Self {
        Self::Private(key)
    }
}

impl From<ExtendedPublicKey> for ExtendedKey {
    fn from(key: ExtendedPublicKey) -> Self {
        Self::Public(key)
    }
}

impl FromStr for ExtendedKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::deserialize(&from_base58(s)?)
    }
}

impl fmt::Display for ExtendedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Private(key) => fmt::Display::fmt(key, f),
            Self::Public(key) => fmt::Display::fmt(key, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_attrs() -> ExtendedKeyAttrs {
        ExtendedKeyAttrs {
            depth: 3,
            parent_fingerprint: [0xde, 0xad, 0xbe, 0xef],
            child_index: 0x8000_0002,
            chain_code: [0x11; 32],
        }
    }

    fn sample_point() -> [u8; 33] {
        hex_literal::hex!("0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798")
    }

    #[test]
    fn layout() {
        let bytes = encode(Network::MAINNET_PUBLIC, &sample_attrs(), &sample_point());
        assert_eq!(bytes[..4], Network::MAINNET_PUBLIC);
        assert_eq!(bytes[4], 3);
        assert_eq!(bytes[5..9], [0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(bytes[9..13], [0x80, 0, 0, 2]);
        assert_eq!(bytes[13..45], [0x11; 32]);
        assert_eq!(bytes[45..78], sample_point());
        assert_eq!(bytes[78..], double_sha256(&bytes[..78])[..4]);
    }

    #[test]
    fn decode_reads_back_fields() {
        let bytes = encode(Network::TESTNET_PUBLIC, &sample_attrs(), &sample_point());
        let raw = decode(&*bytes).unwrap();
        assert_eq!(raw.network, Network::Testnet);
        assert_eq!(raw.kind, KeyKind::Public);
        assert_eq!(raw.attrs, sample_attrs());
        assert_eq!(*raw.key_data, sample_point());
    }

    #[test]
    fn decode_rejects_wrong_length() {
        let bytes = encode(Network::MAINNET_PUBLIC, &sample_attrs(), &sample_point());
        assert!(matches!(
            decode(&bytes[..81]),
            Err(Error::InvalidLength { expected: 82, actual: 81 })
        ));
    }

    #[test]
    fn decode_rejects_bad_checksum() {
        let mut bytes = encode(Network::MAINNET_PUBLIC, &sample_attrs(), &sample_point());
        bytes[81] ^= 0x01;
        assert!(matches!(decode(&*bytes), Err(Error::ChecksumMismatch)));
    }

    #[test]
    fn decode_rejects_unknown_version() {
        let bytes = encode([1, 2, 3, 4], &sample_attrs(), &sample_point());
        assert!(matches!(
            decode(&*bytes),
            Err(Error::UnknownVersion([1, 2, 3, 4]))
        ));
    }

    #[test]
    fn decode_rejects_kind_mismatch() {
        let bytes = encode(Network::MAINNET_PRIVATE, &sample_attrs(), &sample_point());
        assert!(matches!(decode(&*bytes), Err(Error::VersionMismatch(_))));
    }

    #[test]
    fn decode_rejects_unknown_prefix() {
        let mut point = sample_point();
        point[0] = 0x04;
        let bytes = encode(Network::MAINNET_PUBLIC, &sample_attrs(), &point);
        assert!(matches!(decode(&*bytes), Err(Error::InvalidKeyData(_))));
    }

    #[test]
    fn decode_enforces_master_invariant() {
        let mut attrs = sample_attrs();
        attrs.depth = 0;
        let bytes = encode(Network::MAINNET_PUBLIC, &attrs, &sample_point());
        assert!(matches!(decode(&*bytes), Err(Error::InvalidKeyData(_))));

        let bytes = encode(
            Network::MAINNET_PUBLIC,
            &ExtendedKeyAttrs::master([0x11; 32]),
            &sample_point(),
        );
        assert!(decode(&*bytes).is_ok());
    }

    #[test]
    fn base58_rejects_garbage() {
        assert!(matches!(from_base58("0OIl"), Err(Error::InvalidEncoding)));
        assert!(matches!(
            "xpub".parse::<ExtendedKey>(),
            Err(Error::InvalidLength { .. })
        ));
    }
}
