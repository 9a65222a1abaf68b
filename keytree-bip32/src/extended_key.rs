//! BIP-32 extended private keys.

use core::fmt;
use core::str::FromStr;

use k256::SecretKey;
use keytree::{curve, hash, ChildIndex, DerivationPath, Error, KeyKind, Network, Result};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, Zeroizing};

use crate::attrs::ExtendedKeyAttrs;
use crate::encoding::{self, RawKey, KEY_LEN};
use crate::xpub::ExtendedPublicKey;

/// HMAC key for master key generation.
const MASTER_KEY: &[u8] = b"Bitcoin seed";

/// Largest accepted seed in bytes.
pub const MAX_SEED_LEN: usize = 64;

/// BIP-32 extended private key.
///
/// Keys are immutable; derivation returns a new key and never touches the
/// parent. The scalar is held once, inside a [`SecretKey`] that zeroizes
/// itself on drop.
#[derive(Clone)]
pub struct ExtendedPrivateKey {
    secret_key: SecretKey,
    /// Compressed public point, cached for fingerprints and normal derivation.
    point: [u8; 33],
    attrs: ExtendedKeyAttrs,
    network: Network,
}

impl ExtendedPrivateKey {
    /// Create the master key for `seed`.
    ///
    /// `I = HMAC-SHA512("Bitcoin seed", seed)`, the left half is the master
    /// scalar and the right half the chain code.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidSeed`] if the seed is longer than 64 bytes, or if the
    /// master scalar is zero or not below the curve order.
    pub fn new_master(seed: &[u8], network: Network) -> Result<Self> {
        if seed.len() > MAX_SEED_LEN {
            return Err(Error::InvalidSeed("seed must be at most 64 bytes"));
        }

        let i = Zeroizing::new(hash::hmac_sha512(MASTER_KEY, seed)?);
        let (il, chain_code) = split(&i);
        let secret_key = curve::parse_secret_key(&il).ok_or(Error::InvalidSeed(
            "master scalar is zero or not below the curve order",
        ))?;

        tracing::debug!(%network, "created master key");
        Self::from_secret(secret_key, ExtendedKeyAttrs::master(chain_code), network)
    }

    /// Derive the child at raw `index`; indices `>= 2^31` are hardened.
    ///
    /// # Errors
    ///
    /// - [`Error::MaxDepthExceeded`] at depth 255, whatever the index.
    /// - [`Error::InvalidChildIndex`] if `IL >= n` or the child scalar is
    ///   zero. The caller picks another index, see
    ///   [`next_valid_child`](Self::next_valid_child).
    pub fn derive_child(&self, index: u32) -> Result<Self> {
        if self.attrs.depth == u8::MAX {
            return Err(Error::MaxDepthExceeded);
        }
        let hardened = ChildIndex::from(index).is_hardened();

        let mut data = Zeroizing::new([0u8; 37]);
        if hardened {
            data[1..33].copy_from_slice(&*self.secret_bytes());
        } else {
            data[..33].copy_from_slice(&self.point);
        }
        data[33..].copy_from_slice(&index.to_be_bytes());

        let i = Zeroizing::new(hash::hmac_sha512(&self.attrs.chain_code, &*data)?);
        let (il, chain_code) = split(&i);
        if curve::parse_scalar(&il).is_none() {
            tracing::warn!(index, "IL is not below the curve order, skip this index");
            return Err(Error::InvalidChildIndex { index });
        }

        let child = Zeroizing::new(curve::add_mod_n(&il, &self.secret_bytes()));
        let Some(secret_key) = curve::parse_secret_key(&child) else {
            tracing::warn!(index, "child scalar is zero, skip this index");
            return Err(Error::InvalidChildIndex { index });
        };

        let attrs = self.attrs.child(&self.point, index, chain_code);
        tracing::debug!(depth = attrs.depth, index, hardened, "derived private child key");
        Self::from_secret(secret_key, attrs, self.network)
    }

    /// Derive the first valid child at or after `start`, returning the index
    /// that produced it.
    ///
    /// The search stays on the side of the hardened boundary `start` is on.
    pub fn next_valid_child(&self, start: u32) -> Result<(u32, Self)> {
        let hardened = ChildIndex::from(start).is_hardened();
        let mut index = start;
        loop {
            match self.derive_child(index) {
                Ok(child) => return Ok((index, child)),
                Err(Error::InvalidChildIndex { .. }) => {
                    index = index
                        .checked_add(1)
                        .filter(|next| ChildIndex::from(*next).is_hardened() == hardened)
                        .ok_or(Error::InvalidChildIndex { index })?;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Apply each step of `path` in order. The empty path yields a copy of
    /// this key; the first failing step aborts with its error.
    pub fn derive_path(&self, path: &DerivationPath) -> Result<Self> {
        self.derive_indices(&path.to_u32_vec())
    }

    /// Parse `path` (e.g. `"m/44'/0'/0'/0/0"` or `"0/1"`) and derive it.
    pub fn derive_path_str(&self, path: &str) -> Result<Self> {
        self.derive_path(&path.parse()?)
    }

    /// Derive a sequence of raw indices.
    pub fn derive_indices(&self, indices: &[u32]) -> Result<Self> {
        indices
            .iter()
            .try_fold(self.clone(), |key, &index| key.derive_child(index))
    }

    /// The public half, with the same tree position and chain code.
    pub fn to_public(&self) -> ExtendedPublicKey {
        ExtendedPublicKey::from_parts(
            curve::public_key(&self.secret_key),
            self.point,
            self.attrs,
            self.network,
        )
    }

    /// Serialize to the 82-byte form with key data `0x00 || scalar`.
    pub fn serialize(&self) -> Zeroizing<[u8; KEY_LEN]> {
        let mut key_data = Zeroizing::new([0u8; 33]);
        key_data[1..].copy_from_slice(&*self.secret_bytes());
        encoding::encode(self.version(), &self.attrs, &key_data)
    }

    /// Decode an 82-byte private extended key.
    pub fn deserialize(bytes: &[u8]) -> Result<Self> {
        Self::from_raw(&encoding::decode(bytes)?)
    }

    /// Decode a hex string of the 82-byte form.
    pub fn from_hex(s: &str) -> Result<Self> {
        Self::deserialize(&encoding::from_hex(s)?)
    }

    /// Base58 text form (`xprv...` / `tprv...`).
    pub fn to_base58(&self) -> Zeroizing<String> {
        encoding::to_base58(&self.serialize())
    }

    /// Hex of the 82-byte form.
    pub fn to_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(&self.serialize()[..]))
    }

    pub(crate) fn from_raw(raw: &RawKey) -> Result<Self> {
        if raw.kind != KeyKind::Private {
            return Err(Error::InvalidKeyData("expected private key data"));
        }
        let mut scalar = Zeroizing::new([0u8; 32]);
        scalar.copy_from_slice(&raw.key_data[1..]);
        let secret_key = curve::parse_secret_key(&scalar)
            .ok_or(Error::InvalidKeyData("private scalar is zero or not below the curve order"))?;
        Self::from_secret(secret_key, raw.attrs, raw.network)
    }

    fn from_secret(secret_key: SecretKey, attrs: ExtendedKeyAttrs, network: Network) -> Result<Self> {
        let point = curve::encode_point(&curve::public_key(&secret_key))?;
        Ok(Self {
            secret_key,
            point,
            attrs,
            network,
        })
    }

    fn secret_bytes(&self) -> Zeroizing<[u8; 32]> {
        Zeroizing::new(self.secret_key.to_bytes().into())
    }

    /// The private scalar, big-endian.
    ///
    /// **Security Warning**: this alone controls every key below this one on
    /// hardened paths.
    pub fn private_key_bytes(&self) -> Zeroizing<[u8; 32]> {
        self.secret_bytes()
    }

    /// The underlying secret key.
    pub fn secret_key(&self) -> &SecretKey {
        &self.secret_key
    }

    /// Compressed public point.
    pub fn public_key_bytes(&self) -> &[u8; 33] {
        &self.point
    }

    /// Hash160 of the compressed public point.
    pub fn identifier(&self) -> [u8; 20] {
        hash::hash160(&self.point)
    }

    /// First 4 bytes of [`identifier`](Self::identifier).
    pub fn fingerprint(&self) -> [u8; 4] {
        hash::fingerprint(&self.point)
    }

    /// Tree position and chain code.
    pub const fn attrs(&self) -> &ExtendedKeyAttrs {
        &self.attrs
    }

    /// Get the chain code.
    pub const fn chain_code(&self) -> &[u8; 32] {
        &self.attrs.chain_code
    }

    /// Get the depth.
    pub const fn depth(&self) -> u8 {
        self.attrs.depth
    }

    /// Get the parent fingerprint.
    pub const fn parent_fingerprint(&self) -> &[u8; 4] {
        &self.attrs.parent_fingerprint
    }

    /// Get the raw child index.
    pub const fn child_index(&self) -> u32 {
        self.attrs.child_index
    }

    /// Get the network.
    pub const fn network(&self) -> Network {
        self.network
    }

    /// Version bytes, always the private version of the network.
    pub const fn version(&self) -> [u8; 4] {
        self.network.private_version()
    }
}

/// Split an HMAC output into `IL` and `IR`.
fn split(i: &[u8; 64]) -> (Zeroizing<[u8; 32]>, [u8; 32]) {
    let mut il = Zeroizing::new([0u8; 32]);
    let mut ir = [0u8; 32];
    il.copy_from_slice(&i[..32]);
    ir.copy_from_slice(&i[32..]);
    (il, ir)
}

impl Zeroize for ExtendedPrivateKey {
    fn zeroize(&mut self) {
        self.attrs.chain_code.zeroize();
        self.attrs.parent_fingerprint.zeroize();
        self.attrs.depth = 0;
        self.attrs.child_index = 0;
    }
}

impl Drop for ExtendedPrivateKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl PartialEq for ExtendedPrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.serialize()[..].ct_eq(&other.serialize()[..]).into()
    }
}

impl Eq for ExtendedPrivateKey {}

impl FromStr for ExtendedPrivateKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::deserialize(&encoding::from_base58(s)?)
    }
}

impl fmt::Display for ExtendedPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base58())
    }
}

impl fmt::Debug for ExtendedPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtendedPrivateKey")
            .field("depth", &self.attrs.depth)
            .field("child_index", &self.attrs.child_number())
            .field("fingerprint", &hex::encode(self.fingerprint()))
            .field("network", &self.network)
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    // BIP-32 test vector 1
    const SEED_1: [u8; 16] = hex!("000102030405060708090a0b0c0d0e0f");

    fn master() -> ExtendedPrivateKey {
        ExtendedPrivateKey::new_master(&SEED_1, Network::Mainnet).unwrap()
    }

    #[test]
    fn master_key() {
        let key = master();
        assert_eq!(key.depth(), 0);
        assert_eq!(key.child_index(), 0);
        assert_eq!(key.parent_fingerprint(), &[0; 4]);
        assert_eq!(
            key.to_string(),
            "xprv9s21ZrQH143K3QTDL4LXw2F7HEK3wJUD2nW2nRk4stbPy6cq3jPPqjiChkVvvNKmPGJxWUtg6LnF5kejMRNNU3TGtRBeJgk33yuGBxrMPHi"
        );
        assert_eq!(key.fingerprint(), hex!("3442193e"));
    }

    #[test]
    fn seed_bounds() {
        for len in [65, 128] {
            assert!(matches!(
                ExtendedPrivateKey::new_master(&vec![1u8; len], Network::Mainnet),
                Err(Error::InvalidSeed(_))
            ));
        }
        for len in [0, 1, 10, 15, 16, 64] {
            assert!(ExtendedPrivateKey::new_master(&vec![1u8; len], Network::Mainnet).is_ok());
        }
    }

    #[test]
    fn short_seed_master() {
        let key = ExtendedPrivateKey::new_master(&[0u8; 10], Network::Mainnet).unwrap();
        assert_eq!(key.depth(), 0);
        assert_eq!(key, ExtendedPrivateKey::new_master(&[0u8; 10], Network::Mainnet).unwrap());
        assert_ne!(key, ExtendedPrivateKey::new_master(&[0u8; 11], Network::Mainnet).unwrap());
    }

    #[test]
    fn hardened_child() {
        let child = master().derive_child(0x8000_0000).unwrap();
        assert_eq!(child.depth(), 1);
        assert_eq!(child.child_index(), 0x8000_0000);
        assert_eq!(child.parent_fingerprint(), &master().fingerprint());
        assert_eq!(
            child.to_string(),
            "xprv9uHRZZhk6KAJC1avXpDAp4MDc3sQKNxDiPvvkX8Br5ngLNv1TxvUxt4cV1rGL5hj6KCesnDYUhd7oWgT11eZG7XnxHrnYeSvkzY7d2bhkJ7"
        );
    }

    #[test]
    fn derive_does_not_touch_parent() {
        let parent = master();
        let before = parent.serialize();
        let _ = parent.derive_child(7).unwrap();
        assert_eq!(*parent.serialize(), *before);
    }

    #[test]
    fn max_depth() {
        let mut key = master();
        for _ in 0..255 {
            key = key.derive_child(0).unwrap();
        }
        assert_eq!(key.depth(), 255);
        assert_eq!(key.derive_child(0), Err(Error::MaxDepthExceeded));
        assert_eq!(key.derive_child(0x8000_0000), Err(Error::MaxDepthExceeded));
    }

    #[test]
    fn next_valid_child_returns_start_when_valid() {
        let (index, child) = master().next_valid_child(5).unwrap();
        assert_eq!(index, 5);
        assert_eq!(child, master().derive_child(5).unwrap());
    }

    #[test]
    fn next_valid_child_stops_at_boundary() {
        let (index, _) = master().next_valid_child(u32::MAX).unwrap();
        assert_eq!(index, u32::MAX);
    }

    #[test]
    fn path_forms_agree() {
        let key = master();
        let by_str = key.derive_path_str("m/0'/1/2'").unwrap();
        let by_path = key.derive_path(&"0'/1/2'".parse().unwrap()).unwrap();
        let by_indices = key.derive_indices(&[0x8000_0000, 1, 0x8000_0002]).unwrap();
        let stepwise = key
            .derive_child(0x8000_0000)
            .and_then(|k| k.derive_child(1))
            .and_then(|k| k.derive_child(0x8000_0002))
            .unwrap();
        assert_eq!(by_str, stepwise);
        assert_eq!(by_path, stepwise);
        assert_eq!(by_indices, stepwise);
    }

    #[test]
    fn root_path_is_identity() {
        let key = master();
        assert_eq!(key.derive_path_str("m").unwrap(), key);
        assert_eq!(key.derive_indices(&[]).unwrap(), key);
    }

    #[test]
    fn bad_paths_fail() {
        let key = master();
        assert!(matches!(key.derive_path_str(""), Err(Error::InvalidPath(_))));
        assert!(matches!(key.derive_path_str("0//1"), Err(Error::InvalidPath(_))));
        assert!(matches!(
            key.derive_path_str("0/x"),
            Err(Error::InvalidPathSegment(_))
        ));
    }

    #[test]
    fn serialize_roundtrip() {
        let key = master().derive_path_str("m/44'/0'/0'").unwrap();
        let bytes = key.serialize();
        assert_eq!(bytes[45], 0x00);
        assert_eq!(bytes[..4], Network::MAINNET_PRIVATE);
        let back = ExtendedPrivateKey::deserialize(&*bytes).unwrap();
        assert_eq!(back, key);
        assert_eq!(*back.serialize(), *bytes);
        assert_eq!(ExtendedPrivateKey::from_hex(&key.to_hex()).unwrap(), key);
    }

    #[test]
    fn to_hex_matches_serialization() {
        let key = master().derive_child(3).unwrap();
        let encoded = key.to_hex();
        assert_eq!(encoded.len(), 2 * KEY_LEN);
        assert_eq!(hex::decode(&*encoded).unwrap(), key.serialize().to_vec());
    }

    #[test]
    fn zeroize_clears_tree_position() {
        let mut key = master().derive_path_str("m/0'/1").unwrap();
        assert_ne!(key.chain_code(), &[0; 32]);
        key.zeroize();
        assert_eq!(key.chain_code(), &[0; 32]);
        assert_eq!(key.parent_fingerprint(), &[0; 4]);
        assert_eq!(key.depth(), 0);
        assert_eq!(key.child_index(), 0);
    }

    #[test]
    fn testnet_prefix() {
        let key = ExtendedPrivateKey::new_master(&SEED_1, Network::Testnet).unwrap();
        assert!(key.to_string().starts_with("tprv"));
        assert_eq!(key.to_string().parse::<ExtendedPrivateKey>().unwrap(), key);
    }

    #[test]
    fn public_bytes_are_not_private() {
        let xpub = master().to_public().serialize();
        assert!(matches!(
            ExtendedPrivateKey::deserialize(&xpub),
            Err(Error::InvalidKeyData(_))
        ));
    }

    #[test]
    fn zero_scalar_rejected_on_decode() {
        let key_data = [0u8; 33];
        let bytes = encoding::encode(
            Network::MAINNET_PRIVATE,
            &ExtendedKeyAttrs::master([0; 32]),
            &key_data,
        );
        assert!(matches!(
            ExtendedPrivateKey::deserialize(&*bytes),
            Err(Error::InvalidKeyData(_))
        ));
    }

    #[test]
    fn debug_redacts() {
        let debug = format!("{:?}", master());
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("xprv"));
        let secret = hex::encode(*master().private_key_bytes());
        assert!(!debug.contains(&secret));
    }
}
