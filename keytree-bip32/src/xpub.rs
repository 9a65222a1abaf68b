//! BIP-32 extended public keys.
//!
//! Used for watch-only trees. Only normal (non-hardened) children can be
//! derived.

use core::fmt;
use core::str::FromStr;

use k256::PublicKey;
use keytree::{curve, hash, ChildIndex, DerivationPath, Error, KeyKind, Network, Result};

use crate::attrs::ExtendedKeyAttrs;
use crate::encoding::{self, RawKey, KEY_LEN};

/// BIP-32 extended public key.
#[derive(Clone, PartialEq, Eq)]
pub struct ExtendedPublicKey {
    public_key: PublicKey,
    point: [u8; 33],
    attrs: ExtendedKeyAttrs,
    network: Network,
}

impl ExtendedPublicKey {
    /// Build a key from a compressed point and its tree attributes.
    pub fn new(point: [u8; 33], attrs: ExtendedKeyAttrs, network: Network) -> Result<Self> {
        let public_key = curve::decode_point(&point)?;
        Ok(Self::from_parts(public_key, point, attrs, network))
    }

    pub(crate) const fn from_parts(
        public_key: PublicKey,
        point: [u8; 33],
        attrs: ExtendedKeyAttrs,
        network: Network,
    ) -> Self {
        Self {
            public_key,
            point,
            attrs,
            network,
        }
    }

    /// Derive the normal child at `index`.
    ///
    /// # Errors
    ///
    /// - [`Error::MaxDepthExceeded`] at depth 255.
    /// - [`Error::HardenedKeyFromPublic`] for `index >= 2^31`.
    /// - [`Error::InvalidChildIndex`] if `IL >= n` or the child point is the
    ///   point at infinity.
    pub fn derive_child(&self, index: u32) -> Result<Self> {
        if self.attrs.depth == u8::MAX {
            return Err(Error::MaxDepthExceeded);
        }
        if ChildIndex::from(index).is_hardened() {
            return Err(Error::HardenedKeyFromPublic { index });
        }

        let mut data = [0u8; 37];
        data[..33].copy_from_slice(&self.point);
        data[33..].copy_from_slice(&index.to_be_bytes());

        let i = hash::hmac_sha512(&self.attrs.chain_code, &data)?;
        let mut il = [0u8; 32];
        let mut chain_code = [0u8; 32];
        il.copy_from_slice(&i[..32]);
        chain_code.copy_from_slice(&i[32..]);

        let Some(public_key) = curve::add_points(&il, &self.public_key) else {
            tracing::warn!(index, "public child is invalid, skip this index");
            return Err(Error::InvalidChildIndex { index });
        };
        let point = curve::encode_point(&public_key)?;

        let attrs = self.attrs.child(&self.point, index, chain_code);
        tracing::debug!(depth = attrs.depth, index, "derived public child key");
        Ok(Self::from_parts(public_key, point, attrs, self.network))
    }

    /// Apply each step of `path` in order.
    pub fn derive_path(&self, path: &DerivationPath) -> Result<Self> {
        self.derive_indices(&path.to_u32_vec())
    }

    /// Parse `path` and derive it. Hardened segments fail.
    pub fn derive_path_str(&self, path: &str) -> Result<Self> {
        self.derive_path(&path.parse()?)
    }

    /// Derive a sequence of raw indices.
    pub fn derive_indices(&self, indices: &[u32]) -> Result<Self> {
        indices
            .iter()
            .try_fold(self.clone(), |key, &index| key.derive_child(index))
    }

    /// Serialize to the 82-byte form with the compressed point as key data.
    pub fn serialize(&self) -> [u8; KEY_LEN] {
        *encoding::encode(self.version(), &self.attrs, &self.point)
    }

    /// Decode an 82-byte public extended key.
    pub fn deserialize(bytes: &[u8]) -> Result<Self> {
        Self::from_raw(&encoding::decode(bytes)?)
    }

    /// Decode a hex string of the 82-byte form.
    pub fn from_hex(s: &str) -> Result<Self> {
        Self::deserialize(&encoding::from_hex(s)?)
    }

    /// Hex of the 82-byte form.
    pub fn to_hex(&self) -> String {
        hex::encode(self.serialize())
    }

    pub(crate) fn from_raw(raw: &RawKey) -> Result<Self> {
        if raw.kind != KeyKind::Public {
            return Err(Error::InvalidKeyData("expected public key data"));
        }
        Self::new(*raw.key_data, raw.attrs, raw.network)
    }

    /// The public point.
    pub const fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Compressed public point.
    pub const fn public_key_bytes(&self) -> &[u8; 33] {
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

    /// Version bytes, always the public version of the network.
    pub const fn version(&self) -> [u8; 4] {
        self.network.public_version()
    }
}

impl FromStr for ExtendedPublicKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::deserialize(&encoding::from_base58(s)?)
    }
}

impl fmt::Display for ExtendedPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encoding::to_base58(&self.serialize()))
    }
}

impl fmt::Debug for ExtendedPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtendedPublicKey")
            .field("depth", &self.attrs.depth)
            .field("child_index", &self.attrs.child_number())
            .field("fingerprint", &hex::encode(self.fingerprint()))
            .field("network", &self.network)
            .field("public_key", &hex::encode(self.point))
            .finish()
    }
}
