//! Metadata shared by private and public extended keys.

use keytree::hash;
use keytree::ChildIndex;

/// Position of an extended key in its tree plus the chain code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ExtendedKeyAttrs {
    /// Number of derivation steps from the master key (0 for master).
    pub depth: u8,
    /// First 4 bytes of the parent's key identifier, all zero for master.
    pub parent_fingerprint: [u8; 4],
    /// Raw index that produced this key, hardened offset included.
    pub child_index: u32,
    /// Extra entropy mixed into child derivation.
    pub chain_code: [u8; 32],
}

impl ExtendedKeyAttrs {
    /// Attributes of a master key.
    pub const fn master(chain_code: [u8; 32]) -> Self {
        Self {
            depth: 0,
            parent_fingerprint: [0; 4],
            child_index: 0,
            chain_code,
        }
    }

    /// Attributes of the child at `index` of a parent with these attributes
    /// and compressed point `parent_point`.
    ///
    /// The caller checks that `depth < 255`.
    pub(crate) fn child(&self, parent_point: &[u8; 33], index: u32, chain_code: [u8; 32]) -> Self {
        Self {
            depth: self.depth + 1,
            parent_fingerprint: hash::fingerprint(parent_point),
            child_index: index,
            chain_code,
        }
    }

    /// Check if this is a master key.
    pub fn is_master(&self) -> bool {
        self.depth == 0
    }

    /// Child index split into its normal or hardened form.
    pub fn child_number(&self) -> ChildIndex {
        ChildIndex::from(self.child_index)
    }
}
