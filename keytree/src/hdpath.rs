//! BIP-32 derivation paths.
//!
//! Parses and prints paths like `m/44'/0'/0'/0/0` or `44'/0'/0'/0/0` as a
//! sequence of child indices.

use core::fmt;
use core::str::FromStr;

use crate::error::{Error, Result};

/// A child index in a derivation path.
///
/// Hardened indices are `>= 2^31` in raw form and are written with a
/// trailing `'` (or `h`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChildIndex {
    /// Normal (non-hardened) index: 0 to 2^31 - 1
    Normal(u32),
    /// Hardened index, stored without the offset
    Hardened(u32),
}

impl ChildIndex {
    /// First hardened raw index (2^31).
    pub const HARDENED_OFFSET: u32 = 0x8000_0000;

    /// Create a normal (non-hardened) child index.
    pub const fn normal(index: u32) -> Result<Self> {
        if index >= Self::HARDENED_OFFSET {
            Err(Error::InvalidPath("normal index must be below 2^31"))
        } else {
            Ok(Self::Normal(index))
        }
    }

    /// Create a hardened child index from its unoffset value.
    pub const fn hardened(index: u32) -> Result<Self> {
        if index >= Self::HARDENED_OFFSET {
            Err(Error::InvalidPath("hardened index must be below 2^31"))
        } else {
            Ok(Self::Hardened(index))
        }
    }

    /// Check if this is a hardened index.
    pub const fn is_hardened(&self) -> bool {
        matches!(self, Self::Hardened(_))
    }

    /// Index value without the hardened offset.
    pub const fn index(&self) -> u32 {
        match self {
            Self::Normal(i) | Self::Hardened(i) => *i,
        }
    }

    /// Raw u32 value fed into derivation, offset included for hardened indices.
    pub const fn to_u32(&self) -> u32 {
        match self {
            Self::Normal(i) => *i,
            Self::Hardened(i) => *i | Self::HARDENED_OFFSET,
        }
    }
}

impl From<u32> for ChildIndex {
    fn from(value: u32) -> Self {
        if value >= Self::HARDENED_OFFSET {
            Self::Hardened(value & !Self::HARDENED_OFFSET)
        } else {
            Self::Normal(value)
        }
    }
}

impl From<ChildIndex> for u32 {
    fn from(index: ChildIndex) -> Self {
        index.to_u32()
    }
}

impl fmt::Display for ChildIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal(i) => write!(f, "{i}"),
            Self::Hardened(i) => write!(f, "{i}'"),
        }
    }
}

impl FromStr for ChildIndex {
    type Err = Error;

    /// Parse `digits` or `digits'` / `digitsh`.
    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(Error::InvalidPath("empty path segment"));
        }

        let (digits, hardened) = match s.strip_suffix(&['\'', 'h', 'H'][..]) {
            Some(digits) => (digits, true),
            None => (s, false),
        };

        // u32::from_str also accepts a leading '+'
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidPathSegment(s.to_owned()));
        }
        let index: u32 = digits
            .parse()
            .map_err(|_| Error::InvalidPathSegment(s.to_owned()))?;
        if index >= Self::HARDENED_OFFSET {
            return Err(Error::InvalidPathSegment(s.to_owned()));
        }

        Ok(if hardened {
            Self::Hardened(index)
        } else {
            Self::Normal(index)
        })
    }
}

/// A BIP-32 derivation path.
///
/// An empty path denotes the key itself (`m`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct DerivationPath {
    indices: Vec<ChildIndex>,
}

impl DerivationPath {
    /// The root path `m`.
    pub fn master() -> Self {
        Self::default()
    }

    /// Create a derivation path from child indices.
    pub fn new(indices: Vec<ChildIndex>) -> Self {
        Self { indices }
    }

    /// Child indices in application order.
    pub fn indices(&self) -> &[ChildIndex] {
        &self.indices
    }

    /// Raw u32 indices in application order.
    pub fn to_u32_vec(&self) -> Vec<u32> {
        self.indices.iter().map(ChildIndex::to_u32).collect()
    }

    /// Number of derivation steps.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Check if this is the root path.
    pub fn is_master(&self) -> bool {
        self.indices.is_empty()
    }

    /// Check if any index in the path is hardened.
    pub fn has_hardened(&self) -> bool {
        self.indices.iter().any(ChildIndex::is_hardened)
    }

    /// Append a child index to the path.
    pub fn child(&self, index: ChildIndex) -> Self {
        let mut indices = self.indices.clone();
        indices.push(index);
        Self { indices }
    }

    /// Get the parent path, if any.
    pub fn parent(&self) -> Option<Self> {
        let (_, parent) = self.indices.split_last()?;
        Some(Self {
            indices: parent.to_vec(),
        })
    }
}

impl FromStr for DerivationPath {
    type Err = Error;

    /// Parse `segment("/"segment)*`, optionally prefixed by `m/`.
    ///
    /// A bare `m` is the root path; an empty string or an empty segment is
    /// rejected.
    fn from_str(path: &str) -> Result<Self> {
        if path.is_empty() {
            return Err(Error::InvalidPath("empty path"));
        }
        if path == "m" || path == "M" {
            return Ok(Self::master());
        }

        let body = path
            .strip_prefix("m/")
            .or_else(|| path.strip_prefix("M/"))
            .unwrap_or(path);

        body.split('/')
            .map(ChildIndex::from_str)
            .collect::<Result<Vec<_>>>()
            .map(Self::new)
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("m")?;
        for index in &self.indices {
            write!(f, "/{index}")?;
        }
        Ok(())
    }
}

impl From<Vec<ChildIndex>> for DerivationPath {
    fn from(indices: Vec<ChildIndex>) -> Self {
        Self::new(indices)
    }
}

impl From<&[u32]> for DerivationPath {
    fn from(raw: &[u32]) -> Self {
        raw.iter().copied().map(ChildIndex::from).collect()
    }
}

impl FromIterator<ChildIndex> for DerivationPath {
    fn from_iter<I: IntoIterator<Item = ChildIndex>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a DerivationPath {
    type Item = &'a ChildIndex;
    type IntoIter = core::slice::Iter<'a, ChildIndex>;

    fn into_iter(self) -> Self::IntoIter {
        self.indices.iter()
    }
}

impl AsRef<[ChildIndex]> for DerivationPath {
    fn as_ref(&self) -> &[ChildIndex] {
        &self.indices
    }
}
