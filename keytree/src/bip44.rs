//! BIP-44 numbering conventions and extended key version tags.
//!
//! Nothing here computes; these values parametrize BIP-32 derivation:
//! `m / purpose' / coin_type' / account' / change / address_index`.

use core::fmt;
use core::str::FromStr;

use crate::error::Result;
use crate::hdpath::{ChildIndex, DerivationPath};

/// BIP-43 purpose field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Purpose {
    /// BIP-44 multi-account hierarchy.
    Bip44 = 44,
}

impl Purpose {
    /// Purpose number as used in the (hardened) first path level.
    pub const fn number(self) -> u32 {
        self as u32
    }
}

/// Registered SLIP-44 coin types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum CoinType {
    /// Bitcoin mainnet.
    Bitcoin = 0,
    /// Any testnet.
    Testnet = 1,
}

impl CoinType {
    /// Coin type number as used in the (hardened) second path level.
    pub const fn number(self) -> u32 {
        self as u32
    }
}

/// Which half of an extended key pair a version tag denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyKind {
    /// `xpub` / `tpub`.
    Public,
    /// `xprv` / `tprv`.
    Private,
}

/// Supported networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Network {
    /// Mainnet (`xpub` / `xprv`).
    #[default]
    Mainnet,
    /// Testnet (`tpub` / `tprv`).
    Testnet,
}

impl Network {
    /// Mainnet public version, serializes as `xpub`.
    pub const MAINNET_PUBLIC: [u8; 4] = [0x04, 0x88, 0xB2, 0x1E];
    /// Mainnet private version, serializes as `xprv`.
    pub const MAINNET_PRIVATE: [u8; 4] = [0x04, 0x88, 0xAD, 0xE4];
    /// Testnet public version, serializes as `tpub`.
    pub const TESTNET_PUBLIC: [u8; 4] = [0x04, 0x35, 0x87, 0xCF];
    /// Testnet private version, serializes as `tprv`.
    pub const TESTNET_PRIVATE: [u8; 4] = [0x04, 0x35, 0x83, 0x94];

    /// Version bytes for public extended keys.
    #[inline]
    #[must_use]
    pub const fn public_version(self) -> [u8; 4] {
        match self {
            Self::Mainnet => Self::MAINNET_PUBLIC,
            Self::Testnet => Self::TESTNET_PUBLIC,
        }
    }

    /// Version bytes for private extended keys.
    #[inline]
    #[must_use]
    pub const fn private_version(self) -> [u8; 4] {
        match self {
            Self::Mainnet => Self::MAINNET_PRIVATE,
            Self::Testnet => Self::TESTNET_PRIVATE,
        }
    }

    /// Version bytes for the given key kind.
    #[inline]
    #[must_use]
    pub const fn version(self, kind: KeyKind) -> [u8; 4] {
        match kind {
            KeyKind::Public => self.public_version(),
            KeyKind::Private => self.private_version(),
        }
    }

    /// Look up the network and key kind a version tag belongs to.
    pub fn from_version(version: [u8; 4]) -> Option<(Self, KeyKind)> {
        match version {
            Self::MAINNET_PUBLIC => Some((Self::Mainnet, KeyKind::Public)),
            Self::MAINNET_PRIVATE => Some((Self::Mainnet, KeyKind::Private)),
            Self::TESTNET_PUBLIC => Some((Self::Testnet, KeyKind::Public)),
            Self::TESTNET_PRIVATE => Some((Self::Testnet, KeyKind::Private)),
            _ => None,
        }
    }

    /// Get the BIP-44 coin type for this network.
    #[inline]
    #[must_use]
    pub const fn coin_type(self) -> CoinType {
        match self {
            Self::Mainnet => CoinType::Bitcoin,
            Self::Testnet => CoinType::Testnet,
        }
    }

    /// Get network name as string.
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Testnet => "testnet",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown network name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseNetworkError;

impl fmt::Display for ParseNetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid network, expected mainnet or testnet")
    }
}

impl std::error::Error for ParseNetworkError {}

impl FromStr for Network {
    type Err = ParseNetworkError;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" | "main" | "bitcoin" => Ok(Self::Mainnet),
            "testnet" | "test" => Ok(Self::Testnet),
            _ => Err(ParseNetworkError),
        }
    }
}

impl DerivationPath {
    /// Account-level path: `m/44'/coin_type'/account'`.
    pub fn bip44_account(coin_type: CoinType, account: u32) -> Result<Self> {
        Ok(Self::new(vec![
            ChildIndex::hardened(Purpose::Bip44.number())?,
            ChildIndex::hardened(coin_type.number())?,
            ChildIndex::hardened(account)?,
        ]))
    }

    /// Full BIP-44 path: `m/44'/coin_type'/account'/change/address_index`.
    ///
    /// `change` selects the internal chain (1) over the external one (0).
    pub fn bip44(
        coin_type: CoinType,
        account: u32,
        change: bool,
        address_index: u32,
    ) -> Result<Self> {
        Ok(Self::bip44_account(coin_type, account)?
            .child(ChildIndex::Normal(u32::from(change)))
            .child(ChildIndex::normal(address_index)?))
    }
}
