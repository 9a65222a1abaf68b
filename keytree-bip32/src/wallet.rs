//! BIP-44 wallet facade over a master extended key.

use keytree::{CoinType, DerivationPath, Network, Result};
use keytree_bip39::Mnemonic;

use crate::extended_key::ExtendedPrivateKey;
use crate::xpub::ExtendedPublicKey;

/// An HD wallet: mnemonic and passphrase turned into a master key, with
/// BIP-44 account and address derivation for one network.
///
/// # Passphrase Support
///
/// The same mnemonic with a different passphrase yields an unrelated tree.
/// An empty passphrase and no passphrase are the same wallet.
#[derive(Debug, Clone)]
pub struct HdWallet {
    /// Mnemonic the seed came from, absent for wallets built from a raw seed.
    mnemonic: Option<Mnemonic>,
    master: ExtendedPrivateKey,
    has_passphrase: bool,
}

impl HdWallet {
    /// Generate a wallet from a fresh random mnemonic of `word_count` words.
    ///
    /// Back up [`mnemonic`](Self::mnemonic) before using the wallet.
    #[cfg(feature = "rand")]
    pub fn generate(word_count: usize, passphrase: Option<&str>, network: Network) -> Result<Self> {
        Self::from_mnemonic(Mnemonic::generate(word_count)?, passphrase, network)
    }

    /// Restore a wallet from a phrase. The checksum is verified.
    pub fn from_phrase(phrase: &str, passphrase: Option<&str>, network: Network) -> Result<Self> {
        Self::from_mnemonic(phrase.parse()?, passphrase, network)
    }

    /// Build a wallet from a parsed mnemonic.
    pub fn from_mnemonic(
        mnemonic: Mnemonic,
        passphrase: Option<&str>,
        network: Network,
    ) -> Result<Self> {
        let passphrase = passphrase.unwrap_or("");
        let seed = mnemonic.to_seed(passphrase)?;
        let master = ExtendedPrivateKey::new_master(&*seed, network)?;
        Ok(Self {
            mnemonic: Some(mnemonic),
            master,
            has_passphrase: !passphrase.is_empty(),
        })
    }

    /// Build a wallet straight from a seed of at most 64 bytes.
    pub fn from_seed(seed: &[u8], network: Network) -> Result<Self> {
        Ok(Self {
            mnemonic: None,
            master: ExtendedPrivateKey::new_master(seed, network)?,
            has_passphrase: false,
        })
    }

    /// The mnemonic, if the wallet was built from one.
    ///
    /// **Security Warning**: the phrase reconstructs every key of the wallet.
    pub fn mnemonic(&self) -> Option<&Mnemonic> {
        self.mnemonic.as_ref()
    }

    /// Check if a non-empty passphrase was used.
    pub const fn has_passphrase(&self) -> bool {
        self.has_passphrase
    }

    /// The master extended private key.
    pub const fn master(&self) -> &ExtendedPrivateKey {
        &self.master
    }

    /// Get the network.
    pub const fn network(&self) -> Network {
        self.master.network()
    }

    /// BIP-44 coin type for the network.
    pub const fn coin_type(&self) -> CoinType {
        self.network().coin_type()
    }

    /// Account key at `m/44'/coin_type'/account'`.
    pub fn account(&self, account: u32) -> Result<ExtendedPrivateKey> {
        self.master
            .derive_path(&DerivationPath::bip44_account(self.coin_type(), account)?)
    }

    /// Account xpub, enough to watch every address of the account.
    pub fn account_xpub(&self, account: u32) -> Result<ExtendedPublicKey> {
        self.account(account).map(|key| key.to_public())
    }

    /// Key at `m/44'/coin_type'/account'/change/address_index`.
    pub fn derive_bip44(
        &self,
        account: u32,
        change: bool,
        address_index: u32,
    ) -> Result<ExtendedPrivateKey> {
        let path = DerivationPath::bip44(self.coin_type(), account, change, address_index)?;
        self.master.derive_path(&path)
    }

    /// Key at an arbitrary path below the master key.
    pub fn derive_path(&self, path: &str) -> Result<ExtendedPrivateKey> {
        self.master.derive_path_str(path)
    }
}
