use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use super::crypto::{verify_signature, Address, CryptoError, DigitalSignature, Wallet};

/// Errors that can occur when signing or verifying a transaction
#[derive(Debug, Error)]
pub enum TransactionError {
    #[error("Cannot sign transactions for another wallet")]
    SenderMismatch,

    #[error("No signature in this transaction")]
    NotSigned,

    #[error("Signature does not match transaction contents")]
    InvalidSignature,

    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),
}

/// Originator of a transaction.
///
/// Coinbase transactions are minted by the chain itself as mining rewards.
/// They have no wallet behind them and never carry a signature. In the
/// serialized form a coinbase sender is `null`, a wallet sender is its
/// address string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Sender {
    Coinbase,
    Wallet(Address),
}

impl Sender {
    pub fn as_wallet(&self) -> Option<&Address> {
        match self {
            Sender::Coinbase => None,
            Sender::Wallet(address) => Some(address),
        }
    }
}

/// A value transfer between two addresses, immutable once mined into a block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub sender: Sender,
    pub recipient: Address,
    pub amount: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<DigitalSignature>,
}

impl Transaction {
    /// Creates an unsigned transfer from `sender` to `recipient`.
    pub fn new(sender: Address, recipient: Address, amount: f64) -> Self {
        Transaction {
            sender: Sender::Wallet(sender),
            recipient,
            amount,
            signature: None,
        }
    }

    /// Creates the mining-reward transaction paid out by the chain itself.
    pub fn new_coinbase(recipient: Address, amount: f64) -> Self {
        Transaction {
            sender: Sender::Coinbase,
            recipient,
            amount,
            signature: None,
        }
    }

    pub fn is_coinbase(&self) -> bool {
        matches!(self.sender, Sender::Coinbase)
    }

    /// Hash over the transfer's defining fields.
    ///
    /// Stable for a given (sender, recipient, amount); the signature is
    /// excluded so signing does not change the message being signed.
    pub fn calculate_hash(&self) -> String {
        let data = serde_json::json!({
            "sender": self.sender,
            "recipient": self.recipient,
            "amount": self.amount,
        });

        let mut hasher = Sha256::new();
        hasher.update(data.to_string().as_bytes());

        format!("{:x}", hasher.finalize())
    }

    /// Signs the content hash with `wallet`, which must own the sender
    /// address. Re-signing simply replaces the previous signature.
    pub fn sign(&mut self, wallet: &Wallet) -> Result<(), TransactionError> {
        match &self.sender {
            Sender::Wallet(address) if address == wallet.address() => {}
            _ => return Err(TransactionError::SenderMismatch),
        }

        let hash = self.calculate_hash();
        self.signature = Some(wallet.sign(hash.as_bytes()));

        Ok(())
    }

    /// Whether the transaction is properly authorized.
    ///
    /// Coinbase transactions are always valid and need no signature. A
    /// wallet transaction without a signature is an error, not merely
    /// invalid; with one, the signature must verify over the content hash
    /// under the sender's public key.
    pub fn is_valid(&self) -> Result<bool, TransactionError> {
        let sender = match &self.sender {
            Sender::Coinbase => return Ok(true),
            Sender::Wallet(address) => address,
        };

        let signature = self
            .signature
            .as_ref()
            .ok_or(TransactionError::NotSigned)?;
        let public_key = sender.to_public_key()?;
        let hash = self.calculate_hash();

        Ok(verify_signature(hash.as_bytes(), signature, &public_key)?)
    }
}
