// Core ledger engine:
// - crypto: Ed25519 wallets, addresses and signature checks
// - transaction: signed value transfers
// - block: mined transaction bundles
// - chain: the append-only chain, pending pool and validation

pub mod block;
pub mod chain;
pub mod crypto;
pub mod transaction;

// Re-export main components for easier access
pub use block::Block;
pub use chain::{Blockchain, BlockchainError};
pub use crypto::{Address, CryptoError, DigitalSignature, Wallet};
pub use transaction::{Sender, Transaction, TransactionError};
