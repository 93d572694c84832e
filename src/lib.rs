//! A minimal proof-of-work ledger: signed transfers, mined blocks, and
//! full-chain validation.
//!
//! Everything is in-memory and single-threaded. Mining blocks the calling
//! thread for the duration of the nonce search, and the [`blockchain::Blockchain`]
//! performs no internal locking; embeddings that want concurrency must
//! serialize access themselves (one lock around pool mutation and
//! block append).

#![forbid(unsafe_code)]

pub mod blockchain;

pub use blockchain::{
    Address, Block, Blockchain, BlockchainError, CryptoError, DigitalSignature, Sender,
    Transaction, TransactionError, Wallet,
};
