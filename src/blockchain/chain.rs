use chrono::{TimeZone, Utc};
use log::{debug, info};
use thiserror::Error;

use super::block::Block;
use super::crypto::Address;
use super::transaction::{Transaction, TransactionError};

/// Errors raised when admitting a transaction to the pending pool
#[derive(Debug, Error)]
pub enum BlockchainError {
    #[error("Transaction must include sender and recipient addresses")]
    MissingAddress,

    #[error("Cannot add invalid transaction to the pool: {0}")]
    RejectedTransaction(#[from] TransactionError),
}

/// The ledger: an append-only block sequence plus the pool of transactions
/// waiting to be mined.
///
/// State is plain owned data with `&mut self` mutators. There is no internal
/// locking; a multi-threaded embedding must serialize access to the chain
/// itself.
#[derive(Debug, Clone)]
pub struct Blockchain {
    pub chain: Vec<Block>,
    pub pending_transactions: Vec<Transaction>,
    pub difficulty: u32,
    pub mining_reward: f64,
}

impl Blockchain {
    /// A fresh chain with the reference parameters: difficulty 2, reward 100.
    pub fn new() -> Self {
        Self::with_params(2, 100.0)
    }

    /// A fresh chain with explicit mining parameters.
    pub fn with_params(difficulty: u32, mining_reward: f64) -> Self {
        Blockchain {
            chain: vec![Self::create_genesis_block()],
            pending_transactions: Vec::new(),
            difficulty,
            mining_reward,
        }
    }

    /// The fixed first block. Never mined and never difficulty-checked;
    /// `is_valid` starts its scan after it.
    fn create_genesis_block() -> Block {
        let timestamp = Utc.with_ymd_and_hms(2020, 1, 10, 0, 0, 0).unwrap();
        Block::new(timestamp, Vec::new(), "0".to_string())
    }

    pub fn latest_block(&self) -> &Block {
        self.chain
            .last()
            .expect("chain always holds the genesis block")
    }

    /// Queues a signed transfer for inclusion in the next mined block.
    ///
    /// Coinbase transactions are minted internally by
    /// `mine_pending_transactions` and are rejected here. No solvency check
    /// is performed; the pool accepts transfers that would drive the sender
    /// negative.
    pub fn add_transaction(&mut self, transaction: Transaction) -> Result<(), BlockchainError> {
        let sender = transaction
            .sender
            .as_wallet()
            .ok_or(BlockchainError::MissingAddress)?;

        if sender.0.is_empty() || transaction.recipient.0.is_empty() {
            return Err(BlockchainError::MissingAddress);
        }

        if !transaction.is_valid()? {
            return Err(BlockchainError::RejectedTransaction(
                TransactionError::InvalidSignature,
            ));
        }

        debug!(
            "Queued transfer of {} to {}",
            transaction.amount, transaction.recipient
        );
        self.pending_transactions.push(transaction);

        Ok(())
    }

    /// Bundles the entire pending pool, plus the miner's reward, into a new
    /// block, mines it and appends it to the chain.
    ///
    /// This is the sole block-production path: every pending transaction is
    /// included in arrival order, and the pool is cleared afterwards.
    pub fn mine_pending_transactions(&mut self, reward_address: &Address) -> &Block {
        let reward = Transaction::new_coinbase(reward_address.clone(), self.mining_reward);
        self.pending_transactions.push(reward);

        let transactions = std::mem::take(&mut self.pending_transactions);
        let mut block = Block::new(Utc::now(), transactions, self.latest_block().hash.clone());
        block.mine(self.difficulty);

        info!("Block {} appended to the chain", self.chain.len());
        self.chain.push(block);

        self.latest_block()
    }

    /// Net balance of `address`: a full scan over every recorded transfer,
    /// subtracting outgoing amounts and adding incoming ones.
    pub fn balance_of(&self, address: &Address) -> f64 {
        let mut balance = 0.0;

        for block in &self.chain {
            for tx in &block.transactions {
                if tx.sender.as_wallet() == Some(address) {
                    balance -= tx.amount;
                }
                if tx.recipient == *address {
                    balance += tx.amount;
                }
            }
        }

        balance
    }

    /// Re-checks every non-genesis block: its transactions, its stored hash
    /// against a recomputation, and its link to the predecessor. Fails fast
    /// on the first mismatch.
    pub fn is_valid(&self) -> bool {
        for i in 1..self.chain.len() {
            let current = &self.chain[i];
            let previous = &self.chain[i - 1];

            if !current.has_valid_transactions() {
                return false;
            }

            if current.hash != current.calculate_hash() {
                return false;
            }

            if current.previous_hash != previous.hash {
                return false;
            }
        }

        true
    }
}

impl Default for Blockchain {
    fn default() -> Self {
        Self::new()
    }
}
