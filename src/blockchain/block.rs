use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use std::sync::atomic::{AtomicBool, Ordering};

use super::transaction::Transaction;

/// A bundle of transactions linked to its predecessor by hash and secured
/// by proof of work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub timestamp: DateTime<Utc>,
    pub transactions: Vec<Transaction>,
    pub previous_hash: String,
    pub hash: String,
    pub nonce: u64,
}

impl Block {
    /// Creates an unmined block with the initial hash computed and a zero
    /// nonce.
    pub fn new(
        timestamp: DateTime<Utc>,
        transactions: Vec<Transaction>,
        previous_hash: String,
    ) -> Self {
        let mut block = Block {
            timestamp,
            transactions,
            previous_hash,
            hash: String::new(),
            nonce: 0,
        };
        block.hash = block.calculate_hash();

        block
    }

    /// SHA-256 over the block's linking and content fields.
    ///
    /// The transaction list is serialized in order, signatures included, so
    /// any later edit to an embedded transaction changes the block hash.
    pub fn calculate_hash(&self) -> String {
        let data = serde_json::json!({
            "previous_hash": self.previous_hash,
            "timestamp": self.timestamp,
            "transactions": self.transactions,
            "nonce": self.nonce,
        });

        let mut hasher = Sha256::new();
        hasher.update(data.to_string().as_bytes());

        format!("{:x}", hasher.finalize())
    }

    /// Proof of work: walks the nonce until the hash has at least
    /// `difficulty` leading zero hex digits.
    ///
    /// Blocking and unbounded; a difficulty beyond what the hash width can
    /// satisfy never terminates.
    pub fn mine(&mut self, difficulty: u32) {
        let target = "0".repeat(difficulty as usize);

        while !self.hash.starts_with(&target) {
            self.nonce += 1;
            self.hash = self.calculate_hash();
        }

        info!("Block mined: {}", self.hash);
    }

    /// The same search as `mine`, checking `stop` between attempts so
    /// another thread can abort it. Returns whether the difficulty target
    /// was reached.
    pub fn mine_interruptible(&mut self, difficulty: u32, stop: &AtomicBool) -> bool {
        let target = "0".repeat(difficulty as usize);

        while !self.hash.starts_with(&target) {
            if stop.load(Ordering::Relaxed) {
                return false;
            }
            self.nonce += 1;
            self.hash = self.calculate_hash();
        }

        info!("Block mined: {}", self.hash);
        true
    }

    /// True iff every contained transaction passes its validity check.
    /// Stops at the first failure, in transaction order.
    pub fn has_valid_transactions(&self) -> bool {
        self.transactions
            .iter()
            .all(|tx| matches!(tx.is_valid(), Ok(true)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::crypto::Wallet;

    fn block_with_transfer(amount: f64) -> Block {
        let alice = Wallet::new();
        let bob = Wallet::new();

        let mut tx = Transaction::new(alice.address().clone(), bob.address().clone(), amount);
        tx.sign(&alice).unwrap();

        Block::new(Utc::now(), vec![tx], "0".to_string())
    }

    #[test]
    fn hash_is_stable() {
        let block = block_with_transfer(10.0);
        assert_eq!(block.calculate_hash(), block.calculate_hash());
        assert_eq!(block.hash, block.calculate_hash());
    }

    #[test]
    fn mined_block_meets_difficulty() {
        let mut block = block_with_transfer(10.0);
        block.mine(2);

        assert!(block.hash.starts_with("00"));
        assert_eq!(block.hash, block.calculate_hash());
    }

    #[test]
    fn nonce_tamper_breaks_the_stored_hash() {
        let mut block = block_with_transfer(10.0);
        block.mine(2);

        block.nonce += 1;
        assert_ne!(block.hash, block.calculate_hash());
    }

    #[test]
    fn transaction_tamper_breaks_the_stored_hash() {
        let mut block = block_with_transfer(10.0);
        block.mine(2);

        block.transactions[0].amount = 9999.0;
        assert_ne!(block.hash, block.calculate_hash());
    }

    #[test]
    fn detects_invalid_transactions() {
        let mut block = block_with_transfer(10.0);
        assert!(block.has_valid_transactions());

        block.transactions[0].amount = 9999.0;
        assert!(!block.has_valid_transactions());
    }

    #[test]
    fn embedded_unsigned_transfer_counts_as_invalid() {
        let alice = Wallet::new();
        let bob = Wallet::new();

        let tx = Transaction::new(alice.address().clone(), bob.address().clone(), 10.0);
        let block = Block::new(Utc::now(), vec![tx], "0".to_string());

        assert!(!block.has_valid_transactions());
    }

    #[test]
    fn interrupted_mining_stops_without_a_result() {
        let mut block = block_with_transfer(10.0);

        let stop = AtomicBool::new(true);
        assert!(!block.mine_interruptible(64, &stop));
    }
}
