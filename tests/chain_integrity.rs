//! End-to-end exercises of the public ledger API: mine, transfer, settle,
//! and detect tampering after the fact.

use minichain::{Blockchain, BlockchainError, Transaction, Wallet};

fn signed_transfer(from: &Wallet, to: &Wallet, amount: f64) -> Transaction {
    let mut tx = Transaction::new(from.address().clone(), to.address().clone(), amount);
    tx.sign(from).expect("wallet owns the sender address");
    tx
}

#[test]
fn reward_then_transfer_settles_balances() {
    let alice = Wallet::new();
    let bob = Wallet::new();
    let mut ledger = Blockchain::new();

    ledger.mine_pending_transactions(alice.address());
    assert_eq!(ledger.balance_of(alice.address()), 100.0);

    ledger
        .add_transaction(signed_transfer(&alice, &bob, 50.0))
        .unwrap();
    ledger.mine_pending_transactions(alice.address());

    assert_eq!(ledger.balance_of(alice.address()), 150.0);
    assert_eq!(ledger.balance_of(bob.address()), 50.0);
    assert!(ledger.is_valid());
}

#[test]
fn every_mined_block_meets_the_difficulty() {
    let miner = Wallet::new();
    let mut ledger = Blockchain::with_params(3, 25.0);

    ledger.mine_pending_transactions(miner.address());
    ledger.mine_pending_transactions(miner.address());

    let target = "0".repeat(ledger.difficulty as usize);
    for block in ledger.chain.iter().skip(1) {
        assert!(block.hash.starts_with(&target));
        assert_eq!(block.hash, block.calculate_hash());
    }

    // The genesis block is never mined; its nonce stays untouched.
    assert_eq!(ledger.chain[0].nonce, 0);
    assert_eq!(ledger.balance_of(miner.address()), 50.0);
}

#[test]
fn history_tampering_is_detected() {
    let alice = Wallet::new();
    let bob = Wallet::new();
    let mut ledger = Blockchain::new();

    ledger.mine_pending_transactions(alice.address());
    ledger
        .add_transaction(signed_transfer(&alice, &bob, 50.0))
        .unwrap();
    ledger.mine_pending_transactions(alice.address());
    assert!(ledger.is_valid());

    ledger.chain[2].transactions[0].amount = 9999.0;
    assert!(!ledger.is_valid());
}

#[test]
fn unsigned_transfers_never_reach_the_pool() {
    let alice = Wallet::new();
    let bob = Wallet::new();
    let mut ledger = Blockchain::new();

    let tx = Transaction::new(alice.address().clone(), bob.address().clone(), 50.0);
    let result = ledger.add_transaction(tx);

    assert!(matches!(
        result,
        Err(BlockchainError::RejectedTransaction(_))
    ));
    assert!(ledger.pending_transactions.is_empty());
}
