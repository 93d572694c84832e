use anyhow::Result;
use log::info;

use minichain::{Blockchain, Transaction, Wallet};

// Walks the full caller-facing surface once: wallets, a reward block, a
// signed transfer, balances and a validity check.
fn main() -> Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let alice = Wallet::new();
    let bob = Wallet::new();
    info!("Alice's address: {}", alice.address());
    info!("Bob's address:   {}", bob.address());
    info!(
        "Alice's secret key (keep this safe): {}",
        hex::encode(alice.export_secret_key())
    );

    let mut ledger = Blockchain::new();
    info!(
        "Created ledger (difficulty {}, reward {})",
        ledger.difficulty, ledger.mining_reward
    );

    // The pool is empty, so Alice's first block only carries her reward.
    ledger.mine_pending_transactions(alice.address());
    info!("Alice's balance: {}", ledger.balance_of(alice.address()));

    let mut transfer = Transaction::new(alice.address().clone(), bob.address().clone(), 50.0);
    transfer.sign(&alice)?;
    ledger.add_transaction(transfer)?;
    ledger.mine_pending_transactions(alice.address());

    info!("Alice's balance: {}", ledger.balance_of(alice.address()));
    info!("Bob's balance:   {}", ledger.balance_of(bob.address()));
    info!("Chain valid: {}", ledger.is_valid());

    Ok(())
}
