use crate::{accept_until_fixed_point, Coin, RejectReason, Transaction, TxValidator, UtxoPool};
use tracing::info;

/// A public ledger that accepts every transaction it can, in the order they are offered.
pub struct TxHandler {
    utxo_pool: UtxoPool,
}

impl TxHandler {
    /// Creates a ledger whose current pool is a copy of `utxo_pool`.
    pub fn new(utxo_pool: &UtxoPool) -> Self {
        Self {
            utxo_pool: utxo_pool.clone(),
        }
    }

    pub fn utxo_pool(&self) -> &UtxoPool {
        &self.utxo_pool
    }

    pub fn validate_tx(&self, transaction: &Transaction) -> Result<Coin, RejectReason> {
        TxValidator::validate(transaction, &self.utxo_pool)
    }

    pub fn is_valid_tx(&self, transaction: &Transaction) -> bool {
        TxValidator::is_valid(transaction, &self.utxo_pool)
    }

    /// Handles one epoch: accepts a mutually valid subset of `possible_txs`, applies it to the
    /// pool and returns it in acceptance order. The subset is maximal (no remaining candidate is
    /// valid afterwards) but not necessarily the one with the highest fees.
    pub fn handle_txs(&mut self, possible_txs: &[Transaction]) -> Vec<Transaction> {
        let selection = accept_until_fixed_point(possible_txs, &mut self.utxo_pool);
        info!(
            "Accepted {} of {} transactions, total fee: {}",
            selection.transactions.len(),
            possible_txs.len(),
            selection.total_fee
        );
        selection.transactions
    }
}
