use crate::{
    accept_until_fixed_point, Coin, RejectReason, Selection, Transaction, TxValidator, UtxoPool,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::cmp::Reverse;
use tracing::{info, warn};

pub const DEFAULT_TRIALS: usize = 200;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct SelectionParams {
    // Number of candidate orderings tried per epoch. The first one is always the greedy one, and
    // it runs even when this is 0.
    pub trials: usize,
    // Seeds the shuffles of the randomized trials. Without a seed every epoch uses fresh
    // randomness.
    pub seed: Option<u64>,
}

impl Default for SelectionParams {
    fn default() -> Self {
        Self {
            trials: DEFAULT_TRIALS,
            seed: None,
        }
    }
}

/// The order in which a trial offers the candidates to the fixed-point loop.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TrialOrder {
    /// Highest fee first, with fees computed against the pool before anything is accepted.
    /// Ties keep the order of the batch.
    FeeDescending,
    /// A uniformly random permutation.
    Shuffled,
}

impl TrialOrder {
    fn for_trial(trial: usize) -> Self {
        if trial == 0 {
            TrialOrder::FeeDescending
        } else {
            TrialOrder::Shuffled
        }
    }
}

/// Runs one trial against a private copy of `pool`; `pool` itself is never modified.
pub fn run_trial<R: Rng + ?Sized>(
    candidates: &[Transaction],
    pool: &UtxoPool,
    order: TrialOrder,
    rng: &mut R,
) -> Selection {
    let mut working_pool = pool.clone();
    let mut ordered = candidates.iter().collect::<Vec<&Transaction>>();
    match order {
        TrialOrder::FeeDescending => {
            ordered.sort_by_cached_key(|transaction| {
                Reverse(TxValidator::fee(transaction, &working_pool))
            });
        }
        TrialOrder::Shuffled => ordered.shuffle(rng),
    }
    accept_until_fixed_point(ordered, &mut working_pool)
}

/// A public ledger that, among the mutually valid subsets it finds, accepts the one paying the
/// most fees.
///
/// Finding the best subset exactly is a maximum-weight independent set problem over the graph
/// of transactions sharing a claimed output, so the handler searches instead: a greedy
/// fee-descending trial followed by randomly ordered trials, keeping the best. The result is
/// never worse than the greedy trial alone. When two trials reach the same total fee the
/// earlier one is kept.
pub struct MaxFeeTxHandler {
    utxo_pool: UtxoPool,
    params: SelectionParams,
}

impl MaxFeeTxHandler {
    /// Creates a ledger whose current pool is a copy of `utxo_pool`.
    pub fn new(utxo_pool: &UtxoPool) -> Self {
        Self::with_params(utxo_pool, SelectionParams::default())
    }

    pub fn with_params(utxo_pool: &UtxoPool, params: SelectionParams) -> Self {
        Self {
            utxo_pool: utxo_pool.clone(),
            params,
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

    /// Handles one epoch: searches for the mutually valid subset of `possible_txs` with the
    /// highest total fee, applies it to the pool and returns it in acceptance order.
    pub fn handle_txs(&mut self, possible_txs: &[Transaction]) -> Vec<Transaction> {
        let best = match self.params.seed {
            Some(seed) => self.search(possible_txs, &mut StdRng::seed_from_u64(seed)),
            None => self.search(possible_txs, &mut rand::thread_rng()),
        };
        self.commit(best)
    }

    /// Runs all trials against the current pool without modifying it and returns the best one.
    /// The greedy trial always runs, so the result is never worse than it.
    pub fn search<R: Rng + ?Sized>(
        &self,
        possible_txs: &[Transaction],
        rng: &mut R,
    ) -> Selection {
        let best = (0..self.params.trials.max(1)).fold(None, |best: Option<Selection>, trial| {
            let selection = run_trial(
                possible_txs,
                &self.utxo_pool,
                TrialOrder::for_trial(trial),
                &mut *rng,
            );
            match best {
                Some(best) if selection.total_fee <= best.total_fee => Some(best),
                _ => {
                    info!(
                        "Trial {} improved the total fee to {} with {} transactions",
                        trial,
                        selection.total_fee,
                        selection.transactions.len()
                    );
                    Some(selection)
                }
            }
        });
        best.unwrap_or_default()
    }

    // Replays the winning trial against the live pool. The pool hasn't changed since the trials
    // ran, so every transaction is still valid in this order.
    fn commit(&mut self, best: Selection) -> Vec<Transaction> {
        let mut committed = Vec::with_capacity(best.transactions.len());
        let mut total_fee = Coin::zero();
        for transaction in best.transactions {
            match TxValidator::validate(&transaction, &self.utxo_pool) {
                Ok(fee) => {
                    self.utxo_pool.apply_transaction(&transaction);
                    total_fee = total_fee.saturating_add(fee);
                    committed.push(transaction);
                }
                Err(reason) => warn!("Skipped {} on commit: {}", transaction.id(), reason),
            }
        }
        info!(
            "Committed {} transactions, total fee: {}",
            committed.len(),
            total_fee
        );
        committed
    }
}
