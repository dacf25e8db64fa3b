use crate::{Transaction, TransactionOutput, Utxo};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A pool of confirmed and unspent transaction outputs.
/// Cloning the pool produces an independent copy, so trial runs can mutate it freely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<PoolEntry>", into = "Vec<PoolEntry>")]
pub struct UtxoPool {
    // Unspent transaction outputs, indexed by their transaction ID and their index in the
    // transaction.
    utxos: HashMap<Utxo, TransactionOutput>,
}

impl UtxoPool {
    pub fn new() -> Self {
        Self {
            utxos: HashMap::new(),
        }
    }

    /// Adds a mapping from `utxo` to `output`, replacing any output it mapped to before.
    pub fn add_utxo(&mut self, utxo: Utxo, output: TransactionOutput) {
        self.utxos.insert(utxo, output);
    }

    pub fn remove_utxo(&mut self, utxo: &Utxo) -> Option<TransactionOutput> {
        self.utxos.remove(utxo)
    }

    /// Returns the output `utxo` refers to, or `None` if it is spent or never existed.
    pub fn get(&self, utxo: &Utxo) -> Option<&TransactionOutput> {
        self.utxos.get(utxo)
    }

    pub fn contains(&self, utxo: &Utxo) -> bool {
        self.utxos.contains_key(utxo)
    }

    /// All unspent outputs in ascending order.
    pub fn all_utxos(&self) -> Vec<Utxo> {
        let mut utxos = self.utxos.keys().copied().collect::<Vec<Utxo>>();
        utxos.sort();
        utxos
    }

    pub fn len(&self) -> usize {
        self.utxos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.utxos.is_empty()
    }

    /// Spends every output claimed by `transaction` and adds every output it creates.
    /// The caller is responsible for checking that the transaction is valid against this pool.
    pub fn apply_transaction(&mut self, transaction: &Transaction) {
        for input in transaction.inputs() {
            self.utxos.remove(&input.utxo());
        }
        for (utxo, output) in transaction.produced_utxos() {
            self.utxos.insert(utxo, output.clone());
        }
    }
}

/// JSON objects can't be keyed by a struct, so the pool is serialized as a list of entries.
#[derive(Serialize, Deserialize)]
struct PoolEntry {
    utxo: Utxo,
    output: TransactionOutput,
}

impl From<Vec<PoolEntry>> for UtxoPool {
    fn from(entries: Vec<PoolEntry>) -> Self {
        Self {
            utxos: entries
                .into_iter()
                .map(|entry| (entry.utxo, entry.output))
                .collect(),
        }
    }
}

impl From<UtxoPool> for Vec<PoolEntry> {
    fn from(pool: UtxoPool) -> Self {
        let mut entries = pool
            .utxos
            .into_iter()
            .map(|(utxo, output)| PoolEntry { utxo, output })
            .collect::<Vec<PoolEntry>>();
        entries.sort_by(|lhs, rhs| lhs.utxo.cmp(&rhs.utxo));
        entries
    }
}
