use crate::TransactionId;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Identifies an unspent transaction output: the transaction that created it and the
/// position of the output in that transaction.
/// Ordered by the transaction hash first and by the output index second.
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Utxo {
    tx_hash: TransactionId,
    index: u32,
}

impl Utxo {
    pub const fn new(tx_hash: TransactionId, index: u32) -> Self {
        Self { tx_hash, index }
    }

    pub fn tx_hash(&self) -> &TransactionId {
        &self.tx_hash
    }

    pub fn index(&self) -> u32 {
        self.index
    }
}

impl Display for Utxo {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.tx_hash, self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Sha256;
    use std::collections::HashSet;

    #[test]
    fn equality_is_structural() {
        let tx_hash = TransactionId::new(Sha256::digest(b"tx"));
        let mut seen = HashSet::new();
        assert!(seen.insert(Utxo::new(tx_hash, 0)));
        assert!(!seen.insert(Utxo::new(tx_hash, 0)));
        assert!(seen.insert(Utxo::new(tx_hash, 1)));
    }

    #[test]
    fn ordered_by_hash_then_index() {
        let low = TransactionId::new(Sha256::from_raw([0; 32]));
        let high = TransactionId::new(Sha256::from_raw([1; 32]));
        let mut utxos = vec![Utxo::new(high, 0), Utxo::new(low, 2), Utxo::new(low, 1)];
        utxos.sort();
        assert_eq!(
            utxos,
            vec![Utxo::new(low, 1), Utxo::new(low, 2), Utxo::new(high, 0)]
        );
    }
}
