use crate::{Coin, Transaction, TxValidator, UtxoPool};
use tracing::{debug, trace};

/// A mutually valid set of transactions, in the order they were accepted, and the sum of
/// their fees.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub transactions: Vec<Transaction>,
    pub total_fee: Coin,
}

/// Repeatedly scans `candidates` in order and accepts every transaction that is valid against
/// the current state of `pool`, applying it to `pool` immediately. Accepting a transaction can
/// make later ones valid (they may spend its outputs), so scanning continues until a full pass
/// accepts nothing. Every pass but the last accepts at least one candidate, so there are at most
/// `candidates.len() + 1` passes.
pub fn accept_until_fixed_point<'a, I>(candidates: I, pool: &mut UtxoPool) -> Selection
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut pending = candidates.into_iter().collect::<Vec<&Transaction>>();
    let mut selection = Selection::default();
    let mut pass = 0;

    loop {
        pass += 1;
        let pending_before = pending.len();
        pending.retain(|transaction| match TxValidator::validate(transaction, pool) {
            Ok(fee) => {
                pool.apply_transaction(transaction);
                selection.total_fee = selection.total_fee.saturating_add(fee);
                selection.transactions.push((*transaction).clone());
                false
            }
            Err(reason) => {
                trace!("Pass {}: {} not accepted: {}", pass, transaction.id(), reason);
                true
            }
        });
        let accepted = pending_before - pending.len();
        trace!("Pass {}: accepted {} transactions", pass, accepted);
        if accepted == 0 {
            break;
        }
    }

    for transaction in pending {
        debug!(
            "Rejected {}: {}",
            transaction.id(),
            TxValidator::validate(transaction, pool)
                .err()
                .map(|reason| reason.to_string())
                .unwrap_or_default()
        );
    }
    selection
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{signed, LedgerFixture};
    use crate::Utxo;

    #[test]
    fn accepts_child_listed_before_its_parent() {
        let ledger = LedgerFixture::with_genesis(10);
        let parent = ledger.spend(&ledger.genesis, 1, &[(9, 2)]);
        let child = signed(&[(Utxo::new(*parent.id(), 0), 2)], &[(7, 3)]);

        let mut pool = ledger.pool.clone();
        let selection = accept_until_fixed_point(&[child.clone(), parent.clone()], &mut pool);

        assert_eq!(selection.transactions, vec![parent, child.clone()]);
        assert_eq!(selection.total_fee, Coin::new(3));
        assert_eq!(pool.len(), 1);
        assert!(pool.contains(&Utxo::new(*child.id(), 0)));
    }

    #[test]
    fn conflicting_spends_accept_only_the_first() {
        let ledger = LedgerFixture::with_genesis(10);
        let first = ledger.spend(&ledger.genesis, 1, &[(9, 2)]);
        let second = ledger.spend(&ledger.genesis, 1, &[(5, 3)]);

        let mut pool = ledger.pool.clone();
        let selection = accept_until_fixed_point(&[first.clone(), second], &mut pool);

        assert_eq!(selection.transactions, vec![first]);
        assert_eq!(selection.total_fee, Coin::new(1));
    }

    #[test]
    fn empty_candidates_leave_pool_unchanged() {
        let ledger = LedgerFixture::with_genesis(10);
        let mut pool = ledger.pool.clone();
        let candidates: Vec<Transaction> = vec![];

        let selection = accept_until_fixed_point(&candidates, &mut pool);

        assert_eq!(selection, Selection::default());
        assert_eq!(pool, ledger.pool);
    }
}
