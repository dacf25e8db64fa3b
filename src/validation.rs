use crate::{Coin, Transaction, Utxo, UtxoPool};
use std::collections::HashSet;
use thiserror::Error;

/// Why a transaction can't be accepted against a pool.
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum RejectReason {
    #[error("input {index} claims {utxo} which is not in the pool")]
    MissingUtxo { index: usize, utxo: Utxo },
    #[error("input {index} claims {utxo} which an earlier input already claims")]
    DuplicateClaim { index: usize, utxo: Utxo },
    #[error("input {index} is not signed by the owner of {utxo}")]
    InvalidSignature { index: usize, utxo: Utxo },
    #[error("output {index} has negative value: {value}")]
    NegativeOutput { index: usize, value: Coin },
    #[error("outputs ({outputs}) exceed inputs ({inputs})")]
    ValueNotConserved { inputs: Coin, outputs: Coin },
    #[error("sum of values overflows")]
    ValueOverflow,
}

/// Responsible for checking a transaction against a snapshot of the unspent outputs.
/// Validation never mutates the pool.
pub struct TxValidator {}

impl TxValidator {
    /// Returns the fee of `transaction` if all of the following hold:
    ///   - every claimed output is in `pool`,
    ///   - no output is claimed twice by the transaction,
    ///   - every input is signed by the owner of the output it claims,
    ///   - every output value is non-negative,
    ///   - input values sum to at least the output values.
    /// Inputs are checked one at a time, so the reported reason belongs to the first failing
    /// input.
    pub fn validate(transaction: &Transaction, pool: &UtxoPool) -> Result<Coin, RejectReason> {
        let mut claimed = HashSet::new();
        let mut input_sum = Coin::zero();

        for (index, input) in transaction.inputs().iter().enumerate() {
            let utxo = input.utxo();
            let previous_output = pool
                .get(&utxo)
                .ok_or(RejectReason::MissingUtxo { index, utxo })?;
            if !claimed.insert(utxo) {
                return Err(RejectReason::DuplicateClaim { index, utxo });
            }
            Self::validate_signature(transaction, index, utxo, pool)?;
            input_sum = input_sum
                .checked_add(previous_output.value())
                .ok_or(RejectReason::ValueOverflow)?;
        }

        let mut output_sum = Coin::zero();
        for (index, output) in transaction.outputs().iter().enumerate() {
            if output.value().is_negative() {
                return Err(RejectReason::NegativeOutput {
                    index,
                    value: output.value(),
                });
            }
            output_sum = output_sum
                .checked_add(output.value())
                .ok_or(RejectReason::ValueOverflow)?;
        }

        if input_sum < output_sum {
            return Err(RejectReason::ValueNotConserved {
                inputs: input_sum,
                outputs: output_sum,
            });
        }
        // Both sums are non-negative, so the difference can't overflow.
        Ok(input_sum - output_sum)
    }

    pub fn is_valid(transaction: &Transaction, pool: &UtxoPool) -> bool {
        Self::validate(transaction, pool).is_ok()
    }

    /// Sum of the claimed outputs that are in `pool` minus the sum of the transaction's outputs.
    /// Unlike `validate`, this never fails: it is used to rank candidates before any of them is
    /// accepted, so the result is negative for transactions that spend more than they claim.
    pub fn fee(transaction: &Transaction, pool: &UtxoPool) -> Coin {
        let input_sum = transaction
            .inputs()
            .iter()
            .filter_map(|input| pool.get(&input.utxo()))
            .fold(Coin::zero(), |sum, output| {
                sum.checked_add(output.value()).unwrap_or(Coin::new(i64::MAX))
            });
        let output_sum = transaction.output_sum().unwrap_or(Coin::new(i64::MAX));
        input_sum
            .checked_sub(output_sum)
            .unwrap_or(Coin::new(i64::MIN))
    }

    // The signature must come from the owner of the output being spent, not from the spender's
    // own outputs.
    fn validate_signature(
        transaction: &Transaction,
        index: usize,
        utxo: Utxo,
        pool: &UtxoPool,
    ) -> Result<(), RejectReason> {
        let invalid = RejectReason::InvalidSignature { index, utxo };
        let owner = pool.get(&utxo).ok_or(invalid.clone())?.address();
        let message = transaction
            .raw_data_to_sign(index)
            .map_err(|_| invalid.clone())?;
        if owner.verify_signature(&message, transaction.inputs()[index].signature()) {
            Ok(())
        } else {
            Err(invalid)
        }
    }
}
