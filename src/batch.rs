use crate::{
    Coin, PublicKey, Sha256, Transaction, TransactionError, TransactionId, TransactionInput,
    TransactionOutput, Utxo, UtxoPool,
};
use ed25519_dalek::SigningKey;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("failed to access batch file: {0}")]
    Io(#[from] io::Error),
    #[error("malformed batch: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Transaction(#[from] TransactionError),
}

/// One epoch worth of input: the pool the ledger starts from and the transactions offered to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Batch {
    pub pool: UtxoPool,
    pub candidates: Vec<Transaction>,
}

impl Batch {
    pub fn from_json_file(path: &Path) -> Result<Self, BatchError> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn to_json_file(&self, path: &Path) -> Result<(), BatchError> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// A small batch that exercises every outcome: a spend and a spend of its output, a more
    /// generous spend competing for the same output, an independent spend, a forged signature
    /// and an overspend. Keys are derived from `seed`.
    pub fn demo(seed: u64) -> Result<Self, BatchError> {
        let mut rng = StdRng::seed_from_u64(seed);
        let alice = SigningKey::from_bytes(&rng.gen::<[u8; 32]>());
        let bob = SigningKey::from_bytes(&rng.gen::<[u8; 32]>());
        let carol = SigningKey::from_bytes(&rng.gen::<[u8; 32]>());
        let to = |value: i64, key: &SigningKey| {
            TransactionOutput::new(Coin::new(value), PublicKey::from_signing_key(key))
        };

        let mut pool = UtxoPool::new();
        let alice_coins = Utxo::new(genesis_id(seed, "alice"), 0);
        let bob_coins = Utxo::new(genesis_id(seed, "bob"), 0);
        pool.add_utxo(alice_coins, to(10, &alice));
        pool.add_utxo(bob_coins, to(6, &bob));

        let alice_to_bob = spend(&[(alice_coins, &alice)], vec![to(9, &bob)])?;
        let alice_to_carol = spend(&[(alice_coins, &alice)], vec![to(5, &carol)])?;
        let bob_forwards = spend(
            &[(Utxo::new(*alice_to_bob.id(), 0), &bob)],
            vec![to(8, &carol)],
        )?;
        let bob_to_alice = spend(&[(bob_coins, &bob)], vec![to(4, &alice)])?;
        let forged = spend(&[(bob_coins, &carol)], vec![to(6, &carol)])?;
        let overspend = spend(&[(bob_coins, &bob)], vec![to(7, &carol)])?;

        Ok(Self {
            pool,
            candidates: vec![
                alice_to_bob,
                alice_to_carol,
                bob_forwards,
                bob_to_alice,
                forged,
                overspend,
            ],
        })
    }
}

fn genesis_id(seed: u64, owner: &str) -> TransactionId {
    TransactionId::new(Sha256::digest(format!("genesis {} {}", seed, owner).as_bytes()))
}

fn spend(
    claims: &[(Utxo, &SigningKey)],
    outputs: Vec<TransactionOutput>,
) -> Result<Transaction, TransactionError> {
    let inputs = claims
        .iter()
        .map(|(utxo, _)| TransactionInput::spending(utxo))
        .collect();
    let mut transaction = Transaction::new(inputs, outputs)?;
    for (index, (_, key)) in claims.iter().enumerate() {
        transaction.sign_input(index, key)?;
    }
    Ok(transaction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MaxFeeTxHandler, RejectReason, SelectionParams, TxHandler, TxValidator};

    #[test]
    fn demo_is_deterministic() {
        let first = Batch::demo(3).unwrap();
        let second = Batch::demo(3).unwrap();
        assert_eq!(first.pool, second.pool);
        assert_eq!(first.candidates, second.candidates);
    }

    #[test]
    fn demo_candidates_fail_for_the_intended_reasons() {
        let batch = Batch::demo(1).unwrap();
        let results = batch
            .candidates
            .iter()
            .map(|transaction| TxValidator::validate(transaction, &batch.pool))
            .collect::<Vec<Result<Coin, RejectReason>>>();

        assert_eq!(results[0], Ok(Coin::new(1)));
        assert_eq!(results[1], Ok(Coin::new(5)));
        assert!(matches!(results[2], Err(RejectReason::MissingUtxo { .. })));
        assert_eq!(results[3], Ok(Coin::new(2)));
        assert!(matches!(
            results[4],
            Err(RejectReason::InvalidSignature { .. })
        ));
        assert!(matches!(
            results[5],
            Err(RejectReason::ValueNotConserved { .. })
        ));
    }

    #[test]
    fn max_fee_handler_beats_basic_handler_on_demo() {
        let batch = Batch::demo(1).unwrap();

        let mut basic = TxHandler::new(&batch.pool);
        let accepted = basic.handle_txs(&batch.candidates);
        assert_eq!(
            accepted,
            vec![
                batch.candidates[0].clone(),
                batch.candidates[2].clone(),
                batch.candidates[3].clone()
            ]
        );

        let mut max_fee = MaxFeeTxHandler::with_params(
            &batch.pool,
            SelectionParams {
                trials: 1,
                seed: Some(0),
            },
        );
        let accepted = max_fee.handle_txs(&batch.candidates);
        assert_eq!(
            accepted,
            vec![batch.candidates[1].clone(), batch.candidates[3].clone()]
        );
    }

    #[test]
    fn json_round_trip() {
        let batch = Batch::demo(5).unwrap();
        let json = serde_json::to_string(&batch).unwrap();
        let decoded: Batch = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.pool, batch.pool);
        assert_eq!(decoded.candidates, batch.candidates);
    }
}
