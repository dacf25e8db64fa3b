//! Helpers for building signed transactions in tests.

use crate::{
    Coin, PublicKey, Sha256, Transaction, TransactionId, TransactionInput, TransactionOutput, Utxo,
    UtxoPool,
};
use ed25519_dalek::SigningKey;

pub fn key(seed: u8) -> SigningKey {
    SigningKey::from_bytes(&[seed; 32])
}

pub fn address(seed: u8) -> PublicKey {
    PublicKey::from_signing_key(&key(seed))
}

pub fn pay(value: i64, owner_seed: u8) -> TransactionOutput {
    TransactionOutput::new(Coin::new(value), address(owner_seed))
}

/// Builds a transaction spending `claims`, each signed by the key with the given seed.
pub fn signed(claims: &[(Utxo, u8)], outputs: &[(i64, u8)]) -> Transaction {
    let mut transaction = Transaction::new(
        claims
            .iter()
            .map(|(utxo, _)| TransactionInput::spending(utxo))
            .collect(),
        outputs
            .iter()
            .map(|(value, owner)| pay(*value, *owner))
            .collect(),
    )
    .unwrap();
    for (index, (_, signer)) in claims.iter().enumerate() {
        transaction.sign_input(index, &key(*signer)).unwrap();
    }
    transaction
}

/// A pool with a single genesis output owned by key 1.
pub struct LedgerFixture {
    pub pool: UtxoPool,
    pub genesis: Utxo,
}

impl LedgerFixture {
    pub fn with_genesis(value: i64) -> Self {
        let mut pool = UtxoPool::new();
        let genesis = Utxo::new(TransactionId::new(Sha256::digest(b"genesis")), 0);
        pool.add_utxo(genesis, pay(value, 1));
        Self { pool, genesis }
    }

    /// Adds another output owned by `owner_seed`, identified by `name`.
    pub fn fund(&mut self, name: &str, value: i64, owner_seed: u8) -> Utxo {
        let utxo = Utxo::new(TransactionId::new(Sha256::digest(name.as_bytes())), 0);
        self.pool.add_utxo(utxo, pay(value, owner_seed));
        utxo
    }

    pub fn spend(&self, utxo: &Utxo, signer: u8, outputs: &[(i64, u8)]) -> Transaction {
        signed(&[(*utxo, signer)], outputs)
    }
}
