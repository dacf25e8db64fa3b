use crate::{Coin, PublicKey, Sha256, Utxo};
use ed25519_dalek::{Signer, SigningKey};
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};
use thiserror::Error;

/// A double SHA-256 hash of the transaction data.
#[derive(Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Copy, Clone, Serialize, Deserialize)]
pub struct TransactionId(Sha256);

impl Display for TransactionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TransactionId {
    pub fn new(data: Sha256) -> Self {
        Self(data)
    }
}

#[derive(Error, Debug)]
pub enum TransactionError {
    #[error("input index {index} is out of range for a transaction with {len} inputs")]
    InputOutOfRange { index: usize, len: usize },
    #[error("failed to encode transaction: {0}")]
    Encoding(#[from] bincode::Error),
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct TransactionInput {
    // 32 bytes. The hash of the transaction containing the output to be spent.
    prev_tx_hash: TransactionId,
    // The position of the spent output in that transaction, the first one is 0.
    output_index: u32,
    // Signature over `Transaction::raw_data_to_sign` for this input, by the owner of the
    // referenced output. Empty until the input is signed.
    signature: Vec<u8>,
}

impl Display for TransactionInput {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.prev_tx_hash, self.output_index)
    }
}

impl TransactionInput {
    pub fn new(prev_tx_hash: TransactionId, output_index: u32) -> Self {
        Self {
            prev_tx_hash,
            output_index,
            signature: vec![],
        }
    }

    pub fn spending(utxo: &Utxo) -> Self {
        Self::new(*utxo.tx_hash(), utxo.index())
    }

    pub fn prev_tx_hash(&self) -> &TransactionId {
        &self.prev_tx_hash
    }

    pub fn output_index(&self) -> u32 {
        self.output_index
    }

    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// The output this input claims.
    pub fn utxo(&self) -> Utxo {
        Utxo::new(self.prev_tx_hash, self.output_index)
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct TransactionOutput {
    value: Coin,
    // The owner of the output, i.e. the key that must sign any input spending it.
    address: PublicKey,
}

impl Display for TransactionOutput {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.value, self.address)
    }
}

impl TransactionOutput {
    pub fn new(value: Coin, address: PublicKey) -> Self {
        Self { value, address }
    }

    pub fn value(&self) -> Coin {
        self.value
    }

    pub fn address(&self) -> &PublicKey {
        &self.address
    }
}

/// The part of a transaction that input `i` signs: the claimed output and every output of the
/// transaction. Signatures of other inputs are not covered, so inputs can be signed in any order.
#[derive(Serialize)]
struct SigningPayload<'a> {
    prev_tx_hash: &'a TransactionId,
    output_index: u32,
    outputs: &'a [TransactionOutput],
}

/// Transaction contents as they are serialized and hashed. The id is always derived from these.
#[derive(Serialize, Deserialize)]
struct RawTransaction {
    inputs: Vec<TransactionInput>,
    outputs: Vec<TransactionOutput>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawTransaction", into = "RawTransaction")]
pub struct Transaction {
    id: TransactionId,
    inputs: Vec<TransactionInput>,
    outputs: Vec<TransactionOutput>,
}

impl Transaction {
    pub fn new(
        inputs: Vec<TransactionInput>,
        outputs: Vec<TransactionOutput>,
    ) -> Result<Self, TransactionError> {
        let mut transaction = Self {
            id: TransactionId(Sha256::from_raw([0; 32])),
            inputs,
            outputs,
        };
        transaction.id = transaction.compute_id()?;
        Ok(transaction)
    }

    pub fn id(&self) -> &TransactionId {
        &self.id
    }

    pub fn inputs(&self) -> &[TransactionInput] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[TransactionOutput] {
        &self.outputs
    }

    /// The identities of the outputs this transaction creates once it is accepted.
    pub fn produced_utxos(&self) -> impl Iterator<Item = (Utxo, &TransactionOutput)> {
        let id = self.id;
        self.outputs
            .iter()
            .enumerate()
            .map(move |(index, output)| (Utxo::new(id, index as u32), output))
    }

    /// Sum of all output values, or `None` if it overflows.
    pub fn output_sum(&self) -> Option<Coin> {
        self.outputs
            .iter()
            .try_fold(Coin::zero(), |sum, output| sum.checked_add(output.value))
    }

    /// Returns the bytes that the owner of the output claimed by input `index` must sign.
    pub fn raw_data_to_sign(&self, index: usize) -> Result<Vec<u8>, TransactionError> {
        let input = self
            .inputs
            .get(index)
            .ok_or(TransactionError::InputOutOfRange {
                index,
                len: self.inputs.len(),
            })?;
        let payload = SigningPayload {
            prev_tx_hash: &input.prev_tx_hash,
            output_index: input.output_index,
            outputs: &self.outputs,
        };
        Ok(bincode::serialize(&payload)?)
    }

    /// Serializes the complete transaction, including signatures.
    pub fn raw_tx(&self) -> Result<Vec<u8>, TransactionError> {
        let raw = RawTransactionRef {
            inputs: &self.inputs,
            outputs: &self.outputs,
        };
        Ok(bincode::serialize(&raw)?)
    }

    /// Sets the signature of input `index`. The transaction id changes because it covers
    /// signatures.
    pub fn add_signature(
        &mut self,
        index: usize,
        signature: Vec<u8>,
    ) -> Result<(), TransactionError> {
        let len = self.inputs.len();
        let input = self
            .inputs
            .get_mut(index)
            .ok_or(TransactionError::InputOutOfRange { index, len })?;
        input.signature = signature;
        self.id = self.compute_id()?;
        Ok(())
    }

    /// Signs input `index` with the given key.
    pub fn sign_input(
        &mut self,
        index: usize,
        signing_key: &SigningKey,
    ) -> Result<(), TransactionError> {
        let message = self.raw_data_to_sign(index)?;
        let signature = signing_key.sign(&message);
        self.add_signature(index, signature.to_bytes().to_vec())
    }

    fn compute_id(&self) -> Result<TransactionId, TransactionError> {
        Ok(TransactionId(Sha256::double_digest(&self.raw_tx()?)))
    }
}

// Borrowing twin of `RawTransaction`, so hashing does not clone the inputs and outputs.
#[derive(Serialize)]
struct RawTransactionRef<'a> {
    inputs: &'a [TransactionInput],
    outputs: &'a [TransactionOutput],
}

impl TryFrom<RawTransaction> for Transaction {
    type Error = TransactionError;

    fn try_from(raw: RawTransaction) -> Result<Self, Self::Error> {
        Transaction::new(raw.inputs, raw.outputs)
    }
}

impl From<Transaction> for RawTransaction {
    fn from(transaction: Transaction) -> Self {
        Self {
            inputs: transaction.inputs,
            outputs: transaction.outputs,
        }
    }
}

impl PartialEq for Transaction {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Transaction {}

impl Hash for Transaction {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Display for Transaction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] -> [{}]",
            self.id,
            self.inputs
                .iter()
                .map(TransactionInput::to_string)
                .collect::<Vec<String>>()
                .join(", "),
            self.outputs
                .iter()
                .map(TransactionOutput::to_string)
                .collect::<Vec<String>>()
                .join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(seed: u8) -> SigningKey {
        SigningKey::from_bytes(&[seed; 32])
    }

    fn genesis_id() -> TransactionId {
        TransactionId::new(Sha256::digest(b"genesis"))
    }

    fn unsigned_transaction() -> Transaction {
        let bob = PublicKey::from_signing_key(&key(2));
        Transaction::new(
            vec![
                TransactionInput::new(genesis_id(), 0),
                TransactionInput::new(genesis_id(), 1),
            ],
            vec![TransactionOutput::new(Coin::new(7), bob)],
        )
        .unwrap()
    }

    #[test]
    fn signing_payload_excludes_signatures() {
        let mut transaction = unsigned_transaction();
        let before = transaction.raw_data_to_sign(1).unwrap();
        transaction.sign_input(0, &key(1)).unwrap();
        assert_eq!(transaction.raw_data_to_sign(1).unwrap(), before);
    }

    #[test]
    fn signing_payload_differs_per_input() {
        let transaction = unsigned_transaction();
        assert_ne!(
            transaction.raw_data_to_sign(0).unwrap(),
            transaction.raw_data_to_sign(1).unwrap()
        );
    }

    #[test]
    fn signing_payload_rejects_unknown_input() {
        let transaction = unsigned_transaction();
        assert!(matches!(
            transaction.raw_data_to_sign(2),
            Err(TransactionError::InputOutOfRange { index: 2, len: 2 })
        ));
    }

    #[test]
    fn signature_changes_the_id() {
        let mut transaction = unsigned_transaction();
        let unsigned_id = *transaction.id();
        transaction.sign_input(0, &key(1)).unwrap();
        assert_ne!(*transaction.id(), unsigned_id);

        let message = transaction.raw_data_to_sign(0).unwrap();
        let signature = transaction.inputs()[0].signature();
        assert!(PublicKey::from_signing_key(&key(1)).verify_signature(&message, signature));
    }

    #[test]
    fn id_is_a_stable_function_of_contents() {
        assert_eq!(unsigned_transaction().id(), unsigned_transaction().id());
    }

    #[test]
    fn produced_utxos_are_keyed_by_id_and_position() {
        let transaction = unsigned_transaction();
        let produced: Vec<Utxo> = transaction.produced_utxos().map(|(utxo, _)| utxo).collect();
        assert_eq!(produced, vec![Utxo::new(*transaction.id(), 0)]);
    }

    #[test]
    fn json_round_trip_recomputes_id() {
        let mut transaction = unsigned_transaction();
        transaction.sign_input(0, &key(1)).unwrap();
        let json = serde_json::to_string(&transaction).unwrap();
        let decoded: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.id(), transaction.id());
        assert_eq!(decoded.inputs(), transaction.inputs());
    }
}
