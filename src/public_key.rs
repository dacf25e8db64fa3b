use ed25519_dalek::{Signature, SigningKey, Verifier, VerifyingKey, PUBLIC_KEY_LENGTH};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// The identity of an output's owner: the raw bytes of an ed25519 verifying key.
/// Whoever spends an output must sign the spending input with the matching signing key.
#[derive(Debug, Copy, Clone, Hash, Serialize, Deserialize, Eq, PartialEq, Ord, PartialOrd)]
pub struct PublicKey([u8; PUBLIC_KEY_LENGTH]);

impl PublicKey {
    pub const fn new(raw_bytes: [u8; PUBLIC_KEY_LENGTH]) -> Self {
        Self(raw_bytes)
    }

    pub fn from_signing_key(signing_key: &SigningKey) -> Self {
        Self(signing_key.verifying_key().to_bytes())
    }

    /// Returns true iff `signature` is a valid signature of `message` by this key.
    /// Keys that are not valid curve points and signatures of the wrong length never verify.
    pub fn verify_signature(&self, message: &[u8], signature: &[u8]) -> bool {
        let verifying_key = match VerifyingKey::from_bytes(&self.0) {
            Ok(key) => key,
            Err(_) => return false,
        };
        match Signature::from_slice(signature) {
            Ok(signature) => verifying_key.verify(message, &signature).is_ok(),
            Err(_) => false,
        }
    }
}

impl Display for PublicKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}
