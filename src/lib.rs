pub mod batch;
pub mod coin;
pub mod commands;
pub mod hash;
pub mod max_fee_handler;
pub mod public_key;
pub mod selection;
pub mod transaction;
pub mod tx_handler;
pub mod utxo;
pub mod utxo_pool;
pub mod validation;

#[cfg(test)]
mod test_utils;

pub use self::{
    batch::*, coin::*, hash::*, max_fee_handler::*, public_key::*, selection::*, transaction::*,
    tx_handler::*, utxo::*, utxo_pool::*, validation::*,
};
