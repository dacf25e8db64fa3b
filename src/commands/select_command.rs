use crate::{
    Batch, Coin, MaxFeeTxHandler, SelectionParams, Transaction, TxHandler, TxValidator, UtxoPool,
};
use clap::{Arg, ArgMatches, Command};
use std::error::Error;
use std::path::PathBuf;

struct SelectCliOptions {
    batch: PathBuf,
    max_fee: bool,
    params: SelectionParams,
    pool_out: Option<PathBuf>,
}

impl SelectCliOptions {
    pub fn parse(matches: &ArgMatches) -> Result<Self, Box<dyn Error>> {
        let seed = match matches.value_of("seed") {
            Some(seed) => Some(seed.parse::<u64>()?),
            None => None,
        };
        Ok(Self {
            batch: PathBuf::from(matches.value_of("batch").ok_or("Missing batch file.")?),
            max_fee: matches.is_present("max-fee"),
            params: SelectionParams {
                trials: matches.value_of_t::<usize>("trials")?,
                seed,
            },
            pool_out: matches.value_of("pool-out").map(PathBuf::from),
        })
    }
}

pub fn select_command() -> Command<'static> {
    Command::new("select")
        .version("0.1")
        .about("Selects a mutually valid set of transactions from a batch and applies it.")
        .arg(
            Arg::new("batch")
                .short('b')
                .long("batch")
                .value_name("FILE")
                .help("JSON file with the initial pool and the candidate transactions.")
                .takes_value(true)
                .required(true),
        )
        .arg(
            Arg::new("max-fee")
                .long("max-fee")
                .help("Search for the set with the highest total fee instead of accepting greedily."),
        )
        .arg(
            Arg::new("trials")
                .long("trials")
                .value_name("COUNT")
                .help("Number of orderings the fee-maximizing search tries.")
                .takes_value(true)
                .default_value("200"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_name("SEED")
                .help("Seed for the randomized orderings, for reproducible runs.")
                .takes_value(true)
                .required(false),
        )
        .arg(
            Arg::new("pool-out")
                .long("pool-out")
                .value_name("FILE")
                .help("Writes the resulting pool as JSON to this file.")
                .takes_value(true)
                .required(false),
        )
}

pub fn run_select_command(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let options = SelectCliOptions::parse(matches)?;
    let batch = Batch::from_json_file(&options.batch)?;

    let (accepted, pool) = if options.max_fee {
        let mut handler = MaxFeeTxHandler::with_params(&batch.pool, options.params);
        let accepted = handler.handle_txs(&batch.candidates);
        (accepted, handler.utxo_pool().clone())
    } else {
        let mut handler = TxHandler::new(&batch.pool);
        let accepted = handler.handle_txs(&batch.candidates);
        (accepted, handler.utxo_pool().clone())
    };

    print_report(&batch, &accepted, &pool);
    if let Some(path) = options.pool_out {
        std::fs::write(path, serde_json::to_string_pretty(&pool)?)?;
    }
    Ok(())
}

fn print_report(batch: &Batch, accepted: &[Transaction], pool: &UtxoPool) {
    // Fees are recomputed against the initial pool replayed in acceptance order.
    let mut replay = batch.pool.clone();
    let mut total_fee = Coin::zero();
    for transaction in accepted {
        if let Ok(fee) = TxValidator::validate(transaction, &replay) {
            total_fee = total_fee.saturating_add(fee);
            println!("{} (fee: {})", transaction.id(), fee);
        }
        replay.apply_transaction(transaction);
    }
    println!(
        "Accepted {} of {} transactions, total fee: {}",
        accepted.len(),
        batch.candidates.len(),
        total_fee
    );
    println!("Pool size: {} -> {}", batch.pool.len(), pool.len());
}
