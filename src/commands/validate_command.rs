use crate::{Batch, TxValidator};
use clap::{Arg, ArgMatches, Command};
use std::error::Error;
use std::path::PathBuf;

struct ValidateCliOptions {
    batch: PathBuf,
}

impl ValidateCliOptions {
    pub fn parse(matches: &ArgMatches) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            batch: PathBuf::from(matches.value_of("batch").ok_or("Missing batch file.")?),
        })
    }
}

pub fn validate_command() -> Command<'static> {
    Command::new("validate")
        .version("0.1")
        .about("Validates each candidate of a batch on its own against the initial pool.")
        .arg(
            Arg::new("batch")
                .short('b')
                .long("batch")
                .value_name("FILE")
                .help("JSON file with the initial pool and the candidate transactions.")
                .takes_value(true)
                .required(true),
        )
}

pub fn run_validate_command(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let options = ValidateCliOptions::parse(matches)?;
    let batch = Batch::from_json_file(&options.batch)?;
    for transaction in &batch.candidates {
        match TxValidator::validate(transaction, &batch.pool) {
            Ok(fee) => println!("{}: valid, fee: {}", transaction.id(), fee),
            Err(reason) => println!("{}: invalid, {}", transaction.id(), reason),
        }
    }
    Ok(())
}
