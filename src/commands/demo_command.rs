use crate::Batch;
use clap::{Arg, ArgMatches, Command};
use std::error::Error;
use std::path::PathBuf;

struct DemoCliOptions {
    out: PathBuf,
    seed: u64,
}

impl DemoCliOptions {
    pub fn parse(matches: &ArgMatches) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            out: PathBuf::from(matches.value_of("out").ok_or("Missing output file.")?),
            seed: matches.value_of_t::<u64>("seed")?,
        })
    }
}

pub fn demo_command() -> Command<'static> {
    Command::new("demo")
        .version("0.1")
        .about("Writes a small demo batch with competing, chained and invalid transactions.")
        .arg(
            Arg::new("out")
                .short('o')
                .long("out")
                .value_name("FILE")
                .help("Where to write the batch.")
                .takes_value(true)
                .required(true),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_name("SEED")
                .help("Seed from which the demo keys are derived.")
                .takes_value(true)
                .default_value("0"),
        )
}

pub fn run_demo_command(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let options = DemoCliOptions::parse(matches)?;
    Batch::demo(options.seed)?.to_json_file(&options.out)?;
    println!("Wrote demo batch to: {}", options.out.display());
    Ok(())
}
