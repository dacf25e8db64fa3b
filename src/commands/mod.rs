pub mod demo_command;
pub mod select_command;
pub mod validate_command;

pub use self::{demo_command::*, select_command::*, validate_command::*};

use clap::{Arg, Command};

pub fn app() -> Command<'static> {
    Command::new("scroogecoin")
        .about("ScroogeCoin transaction handling CLI tools.")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Logs every rejected transaction and every improving trial.")
                .global(true),
        )
        .subcommand(select_command())
        .subcommand(validate_command())
        .subcommand(demo_command())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_defaults_to_two_hundred_trials() {
        let matches = app()
            .try_get_matches_from(vec!["scroogecoin", "select", "--batch", "batch.json"])
            .unwrap();
        let (name, select) = matches.subcommand().unwrap();
        assert_eq!(name, "select");
        assert_eq!(select.value_of_t::<usize>("trials").unwrap(), 200);
        assert!(!select.is_present("max-fee"));
        assert!(!select.is_present("verbose"));
    }

    #[test]
    fn verbose_is_accepted_after_the_subcommand() {
        let matches = app()
            .try_get_matches_from(vec![
                "scroogecoin",
                "select",
                "--batch",
                "batch.json",
                "--max-fee",
                "--seed",
                "9",
                "-v",
            ])
            .unwrap();
        let select = matches.subcommand_matches("select").unwrap();
        assert!(select.is_present("max-fee"));
        assert_eq!(select.value_of("seed"), Some("9"));
        assert!(select.is_present("verbose"));
    }

    #[test]
    fn subcommand_is_required() {
        assert!(app().try_get_matches_from(vec!["scroogecoin"]).is_err());
    }

    #[test]
    fn demo_batch_round_trips_through_a_file() {
        let path = std::env::temp_dir()
            .join(format!("scroogecoin-demo-{}.json", std::process::id()));
        let matches = app()
            .try_get_matches_from(vec![
                "scroogecoin",
                "demo",
                "--out",
                path.to_str().unwrap(),
                "--seed",
                "4",
            ])
            .unwrap();
        run_demo_command(matches.subcommand_matches("demo").unwrap()).unwrap();

        let batch = crate::Batch::from_json_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(batch.candidates, crate::Batch::demo(4).unwrap().candidates);
    }
}
