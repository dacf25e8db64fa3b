use std::error::Error;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    let matches = scroogecoin_lib::commands::app().get_matches();

    let default_level = if matches.is_present("verbose") {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match matches.subcommand() {
        Some(("select", matches)) => scroogecoin_lib::commands::run_select_command(matches),
        Some(("validate", matches)) => scroogecoin_lib::commands::run_validate_command(matches),
        Some(("demo", matches)) => scroogecoin_lib::commands::run_demo_command(matches),
        _ => panic!("Should report help."),
    }
}
