use statesweep::session::{run_session, SessionError};

use tracing::{debug, trace};
use tracing_subscriber::{filter, prelude::*};

use clap::{Arg, ArgMatches, Command};

fn cli() -> Command {
    Command::new("statesweep")
        .about("reads a finite automaton interactively and reports its unreachable and dead states")
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbosity")
                .num_args(0..=1)
                .require_equals(true)
                .value_parser(["info", "debug", "trace"])
                .default_missing_value("info"),
        )
}

fn setup_logging(matches: &ArgMatches) {
    let Ok(Some(verbosity)) = matches.try_get_one::<String>("verbosity") else {
        return;
    };

    let level = match verbosity.as_str() {
        "trace" => filter::LevelFilter::TRACE,
        "debug" => filter::LevelFilter::DEBUG,
        "info" => filter::LevelFilter::INFO,
        _ => unreachable!(),
    };

    let stderr_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(stderr_log.with_filter(level))
        .init();

    trace!("setup {level} logging");
}

pub fn main() {
    let matches = cli().get_matches();

    setup_logging(&matches);

    debug!("reading automaton from stdin");
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();

    match run_session(stdin.lock(), stdout.lock()) {
        Ok(()) => {}
        // already rendered as an Error: line by the session
        Err(SessionError::Build(_)) => std::process::exit(1),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
