//! Console front-end for remote-voting ballot eligibility checks.
//! Checks a single series passed on the command line, or reads series
//! line-by-line from stdin until EOF.

use std::fs::File;
use std::io::BufReader;

use clap::{Arg, ArgAction, ArgMatches, Command};
use log::{error, info};
use mongodb::error::Error as DbError;
use thiserror::Error;

use ballot_roll::{
    config::{Config, ConfigError},
    store::{MemoryRollStore, MongoRollStore, RollStore},
    verification::Verifier,
    view::{run_checks, ConsolePresenter, ConsoleSource, Presenter, RunError},
};

const PROGRAM_NAME: &str = "ballot-roll";

const ABOUT_TEXT: &str = "Check remote-voting ballot eligibility by passport series.

EXIT CODES:
     0: Check(s) ran to completion.
     2: The supplied series was rejected (empty or wrong length).
 Other: Error (e.g. the roll store was unavailable).";

const SERIES: &str = "SERIES";
const SERIES_HELP: &str = "The passport series to check.\n\
If omitted, series are read line-by-line from stdin until EOF.";

const CONFIG_PATH: &str = "config";
const CONFIG_PATH_HELP: &str = "Path to the TOML config file naming the roll database";

const ROLL_PATH: &str = "roll";
const ROLL_PATH_HELP: &str = "Check against a JSON dump of roll entries\n\
instead of connecting to the configured database";

/// Process exit code for a rejected series in single-check mode.
const REJECTED: i32 = 2;

/// Construct the CLI configuration.
fn cli() -> Command {
    // Make the build dirty when the toml changes.
    include_str!("../Cargo.toml");

    clap::command!(PROGRAM_NAME)
        .about(ABOUT_TEXT)
        .arg(
            Arg::new(SERIES)
                .help(SERIES_HELP)
                .action(ArgAction::Set)
                .required(false),
        )
        .arg(
            Arg::new(CONFIG_PATH)
                .long("config")
                .help(CONFIG_PATH_HELP)
                .action(ArgAction::Set)
                .default_value("BallotRoll.toml"),
        )
        .arg(
            Arg::new(ROLL_PATH)
                .long("roll")
                .help(ROLL_PATH_HELP)
                .action(ArgAction::Set),
        )
}

/// Errors that are critical to the whole program.
#[derive(Debug, Error)]
enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Failed to connect to the roll store: {0}")]
    Connect(#[from] DbError),
    #[error("Failed to read roll dump `{0}`: {1}")]
    DumpIo(String, std::io::Error),
    #[error("Failed to decode roll dump `{0}`: {1}")]
    DumpFormat(String, serde_json::Error),
    #[error(transparent)]
    Run(#[from] RunError),
}

/// Load a JSON dump of roll entries into an in-memory store.
fn load_roll_dump(path: &str) -> Result<MemoryRollStore, Error> {
    let file = File::open(path).map_err(|e| Error::DumpIo(path.to_string(), e))?;
    let entries: Vec<ballot_roll::model::roll::RollEntry> =
        serde_json::from_reader(BufReader::new(file))
            .map_err(|e| Error::DumpFormat(path.to_string(), e))?;
    let store = MemoryRollStore::from_iter(entries);
    info!("Loaded {} roll entries from `{path}`", store.len());
    Ok(store)
}

/// Run the requested checks against the given store.
fn check(store: impl RollStore, matches: &ArgMatches) -> Result<i32, Error> {
    let verifier = Verifier::new(store);
    let mut presenter = ConsolePresenter;
    match matches.get_one::<String>(SERIES) {
        // Single-check mode: one series from the command line.
        Some(raw) => match verifier.verify(raw) {
            Ok(verification) => {
                presenter.present(&verification.message());
                Ok(0)
            }
            Err(err) if err.is_rejection() => {
                presenter.present(&err.to_string());
                Ok(REJECTED)
            }
            Err(err) => Err(RunError::from(err).into()),
        },
        // Interactive mode: series from stdin until EOF.
        None => {
            run_checks(&verifier, &mut ConsoleSource::new(), &mut presenter)?;
            Ok(0)
        }
    }
}

fn run(matches: &ArgMatches) -> Result<i32, Error> {
    match matches.get_one::<String>(ROLL_PATH) {
        Some(path) => check(load_roll_dump(path)?, matches),
        None => {
            let config_path = matches
                .get_one::<String>(CONFIG_PATH)
                .expect("CONFIG_PATH has a default");
            let config = Config::load(config_path)?;
            check(MongoRollStore::connect(&config)?, matches)
        }
    }
}

fn main() {
    // Set up logging.
    log4rs::init_file("log4rs.yaml", Default::default())
        .expect("Failed to initialise logging");

    let matches = cli().get_matches();
    match run(&matches) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            error!("{err}");
            error!("Critical failure, shutting down");
            std::process::exit(1)
        }
    }
}
