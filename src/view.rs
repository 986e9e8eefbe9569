use std::io::{self, BufRead, Write};

use log::warn;
use thiserror::Error;

use crate::{store::RollStore, verification::Verifier};

/// Supplies raw passport series, one per check.
///
/// The verifier's caller owns the input surface; the core never reads input
/// itself.
pub trait SeriesSource {
    /// The next raw series, or `None` once the source is exhausted.
    fn next_series(&mut self) -> io::Result<Option<String>>;
}

/// Consumes rendered check messages.
pub trait Presenter {
    fn present(&mut self, message: &str);
}

/// Errors that abort a check loop. Input rejections are presented and do not
/// abort, so they never appear here.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Failed to read input: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Store(#[from] crate::error::Error),
}

/// Drive the verifier over every series the source supplies.
///
/// Rejected inputs (empty or malformed series) are presented to the user and
/// the loop moves on: the next request is independent of the last. A store
/// failure aborts the loop, since every further check would hit the same
/// unavailable store.
pub fn run_checks<S, I, P>(
    verifier: &Verifier<S>,
    source: &mut I,
    presenter: &mut P,
) -> Result<(), RunError>
where
    S: RollStore,
    I: SeriesSource,
    P: Presenter,
{
    while let Some(raw) = source.next_series()? {
        match verifier.verify(&raw) {
            Ok(verification) => presenter.present(&verification.message()),
            Err(err) if err.is_rejection() => {
                warn!("Rejected input: {err}");
                presenter.present(&err.to_string());
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

/// Reads one series per line from standard input.
pub struct ConsoleSource {
    stdin: io::Stdin,
}

impl ConsoleSource {
    pub fn new() -> Self {
        Self { stdin: io::stdin() }
    }
}

impl Default for ConsoleSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SeriesSource for ConsoleSource {
    fn next_series(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        let bytes = self.stdin.lock().read_line(&mut line)?;
        if bytes == 0 {
            Ok(None)
        } else {
            Ok(Some(line))
        }
    }
}

/// Writes messages to standard output, one per line.
#[derive(Debug, Default)]
pub struct ConsolePresenter;

impl Presenter for ConsolePresenter {
    fn present(&mut self, message: &str) {
        // Best-effort: a closed stdout is not worth aborting a check over.
        let _ = writeln!(io::stdout(), "{message}");
    }
}
