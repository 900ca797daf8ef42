use std::{fmt::Display, panic::AssertUnwindSafe};

use chrono::Local;
use clap::Parser;

use deck::DeckError;
use modes::review::review;
use study::{Study, Tally};
use terminal::TerminalWrapper;

mod cli;
pub mod deck;
pub mod derive;
mod event;
mod logging;
mod modes;
pub mod random;
pub mod registry;
pub mod session;
pub mod srs;
pub mod stats;
pub mod store;
pub mod study;
mod terminal;

///Parses the command line and runs the requested front end. `None` means
///nothing was studied (`--list`).
pub fn run() -> Result<Option<Tally>, VocabrError> {
    let cli = cli::VocabrCli::parse();
    let data_dir = cli.resolve_data_dir();
    logging::init(data_dir.as_deref().ok());
    let data_dir = match data_dir {
        Ok(dir) => Some(dir),
        Err(err) => {
            // No data dir means no log file, so this goes to stderr.
            log::warn!("{err}");
            None
        }
    };

    let mut study = Study::open(cli.study_config(data_dir), Local::now().date_naive())?;

    if cli.list {
        print_decks(&study);
        return Ok(None);
    }

    std::panic::catch_unwind(AssertUnwindSafe(|| -> Result<Tally, VocabrError> {
        //NOTE: From this point, stdout/stderr will not be usable, hence we
        //need to catch any panics, since they are not loggable. Mapping to
        //VocabrError allows us to gracefully exit and log the panic.
        let term = &mut TerminalWrapper::new()?;
        review(term, &mut study)?;
        Ok(study.finish())
    }))
    .map_err(|err| {
        VocabrError::Panic({
            let message = if let Some(msg) = err.downcast_ref::<String>() {
                msg.clone()
            } else if let Some(msg) = err.downcast_ref::<&str>() {
                (*msg).to_owned()
            } else {
                "Unknown panic occurred".to_owned()
            };
            log::error!("Panicked: {message}");
            message
        })
    })?
    .map(Some)
}

fn print_decks(study: &Study) {
    for deck in study.decks() {
        let metrics = study.metrics_for(deck);
        println!(
            "{:<28} {:<18} {:>3} items  learned {:>3}  reviewed {:>3}  progress {:>3}%  accuracy {:>3}%",
            deck.label,
            deck.key().to_string(),
            metrics.total_items,
            metrics.learned,
            metrics.reviewed,
            metrics.progress_percent,
            metrics.accuracy_percent,
        );
    }
}

#[derive(Debug)]
pub enum VocabrError {
    Deck(Box<DeckError>),
    Ui(UiError),
    Panic(String),
}

impl Display for VocabrError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Deck(err) => f.write_fmt(format_args!("Deck: {err}")),
            Self::Ui(err) => f.write_fmt(format_args!("Ui: {err}")),
            Self::Panic(err) => f.write_fmt(format_args!("Panicked: {err}")),
        }
    }
}

impl From<DeckError> for VocabrError {
    fn from(err: DeckError) -> Self {
        Self::Deck(Box::new(err))
    }
}

impl From<UiError> for VocabrError {
    fn from(err: UiError) -> Self {
        Self::Ui(err)
    }
}

#[derive(Debug)]
pub enum UiError {
    IoError(std::io::Error),
}

impl Display for UiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IoError(err) => f.write_fmt(format_args!("IoError: {err}")),
        }
    }
}

impl From<std::io::Error> for UiError {
    fn from(err: std::io::Error) -> Self {
        UiError::IoError(err)
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use crate::{deck::DeckError, UiError, VocabrError};

    #[test]
    fn error_display() {
        let err: VocabrError = UiError::from(io::Error::new(io::ErrorKind::Other, "gone")).into();
        assert_eq!(err.to_string(), "Ui: IoError: gone");

        let err: VocabrError = DeckError::IoError(
            "missing.json".into(),
            io::Error::new(io::ErrorKind::NotFound, "no file"),
        )
        .into();
        assert!(err.to_string().starts_with("Deck: "));
        assert!(err.to_string().contains("missing.json"));
    }
}
