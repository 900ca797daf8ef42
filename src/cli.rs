use std::path::PathBuf;

use clap::Parser;

use crate::{
    deck::DeckKey,
    derive::DeriveOptions,
    session::Mode,
    store::{default_data_dir, StoreError},
    study::StudyConfig,
};

#[derive(Parser, Debug)]
#[command(name = "vocabr", version = env!("CARGO_PKG_VERSION"))]
pub struct VocabrCli {
    #[arg(short = 'l', long = "level", value_name = "LEVEL", requires = "topic", help = "Level of the deck to open.", long_help = LEVEL_HELP)]
    pub level: Option<String>,
    #[arg(short = 't', long = "topic", value_name = "TOPIC", requires = "level", help = "Topic of the deck to open.", long_help = TOPIC_HELP)]
    pub topic: Option<String>,
    #[arg(short = 'r', long = "review-only", help = "Only show items marked for review.", default_value_t = false)]
    pub review_only: bool,
    #[arg(long = "no-builtin", help = "Skip the built-in decks.", default_value_t = false)]
    pub no_builtin: bool,
    #[arg(long = "daily-level", value_name = "LEVEL", default_value = "A1", help = "Level pooled into the daily and mixed decks.")]
    pub daily_level: String,
    #[arg(long = "mega-levels", value_name = "LEVEL", num_args = 0.., default_values_t = ["A1".to_owned(), "A2".to_owned()], help = "Levels concatenated into the mega deck.", long_help = MEGA_HELP)]
    pub mega_levels: Vec<String>,
    #[arg(long = "data-dir", value_name = "DIR", help = "Directory stats are stored in.", long_help = DATA_DIR_HELP)]
    pub data_dir: Option<PathBuf>,
    #[arg(long = "list", help = "List decks with their stats and exit.", default_value_t = false)]
    pub list: bool,
    #[arg(help = "Deck JSON file/dir paths", long_help = PATHS_HELP)]
    pub paths: Vec<PathBuf>,
}

impl VocabrCli {
    ///Explicit `--data-dir` first, then `~/.config/vocabr`.
    pub fn resolve_data_dir(&self) -> Result<PathBuf, StoreError> {
        match self.data_dir.as_ref() {
            Some(dir) => Ok(dir.clone()),
            None => default_data_dir(),
        }
    }

    pub fn study_config(&self, data_dir: Option<PathBuf>) -> StudyConfig {
        StudyConfig {
            paths: self.paths.clone(),
            builtin: !self.no_builtin,
            derive: DeriveOptions {
                daily_level: self.daily_level.clone(),
                mega_levels: self.mega_levels.clone(),
            },
            deck: self
                .level
                .as_ref()
                .zip(self.topic.as_ref())
                .map(|(level, topic)| DeckKey::new(level, topic)),
            mode: if self.review_only {
                Mode::ReviewOnly
            } else {
                Mode::All
            },
            data_dir,
        }
    }
}

const LEVEL_HELP: &str = r#"Level of the deck to open, used together with --topic.
Example Usage: vocabr -l A1 -t food"#;
const TOPIC_HELP: &str = r#"Topic of the deck to open, used together with --level.
Derived decks use the topics "random-<level>", "mixed" and "mega-<levels>".
Example Usage: vocabr -l A1 -t random-a1"#;
const MEGA_HELP: &str = r#"Levels concatenated, in order, into the mega deck. Pass the flag with no values to skip the mega deck.
Example Usage: vocabr --mega-levels A1 A2 B1"#;
const DATA_DIR_HELP: &str = r#"Directory stats are stored in. Defaults to ~/.config/vocabr. The log file is written here too."#;
const PATHS_HELP: &str = r#"Extra paths to load decks from. Can be individual files or directories."#;

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::{CommandFactory, Parser};

    use crate::{cli, deck::DeckKey, session::Mode};

    #[test]
    fn verify_cli() {
        cli::VocabrCli::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let cli = cli::VocabrCli::parse_from(["vocabr"]);
        let config = cli.study_config(None);
        assert!(config.builtin);
        assert!(config.deck.is_none());
        assert_eq!(config.mode, Mode::All);
        assert_eq!(config.derive.daily_level, "A1");
        assert_eq!(config.derive.mega_levels, ["A1", "A2"]);
    }

    #[test]
    fn deck_and_mode_flags() {
        let cli = cli::VocabrCli::parse_from([
            "vocabr", "-l", "A2", "-t", "food", "-r", "--mega-levels", "A2", "B1", "--",
            "./decks",
        ]);
        let config = cli.study_config(None);
        assert_eq!(config.deck, Some(DeckKey::new("A2", "food")));
        assert_eq!(config.mode, Mode::ReviewOnly);
        assert_eq!(config.derive.mega_levels, ["A2", "B1"]);
        assert_eq!(config.paths.len(), 1);
    }

    #[test]
    fn explicit_data_dir_wins() {
        let cli = cli::VocabrCli::parse_from(["vocabr", "--data-dir", "/tmp/vocabr-data"]);
        assert_eq!(
            cli.resolve_data_dir().ok(),
            Some(PathBuf::from("/tmp/vocabr-data"))
        );
    }

    #[test]
    fn level_requires_topic() {
        assert!(cli::VocabrCli::try_parse_from(["vocabr", "-l", "A1"]).is_err());
    }
}
