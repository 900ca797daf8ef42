/*
 * Copyright (C) 2024 Clownvin <123clownvin@gmail.com>
 *
 * This file is part of Vocabr.
 *
 * Vocabr is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Vocabr is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Vocabr.  If not, see <http://www.gnu.org/licenses/>.
 */

use std::{
    ffi::OsStr,
    fmt::{Debug, Display},
    fs,
    ops::Deref,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use serde::Deserialize;

///Review state of a single item. Only the functions in `srs` move an item
///between states.
#[derive(Deserialize, Clone, Copy, PartialEq, Eq, Debug, Default)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    New,
    Review,
    Learned,
}

impl Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::New => "new",
            Self::Review => "review",
            Self::Learned => "learned",
        })
    }
}

///A single vocabulary card. Ids are only unique within the owning deck.
///
///Example:
///```
///# use vocabr::deck::{Item, Status};
///let json = r#"{
///  "id": 1,
///  "word": "apple",
///  "translation": "maçã",
///  "exampleEn": "I eat an apple every morning.",
///  "examplePt": "Eu como uma maçã todas as manhãs."
///}"#;
///assert!(serde_json::from_str::<Item>(json)
///  .is_ok_and(|item| item.status() == Status::New && item.next_review().is_none()));
///```
#[derive(Deserialize, Clone, PartialEq, Eq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: u32,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub topic: String,
    pub word: String,
    pub translation: String,
    #[serde(rename = "exampleEn", default)]
    pub example_in_source: String,
    #[serde(rename = "examplePt", default)]
    pub example_in_target: String,
    #[serde(default)]
    pub(crate) status: Status,
    #[serde(default)]
    pub(crate) next_review: Option<NaiveDate>,
}

impl Item {
    pub fn new(id: u32, word: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            id,
            level: String::new(),
            topic: String::new(),
            word: word.into(),
            translation: translation.into(),
            example_in_source: String::new(),
            example_in_target: String::new(),
            status: Status::New,
            next_review: None,
        }
    }

    pub fn with_examples(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.example_in_source = source.into();
        self.example_in_target = target.into();
        self
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn next_review(&self) -> Option<NaiveDate> {
        self.next_review
    }
}

///Identity of a deck and of its stats record.
#[derive(Deserialize, PartialEq, Eq, Hash, Clone, Debug)]
pub struct DeckKey {
    pub level: String,
    pub topic: String,
}

impl DeckKey {
    pub fn new(level: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            topic: topic.into(),
        }
    }

    ///Key used to order decks for enumeration: `level` immediately followed by `topic`.
    pub fn sort_key(&self) -> String {
        format!("{}{}", self.level, self.topic)
    }
}

///Formats as `level:topic`, the key stats are stored under.
impl Display for DeckKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{}:{}", self.level, self.topic))
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum DeckOrigin {
    #[default]
    Source,
    DailyRandom,
    Mixed,
    Mega,
}

///Represents a named deck of vocabulary items under one (level, topic) identity.
///Items that leave `level` or `topic` out inherit them from the deck.
///
///Example:
///```
///# use vocabr::deck::Deck;
///let json = r#"{
///  "level": "A1",
///  "topic": "food",
///  "label": "Comida e bebida",
///  "items": [
///    { "id": 1, "word": "apple", "translation": "maçã" },
///    { "id": 2, "word": "bread", "translation": "pão" }
///  ]
///}"#;
///assert!(serde_json::from_str::<Deck>(json)
///  .is_ok_and(|deck| deck.topic == "food" && deck.items.len() == 2));
///```
#[derive(Deserialize, Clone)]
pub struct Deck {
    pub level: String,
    pub topic: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub seed: Option<String>,
    pub items: Vec<Item>,
    #[serde(skip)]
    pub(crate) origin: DeckOrigin,
}

impl Deck {
    pub fn new(level: impl Into<String>, topic: impl Into<String>, items: Vec<Item>) -> Self {
        let mut deck = Self {
            level: level.into(),
            topic: topic.into(),
            label: String::new(),
            seed: None,
            items,
            origin: DeckOrigin::Source,
        };
        deck.normalize();
        deck
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub(crate) fn derived(
        key: DeckKey,
        label: String,
        items: Vec<Item>,
        origin: DeckOrigin,
    ) -> Self {
        Self {
            level: key.level,
            topic: key.topic,
            label,
            seed: None,
            items,
            origin,
        }
    }

    pub fn key(&self) -> DeckKey {
        DeckKey::new(self.level.clone(), self.topic.clone())
    }

    pub fn origin(&self) -> DeckOrigin {
        self.origin
    }

    pub fn is_source(&self) -> bool {
        self.origin == DeckOrigin::Source
    }

    pub(crate) fn normalize(&mut self) {
        if self.label.is_empty() {
            self.label = format!("{} – {}", self.level, self.topic);
        }

        for item in self.items.iter_mut() {
            if item.level.is_empty() {
                item.level.clone_from(&self.level);
            }
            if item.topic.is_empty() {
                item.topic.clone_from(&self.topic);
            }
        }
    }

    pub(crate) fn validate(&self) -> Result<(), DeckError> {
        if self.level.trim().is_empty() || self.topic.trim().is_empty() {
            return Err(DeckError::MissingIdentity(Box::new(self.clone())));
        }

        let invalid = |err| Err(DeckError::InvalidItem(self.key(), err));

        if let Some(item) = self.items.iter().find(|item| item.id == 0) {
            return invalid(ItemError::ZeroId(item.word.clone()));
        }

        let mut seen_ids = Vec::with_capacity(self.items.len());
        if let Some(item) = self.items.iter().find(|item| {
            if seen_ids.contains(&item.id) {
                true
            } else {
                seen_ids.push(item.id);
                false
            }
        }) {
            return invalid(ItemError::DuplicateId(item.id));
        }

        if let Some(item) = self.items.iter().find(|item| item.word.trim().is_empty()) {
            return invalid(ItemError::EmptyWord(item.id));
        }

        if let Some(item) = self
            .items
            .iter()
            .find(|item| (item.status == Status::New) != item.next_review.is_none())
        {
            return invalid(ItemError::InconsistentState(item.id, item.status));
        }

        Ok(())
    }
}

impl Debug for Deck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Deck")
            .field("level", &self.level)
            .field("topic", &self.topic)
            .field("label", &self.label)
            .field("origin", &self.origin)
            .field("items", &self.items.len())
            .finish()
    }
}

impl PartialEq for Deck {
    fn eq(&self, other: &Self) -> bool {
        self.level == other.level && self.topic == other.topic
    }
}

impl Deref for Deck {
    type Target = [Item];

    fn deref(&self) -> &Self::Target {
        &self.items
    }
}

#[derive(Debug)]
pub enum DeckError {
    IoError(PathBuf, std::io::Error),
    SerdeError(PathBuf, serde_json::Error),
    MissingIdentity(Box<Deck>),
    InvalidItem(DeckKey, ItemError),
}

impl Display for DeckError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IoError(path, err) => f.write_fmt(format_args!(
                "IoError: {err}, path: {}",
                path.to_str().unwrap_or("unknown")
            )),
            Self::SerdeError(path, err) => f.write_fmt(format_args!(
                "SerdeError: {err}, path: {}",
                path.to_str().unwrap_or("unknown")
            )),
            Self::MissingIdentity(deck) => f.write_fmt(format_args!(
                "MissingIdentity: Deck \"{}\" needs both a level and a topic, has level \"{}\" and topic \"{}\"",
                deck.label, deck.level, deck.topic
            )),
            Self::InvalidItem(key, err) => f.write_fmt(format_args!(
                "InvalidItem: Deck \"{key}\" contains an invalid item: {err}"
            )),
        }
    }
}

#[derive(Debug)]
pub enum ItemError {
    ZeroId(String),
    DuplicateId(u32),
    EmptyWord(u32),
    InconsistentState(u32, Status),
}

impl Display for ItemError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroId(word) => f.write_fmt(format_args!(
                "Item \"{word}\" has id 0, ids start at 1"
            )),
            Self::DuplicateId(id) => {
                f.write_fmt(format_args!("More than one item has id {id}"))
            }
            Self::EmptyWord(id) => f.write_fmt(format_args!("Item #{id} has an empty word")),
            Self::InconsistentState(id, status) => f.write_fmt(format_args!(
                "Item #{id} has status \"{status}\" but its next review date does not match"
            )),
        }
    }
}

const BUILTIN_DECKS: [(&str, &str); 4] = [
    ("builtin:a1-people", include_str!("../decks/a1-people.json")),
    ("builtin:a1-food", include_str!("../decks/a1-food.json")),
    ("builtin:a2-people", include_str!("../decks/a2-people.json")),
    ("builtin:a2-food", include_str!("../decks/a2-food.json")),
];

///Source decks compiled into the binary, in registration order.
pub fn builtin_decks() -> Result<Vec<Deck>, DeckError> {
    BUILTIN_DECKS
        .iter()
        .map(|(name, json)| parse_deck(json, PathBuf::from(name)))
        .collect()
}

pub fn load_decks<P: Into<PathBuf>>(
    paths: impl IntoIterator<Item = P>,
) -> Result<Vec<Deck>, DeckError> {
    paths.into_iter().try_fold(vec![], |mut decks, path| {
        decks.extend(load_decks_from_path(path.into())?.into_iter().flatten());
        Ok(decks)
    })
}

fn load_decks_from_path(path: PathBuf) -> Result<Option<Vec<Deck>>, DeckError> {
    let metadata = fs::metadata(&path).map_err(|err| DeckError::IoError(path.clone(), err))?;

    if metadata.is_dir() {
        load_decks_from_dir(path).map(Some)
    } else if file_extension(&path).is_some_and(|ext| ext.to_lowercase() == "json") {
        load_deck_from_file(path).map(|deck| Some(vec![deck]))
    } else {
        Ok(None)
    }
}

fn file_extension(path: &Path) -> Option<&str> {
    path.extension().and_then(OsStr::to_str)
}

fn load_decks_from_dir(path: PathBuf) -> Result<Vec<Deck>, DeckError> {
    let mut files = fs::read_dir(&path)
        .map_err(|err| DeckError::IoError(path, err))?
        .filter_map(|file| file.ok())
        .map(|file| file.path())
        .collect::<Vec<_>>();
    // read_dir order is platform dependent, and registration order feeds the derived decks
    files.sort();

    let len = files.len();
    files
        .into_iter()
        .try_fold(Vec::with_capacity(len), |mut decks, file| {
            decks.extend(load_decks_from_path(file)?.into_iter().flatten());
            Ok(decks)
        })
}

fn load_deck_from_file(path: PathBuf) -> Result<Deck, DeckError> {
    let json = fs::read_to_string(&path).map_err(|err| DeckError::IoError(path.clone(), err))?;
    parse_deck(&json, path)
}

fn parse_deck(json: &str, path: PathBuf) -> Result<Deck, DeckError> {
    let mut deck: Deck =
        serde_json::from_str(json).map_err(|err| DeckError::SerdeError(path, err))?;
    deck.normalize();
    Ok(deck)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{builtin_decks, load_decks, Deck, DeckError, Item, ItemError, Status};

    #[test]
    fn deserialize_deck_inherits_identity() {
        let deck_json = r#"
        {
            "level": "A1",
            "topic": "food",
            "items": [
                {
                    "id": 1,
                    "word": "apple",
                    "translation": "maçã",
                    "exampleEn": "I eat an apple every morning.",
                    "examplePt": "Eu como uma maçã todas as manhãs.",
                    "status": "new",
                    "nextReview": null
                }
            ]
        }"#;

        let mut deck: Deck =
            serde_json::from_str(deck_json).expect("Unable to parse deck from example string");
        deck.normalize();
        assert_eq!(deck.len(), 1);
        assert_eq!(deck.label, "A1 – food");
        assert_eq!(deck[0].level, "A1");
        assert_eq!(deck[0].topic, "food");
        assert_eq!(deck[0].example_in_target, "Eu como uma maçã todas as manhãs.");
        assert!(deck.is_source());
    }

    #[test]
    fn deserialize_item_with_review_date() {
        let item: Item = serde_json::from_str(
            r#"{"id": 4, "word": "milk", "translation": "leite", "status": "review", "nextReview": "2024-01-03"}"#,
        )
        .expect("Unable to parse item");
        assert_eq!(item.status(), Status::Review);
        assert_eq!(item.next_review(), NaiveDate::from_ymd_opt(2024, 1, 3));
    }

    #[test]
    fn builtin_decks_are_valid() {
        let decks = builtin_decks().expect("Unable to parse builtin decks");
        assert_eq!(decks.len(), 4);
        assert!(decks.iter().all(|deck| deck.validate().is_ok()));
        assert_eq!(decks[0].key().to_string(), "A1:people");
        assert_eq!(decks[1].key().to_string(), "A1:food");
    }

    #[test]
    fn load_decks_from_files() {
        let decks = load_decks(vec!["./tests/a1-colors.json", "./tests/dir"])
            .expect("Unable to load decks from files");
        assert_eq!(decks.len(), 3);
    }

    #[test]
    fn load_decks_from_dir_is_sorted() {
        let decks = load_decks(vec!["./tests/dir"]).expect("Unable to load decks from directory");
        let topics = decks.iter().map(|deck| deck.topic.as_str()).collect::<Vec<_>>();
        assert_eq!(topics, ["travel", "weather"]);
    }

    #[test]
    fn load_decks_from_non_deck_file() {
        let decks = load_decks(vec!["./tests/dir/notes.txt"])
            .expect("Unable to load deck from random file");
        assert!(decks.is_empty());
    }

    #[test]
    fn load_decks_from_empty_folder() {
        let dir = tempfile::tempdir().expect("Unable to create temp dir");
        let decks = load_decks(vec![dir.path()]).expect("Unable to load decks from directory");
        assert!(decks.is_empty());
    }

    #[test]
    fn load_decks_missing_path() {
        assert!(load_decks(vec!["./tests/does_not_exist.json"])
            .is_err_and(|err| matches!(err, DeckError::IoError(_, _))));
    }

    #[test]
    fn load_decks_malformed_file() {
        assert!(load_decks(vec!["./tests/malformed.json"])
            .is_err_and(|err| matches!(err, DeckError::SerdeError(_, _))));
    }

    #[test]
    fn validate_missing_identity() {
        let deck = Deck::new("A1", "  ", vec![Item::new(1, "apple", "maçã")]);
        assert!(deck
            .validate()
            .is_err_and(|err| matches!(err, DeckError::MissingIdentity(_))));
    }

    #[test]
    fn validate_duplicate_item_id() {
        let deck = Deck::new(
            "A1",
            "food",
            vec![Item::new(1, "apple", "maçã"), Item::new(1, "bread", "pão")],
        );
        assert!(deck.validate().is_err_and(|err| matches!(
            err,
            DeckError::InvalidItem(_, ItemError::DuplicateId(1))
        )));
    }

    #[test]
    fn validate_zero_id() {
        let deck = Deck::new("A1", "food", vec![Item::new(0, "apple", "maçã")]);
        assert!(deck.validate().is_err_and(|err| matches!(
            err,
            DeckError::InvalidItem(_, ItemError::ZeroId(_))
        )));
    }

    #[test]
    fn validate_inconsistent_state() {
        let mut item = Item::new(1, "apple", "maçã");
        item.status = Status::Learned;
        let deck = Deck::new("A1", "food", vec![item]);
        assert!(deck.validate().is_err_and(|err| matches!(
            err,
            DeckError::InvalidItem(_, ItemError::InconsistentState(1, Status::Learned))
        )));
    }
}
