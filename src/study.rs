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

use std::path::PathBuf;

use chrono::NaiveDate;

use crate::{
    deck::{builtin_decks, load_decks, Deck, DeckError, DeckKey, Item},
    derive::{build_derived_decks, DeriveOptions},
    registry::DeckRegistry,
    session::{Mode, ReviewSession},
    srs::{self, Decision},
    stats::{DeckMetrics, StatsStore},
    store::{FileStore, KeyValueStore, MemoryStore},
};

///Everything needed to open a study session.
#[derive(Clone, Debug, Default)]
pub struct StudyConfig {
    pub paths: Vec<PathBuf>,
    pub builtin: bool,
    pub derive: DeriveOptions,
    pub deck: Option<DeckKey>,
    pub mode: Mode,
    ///Where the durable store lives. `None` keeps stats in memory only.
    pub data_dir: Option<PathBuf>,
}

///Decisions made since the session was opened.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Tally {
    pub learned: usize,
    pub reviewed: usize,
}

impl Tally {
    pub fn total(&self) -> usize {
        self.learned + self.reviewed
    }
}

///Owns the registry, stats and session, and is the only surface a front end
///talks to.
pub struct Study {
    registry: DeckRegistry,
    stats: StatsStore,
    session: ReviewSession,
    tally: Tally,
}

impl Study {
    pub fn new(registry: DeckRegistry, stats: StatsStore, session: ReviewSession) -> Self {
        Self {
            registry,
            stats,
            session,
            tally: Tally::default(),
        }
    }

    ///Registers the source decks, derives the synthetic ones for `today`, loads
    ///stats and points the session at the configured deck (or the first one listed).
    pub fn open(config: StudyConfig, today: NaiveDate) -> Result<Self, DeckError> {
        let mut registry = DeckRegistry::new();
        if config.builtin {
            registry.register_all(builtin_decks()?);
        }
        registry.register_all(load_decks(config.paths)?);
        build_derived_decks(&mut registry, &config.derive, today);

        let store: Box<dyn KeyValueStore> = match config.data_dir {
            Some(dir) => Box::new(FileStore::new(dir)),
            None => {
                log::warn!("No data directory available, stats will not outlive this session");
                Box::new(MemoryStore::new())
            }
        };
        let stats = StatsStore::load(store);

        let deck = config
            .deck
            .or_else(|| registry.list_all().first().map(|deck| deck.key()));
        if let Some(key) = deck.as_ref().filter(|key| !registry.contains(key)) {
            log::warn!("Deck {key} is not registered");
        }

        Ok(Self::new(registry, stats, ReviewSession::new(deck, config.mode)))
    }

    pub fn registry(&self) -> &DeckRegistry {
        &self.registry
    }

    pub fn stats(&self) -> &StatsStore {
        &self.stats
    }

    pub fn session(&self) -> &ReviewSession {
        &self.session
    }

    pub fn tally(&self) -> Tally {
        self.tally
    }

    pub fn decks(&self) -> Vec<&Deck> {
        self.registry.list_all()
    }

    pub fn active_deck(&self) -> Option<&Deck> {
        self.session.deck().and_then(|key| self.registry.get(key))
    }

    pub fn active_items(&self) -> Vec<&Item> {
        self.session.active_items(&self.registry)
    }

    pub fn current_item(&mut self) -> Option<&Item> {
        let position = self.session.current_position(&self.registry)?;
        self.active_deck()?.items.get(position)
    }

    ///One-based place of the current item among the active ones, and how many there are.
    pub fn progress(&mut self) -> Option<(usize, usize)> {
        self.session.current_position(&self.registry)?;
        let len = self.session.active_positions(&self.registry).len();
        Some((self.session.cursor() + 1, len))
    }

    pub fn metrics(&self) -> DeckMetrics {
        match self.session.deck() {
            Some(key) => {
                let items = self.registry.get(key).map(|deck| &deck.items[..]).unwrap_or(&[]);
                self.stats.metrics(key, items)
            }
            None => DeckMetrics::default(),
        }
    }

    pub fn metrics_for(&self, deck: &Deck) -> DeckMetrics {
        self.stats.metrics(&deck.key(), &deck.items)
    }

    ///Saves the stats one last time and returns the decisions made. Save
    ///failures are logged, never returned.
    pub fn finish(&mut self) -> Tally {
        self.stats.flush();
        self.tally
    }

    pub fn mark_learned(&mut self, today: NaiveDate) -> bool {
        self.decide(Decision::Learned, today)
    }

    pub fn mark_review(&mut self, today: NaiveDate) -> bool {
        self.decide(Decision::Review, today)
    }

    ///Applies `decision` to the current item and moves on. Returns `false` when
    ///there was no current item.
    pub fn decide(&mut self, decision: Decision, today: NaiveDate) -> bool {
        let Some(key) = self.session.deck().cloned() else {
            return false;
        };
        let Some(position) = self.session.current_position(&self.registry) else {
            return false;
        };
        let Some(item) = self
            .registry
            .get_mut(&key)
            .and_then(|deck| deck.items.get_mut(position))
        else {
            return false;
        };

        srs::apply(decision, item, &key, &mut self.stats, today);
        match decision {
            Decision::Learned => self.tally.learned += 1,
            Decision::Review => self.tally.reviewed += 1,
        }

        self.session.advance(&self.registry);
        true
    }

    pub fn reset_deck(&mut self) {
        let Some(key) = self.session.deck().cloned() else {
            return;
        };
        match self.registry.get_mut(&key) {
            Some(deck) => srs::reset_deck(deck, &mut self.stats),
            None => self.stats.reset(&key),
        }
        self.session.rewind();
    }

    pub fn switch_deck(&mut self, level: &str, topic: &str) {
        self.session.switch_deck(level, topic);
    }

    pub fn switch_mode(&mut self, mode: Mode) {
        self.session.switch_mode(mode);
    }

    pub fn toggle_mode(&mut self) {
        self.switch_mode(self.session.mode().toggled());
    }

    pub fn next_deck(&mut self) {
        self.cycle_deck(1);
    }

    pub fn prev_deck(&mut self) {
        self.cycle_deck(-1);
    }

    fn cycle_deck(&mut self, step: isize) {
        let keys = self
            .registry
            .list_all()
            .iter()
            .map(|deck| deck.key())
            .collect::<Vec<_>>();
        if keys.is_empty() {
            return;
        }

        let len = keys.len() as isize;
        let next = match self
            .session
            .deck()
            .and_then(|current| keys.iter().position(|key| key == current))
        {
            Some(index) => (index as isize + step).rem_euclid(len),
            None => 0,
        };

        let key = &keys[next as usize];
        self.session.switch_deck(&key.level, &key.topic);
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::{
        deck::{DeckKey, Status},
        derive::DeriveOptions,
        session::Mode,
    };

    use super::{Study, StudyConfig, Tally};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).expect("Invalid test date")
    }

    fn config(deck: Option<DeckKey>) -> StudyConfig {
        StudyConfig {
            paths: vec![],
            builtin: true,
            derive: DeriveOptions::default(),
            deck,
            mode: Mode::All,
            data_dir: None,
        }
    }

    fn open(level: &str, topic: &str) -> Study {
        Study::open(config(Some(DeckKey::new(level, topic))), today())
            .expect("Unable to open study")
    }

    #[test]
    fn open_registers_sources_and_derived() {
        let study = open("A1", "food");
        let keys = study
            .decks()
            .iter()
            .map(|deck| deck.key().to_string())
            .collect::<Vec<_>>();
        assert_eq!(
            keys,
            [
                "A1+A2:mega-a1-a2",
                "A1:food",
                "A1:mixed",
                "A1:people",
                "A1:random-a1",
                "A2:food",
                "A2:people",
            ]
        );
        assert_eq!(study.registry().find("A1", "random-a1").map(|d| d.len()), Some(13));
    }

    #[test]
    fn open_defaults_to_first_listed_deck() {
        let study = Study::open(config(None), today()).expect("Unable to open study");
        assert_eq!(
            study.session().deck(),
            Some(&DeckKey::new("A1+A2", "mega-a1-a2"))
        );
        assert_eq!(study.active_items().len(), 21);
    }

    #[test]
    fn open_with_extra_paths() {
        let mut config = config(None);
        config.paths = vec!["./tests/a1-colors.json".into(), "./tests/duplicate_ids.json".into()];
        let study = Study::open(config, today()).expect("Unable to open study");

        assert!(study.registry().find("A1", "colors").is_some());
        assert!(study.registry().find("A1", "numbers").is_none());
        assert_eq!(study.registry().find("A1", "random-a1").map(|d| d.len()), Some(16));
    }

    #[test]
    fn decisions_update_item_stats_and_cursor() {
        let mut study = open("A1", "food");

        assert_eq!(study.current_item().map(|item| item.word.clone()).as_deref(), Some("apple"));
        assert!(study.mark_learned(today()));
        assert_eq!(study.current_item().map(|item| item.word.clone()).as_deref(), Some("bread"));
        assert!(study.mark_review(today()));
        assert!(study.mark_learned(today()));
        assert!(study.mark_learned(today()));

        let metrics = study.metrics();
        assert_eq!((metrics.learned, metrics.reviewed), (3, 1));
        assert_eq!(metrics.accuracy_percent, 75);
        assert_eq!(metrics.progress_percent, 100);
        assert_eq!(study.tally(), Tally { learned: 3, reviewed: 1 });

        let statuses = study
            .active_deck()
            .map(|deck| deck.items.iter().map(|item| item.status()).collect::<Vec<_>>())
            .unwrap_or_default();
        assert_eq!(statuses, [Status::Learned, Status::Review, Status::Learned]);
    }

    #[test]
    fn derived_deck_keeps_its_own_stats() {
        let mut study = open("A1", "random-a1");
        assert!(study.mark_review(today()));

        assert_eq!(study.stats().record(&DeckKey::new("A1", "random-a1")).reviewed, 1);
        assert_eq!(study.stats().record(&DeckKey::new("A1", "food")).reviewed, 0);
        assert!(study
            .registry()
            .iter()
            .filter(|deck| deck.is_source())
            .all(|deck| deck.items.iter().all(|item| item.status() == Status::New)));
    }

    #[test]
    fn review_only_mode() {
        let mut study = open("A1", "food");
        study.mark_learned(today());
        study.mark_review(today());

        study.switch_mode(Mode::ReviewOnly);
        assert_eq!(study.active_items().len(), 1);
        assert_eq!(study.progress(), Some((1, 1)));
        assert_eq!(study.current_item().map(|item| item.word.clone()).as_deref(), Some("bread"));
        assert_eq!(study.metrics().review_count, 1);

        assert!(study.mark_learned(today()));
        assert!(study.current_item().is_none());
        assert!(!study.mark_review(today()));
    }

    #[test]
    fn reset_deck_clears_state() {
        let mut study = open("A1", "food");
        study.mark_learned(today());
        study.mark_review(today());

        study.reset_deck();
        assert_eq!(study.session().cursor(), 0);
        assert_eq!(study.metrics().learned, 0);
        assert_eq!(study.metrics().reviewed, 0);
        assert!(study.active_items().iter().all(|item| item.status() == Status::New));
    }

    #[test]
    fn unknown_deck_is_empty_state() {
        let mut study = open("A1", "nonexistent");
        assert!(study.active_items().is_empty());
        assert!(study.current_item().is_none());
        assert!(study.progress().is_none());
        assert!(!study.mark_learned(today()));
        assert_eq!(study.metrics().total_items, 0);
    }

    #[test]
    fn cycling_decks_follows_list_order() {
        let mut study = open("A1", "food");
        study.next_deck();
        assert_eq!(study.session().deck(), Some(&DeckKey::new("A1", "mixed")));
        study.prev_deck();
        study.prev_deck();
        assert_eq!(
            study.session().deck(),
            Some(&DeckKey::new("A1+A2", "mega-a1-a2"))
        );
        study.prev_deck();
        assert_eq!(study.session().deck(), Some(&DeckKey::new("A2", "people")));

        study.switch_deck("A1", "nonexistent");
        study.next_deck();
        assert_eq!(
            study.session().deck(),
            Some(&DeckKey::new("A1+A2", "mega-a1-a2"))
        );
    }

    #[test]
    fn stats_persist_between_opens() {
        let dir = tempfile::tempdir().expect("Unable to create temp dir");
        let mut with_dir = config(Some(DeckKey::new("A1", "people")));
        with_dir.data_dir = Some(dir.path().to_path_buf());

        {
            let mut study = Study::open(with_dir.clone(), today()).expect("Unable to open study");
            study.mark_learned(today());
            study.mark_learned(today());
        }

        let study = Study::open(with_dir, today()).expect("Unable to open study");
        assert_eq!(study.metrics().learned, 2);
        assert_eq!(study.metrics().progress_percent, 20);
        assert!(study.active_items().iter().all(|item| item.status() == Status::New));
    }

    #[test]
    fn unwritable_store_keeps_session_going() {
        let dir = tempfile::tempdir().expect("Unable to create temp dir");
        let not_a_dir = dir.path().join("not_a_dir");
        std::fs::write(&not_a_dir, "").expect("Unable to create file");

        let mut blocked = config(Some(DeckKey::new("A1", "people")));
        blocked.data_dir = Some(not_a_dir);

        let mut study = Study::open(blocked, today()).expect("Unable to open study");
        assert!(study.mark_learned(today()));
        assert!(study.mark_review(today()));
        assert_eq!(study.metrics().learned, 1);
        assert_eq!(study.metrics().reviewed, 1);

        assert_eq!(
            study.finish(),
            Tally {
                learned: 1,
                reviewed: 1
            }
        );
        assert_eq!(study.metrics().learned, 1);
    }
}
