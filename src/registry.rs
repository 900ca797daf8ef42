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

use hashbrown::HashMap;

use crate::deck::{Deck, DeckError, DeckKey};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Registered {
    Inserted,
    AlreadyPresent,
}

///Every known deck, at most one per (level, topic). Decks are kept in
///registration order; `list_all` gives the enumeration order.
#[derive(Default)]
pub struct DeckRegistry {
    decks: Vec<Deck>,
    index: HashMap<DeckKey, usize>,
}

impl DeckRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    ///Registering a key that is already present leaves the registry untouched.
    ///Malformed decks are rejected.
    pub fn register(&mut self, mut deck: Deck) -> Result<Registered, DeckError> {
        let key = deck.key();
        if self.index.contains_key(&key) {
            log::debug!("Deck {key} already registered, ignoring");
            return Ok(Registered::AlreadyPresent);
        }

        deck.normalize();
        deck.validate()?;

        log::debug!("Registered deck {key} with {} items", deck.items.len());
        self.index.insert(key, self.decks.len());
        self.decks.push(deck);
        Ok(Registered::Inserted)
    }

    ///Registers each deck, logging and skipping the ones that are rejected.
    ///Returns how many were inserted.
    pub fn register_all(&mut self, decks: impl IntoIterator<Item = Deck>) -> usize {
        decks
            .into_iter()
            .map(|deck| {
                let label = deck.label.clone();
                match self.register(deck) {
                    Ok(Registered::Inserted) => 1,
                    Ok(Registered::AlreadyPresent) => 0,
                    Err(err) => {
                        log::warn!("Skipping deck \"{label}\": {err}");
                        0
                    }
                }
            })
            .sum()
    }

    pub fn find(&self, level: &str, topic: &str) -> Option<&Deck> {
        self.get(&DeckKey::new(level, topic))
    }

    pub fn get(&self, key: &DeckKey) -> Option<&Deck> {
        self.index.get(key).map(|&i| &self.decks[i])
    }

    pub fn get_mut(&mut self, key: &DeckKey) -> Option<&mut Deck> {
        self.index.get(key).map(|&i| &mut self.decks[i])
    }

    pub fn contains(&self, key: &DeckKey) -> bool {
        self.index.contains_key(key)
    }

    ///Decks ordered by `level` followed directly by `topic`.
    pub fn list_all(&self) -> Vec<&Deck> {
        let mut decks = self.decks.iter().collect::<Vec<_>>();
        decks.sort_by_cached_key(|deck| deck.key().sort_key());
        decks
    }

    ///Decks in the order they were registered.
    pub fn iter(&self) -> impl Iterator<Item = &Deck> {
        self.decks.iter()
    }

    ///Source decks of `level`, in registration order.
    pub fn sources_at_level<'a>(&'a self, level: &'a str) -> impl Iterator<Item = &'a Deck> {
        self.decks
            .iter()
            .filter(move |deck| deck.is_source() && deck.level == level)
    }

    pub fn len(&self) -> usize {
        self.decks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decks.is_empty()
    }
}
