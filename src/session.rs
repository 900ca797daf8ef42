use std::fmt::Display;

use crate::{
    deck::{DeckKey, Item, Status},
    registry::DeckRegistry,
};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Mode {
    #[default]
    All,
    ReviewOnly,
}

impl Mode {
    pub fn toggled(self) -> Self {
        match self {
            Self::All => Self::ReviewOnly,
            Self::ReviewOnly => Self::All,
        }
    }

    fn includes(self, item: &Item) -> bool {
        match self {
            Self::All => true,
            Self::ReviewOnly => item.status() == Status::Review,
        }
    }
}

impl Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Mode::All => "all",
            Mode::ReviewOnly => "review only",
        })
    }
}

///Cyclic cursor over the active items of one deck. The session only holds the
///deck's identity; an unknown deck reads as empty.
#[derive(Clone, Debug, Default)]
pub struct ReviewSession {
    deck: Option<DeckKey>,
    mode: Mode,
    cursor: usize,
}

impl ReviewSession {
    pub fn new(deck: Option<DeckKey>, mode: Mode) -> Self {
        Self {
            deck,
            mode,
            cursor: 0,
        }
    }

    pub fn deck(&self) -> Option<&DeckKey> {
        self.deck.as_ref()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    ///Positions within the deck's items of every active item, in deck order.
    pub fn active_positions(&self, registry: &DeckRegistry) -> Vec<usize> {
        self.deck
            .as_ref()
            .and_then(|key| registry.get(key))
            .map(|deck| {
                deck.items
                    .iter()
                    .enumerate()
                    .filter(|(_, item)| self.mode.includes(item))
                    .map(|(position, _)| position)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn active_items<'r>(&self, registry: &'r DeckRegistry) -> Vec<&'r Item> {
        self.deck
            .as_ref()
            .and_then(|key| registry.get(key))
            .map(|deck| {
                deck.items
                    .iter()
                    .filter(|item| self.mode.includes(item))
                    .collect()
            })
            .unwrap_or_default()
    }

    ///Moves to the next active item, wrapping at the end. Stays at 0 when
    ///nothing is active.
    pub fn advance(&mut self, registry: &DeckRegistry) {
        let len = self.active_positions(registry).len();
        self.cursor = if len == 0 { 0 } else { (self.cursor + 1) % len };
    }

    ///Deck position of the item under the cursor. A cursor left out of range
    ///by a shrinking list is pulled back to 0.
    pub fn current_position(&mut self, registry: &DeckRegistry) -> Option<usize> {
        let positions = self.active_positions(registry);
        if positions.is_empty() {
            return None;
        }
        if self.cursor >= positions.len() {
            self.cursor = 0;
        }
        positions.get(self.cursor).copied()
    }

    pub fn switch_deck(&mut self, level: &str, topic: &str) {
        self.deck = Some(DeckKey::new(level, topic));
        self.cursor = 0;
    }

    pub fn switch_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.cursor = 0;
    }

    pub fn rewind(&mut self) {
        self.cursor = 0;
    }
}
