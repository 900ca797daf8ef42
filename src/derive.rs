//! Synthetic decks built from the source decks already in a registry.

use chrono::NaiveDate;
use rand::Rng;

use crate::{
    deck::{Deck, DeckKey, DeckOrigin, Item},
    random::{shuffled, PermuteSeeded},
    registry::DeckRegistry,
};

pub const MIXED_TOPIC: &str = "mixed";

#[derive(Clone, Debug)]
pub struct DeriveOptions {
    ///Level pooled into the daily-random and mixed decks.
    pub daily_level: String,
    ///Levels concatenated, in order, into the mega deck. Empty means no mega deck.
    pub mega_levels: Vec<String>,
}

impl Default for DeriveOptions {
    fn default() -> Self {
        Self {
            daily_level: "A1".to_owned(),
            mega_levels: vec!["A1".to_owned(), "A2".to_owned()],
        }
    }
}

pub fn daily_topic(level: &str) -> String {
    format!("random-{}", level.to_lowercase())
}

pub fn mega_key(levels: &[String]) -> DeckKey {
    let topic = levels
        .iter()
        .map(|level| level.to_lowercase())
        .collect::<Vec<_>>()
        .join("-");
    DeckKey::new(levels.join("+"), format!("mega-{topic}"))
}

///Seed for the daily deck: the calendar date as `YYYY-MM-DD`.
pub fn date_seed(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

///Every source deck at `level`, permuted by `today`, so the order only
///changes when the date does.
pub fn daily_random_deck(registry: &DeckRegistry, level: &str, today: NaiveDate) -> Deck {
    let key = DeckKey::new(level, daily_topic(level));
    let seed = date_seed(today);

    let items = pooled_items(registry, level).permute_seeded(&seed);

    let mut deck = Deck::derived(
        key.clone(),
        format!("{level} – Random (Daily)"),
        renumber(items, &key, true),
        DeckOrigin::DailyRandom,
    );
    deck.seed = Some(seed);
    deck
}

///Every source deck at `level`, shuffled differently on each build.
pub fn mixed_deck(registry: &DeckRegistry, level: &str, rng: &mut impl Rng) -> Deck {
    let key = DeckKey::new(level, MIXED_TOPIC);
    let items = shuffled(pooled_items(registry, level), rng);

    Deck::derived(
        key.clone(),
        format!("{level} – Mixed Review"),
        renumber(items, &key, true),
        DeckOrigin::Mixed,
    )
}

///Source decks of each level in turn, without shuffling. Items keep their own level.
pub fn mega_deck(registry: &DeckRegistry, levels: &[String]) -> Deck {
    let key = mega_key(levels);
    let items = levels
        .iter()
        .flat_map(|level| pooled_items(registry, level))
        .collect::<Vec<_>>();

    Deck::derived(
        key.clone(),
        format!("Mega Deck – {}", levels.join(" + ")),
        renumber(items, &key, false),
        DeckOrigin::Mega,
    )
}

///Builds the derived decks and registers them. Running it again is harmless:
///decks that already exist are left as they are. Returns how many were inserted.
pub fn build_derived_decks(
    registry: &mut DeckRegistry,
    options: &DeriveOptions,
    today: NaiveDate,
) -> usize {
    let rng = &mut rand::thread_rng();

    let mut derived = vec![
        daily_random_deck(registry, &options.daily_level, today),
        mixed_deck(registry, &options.daily_level, rng),
    ];
    if !options.mega_levels.is_empty() {
        derived.push(mega_deck(registry, &options.mega_levels));
    }

    let inserted = registry.register_all(derived);
    log::debug!(
        "Derived {inserted} decks from {} registered decks (seed {})",
        registry.len(),
        date_seed(today)
    );
    inserted
}

fn pooled_items(registry: &DeckRegistry, level: &str) -> Vec<Item> {
    registry
        .sources_at_level(level)
        .flat_map(|deck| deck.items.iter().cloned())
        .collect()
}

fn renumber(items: Vec<Item>, key: &DeckKey, take_level: bool) -> Vec<Item> {
    items
        .into_iter()
        .zip(1..)
        .map(|(mut item, id)| {
            item.id = id;
            item.topic.clone_from(&key.topic);
            if take_level {
                item.level.clone_from(&key.level);
            }
            item
        })
        .collect()
}
