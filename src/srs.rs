//! Review state transitions. These are the only functions that change an
//! item's status or next review date.
//!
//! ```text
//! new ──▶ review ◀──▶ learned
//!   └──────────────────▲
//! ```
//!
//! No transition looks at the stored review date: an item can be marked again
//! at any time.

use chrono::{Days, NaiveDate};

use crate::{
    deck::{Deck, DeckKey, Item, Status},
    stats::{Counter, StatsStore},
};

pub const REVIEW_INTERVAL_DAYS: u64 = 2;
pub const LEARNED_INTERVAL_DAYS: u64 = 7;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Decision {
    Learned,
    Review,
}

pub fn next_review_date(today: NaiveDate, days: u64) -> NaiveDate {
    today.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX)
}

pub fn mark_review(item: &mut Item, deck: &DeckKey, stats: &mut StatsStore, today: NaiveDate) {
    item.status = Status::Review;
    item.next_review = Some(next_review_date(today, REVIEW_INTERVAL_DAYS));
    log::info!("Review: {} | next review: {}", item.word, next_review(item));

    stats.increment(deck, Counter::Reviewed);
}

pub fn mark_learned(item: &mut Item, deck: &DeckKey, stats: &mut StatsStore, today: NaiveDate) {
    item.status = Status::Learned;
    item.next_review = Some(next_review_date(today, LEARNED_INTERVAL_DAYS));
    log::info!("Learned: {} | next review: {}", item.word, next_review(item));

    stats.increment(deck, Counter::Learned);
}

pub fn apply(
    decision: Decision,
    item: &mut Item,
    deck: &DeckKey,
    stats: &mut StatsStore,
    today: NaiveDate,
) {
    match decision {
        Decision::Learned => mark_learned(item, deck, stats, today),
        Decision::Review => mark_review(item, deck, stats, today),
    }
}

///Every item goes back to `new` and the deck's counters are zeroed.
pub fn reset_deck(deck: &mut Deck, stats: &mut StatsStore) {
    for item in deck.items.iter_mut() {
        item.status = Status::New;
        item.next_review = None;
    }
    log::info!("Reset deck {}", deck.key());

    stats.reset(&deck.key());
}

fn next_review(item: &Item) -> String {
    item.next_review
        .map(|date| date.to_string())
        .unwrap_or_else(|| "-".to_owned())
}
