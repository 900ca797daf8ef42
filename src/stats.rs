use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    deck::{DeckKey, Item, Status},
    store::{KeyValueStore, MemoryStore, StoreError},
};

///Store key holding the whole `{ "level:topic": { learned, reviewed } }` map.
pub const STATS_STORAGE_KEY: &str = "flashcards_stats_v1";

#[derive(Serialize, Deserialize, Default, Clone, Copy, PartialEq, Eq, Debug)]
pub struct StatsRecord {
    #[serde(default)]
    pub learned: u64,
    #[serde(default)]
    pub reviewed: u64,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Counter {
    Learned,
    Reviewed,
}

///Per-deck counters, persisted in full after every change.
pub struct StatsStore {
    records: HashMap<String, StatsRecord>,
    store: Box<dyn KeyValueStore>,
}

impl StatsStore {
    ///Reads the map from `store`. Absent, unreadable or malformed data yields an
    ///empty map; the problem is logged and the session carries on.
    pub fn load(store: Box<dyn KeyValueStore>) -> Self {
        let records = match store.get(STATS_STORAGE_KEY) {
            Ok(Some(raw)) => parse_records(&raw),
            Ok(None) => HashMap::new(),
            Err(err) => {
                log::warn!("Unable to read stats, starting empty: {err}");
                HashMap::new()
            }
        };

        Self { records, store }
    }

    pub fn in_memory() -> Self {
        Self::load(Box::new(MemoryStore::new()))
    }

    pub fn ensure(&mut self, key: &DeckKey) -> &StatsRecord {
        self.records.entry(key.to_string()).or_default()
    }

    ///Current counters for `key`, zero if it has never been touched.
    pub fn record(&self, key: &DeckKey) -> StatsRecord {
        self.records
            .get(&key.to_string())
            .copied()
            .unwrap_or_default()
    }

    pub fn increment(&mut self, key: &DeckKey, counter: Counter) {
        let record = self.records.entry(key.to_string()).or_default();
        match counter {
            Counter::Learned => record.learned += 1,
            Counter::Reviewed => record.reviewed += 1,
        }
        self.flush();
    }

    pub fn reset(&mut self, key: &DeckKey) {
        self.records.insert(key.to_string(), StatsRecord::default());
        self.flush();
    }

    pub fn save(&mut self) -> Result<(), StoreError> {
        let json = serde_json::to_string(&self.records).map_err(StoreError::SerdeError)?;
        self.store.set(STATS_STORAGE_KEY, &json)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn metrics(&self, key: &DeckKey, items: &[Item]) -> DeckMetrics {
        DeckMetrics::compute(self.record(key), items)
    }

    ///Saves, logging a failure instead of returning it.
    pub fn flush(&mut self) {
        if let Err(err) = self.save() {
            log::warn!("Unable to save stats, keeping them in memory only: {err}");
        }
    }
}

fn parse_records(raw: &str) -> HashMap<String, StatsRecord> {
    let value = match serde_json::from_str::<Value>(raw) {
        Ok(value) => value,
        Err(err) => {
            log::warn!("Discarding malformed stats: {err}");
            return HashMap::new();
        }
    };

    let Value::Object(entries) = value else {
        log::warn!("Discarding stats that are not an object");
        return HashMap::new();
    };

    entries
        .into_iter()
        .filter_map(
            |(key, entry)| match serde_json::from_value::<StatsRecord>(entry) {
                Ok(record) => Some((key, record)),
                Err(err) => {
                    log::warn!("Discarding stats for {key}: {err}");
                    None
                }
            },
        )
        .collect()
}

///Read-only figures derived from a deck's counters and items. Never stored.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct DeckMetrics {
    pub learned: u64,
    pub reviewed: u64,
    pub total_items: usize,
    pub progress_percent: u32,
    pub accuracy_percent: u32,
    pub review_count: usize,
}

impl DeckMetrics {
    pub fn compute(record: StatsRecord, items: &[Item]) -> Self {
        let total_items = items.len();
        let actions = record.learned + record.reviewed;

        Self {
            learned: record.learned,
            reviewed: record.reviewed,
            total_items,
            progress_percent: percent(record.learned, total_items as u64),
            accuracy_percent: percent(record.learned, actions),
            review_count: items
                .iter()
                .filter(|item| item.status() == Status::Review)
                .count(),
        }
    }
}

fn percent(part: u64, whole: u64) -> u32 {
    if whole == 0 {
        0
    } else {
        ((part as f64 / whole as f64) * 100.0).round() as u32
    }
}
