use chrono::{DateTime, Local};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::io;
use tracing::{info, warn};

use crate::error::Result;
use crate::score::display_score;
use crate::storage::KvStore;

const NEXT_ID_KEY: &str = "leaderboard/next_id";
const ENTRY_PREFIX: &str = "leaderboard/entry/";

/// One saved round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub points: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Local>>,
}

impl LeaderboardEntry {
    pub fn new(name: impl Into<String>, points: f64) -> Self {
        Self {
            name: name.into(),
            points,
            saved_at: None,
        }
    }
}

fn entry_key(id: u64) -> String {
    format!("{ENTRY_PREFIX}{id}")
}

/// Append-only list of saved scores on top of a key-value store
pub struct LeaderboardStore {
    store: Box<dyn KvStore>,
}

impl LeaderboardStore {
    pub fn new(store: Box<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Append a new entry and return its id. Never overwrites an existing entry.
    pub fn save(&mut self, name: &str, score: f64) -> Result<u64> {
        let mut id = self.next_id()?;

        // The entry is written before the counter, so a crash in between
        // leaves the counter pointing at an occupied slot.
        while self.store.get(&entry_key(id))?.is_some() {
            warn!(id, "leaderboard counter behind stored entries, skipping");
            id += 1;
        }

        let entry = LeaderboardEntry {
            name: name.to_string(),
            points: score,
            saved_at: Some(Local::now()),
        };
        self.store
            .set(&entry_key(id), &serde_json::to_string(&entry)?)?;
        self.store.set(NEXT_ID_KEY, &(id + 1).to_string())?;

        info!(id, name, points = score, "score saved");
        Ok(id)
    }

    /// Every saved entry, highest score first. Equal scores keep save order.
    pub fn list(&self) -> Result<Standings> {
        let mut entries = Vec::new();
        for key in self.store.keys()? {
            if !key.starts_with(ENTRY_PREFIX) {
                continue;
            }
            let Some(raw) = self.store.get(&key)? else {
                continue;
            };
            match serde_json::from_str::<LeaderboardEntry>(&raw) {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!(key = %key, "skipping unreadable leaderboard entry: {}", e),
            }
        }

        let entries = entries
            .into_iter()
            .sorted_by(|a, b| b.points.total_cmp(&a.points))
            .collect();
        Ok(Standings { entries })
    }

    fn next_id(&self) -> Result<u64> {
        Ok(match self.store.get(NEXT_ID_KEY)? {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warn!(raw = %raw, "corrupt leaderboard counter, rescanning from 0");
                0
            }),
            None => 0,
        })
    }
}

impl std::fmt::Debug for LeaderboardStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeaderboardStore").finish_non_exhaustive()
    }
}

/// Ranked snapshot of the leaderboard; can be iterated any number of times
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Standings {
    entries: Vec<LeaderboardEntry>,
}

#[derive(Serialize)]
struct CsvRow<'a> {
    place: usize,
    name: &'a str,
    points: i64,
    saved_at: String,
}

impl Standings {
    pub fn iter(&self) -> std::slice::Iter<'_, LeaderboardEntry> {
        self.entries.iter()
    }

    /// Entries paired with their 1-based place
    pub fn ranked(&self) -> impl Iterator<Item = (usize, &LeaderboardEntry)> {
        self.entries.iter().enumerate().map(|(i, e)| (i + 1, e))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn export_csv<W: io::Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        for (place, entry) in self.ranked() {
            wtr.serialize(CsvRow {
                place,
                name: &entry.name,
                points: display_score(entry.points),
                saved_at: entry
                    .saved_at
                    .map(|t| t.to_rfc3339())
                    .unwrap_or_default(),
            })?;
        }
        wtr.flush()?;
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Standings {
    type Item = &'a LeaderboardEntry;
    type IntoIter = std::slice::Iter<'a, LeaderboardEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
