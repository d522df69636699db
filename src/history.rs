// history.rs

use serde::{Deserialize, Serialize};

use crate::storage::KeyValueStore;

/// Storage key the history list is saved under.
pub const HISTORY_KEY: &str = "calculatorHistory";
/// Number of entries kept; older ones are dropped.
pub const MAX_HISTORY: usize = 5;

/// One successful evaluation. Never modified after it is recorded.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub expression: String,
    pub result: f64,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

/// Newest-first list of past results, written through to a
/// [`KeyValueStore`] on every change.
pub struct History {
    entries: Vec<HistoryEntry>,
    store: Box<dyn KeyValueStore>,
}

impl History {
    /// Read the persisted list. Missing, unreadable or malformed data gives
    /// an empty history.
    pub fn load(store: Box<dyn KeyValueStore>) -> Self {
        let mut entries = match store.get(HISTORY_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<serde_json::Value>>(&raw) {
                Ok(items) => parse_entries(items),
                Err(e) => {
                    tracing::warn!(error = %e, "ignoring malformed history");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %format!("{e:#}"), "could not read history");
                Vec::new()
            }
        };
        entries.truncate(MAX_HISTORY);
        tracing::debug!(entries = entries.len(), "history loaded");
        Self { entries, store }
    }

    pub fn record(&mut self, expression: String, result: f64) {
        let timestamp = chrono::Utc::now().timestamp_millis();
        self.record_at(expression, result, timestamp);
    }

    pub fn record_at(&mut self, expression: String, result: f64, timestamp: i64) {
        self.entries.insert(
            0,
            HistoryEntry {
                expression,
                result,
                timestamp,
            },
        );
        self.entries.truncate(MAX_HISTORY);
        self.save();
    }

    pub fn clear_all(&mut self) {
        self.entries.clear();
        self.save();
    }

    pub fn get(&self, n: usize) -> Option<&HistoryEntry> {
        self.entries.get(n)
    }
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    #[cfg(test)]
    pub(crate) fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    #[cfg(test)]
    pub(crate) fn into_store(self) -> Box<dyn KeyValueStore> {
        self.store
    }

    fn save(&mut self) {
        let raw = match serde_json::to_string(&self.entries) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "could not serialize history");
                return;
            }
        };
        if let Err(e) = self.store.set(HISTORY_KEY, &raw) {
            tracing::warn!(error = %format!("{e:#}"), "could not save history");
        }
    }
}

/// Keep the items that are well-formed entries with a finite result.
fn parse_entries(items: Vec<serde_json::Value>) -> Vec<HistoryEntry> {
    let total = items.len();
    let entries: Vec<HistoryEntry> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<HistoryEntry>(item).ok())
        .filter(|entry| entry.result.is_finite())
        .collect();
    if entries.len() < total {
        tracing::warn!(
            skipped = total - entries.len(),
            "ignoring malformed history entries"
        );
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileStore, MemoryStore};

    fn empty() -> History {
        History::load(Box::new(MemoryStore::new()))
    }

    fn stored(history: &History) -> Option<String> {
        history.store().get(HISTORY_KEY).unwrap()
    }

    #[test]
    fn test_record_newest_first() {
        let mut history = empty();
        history.record_at("1 + 1".into(), 2.0, 10);
        history.record_at("2 × 3".into(), 6.0, 20);
        assert_eq!(history.len(), 2);
        assert_eq!(history.get(0).unwrap().expression, "2 × 3");
        assert_eq!(history.get(1).unwrap().result, 2.0);
    }

    #[test]
    fn test_bounded_to_five() {
        let mut history = empty();
        for i in 0..6 {
            history.record_at(format!("{i} + 0"), i as f64, i);
        }
        assert_eq!(history.len(), MAX_HISTORY);
        let results: Vec<f64> = history.entries().iter().map(|e| e.result).collect();
        assert_eq!(results, vec![5.0, 4.0, 3.0, 2.0, 1.0]);
    }

    #[test]
    fn test_every_change_is_persisted() {
        let mut history = empty();
        assert_eq!(stored(&history), None);
        history.record_at("4 ÷ 2".into(), 2.0, 1_700_000_000_000);
        assert_eq!(
            stored(&history).as_deref(),
            Some(r#"[{"expression":"4 ÷ 2","result":2.0,"timestamp":1700000000000}]"#)
        );
        history.clear_all();
        assert!(history.is_empty());
        assert_eq!(stored(&history).as_deref(), Some("[]"));
    }

    #[test]
    fn test_reload_round_trip() {
        let mut history = empty();
        history.record_at("5 × 3 + 2".into(), 17.0, 1);
        history.record_at("0.1 + 0.2".into(), 0.3, 2);
        let before = history.entries().to_vec();

        let reloaded = History::load(history.into_store());
        assert_eq!(reloaded.entries(), before.as_slice());
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut history = History::load(Box::new(FileStore::new(dir.path())));
        history.record_at("8 - 3".into(), 5.0, 42);

        let reloaded = History::load(Box::new(FileStore::new(dir.path())));
        assert_eq!(reloaded.entries(), history.entries());
    }

    #[test]
    fn test_malformed_data_is_no_history() {
        for raw in ["not json", "{}", r#"[{"expression":1}]"#, "[null]"] {
            let mut store = MemoryStore::new();
            store.set(HISTORY_KEY, raw).unwrap();
            assert!(History::load(Box::new(store)).is_empty(), "{raw}");
        }
    }

    #[test]
    fn test_bad_entries_are_skipped() {
        let mut store = MemoryStore::new();
        store
            .set(
                HISTORY_KEY,
                r#"[{"expression":"2 × 3","result":6,"timestamp":2},
                    {"expression":"1e200 × 1e200","result":null,"timestamp":1},
                    "junk",
                    {"expression":"1 + 1","result":2,"timestamp":0}]"#,
            )
            .unwrap();
        let history = History::load(Box::new(store));
        let expressions: Vec<&str> =
            history.entries().iter().map(|e| e.expression.as_str()).collect();
        assert_eq!(expressions, vec!["2 × 3", "1 + 1"]);
    }

    #[test]
    fn test_accepts_integer_results() {
        let mut store = MemoryStore::new();
        store
            .set(HISTORY_KEY, r#"[{"expression":"5 × 3 + 2","result":17,"timestamp":1}]"#)
            .unwrap();
        let history = History::load(Box::new(store));
        assert_eq!(history.get(0).unwrap().result, 17.0);
    }

    #[test]
    fn test_oversized_list_is_truncated() {
        let entries: Vec<HistoryEntry> = (0..8)
            .map(|i| HistoryEntry {
                expression: format!("{i}"),
                result: i as f64,
                timestamp: i,
            })
            .collect();
        let mut store = MemoryStore::new();
        store
            .set(HISTORY_KEY, &serde_json::to_string(&entries).unwrap())
            .unwrap();
        let history = History::load(Box::new(store));
        assert_eq!(history.len(), MAX_HISTORY);
        assert_eq!(history.get(0).unwrap().expression, "0");
    }
}
