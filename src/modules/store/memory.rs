use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::core::error::Result;
use crate::features::institutions::models::Institution;
use crate::modules::store::{RecordStore, SearchFilter, SearchOutcome};
use crate::shared::constants::MAX_SEARCH_RESULTS;

/// In-memory table. Records are kept in insertion order; searches sort a
/// matching copy with a stable sort, so name ties keep that order.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<Vec<Institution>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn replace_all(&self, records: Vec<Institution>) -> Result<u64> {
        let count = records.len() as u64;
        // Swap under the write lock so readers see old or new, never empty.
        let mut guard = self.records.write().await;
        *guard = records;
        Ok(count)
    }

    async fn search(&self, filter: &SearchFilter) -> Result<SearchOutcome> {
        let guard = self.records.read().await;

        let mut matches: Vec<&Institution> =
            guard.iter().filter(|inst| filter.matches(inst)).collect();
        let total = matches.len() as i64;

        matches.sort_by(|a, b| a.name.cmp(&b.name));
        let institutions = matches
            .into_iter()
            .take(MAX_SEARCH_RESULTS)
            .cloned()
            .collect();

        Ok(SearchOutcome {
            total,
            institutions,
        })
    }

    async fn total_count(&self) -> Result<i64> {
        Ok(self.records.read().await.len() as i64)
    }
}
