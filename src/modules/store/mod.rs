//! Institution record storage.
//!
//! The dataset fits comfortably in memory and is also small enough to keep in
//! a single sqlite table; both backends implement the same [`RecordStore`]
//! contract so the query layer and tests are backend-agnostic.

pub mod memory;
pub mod sqlite;

use async_trait::async_trait;

use crate::core::error::Result;
use crate::features::institutions::models::Institution;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// District constraint of a search, decided by the query layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DistrictFilter {
    /// The requested code resolved to a district name: match the address
    /// against the full name or the name without its administrative suffix.
    /// Either substring match suffices. The address free text is a more
    /// reliable district signal than the stored code column, so this is the
    /// preferred path.
    Address { name: String, stem: String },
    /// No name resolved: exact match on the stored district code.
    Code(String),
}

/// Conjunctive search filter; an empty filter matches every record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
    pub city_code: Option<String>,
    pub district: Option<DistrictFilter>,
    /// Case-sensitive substring match against the service-type column.
    pub service_type: Option<String>,
}

impl SearchFilter {
    pub fn matches(&self, inst: &Institution) -> bool {
        if let Some(city) = &self.city_code {
            if inst.city_code != *city {
                return false;
            }
        }

        if let Some(district) = &self.district {
            match district {
                DistrictFilter::Address { name, stem } => {
                    let address = inst.address.as_deref().unwrap_or("");
                    if !address.contains(name.as_str()) && !address.contains(stem.as_str()) {
                        return false;
                    }
                }
                DistrictFilter::Code(code) => {
                    if inst.district_code != *code {
                        return false;
                    }
                }
            }
        }

        if let Some(service) = &self.service_type {
            let service_type = inst.service_type.as_deref().unwrap_or("");
            if !service_type.contains(service.as_str()) {
                return false;
            }
        }

        true
    }
}

/// Search result: `total` is the uncapped match count, `institutions` the
/// first [`crate::shared::constants::MAX_SEARCH_RESULTS`] matches in name
/// order.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub total: i64,
    pub institutions: Vec<Institution>,
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Replaces the whole table with `records`. Readers either see the old
    /// snapshot or the new one, never a cleared-but-unfilled table.
    async fn replace_all(&self, records: Vec<Institution>) -> Result<u64>;

    /// Filtered scan, ordered by name ascending (ties keep insertion order),
    /// capped at the search result limit; the reported total is not.
    async fn search(&self, filter: &SearchFilter) -> Result<SearchOutcome>;

    async fn total_count(&self) -> Result<i64>;
}
