use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Local};
use tokio::sync::Mutex;

use crate::core::error::Result;
use crate::features::dataset::dtos::DataInfoDto;
use crate::features::dataset::services::fetcher::DatasetFetcher;
use crate::features::dataset::services::importer;
use crate::modules::store::RecordStore;

/// Orchestrates dataset refreshes.
///
/// The refresh guard makes lazy and forced refreshes mutually exclusive with
/// each other and with the bulk replace, so two refreshes can never
/// interleave their delete/insert phases. Reads are not held up: the store
/// keeps the previous snapshot visible until the replace commits.
pub struct DatasetService {
    fetcher: DatasetFetcher,
    store: Arc<dyn RecordStore>,
    refresh_guard: Mutex<()>,
    /// Set when the sqlite backend is active; reported by `data_info`.
    database_path: Option<PathBuf>,
}

impl DatasetService {
    pub fn new(
        fetcher: DatasetFetcher,
        store: Arc<dyn RecordStore>,
        database_path: Option<PathBuf>,
    ) -> Self {
        Self {
            fetcher,
            store,
            refresh_guard: Mutex::new(()),
            database_path,
        }
    }

    /// Startup path: populate the store when it is empty. An unreachable
    /// upstream is not fatal here; the service starts "not yet initialized".
    pub async fn ensure_loaded(&self) -> Result<u64> {
        let count = self.store.total_count().await?;
        if count > 0 {
            tracing::info!("Store already holds {} institution records", count);
            return Ok(count as u64);
        }
        tracing::info!("Store is empty, importing dataset");
        self.refresh_if_stale().await
    }

    /// Lazy refresh: reuse the cached CSV when fresh, otherwise fetch (with
    /// fallback to the stale copy on failure), then replace the store.
    pub async fn refresh_if_stale(&self) -> Result<u64> {
        let _guard = self.refresh_guard.lock().await;
        let path = self.fetcher.ensure_fresh().await?;
        let records = importer::read_dataset_file(&path).await?;
        let count = self.store.replace_all(records).await?;
        tracing::info!("Imported {} institution records", count);
        Ok(count)
    }

    /// Forced refresh: delete the cached CSV, fetch anew, replace the store.
    /// Fails hard when the upstream is unreachable.
    pub async fn force_refresh(&self) -> Result<u64> {
        let _guard = self.refresh_guard.lock().await;
        let path = self.fetcher.force_refresh().await?;
        let records = importer::read_dataset_file(&path).await?;
        let count = self.store.replace_all(records).await?;
        tracing::info!("Force refresh imported {} institution records", count);
        Ok(count)
    }

    pub async fn total_records(&self) -> Result<i64> {
        self.store.total_count().await
    }

    pub async fn data_info(&self) -> Result<DataInfoDto> {
        let total_records = self.store.total_count().await?;
        let csv_path = self.fetcher.csv_path();

        let mut info = DataInfoDto {
            local_file_exists: csv_path.exists(),
            total_records,
            database_path: self
                .database_path
                .as_ref()
                .map(|p| p.display().to_string()),
            database_exists: self.database_path.as_ref().map(|p| p.exists()),
            file_date: None,
            days_old: None,
            needs_update: None,
        };

        if let Some(age) = self.fetcher.file_age_days() {
            if let Ok(meta) = std::fs::metadata(csv_path) {
                if let Ok(modified) = meta.modified() {
                    let local: DateTime<Local> = modified.into();
                    info.file_date = Some(local.format("%Y-%m-%d %H:%M:%S").to_string());
                }
            }
            info.days_old = Some((age * 10.0).round() / 10.0);
            info.needs_update = Some(age >= self.fetcher.max_age_days());
        }

        Ok(info)
    }
}
