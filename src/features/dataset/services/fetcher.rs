use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use async_trait::async_trait;

use crate::core::error::{AppError, Result};

const SECS_PER_DAY: f64 = 24.0 * 3600.0;

/// Network boundary of the dataset refresh; the production implementation is
/// [`HttpSource`], tests plug in fakes.
#[async_trait]
pub trait RemoteSource: Send + Sync {
    /// Fetches the raw dataset text from the upstream publisher.
    async fn fetch(&self) -> Result<String>;
}

pub struct HttpSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSource {
    pub fn new(url: String, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, url })
    }
}

#[async_trait]
impl RemoteSource for HttpSource {
    async fn fetch(&self) -> Result<String> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| AppError::Fetch(e.to_string()))?
            .error_for_status()
            .map_err(|e| AppError::Fetch(e.to_string()))?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::Fetch(e.to_string()))?;

        Ok(decode_bom_utf8(&bytes))
    }
}

/// UTF-8 decode that tolerates the BOM the upstream CSV ships with.
pub fn decode_bom_utf8(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xef\xbb\xbf".as_slice()).unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}

/// Decides between reusing the cached raw CSV and fetching a fresh copy.
///
/// Freshness is the age of the cached file (mtime), strictly less than
/// `max_age_days`. The lazy path falls back to a stale file when the fetch
/// fails; the forced path deletes the file first and therefore fails hard.
pub struct DatasetFetcher {
    source: Arc<dyn RemoteSource>,
    csv_path: PathBuf,
    max_age_days: f64,
}

impl DatasetFetcher {
    pub fn new(source: Arc<dyn RemoteSource>, csv_path: PathBuf, max_age_days: f64) -> Self {
        Self {
            source,
            csv_path,
            max_age_days,
        }
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }

    pub fn max_age_days(&self) -> f64 {
        self.max_age_days
    }

    /// Age of the cached file in days, `None` when it does not exist.
    pub fn file_age_days(&self) -> Option<f64> {
        let modified = std::fs::metadata(&self.csv_path).ok()?.modified().ok()?;
        let elapsed = SystemTime::now().duration_since(modified).unwrap_or_default();
        Some(elapsed.as_secs_f64() / SECS_PER_DAY)
    }

    /// Returns a usable raw dataset file, fetching only when the cached copy
    /// is missing or stale. A failed fetch falls back to the stale copy if
    /// one exists; with no copy at all the fetch error is surfaced.
    pub async fn ensure_fresh(&self) -> Result<PathBuf> {
        if let Some(age) = self.file_age_days() {
            if age < self.max_age_days {
                tracing::info!("Using cached CSV ({:.1} days old)", age);
                return Ok(self.csv_path.clone());
            }
            tracing::info!("Cached CSV is stale ({:.1} days old), re-downloading", age);
        }

        match self.download().await {
            Ok(path) => Ok(path),
            Err(e) => {
                if self.csv_path.exists() {
                    tracing::warn!("Fetch failed ({}), falling back to stale CSV", e);
                    Ok(self.csv_path.clone())
                } else {
                    Err(e)
                }
            }
        }
    }

    /// Deletes the cached file and fetches anew. With the stale copy gone,
    /// a failed fetch propagates instead of silently resurfacing old data.
    pub async fn force_refresh(&self) -> Result<PathBuf> {
        if self.csv_path.exists() {
            tokio::fs::remove_file(&self.csv_path).await?;
            tracing::info!("Removed cached CSV {}", self.csv_path.display());
        }
        self.download().await
    }

    async fn download(&self) -> Result<PathBuf> {
        tracing::info!("Downloading dataset");
        let text = self.source.fetch().await?;

        if let Some(parent) = self.csv_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.csv_path, text).await?;

        tracing::info!("Dataset saved to {}", self.csv_path.display());
        Ok(self.csv_path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeSource {
        payload: Option<String>,
    }

    #[async_trait]
    impl RemoteSource for FakeSource {
        async fn fetch(&self) -> Result<String> {
            self.payload
                .clone()
                .ok_or_else(|| AppError::Fetch("remote unavailable".to_string()))
        }
    }

    fn fetcher(dir: &Path, payload: Option<&str>, max_age_days: f64) -> DatasetFetcher {
        DatasetFetcher::new(
            Arc::new(FakeSource {
                payload: payload.map(str::to_string),
            }),
            dir.join("abc.csv"),
            max_age_days,
        )
    }

    #[test]
    fn bom_is_stripped_on_decode() {
        assert_eq!(decode_bom_utf8(b"\xef\xbb\xbfabc"), "abc");
        assert_eq!(decode_bom_utf8(b"abc"), "abc");
    }

    #[tokio::test]
    async fn fresh_cached_file_is_reused_without_fetching() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("abc.csv"), "cached").unwrap();

        // A failing source proves the network is never touched.
        let fetcher = fetcher(dir.path(), None, 30.0);
        let path = fetcher.ensure_fresh().await.unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "cached");
    }

    #[tokio::test]
    async fn stale_file_is_replaced_by_a_successful_fetch() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("abc.csv"), "old").unwrap();

        // max_age 0 makes any existing file stale.
        let fetcher = fetcher(dir.path(), Some("new"), 0.0);
        let path = fetcher.ensure_fresh().await.unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "new");
    }

    #[tokio::test]
    async fn failed_fetch_falls_back_to_the_stale_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("abc.csv"), "old").unwrap();

        let fetcher = fetcher(dir.path(), None, 0.0);
        let path = fetcher.ensure_fresh().await.unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "old");
    }

    #[tokio::test]
    async fn failed_fetch_with_no_cache_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = fetcher(dir.path(), None, 30.0);
        assert!(fetcher.ensure_fresh().await.is_err());
    }

    #[tokio::test]
    async fn force_refresh_deletes_the_cache_and_fails_hard() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("abc.csv");
        std::fs::write(&csv, "old").unwrap();

        let fetcher = fetcher(dir.path(), None, 30.0);
        assert!(fetcher.force_refresh().await.is_err());
        // No stale fallback: the old copy is gone for good.
        assert!(!csv.exists());
    }

    #[tokio::test]
    async fn force_refresh_fetches_even_when_the_cache_is_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("abc.csv");
        std::fs::write(&csv, "old").unwrap();

        let fetcher = fetcher(dir.path(), Some("new"), 30.0);
        fetcher.force_refresh().await.unwrap();
        assert_eq!(std::fs::read_to_string(&csv).unwrap(), "new");
    }
}
