use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Response of a successful forced refresh.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RefreshResponseDto {
    pub message: String,
    pub total_records: i64,
    /// Local time of the refresh, `%Y-%m-%d %H:%M:%S`
    pub update_time: String,
}

/// Freshness report of the cached dataset and the backing store.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DataInfoDto {
    pub local_file_exists: bool,
    pub total_records: i64,
    /// Only present with the sqlite backend
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_exists: Option<bool>,
    /// Only present while a cached file exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_old: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub needs_update: Option<bool>,
}
