use std::sync::Arc;

use axum::{extract::State, Json};
use chrono::Local;

use crate::core::error::Result;
use crate::features::dataset::dtos::{DataInfoDto, RefreshResponseDto};
use crate::features::dataset::services::DatasetService;

/// Force a re-download and re-import of the dataset
#[utoipa::path(
    get,
    path = "/api/refresh-data",
    responses(
        (status = 200, description = "Dataset refreshed", body = RefreshResponseDto),
        (status = 502, description = "Upstream fetch failed; no stale fallback on a forced refresh")
    ),
    tag = "dataset"
)]
pub async fn refresh_data(
    State(service): State<Arc<DatasetService>>,
) -> Result<Json<RefreshResponseDto>> {
    service.force_refresh().await?;
    let total_records = service.total_records().await?;

    Ok(Json(RefreshResponseDto {
        message: "資料強制更新成功".to_string(),
        total_records,
        update_time: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
    }))
}

/// Report dataset freshness and store state
#[utoipa::path(
    get,
    path = "/api/data-info",
    responses(
        (status = 200, description = "Dataset freshness report", body = DataInfoDto)
    ),
    tag = "dataset"
)]
pub async fn data_info(State(service): State<Arc<DatasetService>>) -> Result<Json<DataInfoDto>> {
    Ok(Json(service.data_info().await?))
}
