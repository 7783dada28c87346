use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::dataset::handlers;
use crate::features::dataset::services::DatasetService;

/// Create routes for the dataset feature
pub fn routes(service: Arc<DatasetService>) -> Router {
    Router::new()
        .route("/api/refresh-data", get(handlers::refresh_data))
        .route("/api/data-info", get(handlers::data_info))
        .with_state(service)
}
