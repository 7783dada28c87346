use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::regions::handlers;
use crate::features::regions::services::RegionDirectory;

/// Create routes for the regions feature
pub fn routes(directory: Arc<RegionDirectory>) -> Router {
    Router::new()
        .route("/api/cities", get(handlers::list_cities))
        .route("/api/districts/{city_code}", get(handlers::list_districts))
        .with_state(directory)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_test::TestServer;

    fn server() -> TestServer {
        let directory = Arc::new(RegionDirectory::load(std::path::Path::new(
            "does/not/exist.json",
        )));
        TestServer::new(routes(directory)).unwrap()
    }

    #[tokio::test]
    async fn cities_endpoint_returns_bare_array() {
        let response = server().get("/api/cities").await;
        response.assert_status_ok();

        let cities: Vec<serde_json::Value> = response.json();
        assert!(cities.iter().any(|c| c["code"] == "63000" && c["name"] == "臺北市"));
    }

    #[tokio::test]
    async fn unknown_city_districts_is_empty_array_not_error() {
        let response = server().get("/api/districts/00000").await;
        response.assert_status_ok();

        let districts: Vec<serde_json::Value> = response.json();
        assert!(districts.is_empty());
    }

    #[tokio::test]
    async fn known_city_lists_its_districts() {
        let response = server().get("/api/districts/63000").await;
        let districts: Vec<serde_json::Value> = response.json();
        assert!(districts
            .iter()
            .any(|d| d["code"] == "63000030" && d["name"] == "大安區"));
    }
}
