use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::institutions::handlers;
use crate::features::institutions::services::SearchService;

/// Create routes for the institutions feature
pub fn routes(service: Arc<SearchService>) -> Router {
    Router::new()
        .route("/api/institutions", get(handlers::search_institutions))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use axum_test::TestServer;

    use crate::features::institutions::models::Institution;
    use crate::features::regions::services::{CityEntry, RegionDirectory};
    use crate::modules::store::{MemoryStore, RecordStore};

    fn inst(name: &str, city: &str, district: &str, address: &str) -> Institution {
        Institution {
            name: name.to_string(),
            code: Some("A-1".to_string()),
            kind: Some("住宿式".to_string()),
            city_code: city.to_string(),
            district_code: district.to_string(),
            address: Some(address.to_string()),
            longitude: Some(120.3),
            latitude: Some(22.64),
            o_abc: Some("A".to_string()),
            service_type: Some("居家服務".to_string()),
            contract_city: Some("高雄市".to_string()),
            contract_district: Some("三民區".to_string()),
            phone: None,
            email: None,
            manager: None,
            contract_start: None,
            contract_end: None,
            last_updated: None,
        }
    }

    async fn server(records: Vec<Institution>) -> TestServer {
        let mut mapping = BTreeMap::new();
        mapping.insert(
            "64000".to_string(),
            CityEntry {
                name: "高雄市".to_string(),
                districts: BTreeMap::from([("64000050".to_string(), "三民區".to_string())]),
            },
        );
        let directory = Arc::new(RegionDirectory::from_mapping(mapping));

        let store = Arc::new(MemoryStore::new());
        store.replace_all(records).await.unwrap();

        let service = Arc::new(SearchService::new(directory, store));
        TestServer::new(routes(service)).unwrap()
    }

    #[tokio::test]
    async fn response_shape_has_total_and_stable_keys() {
        let server = server(vec![inst(
            "甲機構",
            "64000",
            "64000050",
            "高雄市三民區民族一路1號",
        )])
        .await;

        let response = server.get("/api/institutions").await;
        response.assert_status_ok();

        let body: serde_json::Value = response.json();
        assert_eq!(body["total"], 1);

        let first = &body["institutions"][0];
        assert_eq!(first["name"], "甲機構");
        assert_eq!(first["type"], "住宿式");
        assert_eq!(first["city"], "64000");
        assert_eq!(first["district"], "64000050");
        assert_eq!(first["service_type"], "居家服務");
        // Stored-only column never leaks into the response.
        assert!(first.get("o_abc").is_none());
    }

    #[tokio::test]
    async fn end_to_end_district_resolution_and_code_fallback() {
        let server = server(vec![
            inst("甲機構", "64000", "64000050", "高雄市三民區民族一路1號"),
            inst("乙機構", "64000", "64000999", "高雄市某處2號"),
        ])
        .await;

        // Mapped district: fuzzy address match returns only the first.
        let body: serde_json::Value = server
            .get("/api/institutions")
            .add_query_param("city", "64000")
            .add_query_param("district", "64000050")
            .await
            .json();
        assert_eq!(body["total"], 1);
        assert_eq!(body["institutions"][0]["name"], "甲機構");

        // Unmapped district: exact-code fallback returns only the second.
        let body: serde_json::Value = server
            .get("/api/institutions")
            .add_query_param("city", "64000")
            .add_query_param("district", "64000999")
            .await
            .json();
        assert_eq!(body["total"], 1);
        assert_eq!(body["institutions"][0]["name"], "乙機構");
    }
}
