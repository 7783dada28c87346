use std::sync::Arc;

use crate::core::error::Result;
use crate::features::regions::services::RegionDirectory;
use crate::modules::store::{DistrictFilter, RecordStore, SearchFilter, SearchOutcome};
use crate::shared::constants::DISTRICT_SUFFIXES;

/// Translates a (city, district, service type) request into a store filter.
///
/// The district filter is deliberately fuzzy: the stored district-code column
/// is unreliable in the source data, so when the requested code resolves to a
/// name we match the address text instead, against the full name or the name
/// without its trailing administrative suffix. Only when no name resolves do
/// we fall back to exact code equality.
pub struct SearchService {
    directory: Arc<RegionDirectory>,
    store: Arc<dyn RecordStore>,
}

impl SearchService {
    pub fn new(directory: Arc<RegionDirectory>, store: Arc<dyn RecordStore>) -> Self {
        Self { directory, store }
    }

    pub async fn search(
        &self,
        city: Option<&str>,
        district: Option<&str>,
        service_type: Option<&str>,
    ) -> Result<SearchOutcome> {
        let filter = self.build_filter(city, district, service_type);
        let outcome = self.store.search(&filter).await?;

        tracing::debug!(
            total = outcome.total,
            returned = outcome.institutions.len(),
            "Institution search completed"
        );
        Ok(outcome)
    }

    fn build_filter(
        &self,
        city: Option<&str>,
        district: Option<&str>,
        service_type: Option<&str>,
    ) -> SearchFilter {
        let district_filter = district.map(|district_code| {
            let resolved =
                city.and_then(|city_code| self.directory.district_name(city_code, district_code));

            match resolved {
                Some(name) => {
                    tracing::debug!("Matching addresses against district name '{}'", name);
                    DistrictFilter::Address {
                        name: name.to_string(),
                        stem: strip_admin_suffix(name),
                    }
                }
                None => DistrictFilter::Code(district_code.to_string()),
            }
        });

        SearchFilter {
            city_code: city.map(str::to_string),
            district: district_filter,
            service_type: service_type
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        }
    }
}

/// Drops a trailing 區/市/鎮/鄉 from a district name; names without the
/// suffix (or nothing but the suffix) come back unchanged.
fn strip_admin_suffix(name: &str) -> String {
    if let Some(last) = name.chars().last() {
        if DISTRICT_SUFFIXES.contains(&last) {
            let stem = &name[..name.len() - last.len_utf8()];
            if !stem.is_empty() {
                return stem.to_string();
            }
        }
    }
    name.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use crate::features::institutions::models::Institution;
    use crate::features::regions::services::CityEntry;
    use crate::modules::store::MemoryStore;

    fn directory() -> Arc<RegionDirectory> {
        let mut mapping = BTreeMap::new();
        mapping.insert(
            "64000".to_string(),
            CityEntry {
                name: "高雄市".to_string(),
                districts: BTreeMap::from([("64000050".to_string(), "三民區".to_string())]),
            },
        );
        Arc::new(RegionDirectory::from_mapping(mapping))
    }

    fn inst(name: &str, city: &str, district: &str, address: &str) -> Institution {
        Institution {
            name: name.to_string(),
            code: None,
            kind: None,
            city_code: city.to_string(),
            district_code: district.to_string(),
            address: Some(address.to_string()),
            longitude: None,
            latitude: None,
            o_abc: None,
            service_type: Some("居家服務".to_string()),
            contract_city: None,
            contract_district: None,
            phone: None,
            email: None,
            manager: None,
            contract_start: None,
            contract_end: None,
            last_updated: None,
        }
    }

    async fn service_with(records: Vec<Institution>) -> SearchService {
        let store = Arc::new(MemoryStore::new());
        store.replace_all(records).await.unwrap();
        SearchService::new(directory(), store)
    }

    #[test]
    fn admin_suffix_is_stripped_only_at_the_end() {
        assert_eq!(strip_admin_suffix("三民區"), "三民");
        assert_eq!(strip_admin_suffix("竹北市"), "竹北");
        assert_eq!(strip_admin_suffix("三民"), "三民");
        assert_eq!(strip_admin_suffix("區"), "區");
    }

    #[tokio::test]
    async fn resolvable_district_matches_by_address_regardless_of_code_column() {
        let svc = service_with(vec![
            // district_code disagrees with the address on purpose
            inst("甲機構", "64000", "99999999", "高雄市三民區民族一路1號"),
            inst("乙機構", "64000", "64000050", "高雄市左營區某路2號"),
        ])
        .await;

        let out = svc
            .search(Some("64000"), Some("64000050"), None)
            .await
            .unwrap();
        assert_eq!(out.total, 1);
        assert_eq!(out.institutions[0].name, "甲機構");
    }

    #[tokio::test]
    async fn unresolvable_district_falls_back_to_exact_code() {
        let svc = service_with(vec![
            inst("甲機構", "64000", "64000050", "高雄市三民區民族一路1號"),
            // address contains no derived name, only the code column matches
            inst("乙機構", "64000", "64000999", "高雄市某處3號"),
        ])
        .await;

        let out = svc
            .search(Some("64000"), Some("64000999"), None)
            .await
            .unwrap();
        assert_eq!(out.total, 1);
        assert_eq!(out.institutions[0].name, "乙機構");
    }

    #[tokio::test]
    async fn district_without_city_cannot_resolve_and_uses_the_code() {
        let svc = service_with(vec![
            inst("甲機構", "64000", "64000050", "高雄市三民區民族一路1號"),
            inst("乙機構", "63000", "64000050", "臺北市大安區和平東路2號"),
        ])
        .await;

        let out = svc.search(None, Some("64000050"), None).await.unwrap();
        assert_eq!(out.total, 2);
    }

    #[tokio::test]
    async fn suffixless_address_still_matches_via_the_stem_pattern() {
        let svc = service_with(vec![inst(
            "甲機構",
            "64000",
            "64000050",
            "高雄市三民東路9號",
        )])
        .await;

        let out = svc
            .search(Some("64000"), Some("64000050"), None)
            .await
            .unwrap();
        assert_eq!(out.total, 1);
    }

    #[tokio::test]
    async fn empty_service_type_is_ignored() {
        let svc = service_with(vec![inst(
            "甲機構",
            "64000",
            "64000050",
            "高雄市三民區民族一路1號",
        )])
        .await;

        let out = svc.search(None, None, Some("")).await.unwrap();
        assert_eq!(out.total, 1);

        let out = svc.search(None, None, Some("喘息")).await.unwrap();
        assert_eq!(out.total, 0);
    }

    #[tokio::test]
    async fn no_filters_returns_the_whole_table() {
        let svc = service_with(vec![
            inst("甲機構", "64000", "64000050", "高雄市三民區民族一路1號"),
            inst("乙機構", "63000", "63000030", "臺北市大安區和平東路2號"),
        ])
        .await;

        let out = svc.search(None, None, None).await.unwrap();
        assert_eq!(out.total, 2);
        assert_eq!(out.institutions.len(), 2);
    }
}
