use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::core::error::Result;
use crate::features::institutions::models::Institution;
use crate::modules::store::{DistrictFilter, RecordStore, SearchFilter, SearchOutcome};
use crate::shared::constants::MAX_SEARCH_RESULTS;

/// Sqlite-backed table. Substring predicates use `instr()` rather than
/// `LIKE` so matching stays case-sensitive, identical to the memory backend.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn push_where(builder: &mut QueryBuilder<'_, Sqlite>, filter: &SearchFilter) {
        let mut prefix = " WHERE ";

        if let Some(city) = &filter.city_code {
            builder.push(prefix).push("city_code = ").push_bind(city.clone());
            prefix = " AND ";
        }

        match &filter.district {
            Some(DistrictFilter::Address { name, stem }) => {
                builder
                    .push(prefix)
                    .push("(instr(address, ")
                    .push_bind(name.clone())
                    .push(") > 0 OR instr(address, ")
                    .push_bind(stem.clone())
                    .push(") > 0)");
                prefix = " AND ";
            }
            Some(DistrictFilter::Code(code)) => {
                builder
                    .push(prefix)
                    .push("district_code = ")
                    .push_bind(code.clone());
                prefix = " AND ";
            }
            None => {}
        }

        if let Some(service) = &filter.service_type {
            builder
                .push(prefix)
                .push("instr(service_type, ")
                .push_bind(service.clone())
                .push(") > 0");
        }
    }
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn replace_all(&self, records: Vec<Institution>) -> Result<u64> {
        // Single transaction: readers see the previous snapshot until commit.
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM institutions").execute(&mut *tx).await?;

        let count = records.len() as u64;
        for inst in records {
            sqlx::query(
                r#"
                INSERT INTO institutions (
                    name, code, kind, city_code, district_code, address,
                    longitude, latitude, o_abc, service_type, contract_city,
                    contract_district, phone, email, manager, contract_start,
                    contract_end, last_updated
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(inst.name)
            .bind(inst.code)
            .bind(inst.kind)
            .bind(inst.city_code)
            .bind(inst.district_code)
            .bind(inst.address)
            .bind(inst.longitude)
            .bind(inst.latitude)
            .bind(inst.o_abc)
            .bind(inst.service_type)
            .bind(inst.contract_city)
            .bind(inst.contract_district)
            .bind(inst.phone)
            .bind(inst.email)
            .bind(inst.manager)
            .bind(inst.contract_start)
            .bind(inst.contract_end)
            .bind(inst.last_updated)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(count)
    }

    async fn search(&self, filter: &SearchFilter) -> Result<SearchOutcome> {
        let mut query = QueryBuilder::new(
            r#"
            SELECT name, code, kind, city_code, district_code, address,
                   longitude, latitude, o_abc, service_type, contract_city,
                   contract_district, phone, email, manager, contract_start,
                   contract_end, last_updated
            FROM institutions
            "#,
        );
        Self::push_where(&mut query, filter);
        // id is the insertion order, so equal names stay stable.
        query
            .push(" ORDER BY name ASC, id ASC LIMIT ")
            .push_bind(MAX_SEARCH_RESULTS as i64);

        let institutions: Vec<Institution> =
            query.build_query_as().fetch_all(&self.pool).await?;

        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM institutions");
        Self::push_where(&mut count, filter);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        Ok(SearchOutcome {
            total,
            institutions,
        })
    }

    async fn total_count(&self) -> Result<i64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM institutions")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_store() -> SqliteStore {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        SqliteStore::new(pool)
    }

    fn inst(name: &str, city: &str, district: &str, address: &str, service: &str) -> Institution {
        Institution {
            name: name.to_string(),
            code: None,
            kind: None,
            city_code: city.to_string(),
            district_code: district.to_string(),
            address: Some(address.to_string()),
            longitude: Some(121.5),
            latitude: Some(25.03),
            o_abc: None,
            service_type: Some(service.to_string()),
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

    #[tokio::test]
    async fn replace_all_is_a_full_swap() {
        let store = test_store().await;
        store
            .replace_all(vec![
                inst("甲", "63000", "63000030", "臺北市大安區", ""),
                inst("乙", "63000", "63000030", "臺北市大安區", ""),
            ])
            .await
            .unwrap();
        assert_eq!(store.total_count().await.unwrap(), 2);

        let count = store
            .replace_all(vec![inst("丙", "64000", "64000050", "高雄市三民區", "")])
            .await
            .unwrap();
        assert_eq!(count, 1);
        assert_eq!(store.total_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn address_filter_and_code_fallback_match_memory_semantics() {
        let store = test_store().await;
        store
            .replace_all(vec![
                // Address places this one in 三民區 even though its stored
                // district code is something else entirely.
                inst("甲機構", "64000", "00000000", "高雄市三民區民族一路1號", ""),
                inst("乙機構", "64000", "64000999", "高雄市某處", ""),
            ])
            .await
            .unwrap();

        let fuzzy = SearchFilter {
            city_code: Some("64000".to_string()),
            district: Some(DistrictFilter::Address {
                name: "三民區".to_string(),
                stem: "三民".to_string(),
            }),
            service_type: None,
        };
        let out = store.search(&fuzzy).await.unwrap();
        assert_eq!(out.total, 1);
        assert_eq!(out.institutions[0].name, "甲機構");

        let exact = SearchFilter {
            city_code: Some("64000".to_string()),
            district: Some(DistrictFilter::Code("64000999".to_string())),
            service_type: None,
        };
        let out = store.search(&exact).await.unwrap();
        assert_eq!(out.total, 1);
        assert_eq!(out.institutions[0].name, "乙機構");
    }

    #[tokio::test]
    async fn results_are_capped_but_total_is_not() {
        let store = test_store().await;
        let many: Vec<Institution> = (0..120)
            .map(|i| inst(&format!("機構{:03}", i), "63000", "63000030", "臺北市", ""))
            .collect();
        store.replace_all(many).await.unwrap();

        let out = store.search(&SearchFilter::default()).await.unwrap();
        assert_eq!(out.total, 120);
        assert_eq!(out.institutions.len(), MAX_SEARCH_RESULTS);
        // name order
        assert_eq!(out.institutions[0].name, "機構000");
    }

    #[tokio::test]
    async fn service_type_filter_is_case_sensitive() {
        let store = test_store().await;
        store
            .replace_all(vec![
                inst("甲", "63000", "63000030", "臺北市", "居家服務(Home Care)"),
                inst("乙", "63000", "63000030", "臺北市", "居家服務(HOME CARE)"),
            ])
            .await
            .unwrap();

        let filter = SearchFilter {
            service_type: Some("Home".to_string()),
            ..Default::default()
        };
        assert_eq!(store.search(&filter).await.unwrap().total, 1);
    }
}
