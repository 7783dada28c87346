//! Offline generator for the real-world city/district mapping.
//!
//! Mines district names out of the full-address column of the cached dataset
//! (the district-code column alone carries no names) and writes the
//! `{cityCode: {name, districts: {districtCode: districtName}}}` JSON file
//! the lookup service loads as its first-choice mapping.

use std::collections::BTreeMap;
use std::env;
use std::fs;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// City code → official name. District names are not listed anywhere in the
/// dataset, so they are extracted from addresses per city.
const CITY_NAMES: [(&str, &str); 22] = [
    ("63000", "臺北市"),
    ("64000", "高雄市"),
    ("65000", "新北市"),
    ("66000", "桃園市"),
    ("67000", "臺中市"),
    ("68000", "臺南市"),
    ("10002", "宜蘭縣"),
    ("10004", "新竹縣"),
    ("10005", "苗栗縣"),
    ("10007", "彰化縣"),
    ("10008", "南投縣"),
    ("10009", "雲林縣"),
    ("10010", "嘉義縣"),
    ("10013", "屏東縣"),
    ("10014", "臺東縣"),
    ("10015", "花蓮縣"),
    ("10016", "澎湖縣"),
    ("10017", "基隆市"),
    ("10018", "新竹市"),
    ("10020", "嘉義市"),
    ("9007", "連江縣"),
    ("9020", "金門縣"),
];

#[derive(Debug, Deserialize)]
struct Row {
    #[serde(rename = "縣市")]
    city: Option<String>,
    #[serde(rename = "區")]
    district: Option<String>,
    #[serde(rename = "地址全址")]
    address: Option<String>,
}

#[derive(Debug, Serialize)]
struct CityMapping {
    name: String,
    districts: BTreeMap<String, String>,
}

/// Finds the district name following the city name in an address; the four
/// administrative suffixes are tried in a fixed order, first hit wins.
fn extract_district(address: &str, patterns: &[Regex]) -> Option<String> {
    for pattern in patterns {
        if let Some(caps) = pattern.captures(address) {
            return Some(caps[1].to_string());
        }
    }
    None
}

fn district_patterns(city_name: &str) -> Vec<Regex> {
    ["區", "市", "鎮", "鄉"]
        .iter()
        .filter_map(|suffix| Regex::new(&format!("{}(\\w+{})", regex::escape(city_name), suffix)).ok())
        .collect()
}

fn normalize_district_code(code: &str) -> &str {
    code.strip_suffix(".0").unwrap_or(code)
}

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let csv_path = env::var("DATASET_CSV_PATH").unwrap_or_else(|_| "data/abc.csv".to_string());
    let out_path =
        env::var("REGION_MAPPING_PATH").unwrap_or_else(|_| "real_city_mapping.json".to_string());

    let raw = fs::read(&csv_path)?;
    let raw = raw
        .strip_prefix(b"\xef\xbb\xbf".as_slice())
        .unwrap_or(&raw)
        .to_vec();

    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(raw.as_slice());
    let rows: Vec<Row> = reader.deserialize().collect::<Result<_, _>>()?;
    tracing::info!("Read {} rows from {}", rows.len(), csv_path);

    let mut mapping: BTreeMap<String, CityMapping> = BTreeMap::new();

    for (city_code, city_name) in CITY_NAMES {
        let patterns = district_patterns(city_name);
        let mut districts: BTreeMap<String, String> = BTreeMap::new();

        for row in rows.iter().filter(|r| r.city.as_deref() == Some(city_code)) {
            let (Some(district), Some(address)) = (row.district.as_deref(), row.address.as_deref())
            else {
                continue;
            };
            let code = normalize_district_code(district.trim());
            if code.is_empty() || districts.contains_key(code) {
                continue;
            }
            if let Some(name) = extract_district(address, &patterns) {
                districts.insert(code.to_string(), name);
            }
        }

        if districts.is_empty() {
            continue;
        }
        tracing::info!("{} ({}): {} districts", city_name, city_code, districts.len());
        mapping.insert(
            city_code.to_string(),
            CityMapping {
                name: city_name.to_string(),
                districts,
            },
        );
    }

    fs::write(&out_path, serde_json::to_string_pretty(&mapping)?)?;
    tracing::info!("Wrote {} cities to {}", mapping.len(), out_path);

    Ok(())
}
