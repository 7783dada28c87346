use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

/// One city with its district code→name table.
#[derive(Debug, Clone, Deserialize)]
pub struct CityEntry {
    pub name: String,
    #[serde(default)]
    pub districts: BTreeMap<String, String>,
}

type Mapping = BTreeMap<String, CityEntry>;

/// Code→name directory for cities and districts.
///
/// Loaded once at startup and immutable afterwards. Three sources are tried
/// in order, first existing one wins, no merging:
/// 1. the generated real-world mapping file (output of `generate-mapping`),
/// 2. the bundled static mapping,
/// 3. a minimal hardcoded two-city table.
pub struct RegionDirectory {
    mapping: Mapping,
}

const BUILTIN_MAPPING: &str = include_str!("builtin_regions.json");

impl RegionDirectory {
    pub fn load(generated_path: &Path) -> Self {
        if let Some(mapping) = Self::load_generated(generated_path) {
            tracing::info!(
                "Loaded {} cities from generated mapping {}",
                mapping.len(),
                generated_path.display()
            );
            return Self { mapping };
        }

        if let Some(mapping) = Self::load_builtin() {
            tracing::info!("Loaded {} cities from bundled mapping", mapping.len());
            return Self { mapping };
        }

        tracing::warn!("Falling back to minimal hardcoded region mapping");
        Self {
            mapping: Self::minimal(),
        }
    }

    /// Constructor for tests and callers that already hold a mapping.
    pub fn from_mapping(mapping: BTreeMap<String, CityEntry>) -> Self {
        Self { mapping }
    }

    fn load_generated(path: &Path) -> Option<Mapping> {
        let raw = fs::read_to_string(path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(mapping) => Some(mapping),
            Err(e) => {
                tracing::warn!("Ignoring malformed mapping file {}: {}", path.display(), e);
                None
            }
        }
    }

    fn load_builtin() -> Option<Mapping> {
        serde_json::from_str(BUILTIN_MAPPING).ok()
    }

    fn minimal() -> Mapping {
        let mut mapping = BTreeMap::new();
        mapping.insert(
            "63000".to_string(),
            CityEntry {
                name: "臺北市".to_string(),
                districts: BTreeMap::from([("63000030".to_string(), "大安區".to_string())]),
            },
        );
        mapping.insert(
            "64000".to_string(),
            CityEntry {
                name: "高雄市".to_string(),
                districts: BTreeMap::from([("64000050".to_string(), "三民區".to_string())]),
            },
        );
        mapping
    }

    /// Resolves a district code to its human-readable name.
    pub fn district_name(&self, city_code: &str, district_code: &str) -> Option<&str> {
        self.mapping
            .get(city_code)?
            .districts
            .get(district_code)
            .map(String::as_str)
    }

    /// All known cities as `(code, name)`, ordered by code.
    pub fn cities(&self) -> Vec<(&str, &str)> {
        self.mapping
            .iter()
            .map(|(code, entry)| (code.as_str(), entry.name.as_str()))
            .collect()
    }

    /// Districts of one city as `(code, name)`, ordered by code.
    /// Unknown city yields an empty list, not an error.
    pub fn districts(&self, city_code: &str) -> Vec<(&str, &str)> {
        self.mapping
            .get(city_code)
            .map(|entry| {
                entry
                    .districts
                    .iter()
                    .map(|(code, name)| (code.as_str(), name.as_str()))
                    .collect()
            })
            .unwrap_or_default()
    }
}
