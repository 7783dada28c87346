use std::path::Path;

use crate::core::error::Result;
use crate::features::dataset::services::fetcher::decode_bom_utf8;
use crate::features::institutions::models::{CsvRow, Institution};

/// Parses the raw dataset text into storable records.
///
/// Rows missing the institution name, city code or district code are dropped
/// here and never reach the store.
pub fn parse_dataset(raw: &str) -> Result<Vec<Institution>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(raw.as_bytes());

    let mut records = Vec::new();
    let mut dropped = 0usize;

    for row in reader.deserialize::<CsvRow>() {
        match row?.into_institution() {
            Some(inst) => records.push(inst),
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        tracing::debug!("Dropped {} rows missing required fields", dropped);
    }
    Ok(records)
}

/// Reads and parses a cached dataset file. Files supplied out-of-band may
/// still carry a BOM, so decoding goes through the same path as downloads.
pub async fn read_dataset_file(path: &Path) -> Result<Vec<Institution>> {
    let bytes = tokio::fs::read(path).await?;
    parse_dataset(&decode_bom_utf8(&bytes))
}
