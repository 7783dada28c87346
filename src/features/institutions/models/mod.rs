mod institution;

pub use institution::{normalize_district_code, CsvRow, Institution};
