use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One city or district as exposed by the lookup endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegionEntryDto {
    /// Administrative region code (string, not numeric)
    pub code: String,
    pub name: String,
}

impl RegionEntryDto {
    pub fn new(code: &str, name: &str) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
        }
    }
}
