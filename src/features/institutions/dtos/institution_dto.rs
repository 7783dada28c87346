use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::features::institutions::models::Institution;

/// Query parameters for institution search; all filters are optional and
/// combined with AND.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct InstitutionQuery {
    /// City code, exact match (e.g. 64000)
    pub city: Option<String>,
    /// District code; resolved to a district name for address matching
    pub district: Option<String>,
    /// Substring of the contracted service types (e.g. 居家服務)
    pub service_type: Option<String>,
}

/// One institution as returned by the search endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InstitutionDto {
    pub name: String,
    pub code: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// City code of the record
    pub city: String,
    /// District code of the record
    pub district: String,
    pub address: Option<String>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub service_type: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub manager: Option<String>,
    pub contract_start: Option<String>,
    pub contract_end: Option<String>,
}

impl From<Institution> for InstitutionDto {
    fn from(inst: Institution) -> Self {
        Self {
            name: inst.name,
            code: inst.code,
            kind: inst.kind,
            city: inst.city_code,
            district: inst.district_code,
            address: inst.address,
            longitude: inst.longitude,
            latitude: inst.latitude,
            service_type: inst.service_type,
            phone: inst.phone,
            email: inst.email,
            manager: inst.manager,
            contract_start: inst.contract_start,
            contract_end: inst.contract_end,
        }
    }
}

/// Search response: `total` counts every match, `institutions` holds at most
/// the first hundred in name order.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SearchResponseDto {
    pub total: i64,
    pub institutions: Vec<InstitutionDto>,
}
