use serde::Deserialize;
use sqlx::FromRow;

/// One contracted long-term-care facility, as stored.
///
/// `city_code`/`district_code` are administrative region codes and stay
/// strings end to end; the upstream CSV sometimes renders district codes as
/// floats (`"50.0"`), which is stripped at parse time.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Institution {
    pub name: String,
    pub code: Option<String>,
    pub kind: Option<String>,
    pub city_code: String,
    pub district_code: String,
    pub address: Option<String>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub o_abc: Option<String>,
    pub service_type: Option<String>,
    pub contract_city: Option<String>,
    pub contract_district: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub manager: Option<String>,
    pub contract_start: Option<String>,
    pub contract_end: Option<String>,
    pub last_updated: Option<String>,
}

/// Raw row of the MOHW dataset, keyed by the upstream Chinese headers.
#[derive(Debug, Clone, Deserialize)]
pub struct CsvRow {
    #[serde(rename = "機構名稱")]
    pub name: Option<String>,
    #[serde(rename = "機構代碼")]
    pub code: Option<String>,
    #[serde(rename = "機構種類")]
    pub kind: Option<String>,
    #[serde(rename = "縣市")]
    pub city_code: Option<String>,
    #[serde(rename = "區")]
    pub district_code: Option<String>,
    #[serde(rename = "地址全址")]
    pub address: Option<String>,
    #[serde(rename = "經度")]
    pub longitude: Option<String>,
    #[serde(rename = "緯度")]
    pub latitude: Option<String>,
    #[serde(rename = "O_ABC")]
    pub o_abc: Option<String>,
    #[serde(rename = "特約服務項目")]
    pub service_type: Option<String>,
    #[serde(rename = "特約縣市")]
    pub contract_city: Option<String>,
    #[serde(rename = "特約區域")]
    pub contract_district: Option<String>,
    #[serde(rename = "機構電話")]
    pub phone: Option<String>,
    #[serde(rename = "電子郵件")]
    pub email: Option<String>,
    #[serde(rename = "機構負責人姓名")]
    pub manager: Option<String>,
    #[serde(rename = "特約起日")]
    pub contract_start: Option<String>,
    #[serde(rename = "特約迄日")]
    pub contract_end: Option<String>,
    #[serde(rename = "最後異動時間")]
    pub last_updated: Option<String>,
}

impl CsvRow {
    /// Parses the raw row into a stored record.
    ///
    /// Returns `None` when any of name / city code / district code is
    /// missing: such rows are dropped during ingestion, never stored.
    pub fn into_institution(self) -> Option<Institution> {
        let name = non_empty(self.name)?;
        let city_code = non_empty(self.city_code)?;
        let district_code = normalize_district_code(&non_empty(self.district_code)?);

        Some(Institution {
            name,
            code: non_empty(self.code),
            kind: non_empty(self.kind),
            city_code,
            district_code,
            address: non_empty(self.address),
            longitude: parse_coord(self.longitude),
            latitude: parse_coord(self.latitude),
            o_abc: non_empty(self.o_abc),
            service_type: non_empty(self.service_type),
            contract_city: non_empty(self.contract_city),
            contract_district: non_empty(self.contract_district),
            phone: non_empty(self.phone),
            email: non_empty(self.email),
            manager: non_empty(self.manager),
            contract_start: non_empty(self.contract_start),
            contract_end: non_empty(self.contract_end),
            last_updated: non_empty(self.last_updated),
        })
    }
}

/// Strips the trailing `.0` artifact left by numeric parsing upstream.
/// Idempotent on already-canonical codes.
pub fn normalize_district_code(code: &str) -> String {
    code.strip_suffix(".0").unwrap_or(code).to_string()
}

fn non_empty(value: Option<String>) -> Option<String> {
    let value = value?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn parse_coord(value: Option<String>) -> Option<f64> {
    value.and_then(|v| v.trim().parse::<f64>().ok())
}
