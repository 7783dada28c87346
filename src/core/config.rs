use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub store: StoreConfig,
    pub dataset: DatasetConfig,
    pub regions: RegionConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

/// Which `RecordStore` implementation backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Sqlite,
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub database_path: PathBuf,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct DatasetConfig {
    /// Upstream CSV published by the Ministry of Health and Welfare.
    pub url: String,
    /// Where the raw CSV is cached; its mtime is the freshness signal.
    pub csv_path: PathBuf,
    pub max_age_days: f64,
    pub fetch_timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct RegionConfig {
    /// Generated city/district mapping (first tier of the load fallback chain).
    pub mapping_path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            store: StoreConfig::from_env()?,
            dataset: DatasetConfig::from_env()?,
            regions: RegionConfig::from_env(),
            swagger: SwaggerConfig::from_env(),
        })
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl StoreConfig {
    const DEFAULT_MAX_CONNECTIONS: u32 = 5;

    pub fn from_env() -> Result<Self, String> {
        let backend = match env::var("STORE_BACKEND")
            .unwrap_or_else(|_| "sqlite".to_string())
            .to_lowercase()
            .as_str()
        {
            "sqlite" => StoreBackend::Sqlite,
            "memory" => StoreBackend::Memory,
            other => return Err(format!("Invalid STORE_BACKEND: {}", other)),
        };

        let database_path = env::var("DATABASE_PATH")
            .unwrap_or_else(|_| "data/institutions.db".to_string())
            .into();

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MAX_CONNECTIONS must be a valid number".to_string())?;

        Ok(Self {
            backend,
            database_path,
            max_connections,
        })
    }
}

impl DatasetConfig {
    const DEFAULT_URL: &'static str = "https://ltcpap.mohw.gov.tw/publish/abc.csv";
    const DEFAULT_MAX_AGE_DAYS: f64 = 30.0;
    const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATASET_URL").unwrap_or_else(|_| Self::DEFAULT_URL.to_string());
        let csv_path = env::var("DATASET_CSV_PATH")
            .unwrap_or_else(|_| "data/abc.csv".to_string())
            .into();

        let max_age_days = env::var("DATASET_MAX_AGE_DAYS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_AGE_DAYS.to_string())
            .parse::<f64>()
            .map_err(|_| "DATASET_MAX_AGE_DAYS must be a valid number".to_string())?;

        let fetch_timeout_secs = env::var("DATASET_FETCH_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_FETCH_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DATASET_FETCH_TIMEOUT_SECS must be a valid number".to_string())?;

        Ok(Self {
            url,
            csv_path,
            max_age_days,
            fetch_timeout_secs,
        })
    }
}

impl RegionConfig {
    pub fn from_env() -> Self {
        let mapping_path = env::var("REGION_MAPPING_PATH")
            .unwrap_or_else(|_| "real_city_mapping.json".to_string())
            .into();

        Self { mapping_path }
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Self {
        Self {
            username: env::var("SWAGGER_USERNAME").ok(),
            password: env::var("SWAGGER_PASSWORD").ok(),
            title: env::var("SWAGGER_TITLE")
                .unwrap_or_else(|_| "Long-Term-Care Institution Lookup API".to_string()),
            version: env::var("SWAGGER_VERSION")
                .unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string()),
            description: env::var("SWAGGER_DESCRIPTION").unwrap_or_else(|_| {
                "Search API over the MOHW contracted long-term-care institution dataset".to_string()
            }),
        }
    }

    /// Returns "username:password" when both are configured.
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(u), Some(p)) => Some(format!("{}:{}", u, p)),
            _ => None,
        }
    }
}
