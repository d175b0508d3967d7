//! Configuration module for the fleet dashboard backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::errors::AppError;
use crate::normalize::VehicleLayout;

/// Default Google Sheets v4 endpoint.
pub const DEFAULT_SHEETS_BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Workbook to read from
    pub spreadsheet_id: Option<String>,
    /// Google API key for the Sheets API
    pub sheets_api_key: Option<String>,
    /// Pre-issued OAuth access token, used instead of the API key when set
    pub sheets_access_token: Option<String>,
    /// Service-account key file contents; takes precedence over the other credentials
    pub google_credentials_json: Option<String>,
    /// Base URL of the Sheets values API
    pub sheets_base_url: String,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Pre-shared key for the data routes (auth disabled when unset)
    pub api_psk: Option<String>,
    /// Shape of the vehicle sheet
    pub vehicle_layout: VehicleLayout,
    /// Timeout applied to every spreadsheet request
    pub fetch_timeout: Duration,
    /// Lifetime of the cached vehicle listing
    pub cache_ttl: Duration,
    /// Directory holding the dashboard pages and assets
    pub static_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            spreadsheet_id: None,
            sheets_api_key: None,
            sheets_access_token: None,
            google_credentials_json: None,
            sheets_base_url: DEFAULT_SHEETS_BASE_URL.to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            log_level: "info".to_string(),
            api_psk: None,
            vehicle_layout: VehicleLayout::default(),
            fetch_timeout: Duration::from_secs(10),
            cache_ttl: Duration::from_secs(30),
            static_dir: PathBuf::from("./static"),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let bind_addr = match env::var("FLEET_BIND_ADDR") {
            Ok(addr) => addr
                .parse()
                .map_err(|_| AppError::Config(format!("Invalid FLEET_BIND_ADDR: {}", addr)))?,
            Err(_) => defaults.bind_addr,
        };

        let vehicle_layout = match env::var("FLEET_VEHICLE_LAYOUT") {
            Ok(layout) => layout.parse().map_err(AppError::Config)?,
            Err(_) => defaults.vehicle_layout,
        };

        Ok(Self {
            spreadsheet_id: non_empty_var("FLEET_SPREADSHEET_ID"),
            sheets_api_key: non_empty_var("FLEET_SHEETS_API_KEY"),
            sheets_access_token: non_empty_var("FLEET_SHEETS_ACCESS_TOKEN"),
            google_credentials_json: non_empty_var("FLEET_GOOGLE_CREDENTIALS_JSON"),
            sheets_base_url: env::var("FLEET_SHEETS_BASE_URL").unwrap_or(defaults.sheets_base_url),
            bind_addr,
            log_level: env::var("FLEET_LOG_LEVEL").unwrap_or(defaults.log_level),
            api_psk: non_empty_var("FLEET_API_PSK"),
            vehicle_layout,
            fetch_timeout: secs_var("FLEET_FETCH_TIMEOUT_SECS", defaults.fetch_timeout)?,
            cache_ttl: secs_var("FLEET_CACHE_TTL_SECS", defaults.cache_ttl)?,
            static_dir: env::var("FLEET_STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn secs_var(name: &str, default: Duration) -> Result<Duration, AppError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| AppError::Config(format!("Invalid {}: {}", name, raw))),
        Err(_) => Ok(default),
    }
}
