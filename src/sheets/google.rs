//! Google Sheets v4 REST client.

use std::sync::Arc;

use gcp_auth::{CustomServiceAccount, TokenProvider};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{CellGridClient, RenderMode, SpreadsheetMetadata};
use crate::config::Config;
use crate::errors::AppError;
use crate::models::{grid_from_values, Grid};

/// OAuth scope requested for service-account tokens.
const SHEETS_SCOPES: &[&str] = &["https://www.googleapis.com/auth/spreadsheets.readonly"];

/// How requests to the Sheets API are authorized.
#[derive(Clone)]
pub enum SheetsCredentials {
    /// `key=` query parameter; enough for link-shared workbooks.
    ApiKey(String),
    /// OAuth bearer token issued out of band.
    AccessToken(String),
    /// Service-account key; a bearer token is minted (and cached until
    /// expiry) for every request.
    ServiceAccount(Arc<CustomServiceAccount>),
}

impl SheetsCredentials {
    /// Parse a service-account key file.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::SourceUnavailable`] when the key cannot be read.
    /// Parser detail is logged, never returned.
    pub fn service_account(json: &str) -> Result<Self, AppError> {
        let invalid = || {
            AppError::SourceUnavailable("Invalid FLEET_GOOGLE_CREDENTIALS_JSON".to_string())
        };

        let info: ServiceAccountInfo = serde_json::from_str(json).map_err(|e| {
            tracing::error!("Error parsing FLEET_GOOGLE_CREDENTIALS_JSON: {}", e);
            invalid()
        })?;
        tracing::info!(
            "Service account: {} (project {})",
            info.client_email,
            info.project_id.as_deref().unwrap_or("unknown")
        );

        let account = CustomServiceAccount::from_json(json).map_err(|e| {
            tracing::error!("Failed to load service account key: {}", e);
            invalid()
        })?;
        Ok(SheetsCredentials::ServiceAccount(Arc::new(account)))
    }
}

impl std::fmt::Debug for SheetsCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SheetsCredentials::ApiKey(_) => f.write_str("ApiKey(..)"),
            SheetsCredentials::AccessToken(_) => f.write_str("AccessToken(..)"),
            SheetsCredentials::ServiceAccount(_) => f.write_str("ServiceAccount(..)"),
        }
    }
}

/// Identity fields of a service-account key, for logging.
#[derive(Debug, Deserialize)]
struct ServiceAccountInfo {
    client_email: String,
    project_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BatchGetResponse {
    #[serde(default)]
    value_ranges: Vec<ValueRange>,
}

#[derive(Debug, Default, Deserialize)]
struct TitleProperties {
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    #[serde(default)]
    properties: TitleProperties,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetResponse {
    #[serde(default)]
    properties: TitleProperties,
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

/// Google API error body.
#[derive(Debug, Deserialize)]
struct GoogleErrorEnvelope {
    error: GoogleErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorDetail {
    message: String,
}

/// Cell-grid client backed by the Google Sheets values API.
#[derive(Debug, Clone)]
pub struct GoogleSheetsClient {
    client: reqwest::Client,
    base_url: Url,
    spreadsheet_id: String,
    credentials: SheetsCredentials,
}

impl GoogleSheetsClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::SourceUnavailable`] when the workbook id or
    /// credentials are missing, or the base URL is unusable.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let spreadsheet_id = config.spreadsheet_id.clone().ok_or_else(|| {
            AppError::SourceUnavailable("FLEET_SPREADSHEET_ID is not set".to_string())
        })?;

        let credentials = match (
            &config.google_credentials_json,
            &config.sheets_access_token,
            &config.sheets_api_key,
        ) {
            (Some(json), _, _) => SheetsCredentials::service_account(json)?,
            (None, Some(token), _) => SheetsCredentials::AccessToken(token.clone()),
            (None, None, Some(key)) => SheetsCredentials::ApiKey(key.clone()),
            (None, None, None) => {
                return Err(AppError::SourceUnavailable(
                    "No Google credentials set (FLEET_GOOGLE_CREDENTIALS_JSON, \
                     FLEET_SHEETS_ACCESS_TOKEN or FLEET_SHEETS_API_KEY)"
                        .to_string(),
                ))
            }
        };

        let base_url = Url::parse(&config.sheets_base_url)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| {
                AppError::SourceUnavailable(format!(
                    "Invalid FLEET_SHEETS_BASE_URL: {}",
                    config.sheets_base_url
                ))
            })?;

        let client = reqwest::Client::builder()
            .timeout(config.fetch_timeout)
            .build()
            .map_err(|e| {
                AppError::SourceUnavailable(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url,
            spreadsheet_id,
            credentials,
        })
    }

    /// URL of the workbook, optionally followed by extra path segments.
    fn spreadsheet_url(&self, segments: &[&str]) -> Result<Url, AppError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::Internal("Sheets base URL cannot hold a path".to_string()))?
            .pop_if_empty()
            .push(&self.spreadsheet_id)
            .extend(segments);
        Ok(url)
    }

    fn values_url(&self, range: &str, mode: RenderMode) -> Result<Url, AppError> {
        let mut url = self.spreadsheet_url(&["values", range])?;
        url.query_pairs_mut()
            .append_pair("valueRenderOption", mode.as_str());
        Ok(url)
    }

    fn batch_url(&self, ranges: &[&str], mode: RenderMode) -> Result<Url, AppError> {
        let mut url = self.spreadsheet_url(&["values:batchGet"])?;
        {
            let mut query = url.query_pairs_mut();
            for range in ranges {
                query.append_pair("ranges", range);
            }
            query.append_pair("valueRenderOption", mode.as_str());
        }
        Ok(url)
    }

    fn metadata_url(&self) -> Result<Url, AppError> {
        let mut url = self.spreadsheet_url(&[])?;
        url.query_pairs_mut()
            .append_pair("fields", "properties.title,sheets.properties.title");
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, what: &str) -> Result<T, AppError> {
        let request = self.client.get(url);
        let request = match &self.credentials {
            SheetsCredentials::ApiKey(key) => request.query(&[("key", key)]),
            SheetsCredentials::AccessToken(token) => request.bearer_auth(token),
            SheetsCredentials::ServiceAccount(account) => {
                let token = account.token(SHEETS_SCOPES).await.map_err(|e| {
                    tracing::error!("Failed to obtain service account token: {}", e);
                    AppError::FetchFailed(format!("Failed to authorize request for {}", what))
                })?;
                request.bearer_auth(token.as_str())
            }
        };

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<GoogleErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            tracing::error!("Sheets API returned {} for {}: {}", status, what, detail);
            return Err(AppError::FetchFailed(format!(
                "Failed to fetch {} (HTTP {})",
                what,
                status.as_u16()
            )));
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait::async_trait]
impl CellGridClient for GoogleSheetsClient {
    async fn fetch_range(&self, range: &str, mode: RenderMode) -> Result<Grid, AppError> {
        let url = self.values_url(range, mode)?;
        let value_range: ValueRange = self.get_json(url, range).await?;
        tracing::debug!(
            "Fetched {} rows from {}",
            value_range.values.len(),
            range
        );
        Ok(grid_from_values(range, value_range.values))
    }

    async fn fetch_ranges_batch(
        &self,
        ranges: &[&str],
        mode: RenderMode,
    ) -> Result<Vec<Grid>, AppError> {
        let url = self.batch_url(ranges, mode)?;
        let what = ranges.join(", ");
        let response: BatchGetResponse = self.get_json(url, &what).await?;

        let mut value_ranges = response.value_ranges.into_iter();
        Ok(ranges
            .iter()
            .map(|range| {
                let values = value_ranges.next().map(|vr| vr.values).unwrap_or_default();
                grid_from_values(range, values)
            })
            .collect())
    }

    async fn spreadsheet_metadata(&self) -> Result<SpreadsheetMetadata, AppError> {
        let url = self.metadata_url()?;
        let response: SpreadsheetResponse = self.get_json(url, "spreadsheet metadata").await?;

        let sheet_names: Vec<String> = response
            .sheets
            .into_iter()
            .filter_map(|sheet| sheet.properties.title)
            .collect();
        tracing::info!("Found sheets: {:?}", sheet_names);

        Ok(SpreadsheetMetadata {
            title: response.properties.title,
            sheet_names,
        })
    }

    fn spreadsheet_id(&self) -> Option<&str> {
        Some(&self.spreadsheet_id)
    }
}
