//! Row sources: where raw spreadsheet rows come from.
//!
//! The server pulls rows over HTTP from the sheet export service; the CLI
//! reads the same JSON shape from local files. Both hand back untyped
//! [`RawRow`] maps for the normalizer.

use std::path::PathBuf;
use std::time::Duration;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::Client;

use brandpulse_core::{BrandConfig, Platform};
use brandpulse_ingest::RawRow;

use crate::error::StoreError;

/// Anything that can produce the raw rows for one brand on one platform.
///
/// A brand with no sheet mapped for the platform yields `Ok(vec![])`, never
/// an error.
pub trait RowSource {
    fn fetch_rows(
        &self,
        brand: &BrandConfig,
        platform: Platform,
    ) -> impl std::future::Future<Output = Result<Vec<RawRow>, StoreError>> + Send;
}

/// HTTP client for the sheet export service.
///
/// Fetches `GET {base}/sheets/{sheet_id}/rows`, which answers with a JSON
/// array of row objects. Use [`SheetClient::new`] with the configured base
/// URL, or point it at a mock server in tests.
pub struct SheetClient {
    client: Client,
    base_url: String,
}

impl SheetClient {
    /// Creates a client for the configured sheet service.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn rows_url(&self, sheet_id: &str) -> String {
        let encoded = utf8_percent_encode(sheet_id, NON_ALPHANUMERIC);
        format!("{}/sheets/{encoded}/rows", self.base_url)
    }

    async fn fetch_sheet(&self, sheet_id: &str) -> Result<Vec<RawRow>, StoreError> {
        let url = self.rows_url(sheet_id);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| StoreError::Deserialize {
            context: url,
            source: e,
        })
    }
}

impl RowSource for SheetClient {
    async fn fetch_rows(
        &self,
        brand: &BrandConfig,
        platform: Platform,
    ) -> Result<Vec<RawRow>, StoreError> {
        let Some(sheet_id) = brand.sheet_for(platform) else {
            tracing::debug!(brand = %brand.name, %platform, "no sheet mapped, skipping fetch");
            return Ok(Vec::new());
        };
        self.fetch_sheet(sheet_id).await
    }
}

/// Reads row exports from `{dir}/{slug}.{platform}.json` for offline
/// reporting.
pub struct FileSource {
    dir: PathBuf,
}

impl FileSource {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn export_path(&self, brand: &BrandConfig, platform: Platform) -> PathBuf {
        self.dir.join(format!("{}.{platform}.json", brand.slug()))
    }
}

impl RowSource for FileSource {
    async fn fetch_rows(
        &self,
        brand: &BrandConfig,
        platform: Platform,
    ) -> Result<Vec<RawRow>, StoreError> {
        if brand.sheet_for(platform).is_none() {
            return Ok(Vec::new());
        }

        let path = self.export_path(brand, platform);
        let contents = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;

        serde_json::from_str(&contents).map_err(|e| StoreError::Deserialize {
            context: path.display().to_string(),
            source: e,
        })
    }
}
