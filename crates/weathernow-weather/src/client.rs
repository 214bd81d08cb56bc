//! weatherapi.com client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::instrument;

use crate::error::TransportError;
use crate::types::WeatherSnapshot;

pub const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com/v1";

/// Fetches a snapshot for a location query.
///
/// The seam between the session controller and the transport.
#[async_trait]
pub trait WeatherFetcher: Send + Sync {
    /// `forecast` selects the forecast endpoint (current + hourly) over the
    /// current-only one.
    async fn fetch(&self, query: &str, forecast: bool) -> Result<WeatherSnapshot, TransportError>;
}

#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub base_url: String,
    /// Request timeout; `None` keeps the transport default.
    pub timeout_ms: Option<u64>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl WeatherClient {
    pub fn new(api_key: &str) -> Result<Self, TransportError> {
        Self::with_options(api_key, ClientOptions::default())
    }

    pub fn with_options(api_key: &str, options: ClientOptions) -> Result<Self, TransportError> {
        let mut builder = Client::builder();
        if let Some(ms) = options.timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            base_url: options.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Endpoint URL for the requested mode.
    pub fn endpoint(&self, forecast: bool) -> String {
        let name = if forecast { "forecast" } else { "current" };
        format!("{}/{}.json", self.base_url, name)
    }

    /// Issue one GET for `query`. No retry.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_snapshot(
        &self,
        query: &str,
        forecast: bool,
    ) -> Result<WeatherSnapshot, TransportError> {
        let url = self.endpoint(forecast);

        let response = self
            .client
            .get(&url)
            .query(&[("key", self.api_key.as_str()), ("q", query)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Weather request failed: {}", status);
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let snapshot: WeatherSnapshot = response.json().await?;

        tracing::debug!(
            "Weather data fetched for {}, {}",
            snapshot.location.name,
            snapshot.location.region
        );
        Ok(snapshot)
    }
}

#[async_trait]
impl WeatherFetcher for WeatherClient {
    async fn fetch(&self, query: &str, forecast: bool) -> Result<WeatherSnapshot, TransportError> {
        self.fetch_snapshot(query, forecast).await
    }
}
