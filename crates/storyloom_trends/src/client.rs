//! HTTP client for the trend provider.

use crate::wire::TrendingResponse;
use storyloom_core::{ProviderConfig, TrendingTopic};
use storyloom_error::{ProviderError, ProviderErrorKind, StoryloomResult};
use tracing::{debug, info, instrument};

/// Client for the trending-searches endpoint.
///
/// Holds the engine identifier, geography, and API key from configuration;
/// the key is read from its file once at construction.
pub struct TrendClient {
    http: reqwest::Client,
    endpoint: String,
    engine: String,
    geo: String,
    api_key: String,
}

impl TrendClient {
    /// Create a client from provider configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key file cannot be read.
    pub fn new(config: &ProviderConfig) -> StoryloomResult<Self> {
        let api_key = std::fs::read_to_string(&config.api_key_file)
            .map_err(|e| {
                ProviderError::new(ProviderErrorKind::Credential(format!(
                    "{}: {}",
                    config.api_key_file.display(),
                    e
                )))
            })?
            .trim()
            .to_string();

        Ok(Self {
            http: reqwest::Client::new(),
            endpoint: config.endpoint.clone(),
            engine: config.engine.clone(),
            geo: config.geo.clone(),
            api_key,
        })
    }

    /// Fetch the current trending batch.
    #[instrument(skip(self))]
    pub async fn fetch(&self) -> StoryloomResult<Vec<TrendingTopic>> {
        debug!(engine = %self.engine, geo = %self.geo, "Fetching trending searches");

        let response = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("engine", self.engine.as_str()),
                ("geo", self.geo.as_str()),
                ("api_key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::new(ProviderErrorKind::Request(e.to_string())))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::new(ProviderErrorKind::Status(status.as_u16())).into());
        }

        let parsed: TrendingResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::new(ProviderErrorKind::Decode(e.to_string())))?;

        let topics: Vec<TrendingTopic> = parsed
            .trending_searches
            .into_iter()
            .map(TrendingTopic::from)
            .collect();

        info!(count = topics.len(), "Fetched trending batch");
        Ok(topics)
    }
}
