use crate::client::traits::PropertyApi;
use crate::config::SearchConfig;
use crate::error::ApiError;
use crate::models::PropertyResult;
use crate::search::PropertyQueryParameters;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Keys a search response may carry its result array under, in preference order
pub const ENVELOPE_KEYS: &[&str] = &["data", "results", "listings"];

/// REST client for the listings backend
pub struct HttpPropertyClient {
    client: Client,
    base_url: Url,
}

impl HttpPropertyClient {
    /// Create a client for `base_url` (e.g. `https://api.example.com/api`)
    pub fn new(base_url: &str, timeout: Duration, user_agent: &str) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Self::with_client(base_url, client)
    }

    /// Use an already configured reqwest client
    pub fn with_client(base_url: &str, client: Client) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(
                url::ParseError::RelativeUrlWithCannotBeABaseBase,
            ));
        }

        Ok(Self { client, base_url })
    }

    /// Create a client from the loaded configuration
    pub fn from_config(config: &SearchConfig) -> Result<Self, ApiError> {
        Self::new(
            &config.api_base_url,
            Duration::from_secs(config.request_timeout_secs),
            &config.user_agent,
        )
    }

    /// Base URL with `segments` appended as escaped path segments
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidBaseUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json(
        &self,
        url: Url,
        query: &[(&'static str, String)],
    ) -> Result<(StatusCode, Option<Value>), ApiError> {
        debug!("GET {} ({} query parameters)", url, query.len());

        let response = self.client.get(url).query(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Ok((status, None));
        }

        let bytes = response.bytes().await?;
        let body = serde_json::from_slice::<Value>(&bytes)?;
        Ok((status, Some(body)))
    }
}

#[async_trait]
impl PropertyApi for HttpPropertyClient {
    async fn search(
        &self,
        params: &PropertyQueryParameters,
    ) -> Result<Vec<PropertyResult>, ApiError> {
        let url = self.endpoint(&["properties"])?;
        let (status, body) = self.get_json(url, &params.to_query_pairs()).await?;

        let Some(body) = body else {
            warn!("Search endpoint returned status: {}", status);
            return Err(ApiError::Status(status));
        };

        let listings = extract_listings(body)?;
        info!(
            "Fetched {} listings (page {}, limit {})",
            listings.len(),
            params.page,
            params.limit
        );
        Ok(listings)
    }

    async fn get_property(&self, id_or_slug: &str) -> Result<PropertyResult, ApiError> {
        let url = self.endpoint(&["properties", id_or_slug])?;
        let (status, body) = self.get_json(url, &[]).await?;

        match body {
            Some(body) => Ok(extract_listing(body)?),
            None if status == StatusCode::NOT_FOUND => {
                Err(ApiError::NotFound(id_or_slug.to_string()))
            }
            None => {
                warn!("Listing endpoint returned status: {}", status);
                Err(ApiError::Status(status))
            }
        }
    }

    fn source_name(&self) -> &'static str {
        "REST API"
    }
}

/// Pull the result array out of a search response.
///
/// The array is taken from the first of [`ENVELOPE_KEYS`] holding one, else
/// the body itself. Entries that do not decode as a listing are skipped.
pub fn extract_listings(body: Value) -> Result<Vec<PropertyResult>, serde_json::Error> {
    let items = match body {
        Value::Object(mut map) => {
            let key = ENVELOPE_KEYS
                .iter()
                .find(|key| map.get(**key).is_some_and(Value::is_array));
            match key {
                Some(key) => map.remove(*key).unwrap_or_default(),
                None => Value::Object(map),
            }
        }
        other => other,
    };

    let items: Vec<Value> = serde_json::from_value(items)?;
    let total = items.len();

    let listings: Vec<PropertyResult> = items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(listing) => Some(listing),
            Err(e) => {
                warn!("Skipping listing that failed to decode: {}", e);
                None
            }
        })
        .collect();

    if listings.len() < total {
        debug!("Decoded {} of {} listings", listings.len(), total);
    }
    Ok(listings)
}

/// Pull a single listing out of a detail response (`data` envelope or bare)
pub fn extract_listing(body: Value) -> Result<PropertyResult, serde_json::Error> {
    let body = match body {
        Value::Object(mut map) if map.get("data").is_some_and(Value::is_object) => {
            map.remove("data").unwrap_or_default()
        }
        other => other,
    };
    serde_json::from_value(body)
}
