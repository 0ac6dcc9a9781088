//! Cloudflare v4 API client
//!
//! Thin reqwest wrapper with Bearer token authentication. Every Cloudflare
//! response uses the `{success, result, errors}` envelope; a falsy `success`
//! is treated as an API error regardless of HTTP status, carrying the raw
//! error payload.

use crate::error::{CloudflareError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Cloudflare API client
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    api_token: String,
}

impl ApiClient {
    /// Create a client against the production API base URL.
    pub fn new(api_token: impl Into<String>) -> Self {
        Self::with_base_url(api_token, CLOUDFLARE_API_BASE)
    }

    /// Create a client against an alternate base URL (used by tests).
    pub fn with_base_url(api_token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_token: api_token.into(),
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let request = self.client.get(self.url(endpoint));
        self.execute(endpoint, request).await
    }

    /// GET with query parameters, percent-encoded on the wire.
    pub async fn get_query<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let request = self.client.get(self.url(endpoint)).query(query);
        self.execute(endpoint, request).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T> {
        let request = self.client.post(self.url(endpoint)).json(body);
        self.execute(endpoint, request).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T> {
        let request = self.client.put(self.url(endpoint)).json(body);
        self.execute(endpoint, request).await
    }

    /// DELETE the resource, checking only the envelope's `success` flag.
    /// Cloudflare returns a null or minimal `result` for deletions.
    pub async fn delete(&self, endpoint: &str) -> Result<()> {
        let request = self.client.delete(self.url(endpoint));
        let _: Option<serde_json::Value> = self.execute_optional(endpoint, request).await?;
        Ok(())
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<T> {
        self.execute_optional(endpoint, request)
            .await?
            .ok_or_else(|| CloudflareError::ApiError("response envelope had no result".to_string()))
    }

    async fn execute_optional<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<Option<T>> {
        let response = request.bearer_auth(&self.api_token).send().await?;
        let envelope: Envelope<T> = response.json().await?;

        if !envelope.success {
            tracing::error!("Request failed: {}", endpoint);
            let detail = serde_json::to_string(&envelope.errors)
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(CloudflareError::ApiError(detail));
        }

        Ok(envelope.result)
    }
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    result: Option<T>,
    #[serde(default)]
    errors: Vec<ApiError>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: i64,
    pub message: String,
}
