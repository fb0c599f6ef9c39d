//! HTTP client for the rang colorization API.
//!
//! Provides a minimal client with optional Bearer auth, generic GET/POST
//! helpers, and domain methods (submit, status, stats, feedback). The CLI
//! uses this client directly; the workflow engine consumes it through the
//! `ColorizeBackend` trait.

pub mod api;

use std::time::Duration;

use rang_core::{AppError, Config};
use reqwest::Client;
use serde::de::DeserializeOwned;

/// Authentication strategy for the API.
#[derive(Clone, Debug)]
pub enum Auth {
    /// `Authorization: Bearer {token}`
    Bearer(String),
}

/// HTTP client for the colorization API with optional auth.
///
/// Submissions go through even when no token is configured; the service
/// decides what an anonymous caller may do.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    auth: Option<Auth>,
}

impl ApiClient {
    pub fn new(
        base_url: String,
        auth: Option<Auth>,
        timeout_secs: u64,
    ) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
        })
    }

    /// Create a client from configuration (RANG_API_URL, RANG_API_TOKEN).
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let auth = config.api_token.clone().map(Auth::Bearer);
        Self::new(config.api_base_url.clone(), auth, config.http_timeout_secs)
    }

    /// Create a client from the environment alone.
    pub fn from_env() -> Result<Self, AppError> {
        let config = Config::from_env()
            .map_err(|e| AppError::Internal(format!("Invalid configuration: {}", e)))?;
        Self::from_config(&config)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth {
            Some(Auth::Bearer(token)) => {
                request.header("Authorization", format!("Bearer {}", token))
            }
            None => request,
        }
    }

    /// Map a non-success response to the error taxonomy: 401/403 become
    /// `Unauthorized`, everything else `Api` with the body text preserved.
    async fn error_for_status(response: reqwest::Response) -> AppError {
        let status = response.status();
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        if status.as_u16() == 401 || status.as_u16() == 403 {
            AppError::Unauthorized(message)
        } else {
            AppError::Api {
                status: status.as_u16(),
                message,
            }
        }
    }

    async fn decode_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, AppError> {
        response
            .json()
            .await
            .map_err(|e| AppError::MalformedResponse(format!("Failed to parse response: {}", e)))
    }

    /// GET request with JSON response.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, AppError> {
        let url = self.build_url(path);
        let request = self.apply_auth(self.client.get(&url));

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Network(format!("Failed to send request: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::error_for_status(response).await);
        }

        Self::decode_json(response).await
    }

    /// POST JSON body; the response body is discarded.
    pub async fn post_json<B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), AppError> {
        let url = self.build_url(path);
        let request = self.apply_auth(self.client.post(&url).json(body));

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Network(format!("Failed to send request: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::error_for_status(response).await);
        }

        Ok(())
    }

    /// POST multipart form and deserialize the JSON response.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T, AppError> {
        let url = self.build_url(path);
        let request = self.apply_auth(self.client.post(&url).multipart(form));

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Network(format!("Failed to send request: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::error_for_status(response).await);
        }

        Self::decode_json(response).await
    }

    /// GET raw bytes. Accepts absolute URLs (service-held results) as well
    /// as API-relative paths.
    pub async fn get_bytes(&self, url: &str) -> Result<bytes::Bytes, AppError> {
        let url = if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            self.build_url(url)
        };
        let request = self.apply_auth(self.client.get(&url));

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Network(format!("Failed to fetch bytes: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::error_for_status(response).await);
        }

        response
            .bytes()
            .await
            .map_err(|e| AppError::Network(format!("Failed to read response body: {}", e)))
    }

    /// Raw client for custom requests.
    pub fn client(&self) -> &Client {
        &self.client
    }
}
