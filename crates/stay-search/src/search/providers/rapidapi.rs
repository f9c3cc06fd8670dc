use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use super::ProviderError;
use crate::config::ProviderCredential;

const USER_AGENT: &str = concat!("stay-search/", env!("CARGO_PKG_VERSION"));

/// Base URL plus the `X-RapidAPI-Host` value identifying one upstream API.
#[derive(Debug, Clone)]
pub struct RapidApiEndpoint {
    pub base_url: String,
    pub host: &'static str,
}

impl RapidApiEndpoint {
    pub fn new(base_url: impl Into<String>, host: &'static str) -> Self {
        Self {
            base_url: base_url.into(),
            host,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

/// HTTP client shared by the RapidAPI-hosted adapters.
#[derive(Debug, Clone)]
pub struct RapidApiClient {
    http: Client,
}

impl RapidApiClient {
    pub fn new(timeout: Duration) -> Result<Self, ProviderError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { http })
    }

    pub async fn get_json(
        &self,
        endpoint: &RapidApiEndpoint,
        path: &str,
        params: &[(&str, String)],
        credential: &ProviderCredential,
    ) -> Result<Value, ProviderError> {
        let response = self
            .http
            .get(endpoint.url(path))
            .query(params)
            .header("X-RapidAPI-Key", credential.expose())
            .header("X-RapidAPI-Host", endpoint.host)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }

        response
            .json::<Value>()
            .await
            .map_err(|err| ProviderError::Payload(err.to_string()))
    }
}
