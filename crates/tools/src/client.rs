//! HTTP client for the external data host.

use std::time::Duration;

use serde_json::Value;

use rotom_domain::config::ToolsConfig;
use rotom_domain::{Error, Result};

/// Thin GET + JSON-parse wrapper around the data host.
pub struct DataClient {
    base_url: String,
    http: reqwest::Client,
}

impl DataClient {
    pub fn new(cfg: &ToolsConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .user_agent("rotomcoach/0.1")
            .build()
            .map_err(|e| Error::Http(format!("building data client: {e}")))?;

        Ok(Self {
            base_url: cfg.data_base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// GET `{base_url}{path}` and parse the body as JSON.
    pub async fn get_json(&self, path: &str) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Http(format!("{url} returned {}", status.as_u16())));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;
        Ok(serde_json::from_str(&body)?)
    }
}
