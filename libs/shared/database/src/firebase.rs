use std::time::Duration;

use anyhow::{anyhow, Result};
use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, error, warn};

use shared_config::ClinicConfig;

/// Retries for the conditional-write counter before giving up.
const CAS_MAX_ATTEMPTS: u32 = 5;

/// REST client for the Firebase Realtime Database.
///
/// Every collection lives under a path (`doctors`, `appointments`,
/// `appointmentArchive`, ...) and is addressed as `{base}/{path}.json`.
/// A missing node reads back as JSON `null`, which is surfaced as `None`.
pub struct FirebaseClient {
    client: Client,
    base_url: String,
    auth_token: String,
}

impl FirebaseClient {
    pub fn new(config: &ClinicConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.store_timeout_secs))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: config.firebase_database_url.trim_end_matches('/').to_string(),
            auth_token: config.firebase_auth_token.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        let mut url = format!("{}/{}.json", self.base_url, path);
        if !self.auth_token.is_empty() {
            url.push_str(&format!("?auth={}", self.auth_token));
        }
        url
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Store error ({}): {}", status, error_text);

            return Err(match status.as_u16() {
                401 | 403 => anyhow!("Store permission denied: {}", error_text),
                404 => anyhow!("Store path not found: {}", error_text),
                _ => anyhow!("Store error ({}): {}", status, error_text),
            });
        }
        Ok(response)
    }

    /// Read the node at `path`. Returns `None` when the node does not exist.
    pub async fn get<T>(&self, path: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        let url = self.url(path);
        debug!("GET {}", path);

        let response = Self::check_status(self.client.get(&url).send().await?).await?;
        let value: Value = response.json().await?;

        if value.is_null() {
            return Ok(None);
        }

        Ok(Some(serde_json::from_value(value)?))
    }

    /// Write the node at `path`, replacing whatever was there.
    pub async fn set<T>(&self, path: &str, value: &T) -> Result<()>
    where
        T: Serialize,
    {
        let url = self.url(path);
        debug!("PUT {}", path);

        Self::check_status(self.client.put(&url).json(value).send().await?).await?;
        Ok(())
    }

    /// Merge `value` into the node at `path` without touching other children.
    pub async fn update(&self, path: &str, value: &Value) -> Result<()> {
        let url = self.url(path);
        debug!("PATCH {}", path);

        Self::check_status(self.client.patch(&url).json(value).send().await?).await?;
        Ok(())
    }

    /// Append a child under `path` and return the store-generated key.
    pub async fn push<T>(&self, path: &str, value: &T) -> Result<String>
    where
        T: Serialize,
    {
        let url = self.url(path);
        debug!("POST {}", path);

        let response = Self::check_status(self.client.post(&url).json(value).send().await?).await?;
        let body: Value = response.json().await?;

        body.get("name")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| anyhow!("Store did not return a key for pushed record"))
    }

    pub async fn delete(&self, path: &str) -> Result<()> {
        let url = self.url(path);
        debug!("DELETE {}", path);

        Self::check_status(self.client.delete(&url).send().await?).await?;
        Ok(())
    }

    /// Atomically add `delta` to the integer counter at `path` using the
    /// store's ETag-conditional write, retrying on concurrent updates.
    /// Returns the value after the increment.
    pub async fn increment(&self, path: &str, delta: i64) -> Result<i64> {
        let url = self.url(path);

        for attempt in 1..=CAS_MAX_ATTEMPTS {
            let response = Self::check_status(
                self.client
                    .get(&url)
                    .header("X-Firebase-ETag", "true")
                    .send()
                    .await?,
            )
            .await?;

            let etag = response
                .headers()
                .get("ETag")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
                .ok_or_else(|| anyhow!("Store did not return an ETag for {}", path))?;

            let current: Value = response.json().await?;
            let next = current.as_i64().unwrap_or(0) + delta;

            let write = self
                .client
                .put(&url)
                .header("if-match", &etag)
                .json(&next)
                .send()
                .await?;

            if write.status() == StatusCode::PRECONDITION_FAILED {
                warn!("Counter {} changed underneath us, retry {}", path, attempt);
                continue;
            }

            Self::check_status(write).await?;
            return Ok(next);
        }

        Err(anyhow!(
            "Counter {} kept changing after {} attempts",
            path,
            CAS_MAX_ATTEMPTS
        ))
    }
}
