use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Resource, User};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {source}")]
    ClientBuild {
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected status {status} from {url}")]
    Status { url: String, status: StatusCode },

    #[error("malformed response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// Thin typed wrapper over the REST API. Holds no auth state of its own;
/// the caller passes the session token per request.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout_seconds: u64) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|source| FetchError::ClientBuild { source })?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn with_auth(
        &self,
        req: reqwest::RequestBuilder,
        token: Option<&str>,
    ) -> reqwest::RequestBuilder {
        match token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn expect_success(
        url: &str,
        result: Result<reqwest::Response, reqwest::Error>,
    ) -> Result<reqwest::Response, FetchError> {
        let resp = result.map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })?;
        if !resp.status().is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: resp.status(),
            });
        }
        Ok(resp)
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, FetchError> {
        let url = self.url("/auth/login");
        let body = serde_json::json!({ "username": username, "password": password });
        let result = self.http.post(&url).json(&body).send().await;
        let resp = Self::expect_success(&url, result).await?;
        resp.json()
            .await
            .map_err(|source| FetchError::Body { url, source })
    }

    pub async fn list<R: Resource>(&self, token: Option<&str>) -> Result<Vec<R>, FetchError> {
        let url = self.url(R::ENDPOINT);
        let result = self.with_auth(self.http.get(&url), token).send().await;
        let resp = Self::expect_success(&url, result).await?;
        resp.json()
            .await
            .map_err(|source| FetchError::Body { url, source })
    }

    pub async fn create<R: Resource>(
        &self,
        token: Option<&str>,
        record: &R,
    ) -> Result<R, FetchError> {
        let url = self.url(R::ENDPOINT);
        let result = self
            .with_auth(self.http.post(&url), token)
            .json(record)
            .send()
            .await;
        let resp = Self::expect_success(&url, result).await?;
        resp.json()
            .await
            .map_err(|source| FetchError::Body { url, source })
    }

    /// PUT the full record; partial merges happen before this call.
    pub async fn update<R: Resource>(
        &self,
        token: Option<&str>,
        record: &R,
    ) -> Result<R, FetchError> {
        let url = self.url(&format!("{}/{}", R::ENDPOINT, record.id()));
        let result = self
            .with_auth(self.http.put(&url), token)
            .json(record)
            .send()
            .await;
        let resp = Self::expect_success(&url, result).await?;
        resp.json()
            .await
            .map_err(|source| FetchError::Body { url, source })
    }

    pub async fn delete<R: Resource>(
        &self,
        token: Option<&str>,
        id: i64,
    ) -> Result<(), FetchError> {
        let url = self.url(&format!("{}/{}", R::ENDPOINT, id));
        let result = self.with_auth(self.http.delete(&url), token).send().await;
        Self::expect_success(&url, result).await?;
        Ok(())
    }
}
