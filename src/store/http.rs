//! Reqwest-backed store talking to the bills REST API
//!
//! This adapter owns transport details only: URL building, bearer auth,
//! multipart encoding and HTTP status classification.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::common::config::ApiConfig;
use crate::common::{Error, Result, StoreError};

use super::types::{Bill, CreatedBill, Credentials, ProofUpload};
use super::Store;

/// Error body returned by the API on failure
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Body returned by `POST /auth/login`
#[derive(Debug, Deserialize)]
struct LoginBody {
    jwt: String,
}

/// Store backed by the bills REST API
pub struct HttpStore {
    client: Client,
    base_url: Url,
    jwt: Option<String>,
}

impl HttpStore {
    /// Build a store from the `[api]` config section
    pub fn new(config: &ApiConfig, jwt: Option<String>) -> Result<Self> {
        let mut base_url = Url::parse(&config.base_url)
            .map_err(|e| Error::Config(format!("invalid api.base_url '{}': {}", config.base_url, e)))?;
        // join() replaces the last segment unless the path ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url,
            jwt,
        })
    }

    /// Resolve a path relative to the base URL
    fn url(&self, path: &str) -> std::result::Result<Url, StoreError> {
        self.base_url
            .join(path)
            .map_err(|e| StoreError::Unknown(format!("invalid url for '{path}': {e}")))
    }

    /// Attach the bearer token, if logged in
    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.jwt {
            Some(jwt) => request.bearer_auth(jwt),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> std::result::Result<T, StoreError> {
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(|e| StoreError::Unknown(format!("request failed: {e}")))?;
        json_or_error(response).await
    }
}

/// Decode a JSON body, or classify a failure status
async fn json_or_error<T: DeserializeOwned>(response: Response) -> std::result::Result<T, StoreError> {
    let status = response.status();
    if !status.is_success() {
        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.message,
            Err(_) => status.canonical_reason().unwrap_or("unknown error").to_string(),
        };
        tracing::warn!(status = status.as_u16(), %message, "Store request failed");
        return Err(StoreError::from_status(status.as_u16(), &message));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| StoreError::Unknown(format!("invalid response body: {e}")))
}

#[async_trait]
impl Store for HttpStore {
    async fn list(&self) -> std::result::Result<Vec<Bill>, StoreError> {
        let url = self.url("bills")?;
        tracing::debug!(%url, "GET bills");
        self.send(self.client.get(url)).await
    }

    async fn create(&self, upload: ProofUpload) -> std::result::Result<CreatedBill, StoreError> {
        let url = self.url("bills")?;
        tracing::debug!(%url, file = %upload.file_name, "POST bills (multipart)");

        let part = Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str(&upload.mime_type)
            .map_err(|e| StoreError::Unknown(format!("invalid mime type: {e}")))?;
        let form = Form::new().part("file", part).text("email", upload.email);

        self.send(self.client.post(url).multipart(form)).await
    }

    async fn update(&self, id: &str, bill: &Bill) -> std::result::Result<Bill, StoreError> {
        let url = self.url(&format!("bills/{id}"))?;
        tracing::debug!(%url, "PATCH bill");
        self.send(self.client.patch(url).json(bill)).await
    }

    async fn login(&self, credentials: &Credentials) -> std::result::Result<String, StoreError> {
        let url = self.url("auth/login")?;
        tracing::debug!(%url, email = %credentials.email, "POST auth/login");
        let body: LoginBody = self.send(self.client.post(url).json(credentials)).await?;
        Ok(body.jwt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(base_url: &str) -> HttpStore {
        let config = ApiConfig {
            base_url: base_url.to_string(),
            request_timeout_secs: 5,
        };
        HttpStore::new(&config, None).unwrap()
    }

    #[test]
    fn test_url_joins_relative_to_base() {
        let store = store("http://localhost:5678/");
        assert_eq!(store.url("bills").unwrap().as_str(), "http://localhost:5678/bills");
        assert_eq!(
            store.url("bills/1234").unwrap().as_str(),
            "http://localhost:5678/bills/1234"
        );
    }

    #[test]
    fn test_url_keeps_base_path() {
        let store = store("https://api.example.com/v1/");
        assert_eq!(
            store.url("auth/login").unwrap().as_str(),
            "https://api.example.com/v1/auth/login"
        );
    }

    #[test]
    fn test_url_keeps_base_path_without_trailing_slash() {
        let store = store("https://api.example.com/v1");
        assert_eq!(
            store.url("bills").unwrap().as_str(),
            "https://api.example.com/v1/bills"
        );
        assert_eq!(
            store.url("bills/1234").unwrap().as_str(),
            "https://api.example.com/v1/bills/1234"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let config = ApiConfig {
            base_url: "not a url".to_string(),
            request_timeout_secs: 5,
        };
        assert!(matches!(HttpStore::new(&config, None), Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_unknown_error() {
        // Port 9 (discard) is reserved and nothing listens on it locally
        let store = store("http://127.0.0.1:9/");
        let err = store.list().await.unwrap_err();
        assert!(matches!(err, StoreError::Unknown(_)));
    }
}
