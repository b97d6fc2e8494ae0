//! HTTP client implementation

use std::fmt;

use reqwest::Method;
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::{
    config::HttpConfig,
    error::{HttpError, Result},
};

/// Username/password pair sent as HTTP basic auth
#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

impl BasicAuth {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Production HTTP client
///
/// Cheap to share behind an `Arc`; the inner reqwest client owns the
/// connection pool.
pub struct HttpClient {
    inner: reqwest::Client,
}

impl HttpClient {
    /// Create a new HTTP client with configuration
    pub fn new(config: HttpConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent);

        // Configure proxy if provided
        if let Some(proxy_url) = &config.proxy {
            let proxy = reqwest::Proxy::all(proxy_url)
                .map_err(|e| HttpError::InvalidProxy(e.to_string()))?;
            builder = builder.proxy(proxy);
        }

        let inner = builder
            .build()
            .map_err(|e| HttpError::BuildError(e.to_string()))?;

        Ok(Self { inner })
    }

    /// POST `body` as JSON and decode the JSON reply.
    ///
    /// Non-2xx replies become [`HttpError::HttpStatus`] carrying the raw
    /// response text.
    pub async fn post_json<B, T>(&self, url: &str, body: &B, auth: Option<&BasicAuth>) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!("HTTP POST: {}", url);
        self.send_json(Method::POST, url, body, auth).await
    }

    async fn send_json<B, T>(
        &self,
        method: Method,
        url: &str,
        body: &B,
        auth: Option<&BasicAuth>,
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = url
            .parse::<url::Url>()
            .map_err(|e| HttpError::InvalidUrl(e.to_string()))?;

        let mut request = self.inner.request(method, url).json(body);
        if let Some(auth) = auth {
            request = request.basic_auth(&auth.username, Some(&auth.password));
        }

        let response = request.send().await.map_err(HttpError::RequestFailed)?;

        let status = response.status();
        if !status.is_success() {
            return Err(HttpError::HttpStatus {
                status,
                message: response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string()),
            });
        }

        let text = response.text().await.map_err(HttpError::RequestFailed)?;
        serde_json::from_str(&text).map_err(HttpError::InvalidBody)
    }
}
