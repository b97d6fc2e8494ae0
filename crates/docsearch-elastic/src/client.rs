//! Elasticsearch client used by the search gateway

use std::fmt;

use async_trait::async_trait;
use docsearch_http::{BasicAuth, HttpClient, HttpConfig};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    backend::SearchBackend,
    cloud::CloudId,
    error::{Result, SearchError},
    query::{HybridQuery, HybridQueryConfig},
    response::{SearchResponse, TopHit},
};

/// Connection settings for the search cluster
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ElasticConfig {
    /// Elastic Cloud deployment id
    #[serde(default)]
    pub cloud_id: Option<String>,

    /// Explicit cluster URL; takes precedence over `cloud_id`
    #[serde(default)]
    pub es_url: Option<String>,

    /// Basic auth user; auth is skipped when empty
    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,

    #[serde(default)]
    pub query: HybridQueryConfig,
}

impl fmt::Debug for ElasticConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElasticConfig")
            .field("cloud_id", &self.cloud_id)
            .field("es_url", &self.es_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("query", &self.query)
            .finish()
    }
}

impl ElasticConfig {
    /// Resolve the cluster base URL, without a trailing slash
    pub fn endpoint(&self) -> Result<String> {
        if let Some(url) = self.es_url.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
            return Ok(url.trim_end_matches('/').to_string());
        }

        match self.cloud_id.as_deref().filter(|id| !id.trim().is_empty()) {
            Some(cloud_id) => Ok(CloudId::parse(cloud_id)?.elasticsearch_url()),
            None => Err(SearchError::MissingEndpoint),
        }
    }
}

/// Long-lived Elasticsearch client. Build once, share behind an `Arc`.
pub struct ElasticClient {
    http: HttpClient,
    endpoint: String,
    auth: Option<BasicAuth>,
    query: HybridQueryConfig,
}

impl ElasticClient {
    /// Create a client, resolving the endpoint up front
    pub fn new(config: ElasticConfig, http_config: HttpConfig) -> Result<Self> {
        let endpoint = config.endpoint()?;
        let http = HttpClient::new(http_config)?;

        info!(endpoint = %endpoint, index = %config.query.index, "search backend configured");

        Ok(Self {
            http,
            endpoint,
            auth: (!config.username.is_empty())
                .then(|| BasicAuth::new(config.username, config.password)),
            query: config.query,
        })
    }

    /// Run the hybrid query and return the raw response
    pub async fn search(&self, query_text: &str) -> Result<SearchResponse> {
        let query = HybridQuery::new(&self.query, query_text);
        let url = format!("{}/{}/_search", self.endpoint, query.index());
        let body = query.to_body();

        debug!(index = %query.index(), query_len = query_text.len(), "sending hybrid search");

        let response: SearchResponse = self.http.post_json(&url, &body, self.auth.as_ref()).await?;

        debug!(
            took_ms = ?response.took,
            hits = response.hits.hits.len(),
            "hybrid search completed"
        );

        Ok(response)
    }
}

#[async_trait]
impl SearchBackend for ElasticClient {
    async fn top_hit(&self, query_text: &str) -> Result<TopHit> {
        let response = self.search(query_text).await?;
        response.into_top_hit(&self.query.body_field, &self.query.url_field)
    }
}
