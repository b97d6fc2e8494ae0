//! Startup configuration
//!
//! Read once from an optional TOML file overlaid by the process environment,
//! validated, then handed to the server. Environment keys are matched
//! case-insensitively, so the deployment's `cloud_id`, `cloud_user`,
//! `cloud_pass`, `API_KEY` and `PORT` variables map straight onto fields.

use std::{
    collections::HashMap,
    fmt,
    net::{IpAddr, SocketAddr},
    path::Path,
    time::Duration,
};

use config::{Config, Environment, File};
use docsearch_elastic::{ElasticConfig, HybridQueryConfig};
use docsearch_http::HttpConfig;
use serde::Deserialize;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File or environment could not be read or deserialized
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// A required setting is absent or empty
    #[error("Missing required setting: {0}")]
    Missing(&'static str),

    /// A setting is present but unusable
    #[error("Invalid setting {key}: {reason}")]
    Invalid {
        /// Setting name
        key: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

/// Process configuration
#[derive(Clone, Deserialize)]
pub struct AppConfig {
    /// Elastic Cloud deployment id
    #[serde(default)]
    pub cloud_id: Option<String>,

    /// Cluster username
    #[serde(default)]
    pub cloud_user: String,

    /// Cluster password
    #[serde(default)]
    pub cloud_pass: String,

    /// Explicit cluster URL, overrides `cloud_id`
    #[serde(default)]
    pub es_url: Option<String>,

    /// Shared secret expected in the `API_KEY` request header
    #[serde(default)]
    pub api_key: String,

    /// Address to bind
    #[serde(default = "default_bind_host")]
    pub bind_host: IpAddr,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Timeout for each call to the search cluster
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Proxy for outbound calls to the search cluster
    #[serde(default)]
    pub http_proxy: Option<String>,

    /// Index to search
    #[serde(default)]
    pub es_index: Option<String>,

    /// Dense vector field holding title embeddings
    #[serde(default)]
    pub es_embedding_field: Option<String>,

    /// Embedding model deployed in the cluster
    #[serde(default)]
    pub es_model_id: Option<String>,

    /// kNN candidate pool
    #[serde(default)]
    pub knn_num_candidates: Option<u32>,

    /// Weight of the kNN clause
    #[serde(default)]
    pub knn_boost: Option<f32>,

    /// Weight of the title match clause
    #[serde(default)]
    pub title_boost: Option<f32>,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("cloud_id", &self.cloud_id)
            .field("cloud_user", &self.cloud_user)
            .field("cloud_pass", &"<redacted>")
            .field("es_url", &self.es_url)
            .field("api_key", &"<redacted>")
            .field("bind_host", &self.bind_host)
            .field("port", &self.port)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("http_proxy", &self.http_proxy)
            .field("es_index", &self.es_index)
            .field("es_embedding_field", &self.es_embedding_field)
            .field("es_model_id", &self.es_model_id)
            .field("knn_num_candidates", &self.knn_num_candidates)
            .field("knn_boost", &self.knn_boost)
            .field("title_boost", &self.title_boost)
            .finish()
    }
}

fn default_bind_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    5001
}

fn default_request_timeout_secs() -> u64 {
    30
}

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "docsearch.toml";

impl AppConfig {
    /// Load from `path` (if it exists) and the process environment, then validate
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_from(path, None)
    }

    /// Like [`AppConfig::load`] but reading environment variables from `env`
    /// instead of the process when given.
    pub fn load_from(
        path: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let file = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));

        let config = Config::builder()
            .add_source(File::from(file).required(path.is_some()))
            .add_source(Environment::default().source(env))
            .build()?;

        let app_config: AppConfig = config.try_deserialize()?;
        app_config.validate()?;
        Ok(app_config)
    }

    /// Check required settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.is_empty() {
            return Err(ConfigError::Missing("API_KEY"));
        }

        let has_url = self.es_url.as_deref().is_some_and(|u| !u.trim().is_empty());
        let has_cloud_id = self.cloud_id.as_deref().is_some_and(|c| !c.trim().is_empty());
        if !has_url && !has_cloud_id {
            return Err(ConfigError::Missing("cloud_id"));
        }
        if !has_url {
            if self.cloud_user.is_empty() {
                return Err(ConfigError::Missing("cloud_user"));
            }
            if self.cloud_pass.is_empty() {
                return Err(ConfigError::Missing("cloud_pass"));
            }
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "request_timeout_secs",
                reason: "must be greater than 0".to_string(),
            });
        }
        if self.knn_num_candidates == Some(0) {
            return Err(ConfigError::Invalid {
                key: "knn_num_candidates",
                reason: "must be greater than 0".to_string(),
            });
        }
        check_boost("knn_boost", self.knn_boost)?;
        check_boost("title_boost", self.title_boost)?;

        Ok(())
    }

    /// Socket address to listen on
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_host, self.port)
    }

    /// Settings for the search cluster connection
    pub fn elastic_config(&self) -> ElasticConfig {
        let mut query = HybridQueryConfig::default();
        if let Some(index) = &self.es_index {
            query.index = index.clone();
        }
        if let Some(field) = &self.es_embedding_field {
            query.embedding_field = field.clone();
        }
        if let Some(model_id) = &self.es_model_id {
            query.model_id = model_id.clone();
        }
        if let Some(num_candidates) = self.knn_num_candidates {
            query.num_candidates = num_candidates;
        }
        if let Some(boost) = self.knn_boost {
            query.knn_boost = boost;
        }
        if let Some(boost) = self.title_boost {
            query.title_boost = boost;
        }

        ElasticConfig {
            cloud_id: self.cloud_id.clone(),
            es_url: self.es_url.clone(),
            username: self.cloud_user.clone(),
            password: self.cloud_pass.clone(),
            query,
        }
    }

    /// Settings for the outbound HTTP client
    pub fn http_config(&self) -> HttpConfig {
        let config =
            HttpConfig::default().with_timeout(Duration::from_secs(self.request_timeout_secs));
        match self.http_proxy.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
            Some(proxy) => config.with_proxy(proxy),
            None => config,
        }
    }
}

// NaN serializes as `null`, which the cluster rejects.
fn check_boost(key: &'static str, boost: Option<f32>) -> Result<(), ConfigError> {
    match boost {
        Some(value) if !value.is_finite() || value <= 0.0 => Err(ConfigError::Invalid {
            key,
            reason: format!("must be a finite number greater than 0, got {}", value),
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> Option<HashMap<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    const CLOUD_ID: &str = "docs:dXMtY2VudHJhbDEuZ2NwLmNsb3VkLmVzLmlvJGFiYzEyMyRraWI0NTY=";

    #[test]
    fn test_load_deployment_variables() {
        let config = AppConfig::load_from(
            None,
            env(&[
                ("cloud_id", CLOUD_ID),
                ("cloud_user", "elastic"),
                ("cloud_pass", "hunter2"),
                ("API_KEY", "s3cret"),
                ("PORT", "8080"),
            ]),
        )
        .unwrap();

        assert_eq!(config.cloud_id.as_deref(), Some(CLOUD_ID));
        assert_eq!(config.cloud_user, "elastic");
        assert_eq!(config.cloud_pass, "hunter2");
        assert_eq!(config.api_key, "s3cret");
        assert_eq!(config.port, 8080);
        assert_eq!(config.listen_addr().to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn test_port_defaults_to_5001() {
        let config = AppConfig::load_from(
            None,
            env(&[("es_url", "http://localhost:9200"), ("API_KEY", "k")]),
        )
        .unwrap();

        assert_eq!(config.port, 5001);
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn test_missing_api_key() {
        let result = AppConfig::load_from(
            None,
            env(&[("es_url", "http://localhost:9200")]),
        );
        assert!(matches!(result, Err(ConfigError::Missing("API_KEY"))));
    }

    #[test]
    fn test_missing_endpoint() {
        let result = AppConfig::load_from(None, env(&[("API_KEY", "k")]));
        assert!(matches!(result, Err(ConfigError::Missing("cloud_id"))));
    }

    #[test]
    fn test_cloud_id_requires_credentials() {
        let result = AppConfig::load_from(
            None,
            env(&[("API_KEY", "k"), ("cloud_id", CLOUD_ID), ("cloud_user", "elastic")]),
        );
        assert!(matches!(result, Err(ConfigError::Missing("cloud_pass"))));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let result = AppConfig::load_from(
            None,
            env(&[
                ("API_KEY", "k"),
                ("es_url", "http://localhost:9200"),
                ("request_timeout_secs", "0"),
            ]),
        );
        assert!(matches!(
            result,
            Err(ConfigError::Invalid {
                key: "request_timeout_secs",
                ..
            })
        ));
    }

    fn local_config() -> AppConfig {
        AppConfig::load_from(
            None,
            env(&[("API_KEY", "k"), ("es_url", "http://localhost:9200")]),
        )
        .unwrap()
    }

    #[test]
    fn test_non_finite_boost_rejected() {
        let mut config = local_config();
        config.knn_boost = Some(f32::NAN);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { key: "knn_boost", .. })
        ));

        let mut config = local_config();
        config.title_boost = Some(f32::INFINITY);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { key: "title_boost", .. })
        ));
    }

    #[test]
    fn test_non_positive_boost_rejected_at_load() {
        for value in ["-2", "0"] {
            let result = AppConfig::load_from(
                None,
                env(&[
                    ("API_KEY", "k"),
                    ("es_url", "http://localhost:9200"),
                    ("knn_boost", value),
                ]),
            );
            assert!(matches!(
                result,
                Err(ConfigError::Invalid { key: "knn_boost", .. })
            ));
        }
    }

    #[test]
    fn test_positive_boosts_accepted() {
        let mut config = local_config();
        config.knn_boost = Some(12.5);
        config.title_boost = Some(0.5);
        assert!(config.validate().is_ok());

        let query = config.elastic_config().query;
        assert_eq!(query.knn_boost, 12.5);
        assert_eq!(query.title_boost, 0.5);
    }

    #[test]
    fn test_http_proxy_reaches_client_config() {
        let config = AppConfig::load_from(
            None,
            env(&[
                ("API_KEY", "k"),
                ("es_url", "http://localhost:9200"),
                ("HTTP_PROXY", "http://proxy.internal:3128"),
            ]),
        )
        .unwrap();
        assert_eq!(
            config.http_config().proxy.as_deref(),
            Some("http://proxy.internal:3128")
        );
        assert_eq!(local_config().http_config().proxy, None);
    }

    #[test]
    fn test_file_overlaid_by_environment() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("docsearch.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "es_url = \"http://file-host:9200\"\napi_key = \"from-file\"\nport = 7000\nes_index = \"search-staging\"\nknn_num_candidates = 50"
        )
        .unwrap();

        let config = AppConfig::load_from(Some(&path), env(&[("PORT", "7100")])).unwrap();

        assert_eq!(config.api_key, "from-file");
        assert_eq!(config.port, 7100);

        let elastic = config.elastic_config();
        assert_eq!(elastic.endpoint().unwrap(), "http://file-host:9200");
        assert_eq!(elastic.query.index, "search-staging");
        assert_eq!(elastic.query.num_candidates, 50);
        assert_eq!(elastic.query.knn_boost, 24.0);
    }

    #[test]
    fn test_explicit_file_must_exist() {
        let result = AppConfig::load_from(
            Some(Path::new("/nonexistent/docsearch.toml")),
            env(&[("API_KEY", "k"), ("es_url", "http://localhost:9200")]),
        );
        assert!(matches!(result, Err(ConfigError::Load(_))));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = AppConfig::load_from(
            None,
            env(&[
                ("API_KEY", "top-secret-key"),
                ("cloud_id", CLOUD_ID),
                ("cloud_user", "elastic"),
                ("cloud_pass", "hunter2"),
            ]),
        )
        .unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("top-secret-key"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn test_http_config_uses_timeout() {
        let config = AppConfig::load_from(
            None,
            env(&[
                ("API_KEY", "k"),
                ("es_url", "http://localhost:9200"),
                ("REQUEST_TIMEOUT_SECS", "7"),
            ]),
        )
        .unwrap();
        assert_eq!(config.http_config().timeout, Duration::from_secs(7));
    }
}
