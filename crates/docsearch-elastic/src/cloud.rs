//! Elastic Cloud id decoding
//!
//! A cloud id looks like `<label>:<base64>` where the payload decodes to
//! `host[:port]$es_uuid$kibana_uuid`. The Elasticsearch endpoint is
//! `https://<es_uuid>.<host>` on the given port (443 when absent). A port
//! attached to the Elasticsearch id wins over one attached to the host.

use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine as _,
};

use crate::error::{Result, SearchError};

const DEFAULT_PORT: u16 = 443;

// Cloud ids in the wild are not always padded.
const CLOUD_ID_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Split an optional trailing `:port` off a payload segment
fn split_port(segment: &str) -> Result<(&str, Option<u16>)> {
    match segment.rsplit_once(':') {
        Some((name, port)) => {
            let port = port
                .parse::<u16>()
                .map_err(|_| SearchError::InvalidCloudId(format!("invalid port '{}'", port)))?;
            Ok((name, Some(port)))
        }
        None => Ok((segment, None)),
    }
}

/// Decoded Elastic Cloud deployment identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudId {
    /// Deployment label before the colon, if present
    pub label: Option<String>,
    /// Parent domain, e.g. `us-central1.gcp.cloud.es.io`
    pub host: String,
    pub port: u16,
    pub es_uuid: String,
    pub kibana_uuid: Option<String>,
}

impl CloudId {
    /// Parse a raw cloud id string
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(SearchError::InvalidCloudId("cloud id is empty".to_string()));
        }

        let (label, encoded) = match raw.rsplit_once(':') {
            Some((label, encoded)) => (Some(label.to_string()), encoded),
            None => (None, raw),
        };

        let decoded = CLOUD_ID_ENGINE
            .decode(encoded)
            .map_err(|e| SearchError::InvalidCloudId(format!("payload is not base64: {}", e)))?;
        let decoded = String::from_utf8(decoded)
            .map_err(|_| SearchError::InvalidCloudId("payload is not UTF-8".to_string()))?;

        let mut parts = decoded.split('$');
        let parent = parts.next().unwrap_or_default();
        if parent.is_empty() {
            return Err(SearchError::InvalidCloudId(
                "payload has no host".to_string(),
            ));
        }

        let (es_uuid, es_port) = split_port(parts.next().unwrap_or_default())?;
        if es_uuid.is_empty() {
            return Err(SearchError::InvalidCloudId(
                "payload has no Elasticsearch id".to_string(),
            ));
        }
        let kibana_uuid = parts
            .next()
            .map(split_port)
            .transpose()?
            .map(|(uuid, _)| uuid)
            .filter(|uuid| !uuid.is_empty())
            .map(String::from);

        let (host, host_port) = split_port(parent)?;
        let port = es_port.or(host_port).unwrap_or(DEFAULT_PORT);

        Ok(Self {
            label: label.filter(|l| !l.is_empty()),
            host: host.to_string(),
            port,
            es_uuid: es_uuid.to_string(),
            kibana_uuid,
        })
    }

    /// Base URL of the Elasticsearch cluster, without a trailing slash
    pub fn elasticsearch_url(&self) -> String {
        if self.port == DEFAULT_PORT {
            format!("https://{}.{}", self.es_uuid, self.host)
        } else {
            format!("https://{}.{}:{}", self.es_uuid, self.host, self.port)
        }
    }
}
