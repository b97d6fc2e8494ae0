//! Search response decoding and top-hit extraction

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, SearchError};

/// The parts of an Elasticsearch `_search` reply we read
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    /// Server-side time in milliseconds
    #[serde(default)]
    pub took: Option<u64>,
    pub hits: Hits,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Hits {
    #[serde(default)]
    pub hits: Vec<Hit>,
}

/// One ranked hit. With `_source: false` the content lives in `fields`,
/// where every value is an array.
#[derive(Debug, Clone, Deserialize)]
pub struct Hit {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(rename = "_score", default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub fields: HashMap<String, Vec<Value>>,
}

impl Hit {
    /// First value of a projected field, as text
    pub fn first_text(&self, field: &str) -> Option<&str> {
        self.fields
            .get(field)
            .and_then(|values| values.first())
            .and_then(Value::as_str)
    }
}

/// Body and URL of the best-ranked document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopHit {
    pub body: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl TopHit {
    pub fn new(body: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            url: url.into(),
            id: None,
            score: None,
        }
    }
}

impl SearchResponse {
    /// Take the first hit and read `body_field` and `url_field` from it.
    ///
    /// An empty hit list is [`SearchError::NoResults`], never a panic.
    pub fn into_top_hit(self, body_field: &str, url_field: &str) -> Result<TopHit> {
        let hit = self
            .hits
            .hits
            .into_iter()
            .next()
            .ok_or(SearchError::NoResults)?;

        let body = hit
            .first_text(body_field)
            .ok_or_else(|| SearchError::MissingField(body_field.to_string()))?
            .to_string();
        let url = hit
            .first_text(url_field)
            .ok_or_else(|| SearchError::MissingField(url_field.to_string()))?
            .to_string();

        Ok(TopHit {
            id: hit.id,
            score: hit.score,
            ..TopHit::new(body, url)
        })
    }
}
