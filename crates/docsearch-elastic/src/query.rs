//! Hybrid query construction
//!
//! One request carries two clauses that Elasticsearch scores together:
//!
//! - a lexical `bool` query: `match` on the title (BM25) plus an `exists`
//!   filter so documents without a title never rank
//! - a `knn` clause over a pre-indexed embedding field, with the query vector
//!   built in the cluster from the raw text by a deployed model
//!
//! The kNN boost is much larger than the lexical boost, so vector similarity
//! dominates and the title match mostly breaks ties.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Index holding the crawled documentation
pub const DEFAULT_INDEX: &str = "search-elastic-docs";

/// Embedding of the title produced by the ingest inference pipeline
pub const DEFAULT_EMBEDDING_FIELD: &str = "ml.inference.title.predicted_value";

/// Text embedding model deployed in the cluster
pub const DEFAULT_MODEL_ID: &str = "sentence-transformers__all-distilroberta-v1";

/// Tunables for the hybrid query. Defaults match the deployed index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HybridQueryConfig {
    #[serde(default = "default_index")]
    pub index: String,

    /// Field matched lexically and required to exist
    #[serde(default = "default_title_field")]
    pub title_field: String,

    #[serde(default = "default_body_field")]
    pub body_field: String,

    #[serde(default = "default_url_field")]
    pub url_field: String,

    #[serde(default = "default_embedding_field")]
    pub embedding_field: String,

    #[serde(default = "default_model_id")]
    pub model_id: String,

    /// Nearest neighbours returned by the kNN clause
    #[serde(default = "default_k")]
    pub k: u32,

    /// Candidates examined per shard before picking `k`
    #[serde(default = "default_num_candidates")]
    pub num_candidates: u32,

    #[serde(default = "default_title_boost")]
    pub title_boost: f32,

    #[serde(default = "default_knn_boost")]
    pub knn_boost: f32,

    /// Hits requested from the backend
    #[serde(default = "default_size")]
    pub size: u32,
}

impl Default for HybridQueryConfig {
    fn default() -> Self {
        Self {
            index: default_index(),
            title_field: default_title_field(),
            body_field: default_body_field(),
            url_field: default_url_field(),
            embedding_field: default_embedding_field(),
            model_id: default_model_id(),
            k: default_k(),
            num_candidates: default_num_candidates(),
            title_boost: default_title_boost(),
            knn_boost: default_knn_boost(),
            size: default_size(),
        }
    }
}

impl HybridQueryConfig {
    /// Fields projected into each hit
    pub fn projected_fields(&self) -> Vec<String> {
        vec![
            self.title_field.clone(),
            self.body_field.clone(),
            self.url_field.clone(),
        ]
    }
}

fn default_index() -> String {
    DEFAULT_INDEX.to_string()
}

fn default_title_field() -> String {
    "title".to_string()
}

fn default_body_field() -> String {
    "body_content".to_string()
}

fn default_url_field() -> String {
    "url".to_string()
}

fn default_embedding_field() -> String {
    DEFAULT_EMBEDDING_FIELD.to_string()
}

fn default_model_id() -> String {
    DEFAULT_MODEL_ID.to_string()
}

fn default_k() -> u32 {
    1
}

fn default_num_candidates() -> u32 {
    20
}

fn default_title_boost() -> f32 {
    1.0
}

fn default_knn_boost() -> f32 {
    24.0
}

fn default_size() -> u32 {
    1
}

/// Body of `POST /{index}/_search`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRequestBody {
    pub query: LexicalQuery,
    pub knn: KnnClause,
    pub fields: Vec<String>,
    pub size: u32,
    #[serde(rename = "_source")]
    pub source: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LexicalQuery {
    #[serde(rename = "bool")]
    pub bool_query: BoolQuery,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoolQuery {
    pub must: Vec<MatchClause>,
    pub filter: Vec<ExistsClause>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchClause {
    /// Single entry keyed by field name
    #[serde(rename = "match")]
    pub fields: BTreeMap<String, MatchField>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchField {
    pub query: String,
    pub boost: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExistsClause {
    pub exists: ExistsField,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExistsField {
    pub field: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KnnClause {
    pub field: String,
    pub k: u32,
    pub num_candidates: u32,
    pub query_vector_builder: QueryVectorBuilder,
    pub boost: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryVectorBuilder {
    pub text_embedding: TextEmbedding,
}

/// Asks the cluster to embed `model_text` with `model_id` at query time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextEmbedding {
    pub model_id: String,
    pub model_text: String,
}

/// A hybrid query for one piece of user text
#[derive(Debug, Clone)]
pub struct HybridQuery<'a> {
    config: &'a HybridQueryConfig,
    text: &'a str,
}

impl<'a> HybridQuery<'a> {
    pub fn new(config: &'a HybridQueryConfig, text: &'a str) -> Self {
        Self { config, text }
    }

    /// Target index
    pub fn index(&self) -> &str {
        &self.config.index
    }

    /// Build the request body. The text is passed through verbatim to both
    /// clauses.
    pub fn to_body(&self) -> SearchRequestBody {
        let config = self.config;

        let mut match_fields = BTreeMap::new();
        match_fields.insert(
            config.title_field.clone(),
            MatchField {
                query: self.text.to_string(),
                boost: config.title_boost,
            },
        );

        SearchRequestBody {
            query: LexicalQuery {
                bool_query: BoolQuery {
                    must: vec![MatchClause {
                        fields: match_fields,
                    }],
                    filter: vec![ExistsClause {
                        exists: ExistsField {
                            field: config.title_field.clone(),
                        },
                    }],
                },
            },
            knn: KnnClause {
                field: config.embedding_field.clone(),
                k: config.k,
                num_candidates: config.num_candidates,
                query_vector_builder: QueryVectorBuilder {
                    text_embedding: TextEmbedding {
                        model_id: config.model_id.clone(),
                        model_text: self.text.to_string(),
                    },
                },
                boost: config.knn_boost,
            },
            fields: config.projected_fields(),
            size: config.size,
            source: false,
        }
    }
}
