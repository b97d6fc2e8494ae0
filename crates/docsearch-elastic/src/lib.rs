//! Hybrid search gateway for Elasticsearch
//!
//! Builds a single request that combines a BM25 `match` on the title with a
//! kNN clause whose query vector is produced by an embedding model running
//! inside the cluster, sends it, and pulls the body and URL out of the top hit.
//!
//! ```text
//! query text ──▶ HybridQuery ──▶ POST /{index}/_search ──▶ SearchResponse ──▶ TopHit
//! ```

pub mod backend;
pub mod client;
pub mod cloud;
pub mod error;
pub mod query;
pub mod response;

pub use backend::SearchBackend;
pub use client::{ElasticClient, ElasticConfig};
pub use cloud::CloudId;
pub use error::{Result, SearchError};
pub use query::{HybridQuery, HybridQueryConfig, SearchRequestBody};
pub use response::{SearchResponse, TopHit};
