//! Search backend abstraction

use async_trait::async_trait;

use crate::{error::Result, response::TopHit};

/// Anything that can answer a query text with its single best hit.
///
/// The HTTP layer holds an `Arc<dyn SearchBackend>` built once at startup;
/// implementations must be safe to call from concurrent handlers.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Run a hybrid search for `query_text` and return the top-ranked hit
    async fn top_hit(&self, query_text: &str) -> Result<TopHit>;
}
