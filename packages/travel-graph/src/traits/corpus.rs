//! Candidate corpus and favorites store traits.
//!
//! Both are owned outside the graph. The graph filters and ranks corpus
//! entries itself and only delegates favorites persistence.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{candidate::Candidate, turn::FavoriteItem};

/// Source of recommendable candidates, in a stable order.
#[async_trait]
pub trait CandidateCorpus: Send + Sync {
    /// All candidates. Order is the tie-breaker for equal scores.
    async fn search(&self) -> Result<Vec<Candidate>>;
}

/// Per-identity favorites persistence.
#[async_trait]
pub trait FavoritesStore: Send + Sync {
    /// Save `item` for `identity` and return the stored entry.
    async fn add(&self, identity: &str, item: &str) -> Result<FavoriteItem>;

    /// Saved items for `identity`.
    async fn list(&self, identity: &str) -> Result<Vec<FavoriteItem>>;
}
