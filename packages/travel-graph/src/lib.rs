//! Conversational Travel Recommendation Graph
//!
//! A multi-turn orchestrator that turns free-form travel requests into
//! either one clarifying question or a short ranked list of recommendations.
//!
//! # Design Philosophy
//!
//! **"The LLM is optional"**
//!
//! - Every external capability has a deterministic fallback
//! - A turn always produces a structured result, even on timeout
//! - Filters accumulate across turns and are never silently dropped
//! - The graph holds no cross-turn state; the caller owns it
//!
//! # Usage
//!
//! ```rust,ignore
//! use travel_graph::{TravelGraph, TurnRequest};
//! use travel_graph::stores::{MemoryCorpus, MemoryFavorites};
//!
//! let graph = TravelGraph::new(MemoryCorpus::sample(), MemoryFavorites::with_sample());
//!
//! let first = graph.process_turn(TurnRequest::new("부산 바다 보이는 감성 숙소 추천해줘")).await;
//! assert!(first.needs_clarification);
//!
//! // The caller feeds the previous result back in
//! let next = TurnRequest::continuing("커플이고 힐링하러 여름에 대중교통으로 가요, 가성비로", &first);
//! let second = graph.process_turn(next).await;
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Capability traits (classifier, phraser, corpus, favorites)
//! - [`types`] - Filter store, classification, candidates, turn input/output
//! - [`pipeline`] - Stages, routers and the [`TravelGraph`] orchestrator
//! - [`stores`] - In-memory corpus and favorites store
//! - [`testing`] - Mock implementations for testing

pub mod error;
pub mod pipeline;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;

#[cfg(feature = "openai")]
pub mod ai;

// Re-export core types at crate root
pub use error::{CapabilityError, GraphError};
pub use traits::{
    classifier::TravelClassifier,
    corpus::{CandidateCorpus, FavoritesStore},
    phraser::Phraser,
};
pub use types::{
    candidate::{Candidate, CandidateBudget},
    classification::{Classification, Intent, Slot},
    config::GraphConfig,
    filters::{
        Budget, Constraints, ConversationStage, FilterStore, Season, Transport, WhenInfo, Who, Why,
    },
    message::{Message, Role},
    turn::{FavoriteItem, Recommendation, TurnRequest, TurnResult, TurnState},
};

// Re-export the orchestrator and deterministic capabilities
pub use pipeline::{KeywordClassifier, Stage, TemplatePhraser, TravelGraph};

// Re-export stores
pub use stores::{MemoryCorpus, MemoryFavorites};
