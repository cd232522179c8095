//! The recommendation pipeline - the core of the library.
//!
//! The pipeline covers:
//! - Intent detection and routing
//! - Persona/purpose classification with a keyword fallback
//! - Filter merging and the completeness check
//! - Clarifying questions for missing slots
//! - Retrieval, ranking and recommendation synthesis
//! - Favorites add/list
//! - The turn orchestrator that walks the stage graph

pub mod clarify;
pub mod classify;
pub mod completeness;
pub mod fallback;
pub mod favorites;
pub mod graph;
pub mod intent;
pub mod merge;
pub mod prompts;
pub mod recommend;
pub mod retrieval;

pub use clarify::{confirmed_facts, prioritize, template_question, TemplatePhraser};
pub use classify::{classify_by_keywords, parse_classification_response, KeywordClassifier};
pub use completeness::{missing_slots, route_missing_info, MissingInfoBranch};
pub use fallback::{with_deadline, Fallback};
pub use favorites::{add_favorite, list_favorites, FavoritesOutcome};
pub use graph::{mermaid, successor, Stage, TravelGraph, EDGES};
pub use intent::{detect_intent, route_intent, IntentBranch};
pub use merge::{extract_region, extract_themes, merge_filters, REGIONS};
pub use prompts::{
    format_classifier_prompt, format_phraser_prompt, strip_code_fence, CLASSIFIER_SYSTEM_PROMPT,
    PHRASER_SYSTEM_PROMPT,
};
pub use recommend::{rationale, render_recommendations, synthesize, POST_ACTIONS};
pub use retrieval::{retrieve, RetrievalQuery, RETRIEVAL_LIMIT};
