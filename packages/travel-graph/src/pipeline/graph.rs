//! The turn orchestrator.
//!
//! A turn walks a fixed stage graph exactly once:
//!
//! ```text
//! user_input → intent_classifier ─┬─ travel flow → travel_classifier → info_extractor
//!                                 │      → missing_info_check ─┬─ clarifying → end
//!                                 │                            └─ retrieval → recommendation → post_action → end
//!                                 ├─ add_favorite → end
//!                                 └─ show_favorites → end
//! ```
//!
//! Topology lives in [`successor`]; stage bodies live in
//! `TravelGraph::execute`. The whole walk runs in a spawned task under the
//! turn deadline, and every failure comes back as a [`TurnResult`] with
//! `error` set.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{
    clarify::{confirmed_facts, prioritize, TemplatePhraser},
    classify::KeywordClassifier,
    completeness::{missing_slots, route_missing_info, MissingInfoBranch},
    fallback::Fallback,
    favorites::{add_favorite, list_favorites, FavoritesOutcome},
    intent::{detect_intent, route_intent, IntentBranch},
    merge::merge_filters,
    recommend::{append_post_actions, render_recommendations, synthesize, POST_ACTIONS},
    retrieval::{retrieve, RetrievalQuery},
};
use crate::error::{GraphError, Result};
use crate::traits::{
    classifier::TravelClassifier,
    corpus::{CandidateCorpus, FavoritesStore},
    phraser::Phraser,
};
use crate::types::{
    classification::Intent,
    config::GraphConfig,
    message::{recent, Message},
    turn::{TurnRequest, TurnResult, TurnState},
};

/// Number of history messages given to the classifier.
const CLASSIFIER_CONTEXT_MESSAGES: usize = 4;

/// A node of the stage graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    UserInput,
    IntentClassifier,
    TravelClassifier,
    InfoExtractor,
    MissingInfoCheck,
    Clarifying,
    Retrieval,
    Recommendation,
    PostAction,
    AddFavorite,
    ShowFavorites,
    End,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserInput => "user_input",
            Self::IntentClassifier => "intent_classifier",
            Self::TravelClassifier => "travel_classifier",
            Self::InfoExtractor => "info_extractor",
            Self::MissingInfoCheck => "missing_info_check",
            Self::Clarifying => "clarifying",
            Self::Retrieval => "retrieval",
            Self::Recommendation => "recommendation",
            Self::PostAction => "post_action",
            Self::AddFavorite => "add_favorite",
            Self::ShowFavorites => "show_favorites",
            Self::End => "end",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every edge of the stage graph, with the branch label for conditional ones.
pub const EDGES: &[(Stage, Stage, Option<&str>)] = &[
    (Stage::UserInput, Stage::IntentClassifier, None),
    (Stage::IntentClassifier, Stage::TravelClassifier, Some("travel_flow")),
    (Stage::IntentClassifier, Stage::AddFavorite, Some("add_favorite")),
    (Stage::IntentClassifier, Stage::ShowFavorites, Some("show_favorites")),
    (Stage::TravelClassifier, Stage::InfoExtractor, None),
    (Stage::InfoExtractor, Stage::MissingInfoCheck, None),
    (Stage::MissingInfoCheck, Stage::Clarifying, Some("clarifying")),
    (Stage::MissingInfoCheck, Stage::Retrieval, Some("retrieval")),
    (Stage::Clarifying, Stage::End, None),
    (Stage::Retrieval, Stage::Recommendation, None),
    (Stage::Recommendation, Stage::PostAction, None),
    (Stage::PostAction, Stage::End, None),
    (Stage::AddFavorite, Stage::End, None),
    (Stage::ShowFavorites, Stage::End, None),
];

/// The stage that runs after `stage`, given the state it produced.
pub fn successor(stage: Stage, state: &TurnState) -> Stage {
    match stage {
        Stage::UserInput => Stage::IntentClassifier,
        Stage::IntentClassifier => {
            let intent = state.intent.clone().unwrap_or(Intent::RecommendPlace);
            match route_intent(&intent) {
                IntentBranch::TravelFlow => Stage::TravelClassifier,
                IntentBranch::FavoriteAdd => Stage::AddFavorite,
                IntentBranch::FavoriteList => Stage::ShowFavorites,
            }
        }
        Stage::TravelClassifier => Stage::InfoExtractor,
        Stage::InfoExtractor => Stage::MissingInfoCheck,
        Stage::MissingInfoCheck => match route_missing_info(&state.missing_info) {
            MissingInfoBranch::Clarify => Stage::Clarifying,
            MissingInfoBranch::Retrieval => Stage::Retrieval,
        },
        Stage::Retrieval => Stage::Recommendation,
        Stage::Recommendation => Stage::PostAction,
        Stage::Clarifying
        | Stage::PostAction
        | Stage::AddFavorite
        | Stage::ShowFavorites
        | Stage::End => Stage::End,
    }
}

/// Render the stage graph as a Mermaid flowchart.
pub fn mermaid() -> String {
    let mut lines = vec![
        "flowchart TD".to_string(),
        format!("    __start__([start]) --> {}", Stage::UserInput),
    ];
    for (from, to, label) in EDGES {
        let to = match to {
            Stage::End => "__end__([end])".to_string(),
            other => other.to_string(),
        };
        match label {
            Some(label) => lines.push(format!("    {} -->|{}| {}", from, label, to)),
            None => lines.push(format!("    {} --> {}", from, to)),
        }
    }
    lines.join("\n")
}

fn preview(text: &str) -> String {
    let mut out: String = text.chars().take(80).collect();
    if text.chars().count() > 80 {
        out.push_str("...");
    }
    out
}

/// Conversational travel recommendation graph.
///
/// Holds only shared, read-only collaborators, so one instance can serve
/// concurrent turns. Cross-turn state travels in [`TurnRequest`] and
/// [`TurnResult`].
///
/// # Example
///
/// ```rust,ignore
/// use travel_graph::{TravelGraph, TurnRequest};
/// use travel_graph::stores::{MemoryCorpus, MemoryFavorites};
///
/// let graph = TravelGraph::new(MemoryCorpus::sample(), MemoryFavorites::with_sample());
/// let first = graph.process_turn(TurnRequest::new("부산 바다 보이는 감성 숙소 추천해줘")).await;
/// let second = graph.process_turn(TurnRequest::continuing("커플이고 여름에 가요", &first)).await;
/// ```
#[derive(Clone)]
pub struct TravelGraph {
    classifier: Option<Arc<dyn TravelClassifier>>,
    phraser: Option<Arc<dyn Phraser>>,
    corpus: Arc<dyn CandidateCorpus>,
    favorites: Arc<dyn FavoritesStore>,
    config: GraphConfig,
}

impl TravelGraph {
    /// Create a graph with deterministic classification and phrasing only.
    pub fn new(
        corpus: impl CandidateCorpus + 'static,
        favorites: impl FavoritesStore + 'static,
    ) -> Self {
        Self::from_shared(Arc::new(corpus), Arc::new(favorites))
    }

    /// Create a graph over collaborators that are shared elsewhere.
    pub fn from_shared(corpus: Arc<dyn CandidateCorpus>, favorites: Arc<dyn FavoritesStore>) -> Self {
        Self {
            classifier: None,
            phraser: None,
            corpus,
            favorites,
            config: GraphConfig::default(),
        }
    }

    /// Use an external classifier, guarded by the keyword fallback.
    pub fn with_classifier(mut self, classifier: Arc<dyn TravelClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Use an external phraser, guarded by the template fallback.
    pub fn with_phraser(mut self, phraser: Arc<dyn Phraser>) -> Self {
        self.phraser = Some(phraser);
        self
    }

    pub fn with_config(mut self, config: GraphConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Mermaid rendering of the stage graph.
    pub fn mermaid(&self) -> String {
        mermaid()
    }

    /// Run one turn. Never fails: timeouts and faults are reported through
    /// [`TurnResult::error`].
    pub async fn process_turn(&self, request: TurnRequest) -> TurnResult {
        info!(
            utterance = %preview(&request.utterance),
            graph_timeout_secs = self.config.graph_timeout().as_secs(),
            external_classifier = self.classifier.is_some(),
            "Turn started"
        );

        match self.run_with_deadline(request).await {
            Ok(result) => {
                info!(
                    intent = ?result.intent,
                    who = ?result.who,
                    why = ?result.why,
                    needs_clarification = result.needs_clarification,
                    recommendations = result.recommendations.len(),
                    "Turn completed"
                );
                result
            }
            Err(e) => {
                warn!(error = %e, "Turn failed");
                failure_result(&e)
            }
        }
    }

    async fn run_with_deadline(&self, request: TurnRequest) -> Result<TurnResult> {
        let timeout = self.config.graph_timeout();
        let graph = self.clone();
        let mut task = tokio::spawn(async move { graph.run(request).await });

        match tokio::time::timeout(timeout, &mut task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(GraphError::stage("turn", join_error)),
            Err(_) => {
                task.abort();
                Err(GraphError::TurnTimeout { after: timeout })
            }
        }
    }

    async fn run(&self, request: TurnRequest) -> Result<TurnResult> {
        let mut state = TurnState::from_request(request);
        let mut stage = Stage::UserInput;

        while stage != Stage::End {
            debug!(stage = %stage, "Running stage");
            self.execute(stage, &mut state).await?;
            stage = successor(stage, &state);
        }

        Ok(TurnResult::from_state(state))
    }

    /// Run a single stage against the turn state.
    async fn execute(&self, stage: Stage, state: &mut TurnState) -> Result<()> {
        match stage {
            Stage::UserInput => {
                if !state.latest_message.trim().is_empty() {
                    state.history.push(Message::user(state.latest_message.clone()));
                }
            }

            Stage::IntentClassifier => {
                let intent = detect_intent(&state.latest_message);
                debug!(intent = %intent, "Intent detected");
                state.intent = Some(intent);
            }

            Stage::TravelClassifier => {
                let classifier: Fallback<dyn TravelClassifier, KeywordClassifier> = Fallback::new(
                    self.classifier.clone(),
                    KeywordClassifier,
                    self.config.llm_timeout(),
                );
                let context = recent(&state.history, CLASSIFIER_CONTEXT_MESSAGES);
                state.classification = classifier
                    .classify(context, &state.latest_message)
                    .await
                    .map_err(|e| GraphError::stage(stage.as_str(), e))?;
                debug!(
                    who = %state.classification.who,
                    why = %state.classification.why,
                    "Classified"
                );
            }

            Stage::InfoExtractor => {
                state.filters =
                    merge_filters(&state.latest_message, &state.filters, &state.classification);
            }

            Stage::MissingInfoCheck => {
                let intent = state.intent.clone().unwrap_or(Intent::RecommendPlace);
                state.missing_info = missing_slots(&intent, &state.filters, &state.classification);
                debug!(missing = ?state.missing_info, "Completeness checked");
            }

            Stage::Clarifying => {
                let slots = prioritize(&state.missing_info);
                if slots.is_empty() {
                    state.clarifying_question = None;
                    return Ok(());
                }

                let facts =
                    confirmed_facts(&state.filters, state.effective_who(), state.effective_why());
                let phraser: Fallback<dyn Phraser, TemplatePhraser> =
                    Fallback::new(self.phraser.clone(), TemplatePhraser, self.config.llm_timeout())
                        .with_min_chars(self.config.min_question_chars);
                let question = phraser
                    .phrase(&facts, &slots, &state.latest_message)
                    .await
                    .map_err(|e| GraphError::stage(stage.as_str(), e))?;

                state.response = Some(question.clone());
                state.clarifying_question = Some(question);
            }

            Stage::Retrieval => {
                let corpus = self
                    .corpus
                    .search()
                    .await
                    .map_err(|e| GraphError::stage(stage.as_str(), e))?;
                let query = RetrievalQuery::from_state(state);
                state.retrieved = retrieve(&corpus, &query);
                debug!(
                    corpus = corpus.len(),
                    retrieved = state.retrieved.len(),
                    "Candidates retrieved"
                );
            }

            Stage::Recommendation => {
                state.recommendations = synthesize(
                    &state.retrieved,
                    &state.filters,
                    state.effective_who(),
                    state.effective_why(),
                );
                state.response = Some(render_recommendations(&state.recommendations));
            }

            Stage::PostAction => {
                state.post_actions = POST_ACTIONS.iter().map(|a| a.to_string()).collect();
                if let Some(response) = &state.response {
                    state.response = Some(append_post_actions(response));
                }
            }

            Stage::AddFavorite => {
                let outcome = add_favorite(
                    state.identity.as_deref(),
                    &state.latest_message,
                    &state.recommended,
                    self.favorites.as_ref(),
                )
                .await
                .map_err(|e| GraphError::stage(stage.as_str(), e))?;
                apply_favorites(state, outcome);
            }

            Stage::ShowFavorites => {
                let outcome = list_favorites(state.identity.as_deref(), self.favorites.as_ref())
                    .await
                    .map_err(|e| GraphError::stage(stage.as_str(), e))?;
                apply_favorites(state, outcome);
            }

            Stage::End => {}
        }

        Ok(())
    }
}

fn apply_favorites(state: &mut TurnState, outcome: FavoritesOutcome) {
    state.response = Some(outcome.response);
    state.favorite_items = outcome.items;
}

fn failure_result(error: &GraphError) -> TurnResult {
    match error {
        GraphError::TurnTimeout { after } => {
            let message = format!("그래프 실행 타임아웃 ({}초 초과)", after.as_secs());
            TurnResult::failure(message.clone(), message)
        }
        other => {
            let message = other.to_string();
            TurnResult::failure(format!("오류가 발생했습니다: {}", message), message)
        }
    }
}
