//! Per-turn input, working state and output.

use serde::{Deserialize, Serialize};

use super::candidate::Candidate;
use super::classification::{Classification, Intent, Slot};
use super::filters::{Constraints, ConversationStage, FilterStore, WhenInfo, Who, Why};
use super::message::Message;

/// Everything the caller supplies for one turn.
///
/// The graph keeps no memory between turns; `history` and `prior_filters`
/// are whatever the caller persisted from the previous [`TurnResult`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TurnRequest {
    pub utterance: String,
    #[serde(default)]
    pub identity: Option<String>,
    #[serde(default)]
    pub history: Vec<Message>,
    #[serde(default)]
    pub prior_filters: Option<FilterStore>,
    /// Names recommended by the previous turn; the only items that can be saved
    #[serde(default)]
    pub recommended: Vec<String>,
}

impl TurnRequest {
    pub fn new(utterance: impl Into<String>) -> Self {
        Self {
            utterance: utterance.into(),
            ..Default::default()
        }
    }

    pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = Some(identity.into());
        self
    }

    pub fn with_history(mut self, history: Vec<Message>) -> Self {
        self.history = history;
        self
    }

    pub fn with_prior_filters(mut self, filters: FilterStore) -> Self {
        self.prior_filters = Some(filters);
        self
    }

    pub fn with_recommended(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.recommended = names.into_iter().map(Into::into).collect();
        self
    }

    /// Seed the next turn from a previous result.
    pub fn continuing(utterance: impl Into<String>, previous: &TurnResult) -> Self {
        Self {
            utterance: utterance.into(),
            identity: None,
            history: previous.history.clone(),
            prior_filters: Some(previous.filters.clone()),
            recommended: previous
                .recommendations
                .iter()
                .map(|rec| rec.name.clone())
                .collect(),
        }
    }
}

/// A ranked recommendation with its rationale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub name: String,
    pub region: String,
    pub theme: Vec<String>,
    pub description: String,
    pub reason: String,
    pub score: f32,
    pub who: Vec<Who>,
    pub why: Vec<Why>,
}

/// An entry of a user's favorites list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteItem {
    pub name: String,
    /// Date the item was saved (YYYY-MM-DD)
    pub added_at: String,
}

impl FavoriteItem {
    pub fn new(name: impl Into<String>, added_at: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            added_at: added_at.into(),
        }
    }
}

/// Working state of a single turn. Discarded when the turn ends.
#[derive(Debug, Clone, Default)]
pub struct TurnState {
    pub history: Vec<Message>,
    pub latest_message: String,
    pub intent: Option<Intent>,
    pub classification: Classification,
    pub filters: FilterStore,
    pub missing_info: Vec<Slot>,
    pub retrieved: Vec<Candidate>,
    pub recommendations: Vec<Recommendation>,
    pub clarifying_question: Option<String>,
    pub response: Option<String>,
    pub post_actions: Vec<String>,
    pub favorite_items: Vec<FavoriteItem>,
    pub identity: Option<String>,
    pub recommended: Vec<String>,
}

impl TurnState {
    /// Build the initial state from a request.
    ///
    /// Persona and purpose start from the accumulated filters so branches
    /// that skip classification still report them.
    pub fn from_request(request: TurnRequest) -> Self {
        let filters = request.prior_filters.unwrap_or_default();
        let classification = Classification {
            who: filters.known_who().unwrap_or_default(),
            why: filters.known_why().unwrap_or_default(),
            constraints: Constraints {
                transport: filters.constraint_transport,
                budget: filters.constraint_budget,
                pet_friendly: filters.constraint_pet_friendly,
            },
            when: WhenInfo {
                season: filters.season,
                need_night_info: filters.need_night_info.then_some(true),
            },
            conversation_stage: filters.conversation_stage.unwrap_or_default(),
        };

        Self {
            history: request.history,
            latest_message: request.utterance,
            classification,
            filters,
            identity: request
                .identity
                .filter(|identity| !identity.trim().is_empty()),
            recommended: request.recommended,
            ..Default::default()
        }
    }

    /// Effective persona: this turn's classification, else the accumulated one.
    pub fn effective_who(&self) -> Option<Who> {
        self.classification
            .who
            .known()
            .or_else(|| self.filters.known_who())
    }

    /// Effective purpose: this turn's classification, else the accumulated one.
    pub fn effective_why(&self) -> Option<Why> {
        self.classification
            .why
            .known()
            .or_else(|| self.filters.known_why())
    }
}

/// Structured outcome of one turn.
///
/// Always produced, even on timeout or failure; in that case collections are
/// empty and `error` describes what went wrong.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnResult {
    pub response: String,
    pub intent: Option<Intent>,
    pub who: Option<Who>,
    pub why: Option<Why>,
    pub constraints: Constraints,
    #[serde(rename = "when_info")]
    pub when: WhenInfo,
    pub conversation_stage: Option<ConversationStage>,
    pub recommendations: Vec<Recommendation>,
    pub clarifying_question: Option<String>,
    pub post_actions: Vec<String>,
    pub favorite_items: Vec<FavoriteItem>,
    pub needs_clarification: bool,
    /// Accumulated filters with persona and purpose folded in
    pub filters: FilterStore,
    #[serde(rename = "conversation_history")]
    pub history: Vec<Message>,
    pub error: Option<String>,
}

impl TurnResult {
    pub(crate) fn from_state(state: TurnState) -> Self {
        let mut filters = state.filters;
        if let Some(who) = state.classification.who.known() {
            filters.who = Some(who);
        }
        if let Some(why) = state.classification.why.known() {
            filters.why = Some(why);
        }

        Self {
            response: state
                .response
                .unwrap_or_else(|| "응답을 생성하지 못했습니다.".to_string()),
            intent: state.intent,
            who: Some(state.classification.who),
            why: Some(state.classification.why),
            constraints: state.classification.constraints,
            when: state.classification.when,
            conversation_stage: Some(state.classification.conversation_stage),
            recommendations: state.recommendations,
            needs_clarification: state.clarifying_question.is_some(),
            clarifying_question: state.clarifying_question,
            post_actions: state.post_actions,
            favorite_items: state.favorite_items,
            filters,
            history: state.history,
            error: None,
        }
    }

    /// Result for a turn that did not complete.
    pub fn failure(response: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            intent: None,
            who: None,
            why: None,
            constraints: Constraints::default(),
            when: WhenInfo::default(),
            conversation_stage: None,
            recommendations: Vec::new(),
            clarifying_question: None,
            post_actions: Vec::new(),
            favorite_items: Vec::new(),
            needs_clarification: false,
            filters: FilterStore::default(),
            history: Vec::new(),
            error: Some(error.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::filters::{Season, Transport};

    #[test]
    fn test_state_seeds_classification_from_filters() {
        let prior = FilterStore::new()
            .with_who(Who::Solo)
            .with_transport(Transport::Public)
            .with_season(Season::Winter);
        let state = TurnState::from_request(TurnRequest::new("hi").with_prior_filters(prior));

        assert_eq!(state.classification.who, Who::Solo);
        assert_eq!(state.classification.why, Why::Unknown);
        assert_eq!(
            state.classification.constraints.transport,
            Some(Transport::Public)
        );
        assert_eq!(state.classification.when.season, Some(Season::Winter));
    }

    #[test]
    fn test_blank_identity_is_anonymous() {
        let state = TurnState::from_request(TurnRequest::new("찜 보기").with_identity("  "));
        assert_eq!(state.identity, None);
    }

    #[test]
    fn test_failure_result_is_empty() {
        let result = TurnResult::failure("오류", "boom");
        assert!(result.is_error());
        assert!(result.recommendations.is_empty());
        assert!(result.history.is_empty());
        assert!(!result.needs_clarification);
    }

    #[test]
    fn test_result_folds_known_persona_into_filters() {
        let mut state = TurnState::from_request(TurnRequest::new("x"));
        state.classification.who = Who::Couple;
        state.response = Some("ok".into());

        let result = TurnResult::from_state(state);
        assert_eq!(result.filters.who, Some(Who::Couple));
        assert_eq!(result.filters.why, None);
        assert_eq!(result.why, Some(Why::Unknown));
    }
}
