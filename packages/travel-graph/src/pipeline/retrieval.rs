//! Multi-attribute candidate filtering and ranking.

use std::cmp::Ordering;

use crate::types::{
    candidate::Candidate,
    filters::{Budget, Season, Transport, Who, Why},
    turn::TurnState,
};

/// Number of candidates kept after ranking.
pub const RETRIEVAL_LIMIT: usize = 5;

/// Effective retrieval inputs for one turn.
///
/// Every field is optional and each one narrows the result set on its own;
/// an absent field constrains nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RetrievalQuery {
    pub region: Option<String>,
    pub themes: Vec<String>,
    pub who: Option<Who>,
    pub why: Option<Why>,
    pub transport: Option<Transport>,
    pub budget: Option<Budget>,
    pub pet_friendly: Option<bool>,
    pub season: Option<Season>,
}

impl RetrievalQuery {
    /// Build the query from this turn's classification, falling back to the
    /// accumulated filters for anything the turn did not mention.
    pub fn from_state(state: &TurnState) -> Self {
        let constraints = &state.classification.constraints;
        let filters = &state.filters;

        Self {
            region: filters.region.clone(),
            themes: filters.theme.iter().cloned().collect(),
            who: state.effective_who(),
            why: state.effective_why(),
            transport: constraints.transport.or(filters.constraint_transport),
            budget: constraints.budget.or(filters.constraint_budget),
            pet_friendly: constraints.pet_friendly.or(filters.constraint_pet_friendly),
            season: state.classification.when.season.or(filters.season),
        }
    }

    /// Whether a candidate passes every present predicate.
    pub fn matches(&self, candidate: &Candidate) -> bool {
        if let Some(region) = &self.region {
            if &candidate.region != region {
                return false;
            }
        }
        if !self.themes.is_empty() && !self.themes.iter().any(|t| candidate.theme.contains(t)) {
            return false;
        }
        if let Some(who) = self.who.and_then(Who::known) {
            if !candidate.who.contains(&who) {
                return false;
            }
        }
        if let Some(why) = self.why.and_then(Why::known) {
            if !candidate.why.contains(&why) {
                return false;
            }
        }
        if let Some(transport) = self.transport {
            if !candidate.transport_ok.contains(&transport) {
                return false;
            }
        }
        if let Some(budget) = self.budget {
            if !candidate.budget.accepts(budget) {
                return false;
            }
        }
        if let Some(pet_friendly) = self.pet_friendly {
            if candidate.pet_friendly != pet_friendly {
                return false;
            }
        }
        if let Some(season) = self.season {
            if !candidate.season_ok.contains(&season) {
                return false;
            }
        }
        true
    }
}

/// Filter, rank by descending score and keep the top [`RETRIEVAL_LIMIT`].
///
/// The sort is stable, so equal scores keep corpus order.
pub fn retrieve(corpus: &[Candidate], query: &RetrievalQuery) -> Vec<Candidate> {
    let mut matched: Vec<Candidate> = corpus
        .iter()
        .filter(|candidate| query.matches(candidate))
        .cloned()
        .collect();

    matched.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    matched.truncate(RETRIEVAL_LIMIT);
    matched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::memory::sample_candidates;
    use crate::types::{
        candidate::CandidateBudget,
        filters::FilterStore,
        turn::TurnRequest,
    };

    fn query() -> RetrievalQuery {
        RetrievalQuery::default()
    }

    #[test]
    fn test_empty_query_returns_top_five_by_score() {
        let results = retrieve(&sample_candidates(), &query());
        assert_eq!(results.len(), RETRIEVAL_LIMIT);
        assert_eq!(results[0].name, "해운대 달맞이길");
        assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_family_with_kids_excludes_other_personas() {
        let q = RetrievalQuery {
            region: Some("부산".into()),
            who: Some(Who::FamilyWithKids),
            ..query()
        };
        let results = retrieve(&sample_candidates(), &q);

        assert!(!results.is_empty());
        for candidate in &results {
            assert!(candidate.who.contains(&Who::FamilyWithKids), "{}", candidate.name);
        }
        let names: Vec<_> = results.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["부산 아쿠아리움", "기장 스카이라인 루지"]);
    }

    #[test]
    fn test_unknown_persona_is_not_a_filter() {
        let q = RetrievalQuery {
            who: Some(Who::Unknown),
            why: Some(Why::Unknown),
            ..query()
        };
        assert_eq!(
            retrieve(&sample_candidates(), &q),
            retrieve(&sample_candidates(), &query())
        );
    }

    #[test]
    fn test_budget_both_accepts_any_request() {
        let luxury = RetrievalQuery {
            budget: Some(Budget::Luxury),
            ..query()
        };
        let results = retrieve(&sample_candidates(), &luxury);
        assert!(results.iter().all(|c| c.budget == CandidateBudget::Both));
        assert!(!results.is_empty());
    }

    #[test]
    fn test_pet_friendly_exact_match() {
        let pets = RetrievalQuery {
            pet_friendly: Some(true),
            ..query()
        };
        let names: Vec<_> = retrieve(&sample_candidates(), &pets)
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["제주 협재 해변 카페거리"]);

        let no_pets = RetrievalQuery {
            pet_friendly: Some(false),
            region: Some("제주".into()),
            ..query()
        };
        let names: Vec<_> = retrieve(&sample_candidates(), &no_pets)
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["제주 동문시장"]);
    }

    #[test]
    fn test_equal_scores_keep_corpus_order() {
        let corpus = vec![
            Candidate::new("a", "부산", 0.5),
            Candidate::new("b", "부산", 0.9),
            Candidate::new("c", "부산", 0.5),
        ];
        let names: Vec<_> = retrieve(&corpus, &query())
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_retrieval_is_idempotent() {
        let q = RetrievalQuery {
            themes: vec!["바다".into()],
            season: Some(Season::Summer),
            ..query()
        };
        let corpus = sample_candidates();
        assert_eq!(retrieve(&corpus, &q), retrieve(&corpus, &q));
    }

    #[test]
    fn test_query_prefers_turn_values_over_store() {
        let prior = FilterStore::new()
            .with_region("제주")
            .with_who(Who::Solo)
            .with_transport(Transport::Car);
        let mut state = TurnState::from_request(TurnRequest::new("x").with_prior_filters(prior));
        state.classification.who = Who::Couple;
        state.classification.constraints.transport = None;

        let q = RetrievalQuery::from_state(&state);
        assert_eq!(q.region.as_deref(), Some("제주"));
        assert_eq!(q.who, Some(Who::Couple));
        assert_eq!(q.transport, Some(Transport::Car));
        assert_eq!(q.budget, None);
    }
}
