//! Completeness check and the missing-info router.

use crate::types::{
    classification::{Classification, Intent, Slot},
    filters::FilterStore,
};

/// Slots that are still unknown, in check order.
///
/// Only recommendation-class intents require slots. Every check runs
/// independently; a slot counts as known when this turn's classification or
/// the accumulated store supplies it (`unknown` never does).
pub fn missing_slots(
    intent: &Intent,
    filters: &FilterStore,
    classification: &Classification,
) -> Vec<Slot> {
    if !intent.is_recommendation() {
        return Vec::new();
    }

    let checks = [
        (Slot::Region, filters.region.is_some()),
        (Slot::Theme, !filters.theme.is_empty()),
        (
            Slot::Who,
            classification.who.is_known() || filters.known_who().is_some(),
        ),
        (
            Slot::Why,
            classification.why.is_known() || filters.known_why().is_some(),
        ),
        (
            Slot::Transport,
            classification.constraints.transport.is_some()
                || filters.constraint_transport.is_some(),
        ),
        (
            Slot::Budget,
            classification.constraints.budget.is_some()
                || filters.constraint_budget.is_some()
                || filters.budget.is_some(),
        ),
        (
            Slot::Season,
            classification.when.season.is_some() || filters.season.is_some(),
        ),
    ];

    checks
        .into_iter()
        .filter(|(_, satisfied)| !satisfied)
        .map(|(slot, _)| slot)
        .collect()
}

/// Branch taken after the completeness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingInfoBranch {
    Clarify,
    Retrieval,
}

pub fn route_missing_info(missing: &[Slot]) -> MissingInfoBranch {
    if missing.is_empty() {
        MissingInfoBranch::Retrieval
    } else {
        MissingInfoBranch::Clarify
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::filters::{Budget, Season, Transport, Who, Why};

    fn complete_store() -> FilterStore {
        FilterStore::new()
            .with_region("부산")
            .with_themes(["바다"])
            .with_who(Who::Couple)
            .with_why(Why::Relaxation)
            .with_transport(Transport::Public)
            .with_budget(Budget::Value)
            .with_season(Season::Summer)
    }

    #[test]
    fn test_empty_store_misses_all_seven_in_order() {
        let missing = missing_slots(
            &Intent::RecommendPlace,
            &FilterStore::new(),
            &Classification::default(),
        );
        assert_eq!(
            missing,
            vec![
                Slot::Region,
                Slot::Theme,
                Slot::Who,
                Slot::Why,
                Slot::Transport,
                Slot::Budget,
                Slot::Season,
            ]
        );
    }

    #[test]
    fn test_complete_store_routes_to_retrieval() {
        let missing = missing_slots(
            &Intent::RecommendAccommodation,
            &complete_store(),
            &Classification::default(),
        );
        assert!(missing.is_empty());
        assert_eq!(route_missing_info(&missing), MissingInfoBranch::Retrieval);
    }

    #[test]
    fn test_non_recommendation_intents_need_nothing() {
        for intent in [
            Intent::AddFavorite,
            Intent::ShowFavorites,
            Intent::Other("hello".into()),
        ] {
            assert!(missing_slots(&intent, &FilterStore::new(), &Classification::default())
                .is_empty());
        }
    }

    #[test]
    fn test_persisted_unknown_does_not_satisfy() {
        let mut store = complete_store();
        store.who = Some(Who::Unknown);
        let missing = missing_slots(&Intent::PlanTrip, &store, &Classification::default());
        assert_eq!(missing, vec![Slot::Who]);
        assert_eq!(route_missing_info(&missing), MissingInfoBranch::Clarify);
    }

    #[test]
    fn test_budget_display_hint_satisfies_budget() {
        let mut store = complete_store();
        store.constraint_budget = None;
        store.budget = Some("저렴".into());
        let missing = missing_slots(&Intent::RecommendPlace, &store, &Classification::default());
        assert!(missing.is_empty());
    }

    #[test]
    fn test_classification_satisfies_slots() {
        let mut classification = Classification::default();
        classification.who = Who::Solo;
        classification.constraints.transport = Some(Transport::Car);
        let missing = missing_slots(
            &Intent::RecommendPlace,
            &FilterStore::new().with_region("제주"),
            &classification,
        );
        assert_eq!(
            missing,
            vec![Slot::Theme, Slot::Why, Slot::Budget, Slot::Season]
        );
    }
}
