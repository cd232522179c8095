//! Intent, classification output and slot identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::filters::{Constraints, ConversationStage, WhenInfo, Who, Why};

/// What the user wants from this turn.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Intent {
    RecommendPlace,
    RecommendAccommodation,
    AddFavorite,
    ShowFavorites,
    PlanTrip,
    /// Any label this graph does not know; routed to the default branch
    Other(String),
}

impl Intent {
    pub fn as_str(&self) -> &str {
        match self {
            Self::RecommendPlace => "recommend_place",
            Self::RecommendAccommodation => "recommend_accommodation",
            Self::AddFavorite => "add_favorite",
            Self::ShowFavorites => "show_favorites",
            Self::PlanTrip => "plan_trip",
            Self::Other(label) => label,
        }
    }

    pub fn from_label(label: &str) -> Self {
        match label {
            "recommend_place" => Self::RecommendPlace,
            "recommend_accommodation" => Self::RecommendAccommodation,
            "add_favorite" => Self::AddFavorite,
            "show_favorites" => Self::ShowFavorites,
            "plan_trip" => Self::PlanTrip,
            other => Self::Other(other.to_string()),
        }
    }

    /// Place, accommodation and trip-planning requests need slots filled.
    pub fn is_recommendation(&self) -> bool {
        matches!(
            self,
            Self::RecommendPlace | Self::RecommendAccommodation | Self::PlanTrip
        )
    }
}

impl From<String> for Intent {
    fn from(label: String) -> Self {
        Self::from_label(&label)
    }
}

impl From<Intent> for String {
    fn from(intent: Intent) -> Self {
        intent.as_str().to_string()
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persona/purpose/constraint classification of one utterance.
///
/// Every field is always populated; "nothing found" is expressed with
/// `Unknown` and empty maps, never by absence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub who: Who,
    pub why: Why,
    pub constraints: Constraints,
    pub when: WhenInfo,
    pub conversation_stage: ConversationStage,
}

/// A named piece of information the graph may ask the user for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Region,
    Theme,
    Who,
    Why,
    Season,
    Transport,
    Budget,
    People,
    Duration,
    PetFriendly,
}

impl Slot {
    /// Order in which missing slots are asked about.
    pub const PRIORITY: [Slot; 10] = [
        Slot::Region,
        Slot::Theme,
        Slot::Who,
        Slot::Why,
        Slot::Season,
        Slot::Transport,
        Slot::Budget,
        Slot::People,
        Slot::Duration,
        Slot::PetFriendly,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Region => "region",
            Self::Theme => "theme",
            Self::Who => "who",
            Self::Why => "why",
            Self::Season => "season",
            Self::Transport => "transport",
            Self::Budget => "budget",
            Self::People => "people",
            Self::Duration => "duration",
            Self::PetFriendly => "pet_friendly",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_labels() {
        assert_eq!(Intent::from_label("plan_trip"), Intent::PlanTrip);
        assert_eq!(
            Intent::from_label("book_flight"),
            Intent::Other("book_flight".into())
        );
        assert!(Intent::RecommendAccommodation.is_recommendation());
        assert!(!Intent::ShowFavorites.is_recommendation());
        assert!(!Intent::Other("x".into()).is_recommendation());
    }

    #[test]
    fn test_intent_serializes_as_label() {
        let json = serde_json::to_string(&Intent::AddFavorite).unwrap();
        assert_eq!(json, r#""add_favorite""#);
        let back: Intent = serde_json::from_str(r#""greeting""#).unwrap();
        assert_eq!(back, Intent::Other("greeting".into()));
    }
}
