//! Accumulated filter state and the classification vocabulary.

use std::fmt;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Travel companionship type (persona).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum Who {
    FamilyWithKids,
    Couple,
    ParentsTrip,
    Solo,
    #[default]
    Unknown,
}

impl Who {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FamilyWithKids => "family_with_kids",
            Self::Couple => "couple",
            Self::ParentsTrip => "parents_trip",
            Self::Solo => "solo",
            Self::Unknown => "unknown",
        }
    }

    /// Parse a label, mapping anything unrecognized to `Unknown`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "family_with_kids" => Self::FamilyWithKids,
            "couple" => Self::Couple,
            "parents_trip" => Self::ParentsTrip,
            "solo" => Self::Solo,
            _ => Self::Unknown,
        }
    }

    pub fn is_known(&self) -> bool {
        *self != Self::Unknown
    }

    /// `None` for `Unknown`, so it can never act as a filter.
    pub fn known(self) -> Option<Self> {
        self.is_known().then_some(self)
    }

    /// Human-readable label used in recommendation rationales.
    pub fn label(&self) -> &'static str {
        match self {
            Self::FamilyWithKids => "아이 동반 가족",
            Self::Couple => "커플·신혼",
            Self::ParentsTrip => "효도 여행",
            Self::Solo => "나홀",
            Self::Unknown => "",
        }
    }
}

impl From<String> for Who {
    fn from(label: String) -> Self {
        Self::from_label(&label)
    }
}

impl fmt::Display for Who {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Travel motivation (purpose).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum Why {
    Relaxation,
    Activity,
    Culture,
    Food,
    #[default]
    Unknown,
}

impl Why {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Relaxation => "relaxation",
            Self::Activity => "activity",
            Self::Culture => "culture",
            Self::Food => "food",
            Self::Unknown => "unknown",
        }
    }

    /// Parse a label, mapping anything unrecognized to `Unknown`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "relaxation" => Self::Relaxation,
            "activity" => Self::Activity,
            "culture" => Self::Culture,
            "food" => Self::Food,
            _ => Self::Unknown,
        }
    }

    pub fn is_known(&self) -> bool {
        *self != Self::Unknown
    }

    /// `None` for `Unknown`, so it can never act as a filter.
    pub fn known(self) -> Option<Self> {
        self.is_known().then_some(self)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Relaxation => "휴식·힐링",
            Self::Activity => "액티비티",
            Self::Culture => "문화·역사",
            Self::Food => "미식",
            Self::Unknown => "",
        }
    }
}

impl From<String> for Why {
    fn from(label: String) -> Self {
        Self::from_label(&label)
    }
}

impl fmt::Display for Why {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transport {
    Car,
    Public,
}

impl Transport {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "car" => Some(Self::Car),
            "public" => Some(Self::Public),
            _ => None,
        }
    }
}

/// Requested budget level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Budget {
    Value,
    Luxury,
}

impl Budget {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "value" => Some(Self::Value),
            "luxury" => Some(Self::Luxury),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "spring" => Some(Self::Spring),
            "summer" => Some(Self::Summer),
            "autumn" | "fall" => Some(Self::Autumn),
            "winter" => Some(Self::Winter),
            _ => None,
        }
    }
}

/// Where the user is in the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationStage {
    /// No concrete region yet
    #[default]
    Exploration,
    /// Region chosen, details pending
    Refinement,
    /// Considering a specific place
    Confirmation,
}

impl ConversationStage {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "exploration" => Some(Self::Exploration),
            "refinement" => Some(Self::Refinement),
            "confirmation" => Some(Self::Confirmation),
            _ => None,
        }
    }
}

/// Preferences that narrow retrieval. `None` means unconstrained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraints {
    #[serde(default)]
    pub transport: Option<Transport>,
    #[serde(default)]
    pub budget: Option<Budget>,
    #[serde(default)]
    pub pet_friendly: Option<bool>,
}

impl Constraints {
    pub fn is_empty(&self) -> bool {
        self.transport.is_none() && self.budget.is_none() && self.pet_friendly.is_none()
    }
}

/// Timing information.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhenInfo {
    #[serde(default)]
    pub season: Option<Season>,
    #[serde(default)]
    pub need_night_info: Option<bool>,
}

/// Structured state accumulated across turns.
///
/// A merge only ever adds or overwrites keys; nothing is cleared. The caller
/// persists this value and passes it back as the seed of the next turn.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterStore {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    #[serde(default, skip_serializing_if = "IndexSet::is_empty")]
    pub theme: IndexSet<String>,

    /// Display hint: party size
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub people: Option<String>,

    /// Display hint: budget wording from the utterance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub who: Option<Who>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub why: Option<Why>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraint_transport: Option<Transport>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraint_budget: Option<Budget>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraint_pet_friendly: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<Season>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub need_night_info: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_stage: Option<ConversationStage>,
}

impl FilterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_themes(mut self, themes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.theme.extend(themes.into_iter().map(Into::into));
        self
    }

    pub fn with_who(mut self, who: Who) -> Self {
        self.who = who.known();
        self
    }

    pub fn with_why(mut self, why: Why) -> Self {
        self.why = why.known();
        self
    }

    pub fn with_transport(mut self, transport: Transport) -> Self {
        self.constraint_transport = Some(transport);
        self
    }

    pub fn with_budget(mut self, budget: Budget) -> Self {
        self.constraint_budget = Some(budget);
        self
    }

    pub fn with_season(mut self, season: Season) -> Self {
        self.season = Some(season);
        self
    }

    /// Accumulated persona, ignoring a persisted `unknown`.
    pub fn known_who(&self) -> Option<Who> {
        self.who.and_then(Who::known)
    }

    /// Accumulated purpose, ignoring a persisted `unknown`.
    pub fn known_why(&self) -> Option<Why> {
        self.why.and_then(Why::known)
    }

    /// Names of the keys currently set, in declaration order.
    #[cfg(test)]
    pub(crate) fn present_keys(&self) -> Vec<&'static str> {
        let mut keys = Vec::new();
        let mut push = |set: bool, key: &'static str| {
            if set {
                keys.push(key);
            }
        };
        push(self.region.is_some(), "region");
        push(!self.theme.is_empty(), "theme");
        push(self.people.is_some(), "people");
        push(self.budget.is_some(), "budget");
        push(self.who.is_some(), "who");
        push(self.why.is_some(), "why");
        push(self.constraint_transport.is_some(), "constraint_transport");
        push(self.constraint_budget.is_some(), "constraint_budget");
        push(
            self.constraint_pet_friendly.is_some(),
            "constraint_pet_friendly",
        );
        push(self.season.is_some(), "season");
        push(self.need_night_info, "need_night_info");
        push(self.conversation_stage.is_some(), "conversation_stage");
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unrecognized_labels_are_unknown() {
        assert_eq!(Who::from_label("friends"), Who::Unknown);
        assert_eq!(Why::from_label(""), Why::Unknown);
        assert_eq!(Who::from_label(" Couple "), Who::Couple);
    }

    #[test]
    fn test_unknown_is_never_stored() {
        let store = FilterStore::new().with_who(Who::Unknown).with_why(Why::Food);
        assert_eq!(store.who, None);
        assert_eq!(store.why, Some(Why::Food));
    }

    #[test]
    fn test_filter_store_json_shape() {
        let store = FilterStore::new()
            .with_region("부산")
            .with_themes(["바다", "감성"])
            .with_who(Who::Couple)
            .with_transport(Transport::Car);

        let json = serde_json::to_value(&store).unwrap();
        assert_eq!(json["region"], "부산");
        assert_eq!(json["theme"], serde_json::json!(["바다", "감성"]));
        assert_eq!(json["who"], "couple");
        assert_eq!(json["constraint_transport"], "car");
        assert!(json.get("season").is_none());
        assert!(json.get("need_night_info").is_none());

        let back: FilterStore = serde_json::from_value(json).unwrap();
        assert_eq!(back, store);
    }

    #[test]
    fn test_persona_from_unexpected_json_label() {
        let store: FilterStore =
            serde_json::from_str(r#"{"who":"unknown","why":"spa"}"#).unwrap();
        assert_eq!(store.who, Some(Who::Unknown));
        assert_eq!(store.why, Some(Why::Unknown));
    }

    #[test]
    fn test_present_keys() {
        let store = FilterStore::new().with_region("제주").with_season(Season::Summer);
        assert_eq!(store.present_keys(), vec!["region", "season"]);
    }
}
