//! Recommendable entities owned by the corpus provider.

use serde::{Deserialize, Deserializer, Serialize};

use super::filters::{Budget, Season, Transport, Who, Why};

/// Budget level a candidate fits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateBudget {
    Value,
    Luxury,
    #[default]
    Both,
}

impl CandidateBudget {
    /// `Both` accepts every requested budget.
    pub fn accepts(&self, requested: Budget) -> bool {
        match self {
            Self::Both => true,
            Self::Value => requested == Budget::Value,
            Self::Luxury => requested == Budget::Luxury,
        }
    }
}

/// One item of the recommendable corpus. Read-only to the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub name: String,
    pub region: String,
    #[serde(default)]
    pub theme: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub who: Vec<Who>,
    #[serde(default)]
    pub why: Vec<Why>,
    #[serde(default)]
    pub transport_ok: Vec<Transport>,
    #[serde(default)]
    pub budget: CandidateBudget,
    #[serde(default)]
    pub pet_friendly: bool,
    #[serde(default)]
    pub season_ok: Vec<Season>,
    /// Relevance prior in [0, 1]
    #[serde(default, deserialize_with = "clamped_score")]
    pub score: f32,
}

fn clamp_score(score: f32) -> f32 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 1.0)
    }
}

fn clamped_score<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    f32::deserialize(deserializer).map(clamp_score)
}

impl Candidate {
    /// Create a candidate with empty attribute sets.
    pub fn new(name: impl Into<String>, region: impl Into<String>, score: f32) -> Self {
        Self {
            name: name.into(),
            region: region.into(),
            theme: Vec::new(),
            description: String::new(),
            who: Vec::new(),
            why: Vec::new(),
            transport_ok: Vec::new(),
            budget: CandidateBudget::Both,
            pet_friendly: false,
            season_ok: Vec::new(),
            score: clamp_score(score),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_themes(mut self, themes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.theme = themes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_who(mut self, who: impl IntoIterator<Item = Who>) -> Self {
        self.who = who.into_iter().collect();
        self
    }

    pub fn with_why(mut self, why: impl IntoIterator<Item = Why>) -> Self {
        self.why = why.into_iter().collect();
        self
    }

    pub fn with_transport(mut self, transport: impl IntoIterator<Item = Transport>) -> Self {
        self.transport_ok = transport.into_iter().collect();
        self
    }

    pub fn with_budget(mut self, budget: CandidateBudget) -> Self {
        self.budget = budget;
        self
    }

    pub fn with_pet_friendly(mut self, pet_friendly: bool) -> Self {
        self.pet_friendly = pet_friendly;
        self
    }

    pub fn with_seasons(mut self, seasons: impl IntoIterator<Item = Season>) -> Self {
        self.season_ok = seasons.into_iter().collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_budget_accepts_everything() {
        assert!(CandidateBudget::Both.accepts(Budget::Luxury));
        assert!(CandidateBudget::Value.accepts(Budget::Value));
        assert!(!CandidateBudget::Value.accepts(Budget::Luxury));
    }

    #[test]
    fn test_candidate_from_minimal_json() {
        let candidate: Candidate = serde_json::from_str(
            r#"{"name":"해운대","region":"부산","who":["couple","unknown"],"score":0.5}"#,
        )
        .unwrap();
        assert_eq!(candidate.budget, CandidateBudget::Both);
        assert_eq!(candidate.who, vec![Who::Couple, Who::Unknown]);
        assert!(candidate.season_ok.is_empty());
    }

    #[test]
    fn test_score_is_clamped() {
        let high: Candidate =
            serde_json::from_str(r#"{"name":"a","region":"부산","score":3.0}"#).unwrap();
        let low: Candidate =
            serde_json::from_str(r#"{"name":"b","region":"부산","score":-1}"#).unwrap();
        assert_eq!(high.score, 1.0);
        assert_eq!(low.score, 0.0);
        assert_eq!(Candidate::new("c", "부산", f32::NAN).score, 0.0);
    }
}
