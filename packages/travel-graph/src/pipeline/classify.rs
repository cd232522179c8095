//! Keyword-based persona/purpose classification.
//!
//! The deterministic half of the classification stage. It needs no external
//! service, never fails, and is what every turn falls back to when the
//! external classifier is missing, slow or wrong.

use async_trait::async_trait;
use serde::Deserialize;

use super::prompts::strip_code_fence;
use crate::error::{CapabilityError, CapabilityResult};
use crate::traits::classifier::TravelClassifier;
use crate::types::{
    classification::Classification,
    filters::{Budget, Constraints, ConversationStage, Season, Transport, WhenInfo, Who, Why},
    message::Message,
};

/// Persona keyword sets, in priority order.
const WHO_KEYWORDS: &[(Who, &[&str])] = &[
    (Who::FamilyWithKids, &["아이", "유모차", "키즈", "가족"]),
    (Who::Couple, &["커플", "연인", "둘이", "데이트", "신혼"]),
    (Who::ParentsTrip, &["부모님", "효도"]),
    (Who::Solo, &["나홀", "혼자", "혼밥", "1인"]),
];

/// Purpose keyword sets, in priority order.
const WHY_KEYWORDS: &[(Why, &[&str])] = &[
    (Why::Relaxation, &["힐링", "휴식", "휴양"]),
    (Why::Activity, &["서핑", "등산", "체험"]),
    (Why::Culture, &["유적", "미술관", "문화"]),
    (Why::Food, &["맛집", "미식", "로컬", "카페"]),
];

const SEASON_KEYWORDS: &[(Season, &[&str])] = &[
    (Season::Spring, &["봄", "벚꽃"]),
    (Season::Summer, &["여름", "해수욕장"]),
    (Season::Autumn, &["가을", "단풍"]),
    (Season::Winter, &["겨울", "눈꽃"]),
];

/// Place names that mark the conversation as past exploration.
const STAGE_PLACES: &[&str] = &["부산", "제주", "강릉", "서울"];

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

fn first_match<T: Copy>(text: &str, table: &[(T, &[&str])]) -> Option<T> {
    table
        .iter()
        .find(|(_, keywords)| contains_any(text, keywords))
        .map(|(value, _)| *value)
}

/// Classify an utterance with fixed keyword rules.
pub fn classify_by_keywords(utterance: &str) -> Classification {
    let text = utterance.to_lowercase();

    let transport = if contains_any(&text, &["자가용", "주차"]) {
        Some(Transport::Car)
    } else if contains_any(&text, &["대중교통", "역세권"]) {
        Some(Transport::Public)
    } else {
        None
    };

    let budget = if contains_any(&text, &["저렴", "가성비"]) {
        Some(Budget::Value)
    } else if contains_any(&text, &["럭셔리", "고급"]) {
        Some(Budget::Luxury)
    } else {
        None
    };

    let conversation_stage = if contains_any(&text, STAGE_PLACES) {
        ConversationStage::Refinement
    } else {
        ConversationStage::Exploration
    };

    Classification {
        who: first_match(&text, WHO_KEYWORDS).unwrap_or_default(),
        why: first_match(&text, WHY_KEYWORDS).unwrap_or_default(),
        constraints: Constraints {
            transport,
            budget,
            pet_friendly: None,
        },
        when: WhenInfo {
            season: first_match(&text, SEASON_KEYWORDS),
            need_night_info: None,
        },
        conversation_stage,
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawClassification {
    #[serde(default)]
    who: Option<String>,
    #[serde(default)]
    why: Option<String>,
    #[serde(default)]
    constraints: Option<RawConstraints>,
    #[serde(default)]
    when_info: Option<RawWhen>,
    #[serde(default)]
    conversation_stage: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawConstraints {
    #[serde(default)]
    transport: Option<String>,
    #[serde(default)]
    budget: Option<String>,
    #[serde(default)]
    pet_friendly: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct RawWhen {
    #[serde(default)]
    season: Option<String>,
    #[serde(default)]
    need_night_info: Option<bool>,
}

/// Keys every external classifier reply must carry.
const REQUIRED_KEYS: [&str; 5] = [
    "who",
    "why",
    "constraints",
    "when_info",
    "conversation_stage",
];

/// Parse an external classifier's reply.
///
/// The reply must be one JSON object (optionally inside a Markdown code
/// fence) carrying all of [`REQUIRED_KEYS`]; a truncated reply is
/// malformed. Null or unrecognized labels become `unknown`/absent, and a
/// null stage becomes `exploration`.
pub fn parse_classification_response(text: &str) -> CapabilityResult<Classification> {
    let value: serde_json::Value = serde_json::from_str(strip_code_fence(text))?;
    let object = value
        .as_object()
        .ok_or_else(|| CapabilityError::Malformed("expected a JSON object".into()))?;
    if let Some(key) = REQUIRED_KEYS.iter().find(|key| !object.contains_key(**key)) {
        return Err(CapabilityError::Malformed(format!("missing key '{}'", key)));
    }

    let raw: RawClassification = serde_json::from_value(value)?;
    let constraints = raw.constraints.unwrap_or_default();
    let when = raw.when_info.unwrap_or_default();

    Ok(Classification {
        who: raw.who.as_deref().map(Who::from_label).unwrap_or_default(),
        why: raw.why.as_deref().map(Why::from_label).unwrap_or_default(),
        constraints: Constraints {
            transport: constraints.transport.as_deref().and_then(Transport::from_label),
            budget: constraints.budget.as_deref().and_then(Budget::from_label),
            pet_friendly: constraints.pet_friendly,
        },
        when: WhenInfo {
            season: when.season.as_deref().and_then(Season::from_label),
            need_night_info: when.need_night_info,
        },
        conversation_stage: raw
            .conversation_stage
            .as_deref()
            .and_then(ConversationStage::from_label)
            .unwrap_or_default(),
    })
}

/// The always-available classifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClassifier;

impl KeywordClassifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TravelClassifier for KeywordClassifier {
    async fn classify(
        &self,
        _recent: &[Message],
        utterance: &str,
    ) -> CapabilityResult<Classification> {
        Ok(classify_by_keywords(utterance))
    }

    fn name(&self) -> &str {
        "keywords"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persona_priority() {
        // family keywords win over couple keywords
        let c = classify_by_keywords("커플이랑 아이랑 같이");
        assert_eq!(c.who, Who::FamilyWithKids);

        assert_eq!(classify_by_keywords("부모님 모시고").who, Who::ParentsTrip);
        assert_eq!(classify_by_keywords("혼자 여행").who, Who::Solo);
        assert_eq!(classify_by_keywords("어디 갈까").who, Who::Unknown);
    }

    #[test]
    fn test_purpose() {
        assert_eq!(classify_by_keywords("바다 보며 힐링").why, Why::Relaxation);
        // mood words are themes, not a purpose
        assert_eq!(
            classify_by_keywords("부산 바다 보이는 감성 숙소").why,
            Why::Unknown
        );
        assert_eq!(classify_by_keywords("서핑 하고 싶어").why, Why::Activity);
        assert_eq!(classify_by_keywords("미술관 투어").why, Why::Culture);
        assert_eq!(classify_by_keywords("로컬 맛집").why, Why::Food);
    }

    #[test]
    fn test_constraints_and_season() {
        let c = classify_by_keywords("주차 되는 가성비 숙소, 가을에");
        assert_eq!(c.constraints.transport, Some(Transport::Car));
        assert_eq!(c.constraints.budget, Some(Budget::Value));
        assert_eq!(c.constraints.pet_friendly, None);
        assert_eq!(c.when.season, Some(Season::Autumn));

        let c = classify_by_keywords("역세권 고급 호텔");
        assert_eq!(c.constraints.transport, Some(Transport::Public));
        assert_eq!(c.constraints.budget, Some(Budget::Luxury));
        assert_eq!(c.when.season, None);
    }

    #[test]
    fn test_stage_heuristic() {
        assert_eq!(
            classify_by_keywords("제주 카페").conversation_stage,
            ConversationStage::Refinement
        );
        // 경주 is a region but not a stage marker
        assert_eq!(
            classify_by_keywords("경주 가볼만한 곳").conversation_stage,
            ConversationStage::Exploration
        );
    }

    #[test]
    fn test_idempotent() {
        let utterance = "여름에 연인이랑 강릉 서핑";
        assert_eq!(
            classify_by_keywords(utterance),
            classify_by_keywords(utterance)
        );
    }

    #[test]
    fn test_parse_fenced_response() {
        let text = r#"```json
{"who":"couple","why":null,"constraints":{"transport":"public","budget":null,"pet_friendly":true},"when_info":{"season":"fall","need_night_info":true},"conversation_stage":"refinement"}
```"#;
        let c = parse_classification_response(text).unwrap();
        assert_eq!(c.who, Who::Couple);
        assert_eq!(c.why, Why::Unknown);
        assert_eq!(c.constraints.transport, Some(Transport::Public));
        assert_eq!(c.constraints.budget, None);
        assert_eq!(c.constraints.pet_friendly, Some(true));
        assert_eq!(c.when.season, Some(Season::Autumn));
        assert_eq!(c.when.need_night_info, Some(true));
        assert_eq!(c.conversation_stage, ConversationStage::Refinement);
    }

    #[test]
    fn test_parse_defaults() {
        let c = parse_classification_response(
            r#"{"who":"alien","why":"food","constraints":null,"when_info":{},"conversation_stage":null}"#,
        )
        .unwrap();
        assert_eq!(c.who, Who::Unknown);
        assert_eq!(c.why, Why::Food);
        assert!(c.constraints.is_empty());
        assert_eq!(c.conversation_stage, ConversationStage::Exploration);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for text in [
            "",
            "sure! here you go",
            "[1,2]",
            r#"{"who":"solo"}"#,
            r#"{"who":"solo","why":"food"}"#,
            r#"{"who":"solo","why":"food","constraints":{},"when_info":{}}"#,
        ] {
            assert!(
                matches!(
                    parse_classification_response(text),
                    Err(CapabilityError::Malformed(_))
                ),
                "accepted: {:?}",
                text
            );
        }
    }

    #[tokio::test]
    async fn test_trait_impl_matches_function() {
        let classifier = KeywordClassifier::new();
        let result = classifier.classify(&[], "혼자 힐링").await.unwrap();
        assert_eq!(result, classify_by_keywords("혼자 힐링"));
    }
}
