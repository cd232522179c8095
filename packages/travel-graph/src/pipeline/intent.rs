//! Intent detection and the intent router.

use crate::types::classification::Intent;

/// Intent keyword sets, checked in order; the first match wins.
///
/// `ShowFavorites` precedes `AddFavorite` since every listing phrase
/// ("찜 목록") also contains a saving keyword ("찜").
const INTENT_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "recommend_place",
        &["여행지", "관광지", "가볼만한", "추천", "어디"],
    ),
    (
        "recommend_accommodation",
        &["숙소", "호텔", "펜션", "게스트하우스", "예약", "잠자리"],
    ),
    (
        "show_favorites",
        &["찜 목록", "저장한", "즐겨찾기 목록", "찜 보기"],
    ),
    ("add_favorite", &["찜", "저장", "즐겨찾기", "북마크"]),
    ("plan_trip", &["일정", "계획", "여행 계획", "스케줄"]),
];

/// Detect the intent of an utterance. Defaults to `RecommendPlace`.
pub fn detect_intent(utterance: &str) -> Intent {
    let lowered = utterance.to_lowercase();

    INTENT_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(label, _)| Intent::from_label(label))
        .unwrap_or(Intent::RecommendPlace)
}

/// Branch taken after intent detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentBranch {
    TravelFlow,
    FavoriteAdd,
    FavoriteList,
}

/// Map an intent to its branch. Unrecognized intents take the travel flow.
pub fn route_intent(intent: &Intent) -> IntentBranch {
    match intent {
        Intent::RecommendPlace | Intent::RecommendAccommodation | Intent::PlanTrip => {
            IntentBranch::TravelFlow
        }
        Intent::AddFavorite => IntentBranch::FavoriteAdd,
        Intent::ShowFavorites => IntentBranch::FavoriteList,
        Intent::Other(_) => IntentBranch::TravelFlow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_intent() {
        let cases = [
            ("부산 바다 보이는 감성 숙소 추천해줘", Intent::RecommendPlace),
            ("제주 호텔 알아봐줘", Intent::RecommendAccommodation),
            ("해운대 달맞이길 찜해줘", Intent::AddFavorite),
            ("찜 목록 보여줘", Intent::ShowFavorites),
            ("내가 저장한 곳들", Intent::ShowFavorites),
            ("3박 4일 일정 짜줘", Intent::PlanTrip),
            ("안녕", Intent::RecommendPlace),
        ];

        for (utterance, expected) in cases {
            assert_eq!(detect_intent(utterance), expected, "for: {}", utterance);
        }
    }

    #[test]
    fn test_route_intent() {
        assert_eq!(route_intent(&Intent::PlanTrip), IntentBranch::TravelFlow);
        assert_eq!(route_intent(&Intent::AddFavorite), IntentBranch::FavoriteAdd);
        assert_eq!(
            route_intent(&Intent::ShowFavorites),
            IntentBranch::FavoriteList
        );
        assert_eq!(
            route_intent(&Intent::Other("smalltalk".into())),
            IntentBranch::TravelFlow
        );
    }
}
