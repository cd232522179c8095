//! Slot extraction from raw text and merging into the filter store.

use indexmap::IndexSet;

use crate::types::{classification::Classification, filters::FilterStore};

/// Recognized places, in match priority order.
pub const REGIONS: &[&str] = &[
    "부산", "제주", "서울", "경주", "강릉", "여수", "전주", "대구", "인천",
];

/// Theme tags and the keywords that evoke them.
pub const THEME_KEYWORDS: &[(&str, &[&str])] = &[
    ("바다", &["바다", "해변", "해수욕장", "해안"]),
    ("감성", &["감성", "로맨틱", "분위기"]),
    ("힐링", &["힐링", "휴식", "여유"]),
    ("커플", &["커플", "연인", "데이트"]),
    ("가족", &["가족", "아이", "어린이"]),
    ("맛집", &["맛집", "음식", "식당"]),
    ("야경", &["야경", "밤"]),
];

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

/// First recognized place mentioned in the text.
pub fn extract_region(text: &str) -> Option<&'static str> {
    REGIONS.iter().copied().find(|region| text.contains(region))
}

/// Every theme tag whose keywords appear in the text.
pub fn extract_themes(text: &str) -> IndexSet<String> {
    THEME_KEYWORDS
        .iter()
        .filter(|(_, keywords)| contains_any(text, keywords))
        .map(|(theme, _)| theme.to_string())
        .collect()
}

fn extract_people(text: &str) -> Option<&'static str> {
    if contains_any(text, &["1명", "혼자"]) {
        Some("1명")
    } else if contains_any(text, &["2명", "커플", "둘이"]) {
        Some("2명")
    } else if contains_any(text, &["가족", "아이"]) {
        Some("가족")
    } else {
        None
    }
}

fn extract_budget_hint(text: &str) -> Option<&'static str> {
    if contains_any(text, &["저렴", "싼", "경제적"]) {
        Some("저렴")
    } else if contains_any(text, &["비싼", "고급", "럭셔리"]) {
        Some("고급")
    } else {
        None
    }
}

/// Merge this turn's rule extraction and classification into `prior`.
///
/// Keys are only added or overwritten, never removed; a key is overwritten
/// only when this turn re-derives it.
pub fn merge_filters(
    utterance: &str,
    prior: &FilterStore,
    classification: &Classification,
) -> FilterStore {
    let mut filters = prior.clone();

    if let Some(region) = extract_region(utterance) {
        filters.region = Some(region.to_string());
    }

    let themes = extract_themes(utterance);
    if !themes.is_empty() {
        filters.theme = themes;
    }

    if let Some(people) = extract_people(utterance) {
        filters.people = Some(people.to_string());
    }
    if let Some(budget) = extract_budget_hint(utterance) {
        filters.budget = Some(budget.to_string());
    }

    if let Some(who) = classification.who.known() {
        filters.who = Some(who);
    }
    if let Some(why) = classification.why.known() {
        filters.why = Some(why);
    }

    let constraints = &classification.constraints;
    if let Some(transport) = constraints.transport {
        filters.constraint_transport = Some(transport);
    }
    if let Some(budget) = constraints.budget {
        filters.constraint_budget = Some(budget);
    }
    if let Some(pet_friendly) = constraints.pet_friendly {
        filters.constraint_pet_friendly = Some(pet_friendly);
    }

    if let Some(season) = classification.when.season {
        filters.season = Some(season);
    }
    if classification.when.need_night_info == Some(true) {
        filters.need_night_info = true;
    }

    filters.conversation_stage = Some(classification.conversation_stage);

    filters
}
