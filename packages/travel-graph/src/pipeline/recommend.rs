//! Recommendation synthesis and follow-up suggestions.

use crate::types::{
    candidate::Candidate,
    filters::{FilterStore, Who, Why},
    turn::Recommendation,
};

/// Number of retrieved candidates turned into recommendations.
pub const RECOMMENDATION_LIMIT: usize = 3;

pub const NO_MATCH_MESSAGE: &str =
    "조건에 맞는 추천을 찾지 못했습니다. 다른 조건으로 검색해보시겠어요?";

/// Suggestions appended after every recommendation response.
pub const POST_ACTIONS: [&str; 4] = [
    "지도에서 위치 확인하기",
    "찜 목록에 추가하기",
    "비슷한 스타일 더 추천받기",
    "상세 정보 보기",
];

/// Why these candidates were picked, e.g. `부산 지역 + 바다, 감성 테마 + 커플·신혼`.
pub fn rationale(filters: &FilterStore, who: Option<Who>, why: Option<Why>) -> String {
    let mut parts = Vec::new();
    if let Some(region) = &filters.region {
        parts.push(format!("{} 지역", region));
    }
    if !filters.theme.is_empty() {
        let themes: Vec<&str> = filters.theme.iter().map(String::as_str).collect();
        parts.push(format!("{} 테마", themes.join(", ")));
    }
    if let Some(who) = who.and_then(Who::known) {
        parts.push(who.label().to_string());
    }
    if let Some(why) = why.and_then(Why::known) {
        parts.push(why.label().to_string());
    }

    if parts.is_empty() {
        "사용자 조건에 맞는 추천".to_string()
    } else {
        parts.join(" + ")
    }
}

/// Turn the best retrieved candidates into recommendations.
pub fn synthesize(
    retrieved: &[Candidate],
    filters: &FilterStore,
    who: Option<Who>,
    why: Option<Why>,
) -> Vec<Recommendation> {
    let reason = rationale(filters, who, why);

    retrieved
        .iter()
        .take(RECOMMENDATION_LIMIT)
        .map(|candidate| Recommendation {
            name: candidate.name.clone(),
            region: candidate.region.clone(),
            theme: candidate.theme.clone(),
            description: candidate.description.clone(),
            reason: reason.clone(),
            score: candidate.score,
            who: candidate.who.clone(),
            why: candidate.why.clone(),
        })
        .collect()
}

/// Enumerated response text, or the no-match message.
pub fn render_recommendations(recommendations: &[Recommendation]) -> String {
    if recommendations.is_empty() {
        return NO_MATCH_MESSAGE.to_string();
    }

    let mut parts = vec![format!("추천 드리는 {}곳입니다:\n\n", recommendations.len())];
    for (i, rec) in recommendations.iter().enumerate() {
        parts.push(format!(
            "{}. {}\n   - {}\n   - 추천 이유: {}\n",
            i + 1,
            rec.name,
            rec.description,
            rec.reason
        ));
    }
    parts.join("\n")
}

/// Append the follow-up suggestions to a response.
pub fn append_post_actions(response: &str) -> String {
    let actions: Vec<String> = POST_ACTIONS.iter().map(|a| format!("- {}", a)).collect();
    format!("{}\n\n추가로 도와드릴까요?\n{}", response, actions.join("\n"))
}
