//! Clarifying questions for missing slots.
//!
//! The question is always one conversational paragraph: no bullets, no
//! numbered lists, no `Q1 | Q2` concatenation. At most two slots are asked
//! about per turn.

use async_trait::async_trait;

use crate::error::CapabilityResult;
use crate::traits::phraser::Phraser;
use crate::types::{
    classification::Slot,
    filters::{FilterStore, Who, Why},
};

/// Maximum number of slots addressed by one question.
pub const MAX_SLOTS_PER_QUESTION: usize = 2;

/// Missing slots in asking order, truncated to what one question covers.
pub fn prioritize(missing: &[Slot]) -> Vec<Slot> {
    Slot::PRIORITY
        .iter()
        .copied()
        .filter(|slot| missing.contains(slot))
        .take(MAX_SLOTS_PER_QUESTION)
        .collect()
}

/// Summary of what is already known, e.g. `["지역-부산", "테마-바다,감성"]`.
pub fn confirmed_facts(filters: &FilterStore, who: Option<Who>, why: Option<Why>) -> Vec<String> {
    let mut facts = Vec::new();
    if let Some(region) = &filters.region {
        facts.push(format!("지역-{}", region));
    }
    if !filters.theme.is_empty() {
        let themes: Vec<&str> = filters.theme.iter().map(String::as_str).collect();
        facts.push(format!("테마-{}", themes.join(",")));
    }
    if let Some(who) = who.and_then(Who::known) {
        facts.push(format!("동행-{}", who));
    }
    if let Some(why) = why.and_then(Why::known) {
        facts.push(format!("목적-{}", why));
    }
    facts
}

const REGION_AND_THEME: &str = "어디로 가고 싶으세요? 부산, 제주, 서울 같은 데 중에 생각 중인 곳이 있으시면 말해 주세요. 그리고 바다 보면서 힐링할까요, 아니면 맛집·감성 분위기 쪽이 더 끌리세요?";
const REGION: &str = "어느 지역이 좋을까요? 부산, 제주, 강릉처럼 바다가 보이는 쪽이요, 아니면 서울·경기 쪽이 더 나을까요?";
const THEME: &str = "어떤 분위기가 더 끌리세요? 바다 보며 힐링, 맛집·카페 투어, 아니면 액티비티나 문화 체험 쪽이요?";
const WHO: &str = "누구와 함께 가시나요? 커플이나 가족, 혼자 여행이요? 그거에 따라 어디가 좋을지가 많이 달라져서요.";
const WHY: &str = "이번엔 뭐가 가장 중요하세요? 휴식·힐링, 맛집·미식, 아니면 볼거리·체험 같은 거요?";
const SEASON: &str = "어느 시즌에 가실 예정이에요? 봄·여름·가을·겨울에 따라 추천할 코스가 조금씩 달라져요.";
const TRANSPORT: &str = "이동은 차로 하실까요, 아니면 대중교통 위주로 생각하고 계세요?";
const BUDGET: &str = "예산은 어느 정도로 생각하고 계세요? 가성비 위주로 잡을까요, 아니면 좀 여유 있게 가실 계획이세요?";
const GENERIC: &str = "조금만 더 알려주시면 딱 맞는 곳 골라 드릴게요. 어디로, 어떤 분위기로 가고 싶으세요?";

/// Template paragraph for a prioritized slot subset.
///
/// Region and theme share one combined paragraph; otherwise the first slot
/// picks the template.
pub fn template_question(slots: &[Slot]) -> Option<&'static str> {
    let first = *slots.first()?;
    let second = slots.get(1).copied();

    let text = match (first, second) {
        (Slot::Region, Some(Slot::Theme)) => REGION_AND_THEME,
        (Slot::Region, _) => REGION,
        (Slot::Theme, _) => THEME,
        (Slot::Who, _) => WHO,
        (Slot::Why, _) => WHY,
        (Slot::Season, _) => SEASON,
        (Slot::Transport, _) => TRANSPORT,
        (Slot::Budget, _) => BUDGET,
        (Slot::People | Slot::Duration | Slot::PetFriendly, _) => GENERIC,
    };
    Some(text)
}

/// Deterministic phraser backed by the template table.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplatePhraser;

#[async_trait]
impl Phraser for TemplatePhraser {
    async fn phrase(
        &self,
        _facts: &[String],
        missing: &[Slot],
        _utterance: &str,
    ) -> CapabilityResult<String> {
        let slots = prioritize(missing);
        Ok(template_question(&slots).unwrap_or(GENERIC).to_string())
    }

    fn name(&self) -> &str {
        "templates"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_single_paragraph(text: &str) {
        assert!(!text.contains('|'), "pipe in: {}", text);
        assert!(!text.contains('\n'), "line break in: {}", text);
        assert!(!text.trim_start().starts_with('-'), "bullet in: {}", text);
        assert!(!text.contains("1."), "numbering in: {}", text);
    }

    #[test]
    fn test_prioritize_follows_fixed_order() {
        let missing = [Slot::Season, Slot::Budget, Slot::Who, Slot::Transport];
        assert_eq!(prioritize(&missing), vec![Slot::Who, Slot::Season]);
        assert!(prioritize(&[]).is_empty());
    }

    #[test]
    fn test_region_and_theme_combined() {
        assert_eq!(
            template_question(&[Slot::Region, Slot::Theme]),
            Some(REGION_AND_THEME)
        );
        assert_eq!(template_question(&[Slot::Region, Slot::Who]), Some(REGION));
        assert_eq!(template_question(&[]), None);
    }

    #[test]
    fn test_every_template_is_one_paragraph() {
        for slot in Slot::PRIORITY {
            let text = template_question(&[slot]).unwrap();
            assert_single_paragraph(text);
        }
        assert_single_paragraph(REGION_AND_THEME);
    }

    #[test]
    fn test_confirmed_facts() {
        let filters = FilterStore::new()
            .with_region("부산")
            .with_themes(["바다", "감성"]);
        let facts = confirmed_facts(&filters, Some(Who::Couple), Some(Why::Unknown));
        assert_eq!(facts, vec!["지역-부산", "테마-바다,감성", "동행-couple"]);
    }

    #[tokio::test]
    async fn test_template_phraser() {
        let text = TemplatePhraser
            .phrase(&[], &[Slot::Budget, Slot::Transport], "")
            .await
            .unwrap();
        assert_eq!(text, TRANSPORT);
    }
}
