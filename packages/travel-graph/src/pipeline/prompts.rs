//! LLM prompts for the external classifier and phraser.

use crate::types::{
    classification::Slot,
    message::{render_transcript, Message},
};

/// Longest slice of the utterance quoted to the phraser, in characters.
pub const PHRASER_UTTERANCE_CHARS: usize = 150;

/// System prompt for persona/purpose/constraint classification.
pub const CLASSIFIER_SYSTEM_PROMPT: &str = r#"당신은 여행 추천 대화의 분류기입니다. 대화 맥락과 현재 발화를 읽고 아래 다섯 항목을 담은 JSON 객체 하나만 출력하세요. 설명이나 다른 텍스트는 쓰지 마세요.

1. who: 누구와 가는지. 다음 값 중 하나.
   - family_with_kids: 아이 동반 가족 (유모차, 키즈존, 체험형)
   - couple: 커플/신혼 (분위기, 야경, 프라이빗)
   - parents_trip: 부모님과 효도 여행 (걷기 편한 곳, 한식, 온천)
   - solo: 혼자 (혼밥, 치안, 게스트하우스)
   - unknown: 알 수 없음

2. why: 여행 목적. 다음 값 중 하나.
   - relaxation: 휴식/힐링 (호캉스, 스파, 숲길)
   - activity: 액티비티 (서핑, 스키, 등산, 테마파크)
   - culture: 문화/역사 (유적지, 미술관, 전통시장)
   - food: 미식 (핫플, 노포, 양조장)
   - unknown: 알 수 없음

3. constraints: 추론 가능한 키만 채우고 없으면 빈 객체.
   - transport: "car" | "public"
   - budget: "value" | "luxury" | null
   - pet_friendly: true | false | null

4. when_info: 추론 가능한 키만.
   - season: "spring" | "summer" | "autumn" | "winter" | null
   - need_night_info: true | false (야간 개장, 휴무일 확인이 필요한지)

5. conversation_stage: 다음 값 중 하나.
   - exploration: 아직 지역을 정하지 않음
   - refinement: 지역은 정했고 세부 조건을 좁히는 중
   - confirmation: 특정 장소를 찜하거나 예약하려는 단계

출력 예:
{"who":"solo","why":"relaxation","constraints":{"transport":"car","budget":"value","pet_friendly":null},"when_info":{"season":"summer","need_night_info":false},"conversation_stage":"exploration"}"#;

const CLASSIFIER_USER_PROMPT: &str = r#"대화 맥락:
{context}

현재 사용자 발화: {utterance}

규칙에 따라 JSON만 출력하세요."#;

/// System prompt for the clarifying-question phraser.
pub const PHRASER_SYSTEM_PROMPT: &str = r#"당신은 친절한 여행 상담가입니다. 전화로 이야기하듯 자연스러운 한 문단만 말하세요.

규칙:
- JSON, 불릿, 번호 목록, " | "로 질문을 나열하지 마세요.
- 먼저 짧게 공감한 뒤, 부족한 정보 한두 가지만 부드럽게 물어보세요.
- 예: "좋네요! 혹시 어디쯤 생각하세요? 부산이나 제주처럼 바다가 있는 곳이 좋을까요, 서울 근교가 더 편하실까요?"
- 설명이나 메타 문구 없이 사용자에게 할 말만 출력하세요."#;

const PHRASER_USER_PROMPT: &str = r#"확보된 정보: {facts}
부족한 정보: {missing}
사용자가 방금 한 말: {utterance}

규칙대로 한 문단의 자연스러운 응답만 작성하세요."#;

/// Format the classifier prompt with recent history and the utterance.
pub fn format_classifier_prompt(recent: &[Message], utterance: &str) -> String {
    let context = if recent.is_empty() {
        "(대화 없음)".to_string()
    } else {
        render_transcript(recent)
    };

    CLASSIFIER_USER_PROMPT
        .replace("{context}", &context)
        .replace("{utterance}", utterance)
}

/// Format the phraser prompt.
pub fn format_phraser_prompt(facts: &[String], missing: &[Slot], utterance: &str) -> String {
    let facts = if facts.is_empty() {
        "아직 없음".to_string()
    } else {
        facts.join(", ")
    };
    let missing = missing
        .iter()
        .map(Slot::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    let utterance: String = utterance.chars().take(PHRASER_UTTERANCE_CHARS).collect();

    PHRASER_USER_PROMPT
        .replace("{facts}", &facts)
        .replace("{missing}", &missing)
        .replace("{utterance}", &utterance)
}

/// Strip a surrounding Markdown code fence (optionally tagged `json`).
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(start) = trimmed.find("```") else {
        return trimmed;
    };

    let mut body = &trimmed[start + 3..];
    if body
        .get(..4)
        .is_some_and(|tag| tag.eq_ignore_ascii_case("json"))
    {
        body = &body[4..];
    }
    match body.find("```") {
        Some(end) => body[..end].trim(),
        None => body.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifier_prompt_without_history() {
        let prompt = format_classifier_prompt(&[], "부산 가고 싶어");
        assert!(prompt.contains("(대화 없음)"));
        assert!(prompt.contains("현재 사용자 발화: 부산 가고 싶어"));
    }

    #[test]
    fn test_classifier_prompt_with_history() {
        let history = vec![Message::user("제주"), Message::assistant("언제 가세요?")];
        let prompt = format_classifier_prompt(&history, "여름");
        assert!(prompt.contains("user: 제주\nassistant: 언제 가세요?"));
    }

    #[test]
    fn test_phraser_prompt_truncates_utterance() {
        let long = "가".repeat(200);
        let prompt = format_phraser_prompt(&[], &[Slot::Who, Slot::Why], &long);
        assert!(prompt.contains("확보된 정보: 아직 없음"));
        assert!(prompt.contains("부족한 정보: who, why"));
        assert!(prompt.contains(&"가".repeat(150)));
        assert!(!prompt.contains(&"가".repeat(151)));
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```JSON{\"a\":1}```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("  {\"a\":1} "), "{\"a\":1}");
        assert_eq!(strip_code_fence("text ```json {} "), "{}");
    }
}
