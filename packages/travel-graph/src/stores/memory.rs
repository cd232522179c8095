//! In-memory corpus and favorites store for testing and development.

use async_trait::async_trait;
use chrono::Local;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{GraphError, Result};
use crate::traits::corpus::{CandidateCorpus, FavoritesStore};
use crate::types::{
    candidate::{Candidate, CandidateBudget},
    filters::{Transport, Who, Why},
    turn::FavoriteItem,
};

use crate::types::filters::Season::{Autumn, Spring, Summer, Winter};

/// A fixed candidate list held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryCorpus {
    candidates: Vec<Candidate>,
}

impl MemoryCorpus {
    pub fn new(candidates: Vec<Candidate>) -> Self {
        Self { candidates }
    }

    /// Corpus of well-known spots in 부산, 제주 and 강릉.
    pub fn sample() -> Self {
        Self::new(sample_candidates())
    }

    /// Parse a JSON array of candidates.
    pub fn from_json(json: &str) -> Result<Self> {
        let candidates: Vec<Candidate> = serde_json::from_str(json)?;
        Ok(Self::new(candidates))
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

#[async_trait]
impl CandidateCorpus for MemoryCorpus {
    async fn search(&self) -> Result<Vec<Candidate>> {
        Ok(self.candidates.clone())
    }
}

/// The bundled sample corpus, in tie-break order.
pub fn sample_candidates() -> Vec<Candidate> {
    vec![
        Candidate::new("해운대 달맞이길", "부산", 0.95)
            .with_themes(["바다", "감성"])
            .with_description("부산 해운대의 아름다운 해안 산책로. 야경과 로맨틱한 분위기.")
            .with_who([Who::Couple, Who::Solo])
            .with_why([Why::Relaxation])
            .with_transport([Transport::Car, Transport::Public])
            .with_budget(CandidateBudget::Both)
            .with_seasons([Spring, Summer, Autumn]),
        Candidate::new("감천문화마을", "부산", 0.92)
            .with_themes(["감성", "힐링"])
            .with_description("부산의 대표 감성 관광지. 골목길 산책, 포토존, 로컬 맛집.")
            .with_who([Who::Couple, Who::Solo, Who::ParentsTrip])
            .with_why([Why::Relaxation, Why::Culture, Why::Food])
            .with_transport([Transport::Public])
            .with_budget(CandidateBudget::Value)
            .with_seasons([Spring, Summer, Autumn, Winter]),
        Candidate::new("송도 스카이워크", "부산", 0.88)
            .with_themes(["바다", "야경"])
            .with_description("바다 위를 걷는 스카이워크. 밤에도 개장하여 야경 코스로 인기.")
            .with_who([Who::Couple, Who::Solo])
            .with_why([Why::Activity, Why::Relaxation])
            .with_transport([Transport::Car, Transport::Public])
            .with_budget(CandidateBudget::Value)
            .with_seasons([Summer, Autumn]),
        Candidate::new("부산 아쿠아리움", "부산", 0.90)
            .with_themes(["바다", "가족"])
            .with_description("실내 수족관. 유모차 이동 편하고 키즈존·체험형 프로그램 보유.")
            .with_who([Who::FamilyWithKids])
            .with_why([Why::Activity, Why::Relaxation])
            .with_transport([Transport::Car, Transport::Public])
            .with_budget(CandidateBudget::Both)
            .with_seasons([Spring, Summer, Autumn, Winter]),
        Candidate::new("기장 스카이라인 루지", "부산", 0.87)
            .with_themes(["액티비티", "가족"])
            .with_description("레일 루지·짚라인. 가족 단위 체험 코스와 주차 편의.")
            .with_who([Who::FamilyWithKids, Who::Couple])
            .with_why([Why::Activity])
            .with_transport([Transport::Car])
            .with_budget(CandidateBudget::Value)
            .with_seasons([Spring, Summer, Autumn]),
        Candidate::new("해운대 온천센터", "부산", 0.91)
            .with_themes(["힐링", "휴양"])
            .with_description("걷기 편한 입장로, 탕류 다양. 부모님 효도 코스로 추천.")
            .with_who([Who::ParentsTrip, Who::Couple])
            .with_why([Why::Relaxation])
            .with_transport([Transport::Car, Transport::Public])
            .with_budget(CandidateBudget::Both)
            .with_seasons([Spring, Autumn, Winter]),
        Candidate::new("영도 한밭한식당", "부산", 0.86)
            .with_themes(["맛집", "한식"])
            .with_description("로컬 한식 맛집. 조용한 분위기로 부모님과 방문하기 좋음.")
            .with_who([Who::ParentsTrip, Who::Solo])
            .with_why([Why::Food, Why::Relaxation])
            .with_transport([Transport::Car, Transport::Public])
            .with_budget(CandidateBudget::Value)
            .with_seasons([Spring, Summer, Autumn, Winter]),
        Candidate::new("제주 협재 해변 카페거리", "제주", 0.89)
            .with_themes(["바다", "힐링", "맛집"])
            .with_description("혼밥·혼카페하기 좋은 해변가. 치안 좋고 게스트하우스 인접.")
            .with_who([Who::Solo, Who::Couple])
            .with_why([Why::Relaxation, Why::Food])
            .with_transport([Transport::Car])
            .with_budget(CandidateBudget::Value)
            .with_pet_friendly(true)
            .with_seasons([Summer, Autumn]),
        Candidate::new("제주 동문시장", "제주", 0.88)
            .with_themes(["맛집", "문화"])
            .with_description("전통시장·로컬 노포. 미식·문화 테마에 맞음.")
            .with_who([Who::Solo, Who::Couple, Who::ParentsTrip])
            .with_why([Why::Food, Why::Culture])
            .with_transport([Transport::Car, Transport::Public])
            .with_budget(CandidateBudget::Value)
            .with_seasons([Spring, Summer, Autumn, Winter]),
        Candidate::new("강릉 경포대 카페거리", "강릉", 0.90)
            .with_themes(["감성", "바다", "힐링"])
            .with_description("바다 뷰 카페와 조용한 산책로. 커플·나홀 힐링에 적합.")
            .with_who([Who::Couple, Who::Solo])
            .with_why([Why::Relaxation, Why::Food])
            .with_transport([Transport::Car, Transport::Public])
            .with_budget(CandidateBudget::Both)
            .with_seasons([Spring, Summer, Autumn]),
        Candidate::new("강릉 정동진 해돋이", "강릉", 0.87)
            .with_themes(["바다", "감성"])
            .with_description("해돋이 명소. 새벽 개장으로 야간·시간대 정보 중요.")
            .with_who([Who::Couple, Who::Solo, Who::ParentsTrip])
            .with_why([Why::Relaxation, Why::Culture])
            .with_transport([Transport::Car])
            .with_budget(CandidateBudget::Value)
            .with_seasons([Spring, Summer, Autumn, Winter]),
    ]
}

fn sample_favorites() -> Vec<FavoriteItem> {
    vec![
        FavoriteItem::new("해운대 달맞이길", "2025-01-20"),
        FavoriteItem::new("감천문화마을", "2025-01-18"),
    ]
}

fn poisoned<T>(_: T) -> GraphError {
    GraphError::Favorites("favorites lock poisoned".into())
}

/// Per-identity favorites lists held in memory.
///
/// Data is lost on restart.
#[derive(Debug, Default)]
pub struct MemoryFavorites {
    lists: RwLock<HashMap<String, Vec<FavoriteItem>>>,
    seed: Vec<FavoriteItem>,
}

impl MemoryFavorites {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every identity starts with the two sample favorites.
    pub fn with_sample() -> Self {
        Self {
            lists: RwLock::new(HashMap::new()),
            seed: sample_favorites(),
        }
    }

    /// Number of identities with a list.
    #[cfg(test)]
    fn identity_count(&self) -> usize {
        self.lists.read().map(|lists| lists.len()).unwrap_or(0)
    }
}

#[async_trait]
impl FavoritesStore for MemoryFavorites {
    async fn add(&self, identity: &str, item: &str) -> Result<FavoriteItem> {
        let entry = FavoriteItem::new(item, Local::now().format("%Y-%m-%d").to_string());

        let mut lists = self.lists.write().map_err(poisoned)?;
        let list = lists
            .entry(identity.to_string())
            .or_insert_with(|| self.seed.clone());
        if !list.iter().any(|existing| existing.name == entry.name) {
            list.push(entry.clone());
        }
        Ok(entry)
    }

    async fn list(&self, identity: &str) -> Result<Vec<FavoriteItem>> {
        let lists = self.lists.read().map_err(poisoned)?;
        Ok(lists
            .get(identity)
            .cloned()
            .unwrap_or_else(|| self.seed.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sample_corpus() {
        let corpus = MemoryCorpus::sample();
        assert_eq!(corpus.len(), 11);

        let candidates = corpus.search().await.unwrap();
        assert!(candidates
            .iter()
            .all(|c| (0.0..=1.0).contains(&c.score) && !c.name.is_empty()));
    }

    #[test]
    fn test_corpus_from_json() {
        let corpus = MemoryCorpus::from_json(
            r#"[{"name":"전주 한옥마을","region":"전주","theme":["문화"],"why":["culture"],"score":0.8}]"#,
        )
        .unwrap();
        assert_eq!(corpus.len(), 1);

        let corpus =
            MemoryCorpus::from_json(r#"[{"name":"과대평가","region":"부산","score":3.0}]"#).unwrap();
        assert_eq!(corpus.candidates[0].score, 1.0);

        assert!(matches!(
            MemoryCorpus::from_json("{not json"),
            Err(GraphError::JsonParse(_))
        ));
    }

    #[tokio::test]
    async fn test_sample_favorites_per_identity() {
        let store = MemoryFavorites::with_sample();
        let items = store.list("u1").await.unwrap();
        assert_eq!(items, sample_favorites());

        store.add("u1", "제주 동문시장").await.unwrap();
        assert_eq!(store.list("u1").await.unwrap().len(), 3);
        assert_eq!(store.list("u2").await.unwrap().len(), 2);
        assert_eq!(store.identity_count(), 1);
    }

    #[tokio::test]
    async fn test_add_is_deduplicated() {
        let store = MemoryFavorites::new();
        assert!(store.list("u1").await.unwrap().is_empty());

        let item = store.add("u1", "감천문화마을").await.unwrap();
        store.add("u1", "감천문화마을").await.unwrap();

        assert_eq!(item.added_at.len(), 10);
        assert_eq!(store.list("u1").await.unwrap().len(), 1);
    }
}
