//! Favorites add/list stages.
//!
//! Both stages require an identity. Persistence is delegated to the
//! [`FavoritesStore`]; the graph only decides what to save and how to
//! report it.

use tracing::debug;

use crate::error::Result;
use crate::traits::corpus::FavoritesStore;
use crate::types::turn::FavoriteItem;

pub const ADD_LOGIN_REQUIRED: &str = "찜 기능을 사용하려면 로그인이 필요합니다.";
pub const LIST_LOGIN_REQUIRED: &str = "찜 목록을 보려면 로그인이 필요합니다.";
pub const ASK_WHICH_ITEM: &str = "어떤 항목을 찜 목록에 추가하시겠어요?";
pub const EMPTY_LIST: &str = "찜 목록이 비어있습니다.";

/// Outcome of a favorites stage: the response text plus any items to report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoritesOutcome {
    pub response: String,
    pub items: Vec<FavoriteItem>,
}

impl FavoritesOutcome {
    fn message(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            items: Vec::new(),
        }
    }
}

/// First name (in the given order) mentioned in the utterance.
pub fn mentioned_item<'a>(
    utterance: &str,
    names: impl IntoIterator<Item = &'a str>,
) -> Option<&'a str> {
    names.into_iter().find(|name| utterance.contains(name))
}

pub fn render_added(name: &str) -> String {
    format!("'{}'을(를) 찜 목록에 추가했습니다!", name)
}

pub fn render_list(items: &[FavoriteItem]) -> String {
    if items.is_empty() {
        return EMPTY_LIST.to_string();
    }

    let mut parts = vec!["찜 목록입니다:\n".to_string()];
    for (i, item) in items.iter().enumerate() {
        parts.push(format!("{}. {} (추가일: {})", i + 1, item.name, item.added_at));
    }
    parts.join("\n")
}

/// Save the recommended item named in the utterance.
///
/// Only names from `recommended` (the previous turn's recommendations) can
/// be saved. The saved item goes to the store and is not echoed back.
pub async fn add_favorite(
    identity: Option<&str>,
    utterance: &str,
    recommended: &[String],
    store: &dyn FavoritesStore,
) -> Result<FavoritesOutcome> {
    let Some(identity) = identity else {
        return Ok(FavoritesOutcome::message(ADD_LOGIN_REQUIRED));
    };

    match mentioned_item(utterance, recommended.iter().map(String::as_str)) {
        Some(name) => {
            let item = store.add(identity, name).await?;
            debug!(identity = %identity, item = %item.name, "Favorite saved");
            Ok(FavoritesOutcome::message(render_added(&item.name)))
        }
        None => Ok(FavoritesOutcome::message(ASK_WHICH_ITEM)),
    }
}

/// List the saved items of an identity.
pub async fn list_favorites(
    identity: Option<&str>,
    store: &dyn FavoritesStore,
) -> Result<FavoritesOutcome> {
    let Some(identity) = identity else {
        return Ok(FavoritesOutcome::message(LIST_LOGIN_REQUIRED));
    };

    let items = store.list(identity).await?;
    Ok(FavoritesOutcome {
        response: render_list(&items),
        items,
    })
}
