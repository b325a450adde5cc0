use serde::{Deserialize, Serialize};

use crate::domain::posts::{NewPost, PostPatch};

/// Raw query string pairs in request order, repeated keys included.
pub type QueryPairs = Vec<(String, String)>;

/// First value for `key`; later repeats are ignored.
fn first_value(pairs: &[(String, String)], key: &str) -> Option<String> {
    pairs
        .iter()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.clone())
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct PostListQuery {
    pub sort_by: Option<String>,
    pub order: Option<String>,
}

impl From<QueryPairs> for PostListQuery {
    fn from(pairs: QueryPairs) -> Self {
        Self {
            sort_by: first_value(&pairs, "sort_by"),
            order: first_value(&pairs, "order"),
        }
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct PostSearchQuery {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl From<QueryPairs> for PostSearchQuery {
    fn from(pairs: QueryPairs) -> Self {
        Self {
            title: first_value(&pairs, "title"),
            content: first_value(&pairs, "content"),
        }
    }
}

/// Body of `POST /api/posts`. Absent fields stay `None` so the store can
/// report them; an explicit `null` is treated the same as an absent field.
#[derive(Debug, Default, Deserialize)]
pub struct PostCreateRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl From<PostCreateRequest> for NewPost {
    fn from(request: PostCreateRequest) -> Self {
        Self {
            title: request.title,
            content: request.content,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PostUpdateRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl From<PostUpdateRequest> for PostPatch {
    fn from(request: PostUpdateRequest) -> Self {
        Self {
            title: request.title,
            content: request.content,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
}
