//! Post records and the vocabulary used to sort, filter and edit them.

use std::{cmp::Ordering, str::FromStr};

use serde::{Deserialize, Serialize};

use super::error::DomainError;

pub type PostId = u64;

const TITLE_FIELD: &str = "title";
const CONTENT_FIELD: &str = "content";

/// A stored post. Field order is part of the wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub content: String,
}

impl Post {
    pub fn new(id: PostId, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            content: content.into(),
        }
    }
}

/// Posts every fresh store starts with.
pub fn seed_posts() -> Vec<Post> {
    vec![
        Post::new(1, "First post", "This is the first post."),
        Post::new(2, "Second post", "This is the second post."),
    ]
}

/// Fields supplied for a new post. Only presence is checked; empty strings pass.
#[derive(Debug, Clone, Default)]
pub struct NewPost {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl NewPost {
    /// Split into `(title, content)` or report every absent field.
    pub fn into_parts(self) -> Result<(String, String), DomainError> {
        match (self.title, self.content) {
            (Some(title), Some(content)) => Ok((title, content)),
            (title, content) => {
                let mut missing = Vec::new();
                if title.is_none() {
                    missing.push(TITLE_FIELD);
                }
                if content.is_none() {
                    missing.push(CONTENT_FIELD);
                }
                Err(DomainError::missing_fields(missing))
            }
        }
    }
}

/// Partial edit of a post; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl PostPatch {
    pub fn apply_to(self, post: &mut Post) {
        if let Some(title) = self.title {
            post.title = title;
        }
        if let Some(content) = self.content {
            post.content = content;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Title,
    Content,
}

impl SortField {
    pub fn compare(self, left: &Post, right: &Post) -> Ordering {
        match self {
            SortField::Id => left.id.cmp(&right.id),
            SortField::Title => left.title.cmp(&right.title),
            SortField::Content => left.content.cmp(&right.content),
        }
    }
}

impl FromStr for SortField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(Self::Id),
            TITLE_FIELD => Ok(Self::Title),
            CONTENT_FIELD => Ok(Self::Content),
            other => Err(DomainError::invalid_field(other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Anything other than `desc` sorts ascending.
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("desc") => Self::Desc,
            _ => Self::Asc,
        }
    }
}

/// Requested ordering for a list call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostSort {
    pub field: SortField,
    pub order: SortOrder,
}

impl PostSort {
    /// `Ok(None)` keeps insertion order. An unknown `sort_by` is rejected even
    /// when `order` is also unusable.
    pub fn from_params(
        sort_by: Option<&str>,
        order: Option<&str>,
    ) -> Result<Option<Self>, DomainError> {
        let Some(sort_by) = sort_by else {
            return Ok(None);
        };
        let field = sort_by.parse::<SortField>()?;
        Ok(Some(Self {
            field,
            order: SortOrder::from_param(order),
        }))
    }

    /// Stable in both directions: equal keys keep insertion order.
    pub fn sort(self, posts: &mut [Post]) {
        match self.order {
            SortOrder::Asc => posts.sort_by(|a, b| self.field.compare(a, b)),
            SortOrder::Desc => posts.sort_by(|a, b| self.field.compare(b, a)),
        }
    }
}

/// Case-insensitive substring filter over title and content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    title: String,
    content: String,
}

impl SearchQuery {
    pub fn new(title: Option<&str>, content: Option<&str>) -> Self {
        Self {
            title: title.unwrap_or_default().to_lowercase(),
            content: content.unwrap_or_default().to_lowercase(),
        }
    }

    pub fn matches(&self, post: &Post) -> bool {
        contains_folded(&post.title, &self.title) && contains_folded(&post.content, &self.content)
    }
}

fn contains_folded(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(needle)
}
