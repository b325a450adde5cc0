//! In-memory post collection shared by every request handler.
//!
//! Reads take the shared lock and return owned snapshots; every mutation holds
//! the exclusive lock for its whole duration, so id assignment and the append
//! that follows it are observed as one step.

use std::sync::RwLock;

use metrics::{counter, gauge};
use tracing::{debug, info};

use crate::application::lock::{read_recovering, write_recovering};
use crate::domain::error::DomainError;
use crate::domain::posts::{NewPost, Post, PostId, PostPatch, PostSort, SearchQuery, seed_posts};

pub(crate) const POSTS_CREATED_TOTAL: &str = "postbox_posts_created_total";
pub(crate) const POSTS_UPDATED_TOTAL: &str = "postbox_posts_updated_total";
pub(crate) const POSTS_DELETED_TOTAL: &str = "postbox_posts_deleted_total";
pub(crate) const POSTS_STORED: &str = "postbox_posts_stored";

#[derive(Debug, Default)]
pub struct PostStore {
    posts: RwLock<Vec<Post>>,
}

impl PostStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding the two initial posts.
    pub fn seeded() -> Self {
        let store = Self {
            posts: RwLock::new(seed_posts()),
        };
        gauge!(POSTS_STORED).set(store.len() as f64);
        store
    }

    pub fn len(&self) -> usize {
        read_recovering(&self.posts, "len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: PostId) -> bool {
        read_recovering(&self.posts, "contains")
            .iter()
            .any(|post| post.id == id)
    }

    /// List posts, optionally sorted by `sort_by` (`id`, `title` or `content`).
    ///
    /// Only `order == "desc"` reverses the ordering; any other value sorts
    /// ascending. The stored order is never changed.
    pub fn list(
        &self,
        sort_by: Option<&str>,
        order: Option<&str>,
    ) -> Result<Vec<Post>, DomainError> {
        let sort = PostSort::from_params(sort_by, order)?;
        Ok(self.list_sorted(sort))
    }

    fn list_sorted(&self, sort: Option<PostSort>) -> Vec<Post> {
        let mut posts = read_recovering(&self.posts, "list").clone();
        if let Some(sort) = sort {
            sort.sort(&mut posts);
        }
        posts
    }

    /// Append a post with id `max(existing) + 1`, or `1` when empty.
    ///
    /// The maximum is recomputed on every call, so deleting the newest post
    /// frees its id for the next insert.
    pub fn insert(&self, draft: NewPost) -> Result<Post, DomainError> {
        let (title, content) = draft.into_parts()?;

        let mut posts = write_recovering(&self.posts, "insert");
        let id = next_id(&posts);
        let post = Post::new(id, title, content);
        posts.push(post.clone());
        let stored = posts.len();
        drop(posts);

        counter!(POSTS_CREATED_TOTAL).increment(1);
        gauge!(POSTS_STORED).set(stored as f64);
        info!(post_id = id, stored, "post created");
        Ok(post)
    }

    /// Replace the supplied fields of post `id` in place.
    pub fn update(&self, id: PostId, patch: PostPatch) -> Result<Post, DomainError> {
        let mut posts = write_recovering(&self.posts, "update");
        let post = posts
            .iter_mut()
            .find(|post| post.id == id)
            .ok_or_else(|| DomainError::not_found(id))?;

        if patch.is_empty() {
            debug!(post_id = id, "update carried no fields");
        }
        patch.apply_to(post);
        let updated = post.clone();
        drop(posts);

        counter!(POSTS_UPDATED_TOTAL).increment(1);
        info!(post_id = id, "post updated");
        Ok(updated)
    }

    /// Remove post `id`, keeping the relative order of the rest.
    pub fn delete(&self, id: PostId) -> Result<Post, DomainError> {
        let mut posts = write_recovering(&self.posts, "delete");
        let index = posts
            .iter()
            .position(|post| post.id == id)
            .ok_or_else(|| DomainError::not_found(id))?;
        let removed = posts.remove(index);
        let stored = posts.len();
        drop(posts);

        counter!(POSTS_DELETED_TOTAL).increment(1);
        gauge!(POSTS_STORED).set(stored as f64);
        info!(post_id = id, stored, "post deleted");
        Ok(removed)
    }

    /// Posts whose title and content contain the given fragments, ignoring
    /// case. Missing or empty fragments match everything.
    pub fn search(&self, title: Option<&str>, content: Option<&str>) -> Vec<Post> {
        self.search_with(&SearchQuery::new(title, content))
    }

    fn search_with(&self, query: &SearchQuery) -> Vec<Post> {
        read_recovering(&self.posts, "search")
            .iter()
            .filter(|post| query.matches(post))
            .cloned()
            .collect()
    }
}

fn next_id(posts: &[Post]) -> PostId {
    posts.iter().map(|post| post.id).max().map_or(1, |max| max + 1)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    use super::*;
    use crate::domain::posts::{SortField, SortOrder};

    fn draft(title: &str, content: &str) -> NewPost {
        NewPost {
            title: Some(title.to_string()),
            content: Some(content.to_string()),
        }
    }

    fn ids(posts: &[Post]) -> Vec<PostId> {
        posts.iter().map(|post| post.id).collect()
    }

    #[test]
    fn seeded_store_holds_initial_posts() {
        let store = PostStore::seeded();
        let posts = store.list(None, None).expect("unsorted list");

        assert_eq!(posts, seed_posts());
        assert_eq!(posts[0].title, "First post");
        assert_eq!(posts[1].content, "This is the second post.");
    }

    #[test]
    fn insert_into_empty_store_starts_at_one() {
        let store = PostStore::new();
        let post = store.insert(draft("T", "C")).expect("insert");

        assert_eq!(post, Post::new(1, "T", "C"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn insert_appends_with_next_id() {
        let store = PostStore::seeded();
        let post = store.insert(draft("T", "C")).expect("insert");

        assert_eq!(post.id, 3);
        let posts = store.list(None, None).expect("list");
        assert_eq!(posts.last(), Some(&post));
    }

    #[test]
    fn insert_with_missing_field_leaves_store_untouched() {
        let store = PostStore::seeded();
        let err = store
            .insert(NewPost {
                title: Some("X".to_string()),
                content: None,
            })
            .unwrap_err();

        assert_eq!(err, DomainError::missing_fields(vec!["content"]));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn deleting_newest_post_frees_its_id() {
        let store = PostStore::seeded();
        let third = store.insert(draft("T", "C")).expect("insert");
        store.delete(third.id).expect("delete");

        let again = store.insert(draft("T2", "C2")).expect("insert");
        assert_eq!(again.id, third.id);

        let posts = store.list(None, None).expect("list");
        let unique: HashSet<_> = ids(&posts).into_iter().collect();
        assert_eq!(unique.len(), posts.len());
    }

    #[test]
    fn deleting_older_post_does_not_reuse_ids() {
        let store = PostStore::seeded();
        store.delete(1).expect("delete");

        let post = store.insert(draft("T", "C")).expect("insert");
        assert_eq!(post.id, 3);
        assert_eq!(ids(&store.list(None, None).expect("list")), vec![2, 3]);
    }

    #[test]
    fn update_changes_only_supplied_fields() {
        let store = PostStore::seeded();

        let updated = store
            .update(
                1,
                PostPatch {
                    title: Some("Renamed".to_string()),
                    content: None,
                },
            )
            .expect("update title");
        assert_eq!(updated, Post::new(1, "Renamed", "This is the first post."));

        let updated = store
            .update(
                1,
                PostPatch {
                    title: None,
                    content: Some("New body".to_string()),
                },
            )
            .expect("update content");
        assert_eq!(updated, Post::new(1, "Renamed", "New body"));

        assert_eq!(ids(&store.list(None, None).expect("list")), vec![1, 2]);
    }

    #[test]
    fn contains_tracks_inserts_and_deletes() {
        let store = PostStore::seeded();
        assert!(store.contains(2));
        assert!(!store.contains(3));

        store.delete(2).expect("delete");
        assert!(!store.contains(2));
        assert!(!store.is_empty());
    }

    #[test]
    fn update_missing_post_is_not_found() {
        let store = PostStore::seeded();
        let err = store.update(42, PostPatch::default()).unwrap_err();
        assert_eq!(err, DomainError::not_found(42));
    }

    #[test]
    fn delete_removes_exactly_one_post() {
        let store = PostStore::seeded();
        store.insert(draft("T", "C")).expect("insert");

        let removed = store.delete(2).expect("delete");
        assert_eq!(removed.id, 2);
        assert_eq!(ids(&store.list(None, None).expect("list")), vec![1, 3]);
    }

    #[test]
    fn delete_missing_post_leaves_store_unchanged() {
        let store = PostStore::seeded();
        let before = store.list(None, None).expect("list");

        assert_eq!(store.delete(99).unwrap_err(), DomainError::not_found(99));
        assert_eq!(store.list(None, None).expect("list"), before);
    }

    #[test]
    fn sorted_list_is_a_permutation_in_field_order() {
        let store = PostStore::seeded();
        store.insert(draft("Banana", "zzz")).expect("insert");
        store.insert(draft("Apple", "aaa")).expect("insert");
        let unsorted = store.list(None, None).expect("list");

        for field in ["id", "title", "content"] {
            for order in ["asc", "desc"] {
                let sorted = store.list(Some(field), Some(order)).expect("sorted list");
                let sort_field: SortField = field.parse().expect("known field");

                let mut expected_ids = ids(&unsorted);
                let mut got_ids = ids(&sorted);
                expected_ids.sort_unstable();
                got_ids.sort_unstable();
                assert_eq!(got_ids, expected_ids, "{field} {order} is a permutation");

                for pair in sorted.windows(2) {
                    let ordering = sort_field.compare(&pair[0], &pair[1]);
                    if SortOrder::from_param(Some(order)) == SortOrder::Desc {
                        assert!(ordering.is_ge(), "{field} desc out of order");
                    } else {
                        assert!(ordering.is_le(), "{field} asc out of order");
                    }
                }
            }
        }

        assert_eq!(store.list(None, None).expect("list"), unsorted);
    }

    #[test]
    fn sorting_by_id_reproduces_insertion_order() {
        let store = PostStore::seeded();
        store.insert(draft("c", "c")).expect("insert");
        store.insert(draft("a", "a")).expect("insert");

        assert_eq!(
            store.list(Some("id"), None).expect("sorted"),
            store.list(None, None).expect("unsorted")
        );
    }

    #[test]
    fn list_rejects_unknown_sort_field() {
        let store = PostStore::seeded();
        let err = store.list(Some("published_at"), None).unwrap_err();
        assert_eq!(err, DomainError::invalid_field("published_at"));
    }

    #[test]
    fn search_matches_seed_title_case_insensitively() {
        let store = PostStore::seeded();
        let found = store.search(Some("first"), None);

        assert_eq!(ids(&found), vec![1]);
        assert_eq!(found[0].title, "First post");
    }

    #[test]
    fn search_without_terms_returns_everything_in_store_order() {
        let store = PostStore::seeded();
        store.delete(1).expect("delete");
        store.insert(draft("Another", "post body")).expect("insert");

        assert_eq!(ids(&store.search(None, None)), vec![2, 3]);
        assert_eq!(ids(&store.search(Some(""), Some(""))), vec![2, 3]);
        assert!(store.search(Some("missing"), None).is_empty());
    }

    #[test]
    fn concurrent_inserts_receive_unique_ids() {
        let store = Arc::new(PostStore::seeded());
        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    (0..25)
                        .map(|n| {
                            store
                                .insert(draft(&format!("w{worker}-{n}"), "body"))
                                .expect("insert")
                                .id
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().expect("worker finished") {
                assert!(seen.insert(id), "id {id} assigned twice");
            }
        }
        assert_eq!(seen.len(), 200);
        assert_eq!(store.len(), 202);
    }
}
