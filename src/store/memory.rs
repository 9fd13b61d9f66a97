//! In-memory store engine
//!
//! Default [`StoreEngine`] implementation. Partitions are created on first
//! use and held in a `DashMap`; all mutation of one partition happens while
//! holding that partition's map guard, so the check-then-insert of the slug
//! uniqueness constraint is atomic. Operations on different partitions never
//! contend on a common lock.

use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::store::{Page, StoreEngine};

/// One tenant's pages plus the slug indexes.
///
/// `retired` keeps the slugs of deleted pages. Those slugs stay reserved
/// forever: a later page with a colliding title must not take over a URL
/// that used to point at different content.
#[derive(Default)]
struct Partition {
    pages: HashMap<Uuid, Page>,
    /// Insertion order, so `list` returns pages in creation order.
    order: Vec<Uuid>,
    /// Live slug index for `find_by_slug`.
    slugs: HashMap<String, Uuid>,
    retired: HashSet<String>,
}

impl Partition {
    fn slug_taken(&self, slug: &str) -> bool {
        self.slugs.contains_key(slug) || self.retired.contains(slug)
    }
}

/// In-process page storage, partitioned by tenant.
#[derive(Default)]
pub struct MemoryEngine {
    partitions: DashMap<String, Partition>,
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pages in a partition. Test helper.
    pub fn len(&self, partition: &str) -> usize {
        self.partitions
            .get(partition)
            .map(|p| p.pages.len())
            .unwrap_or(0)
    }

    /// Whether a partition holds no pages. Test helper.
    pub fn is_empty(&self, partition: &str) -> bool {
        self.len(partition) == 0
    }
}

#[async_trait]
impl StoreEngine for MemoryEngine {
    async fn list(&self, partition: &str) -> Result<Vec<Page>> {
        let pages = match self.partitions.get(partition) {
            Some(part) => part
                .order
                .iter()
                .filter_map(|id| part.pages.get(id).cloned())
                .collect(),
            None => Vec::new(),
        };
        Ok(pages)
    }

    async fn find_by_id(&self, partition: &str, id: Uuid) -> Result<Option<Page>> {
        Ok(self
            .partitions
            .get(partition)
            .and_then(|part| part.pages.get(&id).cloned()))
    }

    async fn find_by_slug(&self, partition: &str, slug: &str) -> Result<Option<Page>> {
        Ok(self.partitions.get(partition).and_then(|part| {
            part.slugs
                .get(slug)
                .and_then(|id| part.pages.get(id).cloned())
        }))
    }

    async fn slug_taken(&self, partition: &str, slug: &str) -> Result<bool> {
        Ok(self
            .partitions
            .get(partition)
            .map(|part| part.slug_taken(slug))
            .unwrap_or(false))
    }

    async fn insert(&self, partition: &str, page: Page) -> Result<()> {
        // The entry guard is held for the whole check-then-insert, making
        // the uniqueness constraint atomic per partition.
        let mut part = self.partitions.entry(partition.to_string()).or_default();

        if part.slug_taken(&page.slug) {
            return Err(Error::SlugConflict(format!(
                "slug '{}' already taken in partition '{}'",
                page.slug, partition
            )));
        }
        if part.pages.contains_key(&page.id) {
            return Err(Error::Storage(format!(
                "duplicate page id {} in partition '{}'",
                page.id, partition
            )));
        }

        part.slugs.insert(page.slug.clone(), page.id);
        part.order.push(page.id);
        part.pages.insert(page.id, page);
        Ok(())
    }

    async fn remove(&self, partition: &str, id: Uuid) -> Result<Option<Page>> {
        let removed = self.partitions.get_mut(partition).and_then(|mut part| {
            let page = part.pages.remove(&id)?;
            part.slugs.remove(&page.slug);
            part.retired.insert(page.slug.clone());
            part.order.retain(|entry| *entry != id);
            Some(page)
        });
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn page(title: &str, slug: &str) -> Page {
        Page::new(title.to_string(), slug.to_string(), json!({}), "acme")
    }

    #[tokio::test]
    async fn test_insert_and_lookup() {
        let engine = MemoryEngine::new();
        let p = page("Hello", "hello");
        let id = p.id;

        engine.insert("pages-acme", p.clone()).await.unwrap();

        assert_eq!(engine.find_by_id("pages-acme", id).await.unwrap(), Some(p.clone()));
        assert_eq!(
            engine.find_by_slug("pages-acme", "hello").await.unwrap(),
            Some(p)
        );
        assert!(engine.slug_taken("pages-acme", "hello").await.unwrap());
    }

    #[tokio::test]
    async fn test_insert_enforces_slug_uniqueness() {
        let engine = MemoryEngine::new();
        engine
            .insert("pages-acme", page("Hello", "hello"))
            .await
            .unwrap();

        let err = engine
            .insert("pages-acme", page("Hello again", "hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::SlugConflict(_)));
        assert_eq!(engine.len("pages-acme"), 1);
    }

    #[tokio::test]
    async fn test_same_slug_in_another_partition_is_fine() {
        let engine = MemoryEngine::new();
        engine
            .insert("pages-acme", page("Hello", "hello"))
            .await
            .unwrap();
        engine
            .insert("pages-globex", page("Hello", "hello"))
            .await
            .unwrap();

        assert_eq!(engine.len("pages-acme"), 1);
        assert_eq!(engine.len("pages-globex"), 1);
    }

    #[tokio::test]
    async fn test_list_preserves_creation_order() {
        let engine = MemoryEngine::new();
        for i in 0..5 {
            engine
                .insert("pages-acme", page(&format!("Page {}", i), &format!("page-{}", i)))
                .await
                .unwrap();
        }

        let titles: Vec<String> = engine
            .list("pages-acme")
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, ["Page 0", "Page 1", "Page 2", "Page 3", "Page 4"]);
    }

    #[tokio::test]
    async fn test_remove_retires_the_slug() {
        let engine = MemoryEngine::new();
        let p = page("Hello", "hello");
        let id = p.id;
        engine.insert("pages-acme", p).await.unwrap();

        let removed = engine.remove("pages-acme", id).await.unwrap();
        assert!(removed.is_some());

        // Gone from lookups, but the slug stays reserved.
        assert_eq!(engine.find_by_slug("pages-acme", "hello").await.unwrap(), None);
        assert!(engine.slug_taken("pages-acme", "hello").await.unwrap());
        assert!(matches!(
            engine.insert("pages-acme", page("Hello", "hello")).await,
            Err(Error::SlugConflict(_))
        ));
    }

    #[tokio::test]
    async fn test_remove_missing_id_is_none() {
        let engine = MemoryEngine::new();
        assert!(engine
            .remove("pages-acme", Uuid::new_v4())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_list_of_unknown_partition_is_empty() {
        let engine = MemoryEngine::new();
        assert!(engine.list("pages-nobody").await.unwrap().is_empty());
        assert!(engine.is_empty("pages-nobody"));
        assert_eq!(engine.len("pages-nobody"), 0);
    }

    #[tokio::test]
    async fn test_is_empty_tracks_inserts_and_removes() {
        let engine = MemoryEngine::new();
        let p = page("Hello", "hello");
        let id = p.id;

        engine.insert("pages-acme", p).await.unwrap();
        assert!(!engine.is_empty("pages-acme"));

        engine.remove("pages-acme", id).await.unwrap();
        assert!(engine.is_empty("pages-acme"));
    }
}
