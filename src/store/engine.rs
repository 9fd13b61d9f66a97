//! Store engine trait and the page store front

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::slug::generate_unique_slug;
use crate::store::{MemoryEngine, Page, PageDraft};
use crate::tenant::TenantId;

/// Upper bound on generate-then-insert retries in [`PageStore::create`].
///
/// Every retry re-probes the partition, so a create only conflicts again if
/// another create claimed its candidate in the race window. Each round has a
/// winner, so the bound is effectively the number of creates racing on one
/// title; 16 is far beyond realistic contention.
pub const MAX_CREATE_ATTEMPTS: u32 = 16;

/// Persistence seam: partition-scoped find/insert/remove over pages.
///
/// The default implementation is [`MemoryEngine`]; an alternative engine
/// could target an external document store. Implementations must uphold two
/// guarantees:
///
/// - Partition isolation: an operation on one partition never observes or
///   mutates another.
/// - Slug uniqueness: `insert` atomically checks the (partition, slug) pair
///   and fails with `SlugConflict` when it is taken, including by a deleted
///   page (retired slugs are never recycled).
#[async_trait]
pub trait StoreEngine: Send + Sync {
    /// All pages in the partition, in creation order.
    async fn list(&self, partition: &str) -> Result<Vec<Page>>;

    /// Looks up a page by primary key.
    async fn find_by_id(&self, partition: &str, id: Uuid) -> Result<Option<Page>>;

    /// Looks up a page by its live slug. Retired slugs do not resolve.
    async fn find_by_slug(&self, partition: &str, slug: &str) -> Result<Option<Page>>;

    /// Whether a slug is taken in the partition (live or retired).
    async fn slug_taken(&self, partition: &str, slug: &str) -> Result<bool>;

    /// Persists a page, enforcing the slug uniqueness constraint.
    async fn insert(&self, partition: &str, page: Page) -> Result<()>;

    /// Removes a page and retires its slug, returning the removed page or
    /// `None` if the id was absent.
    async fn remove(&self, partition: &str, id: Uuid) -> Result<Option<Page>>;
}

/// Tenant-scoped CRUD over pages.
///
/// Owns validation, id assignment, and slug allocation; everything else is
/// delegated to the engine. Cloning is cheap (shared engine handle).
#[derive(Clone)]
pub struct PageStore {
    engine: Arc<dyn StoreEngine>,
}

impl std::fmt::Debug for PageStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageStore").finish()
    }
}

impl PageStore {
    pub fn new(engine: Arc<dyn StoreEngine>) -> Self {
        Self { engine }
    }

    /// Store backed by the default in-process engine.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryEngine::new()))
    }

    /// All pages of the tenant, in creation order.
    pub async fn list(&self, tenant: &TenantId) -> Result<Vec<Page>> {
        self.engine.list(&tenant.partition()).await
    }

    /// Fetches a page by id.
    ///
    /// An id that does not parse as a UUID cannot name any page and resolves
    /// to `NotFound` rather than a client error.
    pub async fn get_by_id(&self, tenant: &TenantId, id: &str) -> Result<Page> {
        let id = Uuid::parse_str(id).map_err(|_| Error::NotFound)?;
        self.engine
            .find_by_id(&tenant.partition(), id)
            .await?
            .ok_or(Error::NotFound)
    }

    /// Fetches a page by slug.
    pub async fn get_by_slug(&self, tenant: &TenantId, slug: &str) -> Result<Page> {
        self.engine
            .find_by_slug(&tenant.partition(), slug)
            .await?
            .ok_or(Error::NotFound)
    }

    /// Creates a page from a client draft.
    ///
    /// Validates presence of `title` and `content`, assigns a fresh UUID,
    /// allocates a unique slug, and persists. Slug probing and insert are
    /// separate operations, so a concurrent create can steal the candidate;
    /// the engine's uniqueness constraint detects that and the whole
    /// generate-then-insert sequence is retried, re-probing past the
    /// winner's suffix. After [`MAX_CREATE_ATTEMPTS`] the conflict is
    /// surfaced to the caller. A failed create leaves no partial record.
    pub async fn create(&self, tenant: &TenantId, draft: PageDraft) -> Result<Page> {
        let title = match draft.title.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => return Err(Error::InvalidDocument("title is required".to_string())),
        };
        let content = draft
            .content
            .ok_or_else(|| Error::InvalidDocument("content is required".to_string()))?;

        let partition = tenant.partition();

        for attempt in 1..=MAX_CREATE_ATTEMPTS {
            let slug = generate_unique_slug(self.engine.as_ref(), &partition, &title).await?;
            let page = Page {
                id: Uuid::new_v4(),
                title: title.clone(),
                image_default: draft.image_default.clone(),
                slug,
                content: content.clone(),
                seo_description: draft.seo_description.clone(),
                seo_keywords: draft.seo_keywords.clone(),
                is_available: draft.is_available,
                tenant: tenant.as_str().to_string(),
            };

            match self.engine.insert(&partition, page.clone()).await {
                Ok(()) => {
                    info!(tenant = %tenant, id = %page.id, slug = %page.slug, "Page created");
                    return Ok(page);
                }
                Err(Error::SlugConflict(reason)) => {
                    // Lost the race to a concurrent create; re-probe.
                    debug!(tenant = %tenant, attempt, %reason, "Slug taken at insert, retrying");
                    continue;
                }
                Err(e) => return Err(e),
            }
        }

        warn!(tenant = %tenant, title = %title, "Slug allocation retries exhausted");
        Err(Error::SlugConflict(format!(
            "could not allocate a unique slug for '{}' after {} attempts",
            title, MAX_CREATE_ATTEMPTS
        )))
    }

    /// Deletes a page by id. Read-before-delete: an absent id (including one
    /// that is not a UUID, or a page already deleted) is `NotFound`.
    pub async fn delete(&self, tenant: &TenantId, id: &str) -> Result<()> {
        let id = Uuid::parse_str(id).map_err(|_| Error::NotFound)?;
        match self.engine.remove(&tenant.partition(), id).await? {
            Some(page) => {
                info!(tenant = %tenant, id = %page.id, slug = %page.slug, "Page deleted");
                Ok(())
            }
            None => Err(Error::NotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tenant(id: &str) -> TenantId {
        TenantId::new(id).unwrap()
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_slug() {
        let store = PageStore::in_memory();
        let page = store
            .create(&tenant("acme"), PageDraft::new("Hello World!", json!({})))
            .await
            .unwrap();

        assert_eq!(page.slug, "hello-world");
        assert_eq!(page.tenant, "acme");
    }

    #[tokio::test]
    async fn test_create_requires_title_and_content() {
        let store = PageStore::in_memory();

        let no_title = PageDraft {
            content: Some(json!({})),
            ..PageDraft::default()
        };
        assert!(matches!(
            store.create(&tenant("acme"), no_title).await,
            Err(Error::InvalidDocument(_))
        ));

        let blank_title = PageDraft {
            title: Some("   ".to_string()),
            content: Some(json!({})),
            ..PageDraft::default()
        };
        assert!(matches!(
            store.create(&tenant("acme"), blank_title).await,
            Err(Error::InvalidDocument(_))
        ));

        let no_content = PageDraft {
            title: Some("Hello".to_string()),
            ..PageDraft::default()
        };
        assert!(matches!(
            store.create(&tenant("acme"), no_content).await,
            Err(Error::InvalidDocument(_))
        ));
    }

    #[tokio::test]
    async fn test_duplicate_titles_get_escalating_suffixes() {
        let store = PageStore::in_memory();
        let t = tenant("acme");

        let slugs = [
            store
                .create(&t, PageDraft::new("Hello World", json!({})))
                .await
                .unwrap()
                .slug,
            store
                .create(&t, PageDraft::new("Hello World!", json!({})))
                .await
                .unwrap()
                .slug,
            store
                .create(&t, PageDraft::new("hello world", json!({})))
                .await
                .unwrap()
                .slug,
        ];

        assert_eq!(slugs, ["hello-world", "hello-world-2", "hello-world-3"]);
    }

    #[tokio::test]
    async fn test_round_trip_by_id_and_slug() {
        let store = PageStore::in_memory();
        let t = tenant("acme");

        let mut draft = PageDraft::new("Hello World", json!({"body": "hi"}));
        draft.seo_description = Some("greeting".to_string());
        draft.is_available = Some(true);

        let created = store.create(&t, draft).await.unwrap();
        let by_id = store.get_by_id(&t, &created.id.to_string()).await.unwrap();
        let by_slug = store.get_by_slug(&t, &created.slug).await.unwrap();

        assert_eq!(created, by_id);
        assert_eq!(created, by_slug);
    }

    #[tokio::test]
    async fn test_tenant_isolation() {
        let store = PageStore::in_memory();
        let acme = tenant("acme");
        let globex = tenant("globex");

        let page = store
            .create(&acme, PageDraft::new("Hello World", json!({})))
            .await
            .unwrap();
        // Same title in another tenant gets the bare slug.
        let other = store
            .create(&globex, PageDraft::new("Hello World", json!({})))
            .await
            .unwrap();
        assert_eq!(other.slug, "hello-world");

        assert!(matches!(
            store.get_by_id(&globex, &page.id.to_string()).await,
            Err(Error::NotFound)
        ));
        assert_eq!(store.list(&acme).await.unwrap().len(), 1);
        assert_eq!(store.list(&globex).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_is_permanent_and_not_found_twice() {
        let store = PageStore::in_memory();
        let t = tenant("acme");

        let page = store
            .create(&t, PageDraft::new("Hello", json!({})))
            .await
            .unwrap();
        let id = page.id.to_string();

        store.delete(&t, &id).await.unwrap();
        assert!(matches!(store.delete(&t, &id).await, Err(Error::NotFound)));
        assert!(matches!(
            store.get_by_id(&t, &id).await,
            Err(Error::NotFound)
        ));
        assert!(matches!(
            store.get_by_slug(&t, "hello").await,
            Err(Error::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_delete_rejects_unknown_and_malformed_ids() {
        let store = PageStore::in_memory();
        let t = tenant("acme");

        assert!(matches!(
            store.delete(&t, &Uuid::new_v4().to_string()).await,
            Err(Error::NotFound)
        ));
        assert!(matches!(
            store.delete(&t, "not-a-uuid").await,
            Err(Error::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_deleted_slug_suffix_is_never_reused() {
        let store = PageStore::in_memory();
        let t = tenant("acme");

        store
            .create(&t, PageDraft::new("Hello", json!({})))
            .await
            .unwrap();
        let second = store
            .create(&t, PageDraft::new("Hello", json!({})))
            .await
            .unwrap();
        store
            .create(&t, PageDraft::new("Hello", json!({})))
            .await
            .unwrap();
        assert_eq!(second.slug, "hello-2");

        store.delete(&t, &second.id.to_string()).await.unwrap();

        // The gap left by hello-2 must not be filled.
        let fourth = store
            .create(&t, PageDraft::new("Hello", json!({})))
            .await
            .unwrap();
        assert_eq!(fourth.slug, "hello-4");
    }
}
