//! Page entity and client-supplied draft

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A stored page document.
///
/// `id`, `slug`, and `tenant` are assigned by the system and immutable;
/// clients never supply them. `content` is an opaque JSON payload. The wire
/// shape omits absent optional fields and never exposes `tenant`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: Uuid,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_default: Option<String>,
    pub slug: String,
    pub content: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seo_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seo_keywords: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_available: Option<bool>,
    /// Owning tenant, set at creation from the request header.
    #[serde(skip)]
    pub tenant: String,
}

impl Page {
    /// Builds a minimal page with a fresh id and no optional metadata.
    pub fn new(title: String, slug: String, content: Value, tenant: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            image_default: None,
            slug,
            content,
            seo_description: None,
            seo_keywords: None,
            is_available: None,
            tenant: tenant.to_string(),
        }
    }
}

/// Client-supplied partial page, as posted to the API.
///
/// `title` and `content` are required but modeled as `Option` so that
/// presence checks produce typed errors instead of deserialization failures.
/// Unknown fields (including any client attempt to set `id` or `slug`) are
/// ignored by serde's default behavior.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageDraft {
    pub title: Option<String>,
    pub image_default: Option<String>,
    pub content: Option<Value>,
    pub seo_description: Option<String>,
    pub seo_keywords: Option<String>,
    pub is_available: Option<bool>,
}

impl PageDraft {
    /// Convenience constructor for the required fields.
    pub fn new(title: impl Into<String>, content: Value) -> Self {
        Self {
            title: Some(title.into()),
            content: Some(content),
            ..Self::default()
        }
    }
}
