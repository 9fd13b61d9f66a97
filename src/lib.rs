// pagecms - Multi-tenant page content API
// Stores page documents per tenant in isolated partitions and allocates
// unique URL slugs from titles.

#![warn(rust_2018_idioms)]

pub mod server;
pub mod slug;
pub mod store;
pub mod tenant;

// Re-exports for convenience
pub use store::{MemoryEngine, Page, PageDraft, PageStore, StoreEngine};
pub use tenant::TenantId;

/// pagecms error types
pub mod error {
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum Error {
        #[error("Domain header is required")]
        MissingTenant,

        #[error("Page not found")]
        NotFound,

        #[error("Invalid page: {0}")]
        InvalidDocument(String),

        #[error("Invalid title: {0}")]
        InvalidTitle(String),

        #[error("Slug conflict: {0}")]
        SlugConflict(String),

        #[error("Storage error: {0}")]
        Storage(String),
    }

    pub type Result<T> = std::result::Result<T, Error>;
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
