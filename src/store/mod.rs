//! Page store
//!
//! # Architecture
//!
//! Pages live in per-tenant partitions:
//!
//! ```text
//! Partitions ("pages-{tenant}")
//!   └─→ Pages (UUID primary key, slug secondary key)
//! ```
//!
//! The [`StoreEngine`] trait is the persistence seam: simple find/insert/
//! remove operations, always qualified by a partition name. Partition
//! isolation is absolute; no operation can observe another partition.
//!
//! [`PageStore`] is the front the rest of the crate talks to. It owns the
//! page lifecycle: presence validation, id assignment, slug allocation with
//! bounded conflict retry, and read-before-delete semantics.
//!
//! [`MemoryEngine`] is the default in-process engine. Its insert enforces an
//! atomic (partition, slug) uniqueness constraint, which is what closes the
//! probe-then-write race in slug allocation.

pub mod engine;
pub mod memory;
pub mod page;

pub use engine::{PageStore, StoreEngine, MAX_CREATE_ATTEMPTS};
pub use memory::MemoryEngine;
pub use page::{Page, PageDraft};
