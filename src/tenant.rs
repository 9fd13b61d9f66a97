//! Tenant resolution
//!
//! Every request carries a `domain` header naming the tenant. The tenant
//! identifier is an opaque string; it is only used to derive the name of the
//! storage partition the request operates on. There is deliberately no
//! allow-list: any non-empty identifier is accepted.

use axum::http::HeaderMap;
use std::fmt;

use crate::error::{Error, Result};

/// Name of the request header carrying the tenant identifier.
pub const TENANT_HEADER: &str = "domain";

/// Prefix for tenant partition names (`pages-{domain}`).
const PARTITION_PREFIX: &str = "pages-";

/// An opaque tenant identifier resolved from a request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TenantId(String);

impl TenantId {
    /// Resolves the tenant from request headers.
    ///
    /// Header lookup is case-insensitive (HTTP header semantics). The value
    /// is trimmed; a missing, empty, or whitespace-only header fails with
    /// `MissingTenant`. No further normalization is applied.
    pub fn from_headers(headers: &HeaderMap) -> Result<Self> {
        let value = headers
            .get(TENANT_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .unwrap_or("");

        if value.is_empty() {
            return Err(Error::MissingTenant);
        }

        Ok(Self(value.to_string()))
    }

    /// Builds a TenantId from a known identifier. Fails on empty input.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(Error::MissingTenant);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The tenant identifier as given in the request.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of the storage partition holding this tenant's pages.
    pub fn partition(&self) -> String {
        format!("{}{}", PARTITION_PREFIX, self.0)
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
