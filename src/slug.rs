//! Slug generation
//!
//! A slug is the URL-safe identifier derived from a page title:
//! `"Hello World!"` becomes `hello-world`. Slugs must be unique within a
//! tenant partition, so allocation probes the store for the base slug and
//! escalates a numeric suffix (`hello-world-2`, `hello-world-3`, ...) until
//! a free candidate is found.
//!
//! The probe is sequential by design (one existence check per round trip)
//! and bounded: an adversarial pile-up of identical titles surfaces a
//! `SlugConflict` instead of looping forever.
//!
//! Probing and inserting are separate operations, so a concurrent create can
//! take a candidate between the check and the write. That race is closed at
//! the store level: [`StoreEngine::insert`] enforces a (partition, slug)
//! uniqueness constraint, and [`PageStore::create`](crate::PageStore::create)
//! retries allocation on conflict.

use crate::error::{Error, Result};
use crate::store::StoreEngine;

/// Upper bound on suffix probing for a single allocation.
pub const MAX_SLUG_CANDIDATES: u32 = 1000;

/// Normalizes a title into a base slug.
///
/// Lowercases, folds common Latin diacritics to ASCII, collapses runs of
/// whitespace, hyphens, and underscores into a single `-`, and drops every
/// other non-alphanumeric character. May return an empty string (e.g. for a
/// title of only punctuation); callers treat that as an invalid title.
pub fn slugify(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        .flat_map(fold_diacritic)
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c
            } else if c.is_whitespace() || c == '-' || c == '_' {
                '-'
            } else {
                '\0' // dropped below
            }
        })
        .filter(|&c| c != '\0')
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Folds common accented Latin characters to their ASCII base letters.
/// Input is already lowercased.
fn fold_diacritic(c: char) -> std::vec::IntoIter<char> {
    let folded: &str = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => "a",
        'è' | 'é' | 'ê' | 'ë' => "e",
        'ì' | 'í' | 'î' | 'ï' => "i",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' => "o",
        'ù' | 'ú' | 'û' | 'ü' => "u",
        'ý' | 'ÿ' => "y",
        'ñ' => "n",
        'ç' => "c",
        'ß' => "ss",
        'æ' => "ae",
        'œ' => "oe",
        'ø' => "o",
        _ => return vec![c].into_iter(),
    };
    folded.chars().collect::<Vec<_>>().into_iter()
}

/// Allocates a slug for `title` that is not taken in `partition`.
///
/// Probes `base`, `base-2`, `base-3`, ... sequentially until the store
/// reports a free candidate. Retired slugs of deleted pages count as taken,
/// so a suffix is never handed out twice (old URLs are never reassigned to
/// different content).
///
/// # Errors
///
/// - `InvalidTitle` if normalization yields an empty slug.
/// - `SlugConflict` if `MAX_SLUG_CANDIDATES` candidates are all taken.
pub async fn generate_unique_slug(
    engine: &dyn StoreEngine,
    partition: &str,
    title: &str,
) -> Result<String> {
    let base = slugify(title);
    if base.is_empty() {
        return Err(Error::InvalidTitle(format!(
            "title {:?} yields an empty slug",
            title
        )));
    }

    let mut candidate = base.clone();
    let mut counter = 2u32;

    while engine.slug_taken(partition, &candidate).await? {
        if counter > MAX_SLUG_CANDIDATES {
            return Err(Error::SlugConflict(format!(
                "no free slug for '{}' within {} candidates",
                base, MAX_SLUG_CANDIDATES
            )));
        }
        candidate = format!("{}-{}", base, counter);
        counter += 1;
    }

    Ok(candidate)
}
