//! Checkout URL normalization
//!
//! Canonicalizes a raw checkout locator into the stable identity key used
//! to deduplicate pipelines. Repository addresses are case-insensitive on
//! every provider we target, branch names are not.

use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Recognized checkout locator shapes:
/// `git@host:org/repo[.git][#branch]` and
/// `https://[user@]host[:port]/org/repo[.git][#branch]`.
static CHECKOUT_URL: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(
        r"(?i)^(?:git@[^\s:/#]+:[^\s/#]+/[^\s#]+|https://(?:[^@/\s#]+@)?[^\s:/#]+(?::\d+)?/[^\s/#]+/[^\s#]+)(?:#(\S+))?$",
    )
    .expect("checkout URL pattern is valid")
});

/// A normalized checkout locator.
///
/// The repository address (everything before `#`) is lowercased and the
/// branch segment is always present, defaulting to `master`. Two locators
/// that differ only in address casing, or in omitting the default branch,
/// normalize to the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CheckoutUrl(String);

impl CheckoutUrl {
    /// Normalize a raw locator, rejecting anything that does not match a
    /// recognized shape.
    ///
    /// Normalization is deterministic and idempotent; branch case is
    /// preserved.
    pub fn normalize(raw: &str) -> Result<Self, InvalidLocator> {
        let raw = raw.trim();
        let captures = CHECKOUT_URL
            .captures(raw)
            .ok_or_else(|| InvalidLocator(raw.to_string()))?;

        let branch = captures.get(1).map_or("master", |m| m.as_str());
        let address = raw.split_once('#').map_or(raw, |(address, _)| address);

        Ok(Self(format!("{}#{}", address.to_lowercase(), branch)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CheckoutUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The locator did not match a recognized checkout URL shape.
#[derive(Debug, Clone, Error)]
#[error("checkout URL does not match a recognized shape: {0}")]
pub struct InvalidLocator(pub String);
