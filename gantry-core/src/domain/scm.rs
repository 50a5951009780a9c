//! Source-control resource identity

use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical resource identifier assigned by the source-control provider.
///
/// Opaque beyond equality: two checkout URLs differing only in casing or
/// syntax resolve to the same `ScmUri`, which is what keys pipeline
/// uniqueness.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScmUri(String);

impl ScmUri {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScmUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
