//! User domain types

use std::fmt;

use serde::{Deserialize, Serialize};

/// A platform user able to own pipelines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    /// SCM credential, encrypted at rest; decrypted on demand through a
    /// [`crate::ports::CredentialVault`].
    pub sealed_credential: SealedCredential,
}

/// Opaque ciphertext of a stored SCM credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SealedCredential(String);

impl SealedCredential {
    pub fn new(ciphertext: impl Into<String>) -> Self {
        Self(ciphertext.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Short-lived plaintext SCM token produced by unsealing.
#[derive(Clone, PartialEq, Eq)]
pub struct UnsealedToken(String);

impl UnsealedToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

// Keeps plaintext credentials out of logs and error chains.
impl fmt::Debug for UnsealedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UnsealedToken(***)")
    }
}

/// Capability flags for a user on a repository.
///
/// The creation workflow only consults `admin`; the full set is carried
/// because the provider reports all three.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Permissions {
    pub admin: bool,
    pub push: bool,
    pub pull: bool,
}
