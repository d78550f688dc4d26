//! External identity and the explicit per-request session
//!
//! Identity verification happens upstream. What arrives here is already
//! trusted: the provider's subject id plus whatever profile fields it reported.

use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Profile of a verified user as reported by the identity provider
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalIdentity {
    /// Provider subject id (stable, unique per user)
    pub subject: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    /// Email addresses, primary first
    #[serde(default)]
    pub email_addresses: Vec<String>,
    pub image_url: Option<String>,
}

impl ExternalIdentity {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            ..Self::default()
        }
    }

    /// The primary (first) email address, if any.
    pub fn primary_email(&self) -> Option<&str> {
        self.email_addresses
            .iter()
            .map(|e| e.trim())
            .find(|e| !e.is_empty())
    }

    /// "First Last", with missing parts dropped.
    pub fn display_name(&self) -> String {
        let first = self.first_name.as_deref().unwrap_or("").trim();
        let last = self.last_name.as_deref().unwrap_or("").trim();
        format!("{} {}", first, last).trim().to_owned()
    }

    /// Provider username, falling back to the local part of the primary email.
    pub fn derived_username(&self) -> Result<String, ValidationError> {
        if let Some(username) = self.username.as_deref().map(str::trim) {
            if !username.is_empty() {
                return Ok(username.to_owned());
            }
        }

        let email = self.primary_email().ok_or(ValidationError::Empty {
            field: "email address",
        })?;

        let local = email.split('@').next().unwrap_or_default();
        if local.is_empty() {
            return Err(ValidationError::InvalidFormat {
                field: "email address",
                reason: "missing local part",
            });
        }

        Ok(local.to_owned())
    }
}

/// Per-request session, passed explicitly into every operation.
///
/// `Session::anonymous()` is a request without a verified identity.
#[derive(Debug, Clone, Default)]
pub struct Session {
    identity: Option<ExternalIdentity>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self { identity: None }
    }

    pub fn authenticated(identity: ExternalIdentity) -> Self {
        Self {
            identity: Some(identity),
        }
    }

    pub fn identity(&self) -> Option<&ExternalIdentity> {
        self.identity.as_ref()
    }

    pub fn subject(&self) -> Option<&str> {
        self.identity.as_ref().map(|i| i.subject.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }
}
