//! Identifier, email and name validation.
//!
//! These checks are pure and never touch the network; they exist so that
//! obviously malformed input fails fast, not to replace server validation.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::ValidationError;

/// Minimum length of an app name, after trimming.
pub const MIN_APP_NAME_LEN: usize = 3;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("email pattern is a valid regex")
});

/// Which identifier a value is meant to be. Only affects error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierKind {
    App,
    Submission,
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentifierKind::App => f.write_str("App"),
            IdentifierKind::Submission => f.write_str("Submission"),
        }
    }
}

/// A validated app or submission identifier.
///
/// # Invariants
/// - Non-empty.
/// - Only ASCII uppercase letters and digits; surrounding whitespace removed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validate an identifier and return its trimmed form.
///
/// # Errors
///
/// Returns `ValidationError::EmptyIdentifier` for blank input and
/// `ValidationError::InvalidIdentifier` if any character falls outside `[A-Z0-9]`.
pub fn validate_identifier(
    kind: IdentifierKind,
    value: &str,
) -> Result<Identifier, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyIdentifier { kind });
    }
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
    {
        return Err(ValidationError::InvalidIdentifier { kind });
    }
    Ok(Identifier(trimmed.to_string()))
}

pub fn validate_app_id(value: &str) -> Result<Identifier, ValidationError> {
    validate_identifier(IdentifierKind::App, value)
}

pub fn validate_submission_id(value: &str) -> Result<Identifier, ValidationError> {
    validate_identifier(IdentifierKind::Submission, value)
}

/// A trimmed email address that matched the address pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Parse and trim an address.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidEmail` if the address does not match.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        if validate_email(value) {
            Ok(EmailAddress(value.trim().to_string()))
        } else {
            Err(ValidationError::InvalidEmail {
                value: value.to_string(),
            })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returns true if `email` (trimmed) looks like `local@domain.tld`.
pub fn validate_email(email: &str) -> bool {
    let trimmed = email.trim();
    !trimmed.is_empty() && EMAIL_PATTERN.is_match(trimmed)
}

/// Outcome of checking a list of email addresses.
///
/// Invalid entries are dropped rather than fatal: the check only fails when
/// no entry at all is valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailListCheck {
    /// Valid addresses, trimmed, in input order.
    pub valid: Vec<EmailAddress>,
    /// Rejected entries, as given.
    pub invalid: Vec<String>,
}

impl EmailListCheck {
    /// True if at least one address survived.
    pub fn any_valid(&self) -> bool {
        !self.valid.is_empty()
    }

    /// Human-readable note about skipped entries; empty when nothing was skipped.
    pub fn diagnostic(&self) -> String {
        if self.valid.is_empty() {
            format!(
                "No valid email addresses found. Invalid emails: {:?}",
                self.invalid
            )
        } else if self.invalid.is_empty() {
            String::new()
        } else {
            format!("Some emails were invalid and skipped: {:?}", self.invalid)
        }
    }

    /// Convert into the valid subset, failing if it is empty.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::NoValidEmails` when every entry was rejected.
    pub fn into_valid(self) -> Result<Vec<EmailAddress>, ValidationError> {
        if self.valid.is_empty() {
            Err(ValidationError::NoValidEmails {
                invalid: self.invalid,
            })
        } else {
            Ok(self.valid)
        }
    }
}

/// Partition `emails` into valid and invalid entries.
///
/// # Errors
///
/// Returns `ValidationError::EmptyEmailList` if `emails` is empty. A list
/// with no valid entries is *not* an error here; see [`EmailListCheck::into_valid`].
pub fn validate_email_list<S: AsRef<str>>(emails: &[S]) -> Result<EmailListCheck, ValidationError> {
    if emails.is_empty() {
        return Err(ValidationError::EmptyEmailList);
    }

    let mut valid = Vec::new();
    let mut invalid = Vec::new();
    for email in emails {
        match EmailAddress::parse(email.as_ref()) {
            Ok(address) => valid.push(address),
            Err(_) => invalid.push(email.as_ref().to_string()),
        }
    }

    Ok(EmailListCheck { valid, invalid })
}

/// Validate an app name and return it trimmed.
pub fn validate_app_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyValue { what: "App name" });
    }
    if trimmed.chars().count() < MIN_APP_NAME_LEN {
        return Err(ValidationError::AppNameTooShort {
            min: MIN_APP_NAME_LEN,
        });
    }
    Ok(trimmed.to_string())
}

/// Trim `value` and reject it if nothing is left.
pub(crate) fn require_text(what: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::EmptyValue { what })
    } else {
        Ok(trimmed.to_string())
    }
}
