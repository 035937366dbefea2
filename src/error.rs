//! Error types for request validation and Clappia API calls.

use thiserror::Error;

use crate::field::FieldType;
use crate::validator::IdentifierKind;

/// Violations of the submission filter grammar.
///
/// The grammar walk is fail-fast, so a single call only ever reports the
/// first rule that did not hold.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("Filters must contain 'queries' key")]
    MissingQueries,

    #[error("Queries must be a non-empty list")]
    EmptyQueries,

    #[error("Each query group must contain 'queries' key")]
    GroupMissingQueries,

    #[error("Each query group must have a non-empty 'queries' list")]
    EmptyGroupQueries,

    #[error("Each query must contain 'conditions'")]
    MissingConditions,

    #[error("Conditions must be a non-empty list")]
    EmptyConditions,

    #[error("Invalid logical operator: {value}")]
    InvalidLogicalOperator { value: String },

    #[error("Condition missing required field: {field}")]
    ConditionMissingField { field: &'static str },

    #[error("Invalid operator: {value}")]
    InvalidOperator { value: String },

    #[error("Invalid filterKeyType: {value}")]
    InvalidFilterKeyType { value: String },

    #[error("Key must be a non-empty string")]
    EmptyKey,

    #[error("Standard filterKeyType used but key '{key}' is not a standard field")]
    NotStandardField { key: String },

    #[error("Operator {operator} should have empty value")]
    UnexpectedValue { operator: String },

    #[error("Operator {operator} requires a non-empty value")]
    MissingValue { operator: String },

    #[error("{path} must be {expected}, got {actual}")]
    WrongType {
        path: String,
        expected: &'static str,
        actual: &'static str,
    },
}

/// Local, pre-network validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{kind} ID is required and cannot be empty")]
    EmptyIdentifier { kind: IdentifierKind },

    #[error("{kind} ID must contain only uppercase letters and numbers")]
    InvalidIdentifier { kind: IdentifierKind },

    #[error("Invalid email address: '{value}'")]
    InvalidEmail { value: String },

    #[error("Email list cannot be empty")]
    EmptyEmailList,

    #[error("No valid email addresses found. Invalid emails: {invalid:?}")]
    NoValidEmails { invalid: Vec<String> },

    #[error("App name must be at least {min} characters long")]
    AppNameTooShort { min: usize },

    #[error("Options are required for {field_type}")]
    MissingOptions { field_type: FieldType },

    #[error("Sections must be a non-empty list")]
    NoSections,

    #[error("Section '{section}' must have a non-empty list of fields")]
    EmptySection { section: String },

    #[error(
        "Invalid field type '{field_type}' in section '{section}', allowed field types are [{allowed}]"
    )]
    FieldTypeNotCreatable {
        field_type: FieldType,
        section: String,
        allowed: String,
    },

    #[error("{what} is required and cannot be empty")]
    EmptyValue { what: &'static str },

    #[error("Invalid {what} '{value}': expected one of {expected}")]
    UnknownValue {
        what: &'static str,
        value: String,
        expected: String,
    },

    #[error("{what} must be {expected}, got {value}")]
    OutOfRange {
        what: &'static str,
        value: i64,
        expected: String,
    },

    #[error("Submission data must be a JSON object, got {actual}")]
    DataNotObject { actual: &'static str },

    #[error("invalid {what}: {message}")]
    Malformed { what: &'static str, message: String },

    #[error(transparent)]
    Filter(#[from] FilterError),
}

/// Failures of the HTTP request/response wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("API Error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Unexpected API response ({status}): {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("Request timeout after {seconds} seconds")]
    Timeout { seconds: u64 },

    #[error("Connection error - unable to reach Clappia API: {message}")]
    Connection { message: String },

    #[error("Unexpected error: {message}")]
    Unknown { message: String },
}

impl RequestError {
    /// Stable tag naming the failure class.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration { .. } => "configuration_error",
            Self::Api { .. } => "api_error",
            Self::UnexpectedStatus { .. } => "unexpected_status",
            Self::Timeout { .. } => "timeout",
            Self::Connection { .. } => "connection_error",
            Self::Unknown { .. } => "unknown_error",
        }
    }

    /// HTTP status for errors produced from a server reply.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } | Self::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Any failure an operation can end in.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Request(#[from] RequestError),
}

impl From<FilterError> for ClientError {
    fn from(err: FilterError) -> Self {
        ClientError::Validation(err.into())
    }
}

impl ClientError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::Request(err) => err.kind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_error_kinds() {
        let err = RequestError::Configuration {
            message: "API key is not configured".into(),
        };
        assert_eq!(err.kind(), "configuration_error");
        assert_eq!(err.status(), None);

        let err = RequestError::Api {
            status: 403,
            body: "{}".into(),
        };
        assert_eq!(err.kind(), "api_error");
        assert_eq!(err.status(), Some(403));

        let err = RequestError::UnexpectedStatus {
            status: 502,
            body: "bad gateway".into(),
        };
        assert_eq!(err.kind(), "unexpected_status");
        assert_eq!(err.status(), Some(502));

        assert_eq!(RequestError::Timeout { seconds: 5 }.kind(), "timeout");
    }

    #[test]
    fn request_error_display() {
        let err = RequestError::Timeout { seconds: 30 };
        assert_eq!(err.to_string(), "Request timeout after 30 seconds");

        let err = RequestError::UnexpectedStatus {
            status: 500,
            body: "boom".into(),
        };
        assert_eq!(err.to_string(), "Unexpected API response (500): boom");
    }

    #[test]
    fn validation_error_display() {
        let err = ValidationError::EmptyIdentifier {
            kind: IdentifierKind::Submission,
        };
        assert_eq!(
            err.to_string(),
            "Submission ID is required and cannot be empty"
        );

        let err = ValidationError::MissingOptions {
            field_type: FieldType::DropDown,
        };
        assert_eq!(err.to_string(), "Options are required for dropDown");
    }

    #[test]
    fn filter_error_is_transparent() {
        let err: ValidationError = FilterError::EmptyQueries.into();
        assert_eq!(err.to_string(), "Queries must be a non-empty list");
    }

    #[test]
    fn client_error_kinds() {
        let err: ClientError = FilterError::EmptyQueries.into();
        assert_eq!(err.kind(), "validation_error");

        let err: ClientError = RequestError::Connection {
            message: "refused".into(),
        }
        .into();
        assert_eq!(err.kind(), "connection_error");
        assert!(err.to_string().starts_with("Connection error"));
    }
}
