//! Typed operation responses.
//!
//! Every response carries an [`Outcome`] (`success`, `message`, optional
//! `data`) flattened next to its operation-specific fields. Failures always
//! have a non-empty message, an error tag and no data.

use serde::Serialize;
use serde_json::Value;

use crate::error::ClientError;
use crate::field::FieldType;
use crate::types::{wire_enum, ExportFormat};

/// Shared head of every response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Outcome {
    pub fn ok(message: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            success: true,
            message: message.into(),
            error_kind: None,
            data,
        }
    }

    pub fn failed(err: &ClientError) -> Self {
        Self {
            success: false,
            message: err.to_string(),
            error_kind: Some(err.kind()),
            data: None,
        }
    }
}

/// Access to the [`Outcome`] of any response.
pub trait OperationResponse: Serialize {
    fn outcome(&self) -> &Outcome;

    fn is_success(&self) -> bool {
        self.outcome().success
    }

    fn message(&self) -> &str {
        &self.outcome().message
    }

    fn data(&self) -> Option<&Value> {
        self.outcome().data.as_ref()
    }
}

macro_rules! impl_operation_response {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl OperationResponse for $ty {
                fn outcome(&self) -> &Outcome {
                    &self.outcome
                }
            }
        )+
    };
}

wire_enum! {
    /// Tag naming the mutation a response reports on.
    pub enum Operation ("operation") {
        AddField => "add_field",
        UpdateField => "update_field",
        CreateSubmission => "create_submission",
        EditSubmission => "edit_submission",
        UpdateStatus => "update_status",
        UpdateOwners => "update_owners",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppDefinitionResponse {
    #[serde(flatten)]
    pub outcome: Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppCreationResponse {
    #[serde(flatten)]
    pub outcome: Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sections_created: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldOperationResponse {
    #[serde(flatten)]
    pub outcome: Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_name: Option<String>,
    pub operation: Operation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_type: Option<FieldType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_properties: Option<Vec<String>>,
}

impl FieldOperationResponse {
    pub(crate) fn failed(err: &ClientError, app_id: &str, operation: Operation) -> Self {
        Self {
            outcome: Outcome::failed(err),
            app_id: Some(app_id.trim().to_string()),
            field_name: None,
            operation,
            field_type: None,
            section_index: None,
            field_index: None,
            updated_properties: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionResponse {
    #[serde(flatten)]
    pub outcome: Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission_id: Option<String>,
    pub operation: Operation,
}

/// Listing summary: page size asked for, rows returned, whether filtered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionsMetadata {
    pub requested_page_size: u32,
    pub returned_count: usize,
    pub has_filters: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionsResponse {
    #[serde(flatten)]
    pub outcome: Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<SubmissionsMetadata>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionsAggregationResponse {
    #[serde(flatten)]
    pub outcome: Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionsExportResponse {
    #[serde(flatten)]
    pub outcome: Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<ExportFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requesting_user_email_address: Option<String>,
}

impl_operation_response!(
    AppDefinitionResponse,
    AppCreationResponse,
    FieldOperationResponse,
    SubmissionResponse,
    SubmissionsResponse,
    SubmissionsAggregationResponse,
    SubmissionsExportResponse,
);
