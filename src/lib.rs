//! Clappia API client
//!
//! Typed, validating client for the Clappia app-definition and submission
//! REST APIs.
//!
//! Every operation runs the same pipeline: validate the inputs, check the
//! client configuration, normalize the request into its wire payload, send a
//! single HTTP request, then shape a typed response. Nothing escapes an
//! operation as an error; failures come back as responses with
//! `success: false` and a message.
//!
//! # Example
//!
//! ```
//! use clappia_api::{AddFieldRequest, FieldProperties, FieldType};
//!
//! let properties = FieldProperties {
//!     label: Some(" Total ".into()),
//!     formula: Some("{price} * {qty}".into()),
//!     options: Some(vec!["ignored".into()]),
//!     ..Default::default()
//! };
//! let request = AddFieldRequest::new(
//!     "MFX093412",
//!     "ops@acme.io",
//!     0,
//!     3,
//!     FieldType::CalculationsAndLogic,
//!     properties,
//! )
//! .unwrap();
//!
//! let payload = request.to_payload("WP1");
//! assert_eq!(payload["label"], "Total");
//! assert_eq!(payload["formula"], "{price} * {qty}");
//! // `options` does not apply to calculation fields
//! assert!(payload.get("options").is_none());
//! ```
//!
//! # Field property applicability
//!
//! | Property | Sent for |
//! |----------|----------|
//! | `label`, `description`, `required`, widths, conditions, `validation` | any field type |
//! | `defaultValue` | `singleLineText` |
//! | `options` | `singleSelector`, `multiSelector`, `dropDown` |
//! | `style`, `numberOfCols` | `singleSelector`, `multiSelector` |
//! | file properties | `file` |
//! | `formula`, `hidden` | `calculationsAndLogic` |
//!
//! # Configuration
//!
//! [`ClientConfig::from_env`] reads `CLAPPIA_API_KEY`, `CLAPPIA_BASE_URL`,
//! `CLAPPIA_WORKPLACE_ID` and `CLAPPIA_TIMEOUT_SECS`. An incomplete
//! configuration fails every operation before any network access.

mod aggregation;
mod app_definition;
mod client;
mod config;
mod error;
mod field;
mod filter;
mod http;
mod normalize;
mod request;
mod response;
mod submissions;
mod types;
mod validator;

pub use aggregation::{AggregationDimension, AggregationMetric};
pub use app_definition::summarize_definition;
pub use client::ClappiaClient;
pub use config::{
    ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, ENV_API_KEY, ENV_BASE_URL,
    ENV_TIMEOUT_SECS, ENV_WORKPLACE_ID,
};
pub use error::{ClientError, FilterError, RequestError, ValidationError};
pub use field::{
    validate_app_structure, AllowedFileType, AppField, AppSection, FieldType, FieldValidation,
    ImageQuality, SelectorStyle, CREATE_APP_FIELD_TYPES, SELECTOR_FIELD_TYPES,
};
pub use filter::{
    validate_condition, validate_filters, Condition, Query, QueryGroup, SubmissionFilters,
};
pub use http::{
    classify_response, ApiClient, HttpRequest, HttpResponse, ReqwestTransport, Transport,
    TransportFailure,
};
pub use normalize::{
    apply_field_properties, Applicability, FieldProperties, FieldProperty, PROPERTY_APPLICABILITY,
};
pub use request::{
    AddFieldRequest, AggregationQuery, CreateAppRequest, CreateSubmissionRequest,
    DefinitionOptions, EditSubmissionRequest, ExportOptions, ExportSubmissionsRequest,
    GetAppDefinitionRequest, GetSubmissionsAggregationRequest, GetSubmissionsRequest,
    SubmissionQuery, UpdateFieldRequest, UpdateSubmissionOwnersRequest,
    UpdateSubmissionStatusRequest, DEFAULT_AGGREGATION_PAGE_SIZE, DEFAULT_PAGE_SIZE,
    MAX_PAGE_SIZE,
};
pub use response::{
    AppCreationResponse, AppDefinitionResponse, FieldOperationResponse, Operation,
    OperationResponse, Outcome, SubmissionResponse, SubmissionsAggregationResponse,
    SubmissionsExportResponse, SubmissionsMetadata, SubmissionsResponse,
};
pub use submissions::returned_count;
pub use types::{
    is_standard_field, AggregationType, DimensionType, ExportFormat, FilterKeyType,
    FilterOperator, LogicalOperator, SortDirection, STANDARD_FIELDS,
};
pub use validator::{
    validate_app_id, validate_app_name, validate_email, validate_email_list,
    validate_identifier, validate_submission_id, EmailAddress, EmailListCheck, Identifier,
    IdentifierKind, MIN_APP_NAME_LEN,
};
