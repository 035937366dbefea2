//! Per-operation request types.
//!
//! Every request is validated as a unit by its constructor; a value of any
//! of these types is known-good input for the payload builders in
//! [`crate::normalize`].

use serde_json::Value;

use crate::aggregation::{AggregationDimension, AggregationMetric};
use crate::error::ValidationError;
use crate::field::{validate_app_structure, AppSection, FieldType};
use crate::filter::SubmissionFilters;
use crate::normalize::FieldProperties;
use crate::types::{json_type_name, ExportFormat};
use crate::validator::{
    require_text, validate_app_id, validate_app_name, validate_email_list,
    validate_submission_id, EmailAddress, Identifier,
};

/// Largest page the submission endpoints accept.
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Default page size for plain submission listings.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Default page size for aggregations.
pub const DEFAULT_AGGREGATION_PAGE_SIZE: u32 = 1000;

/// Rendering options for app definitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionOptions {
    pub language: String,
    pub strip_html: bool,
    pub include_tags: bool,
}

impl Default for DefinitionOptions {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            strip_html: true,
            include_tags: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GetAppDefinitionRequest {
    pub(crate) app_id: Identifier,
    pub(crate) language: String,
    pub(crate) strip_html: bool,
    pub(crate) include_tags: bool,
}

impl GetAppDefinitionRequest {
    pub fn new(app_id: &str, options: DefinitionOptions) -> Result<Self, ValidationError> {
        Ok(Self {
            app_id: validate_app_id(app_id)?,
            language: require_text("Language", &options.language)?,
            strip_html: options.strip_html,
            include_tags: options.include_tags,
        })
    }

    pub fn app_id(&self) -> &Identifier {
        &self.app_id
    }
}

#[derive(Debug, Clone)]
pub struct CreateAppRequest {
    pub(crate) app_name: String,
    pub(crate) requester: EmailAddress,
    pub(crate) sections: Vec<AppSection>,
}

impl CreateAppRequest {
    pub fn new(
        app_name: &str,
        requester: &str,
        sections: Vec<AppSection>,
    ) -> Result<Self, ValidationError> {
        let app_name = validate_app_name(app_name)?;
        let requester = EmailAddress::parse(requester)?;
        validate_app_structure(&sections)?;
        Ok(Self {
            app_name,
            requester,
            sections,
        })
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn sections(&self) -> &[AppSection] {
        &self.sections
    }
}

#[derive(Debug, Clone)]
pub struct AddFieldRequest {
    pub(crate) app_id: Identifier,
    pub(crate) requester: EmailAddress,
    pub(crate) section_index: usize,
    pub(crate) field_index: usize,
    pub(crate) field_type: FieldType,
    pub(crate) properties: FieldProperties,
}

impl AddFieldRequest {
    pub fn new(
        app_id: &str,
        requester: &str,
        section_index: usize,
        field_index: usize,
        field_type: FieldType,
        properties: FieldProperties,
    ) -> Result<Self, ValidationError> {
        let app_id = validate_app_id(app_id)?;
        let requester = EmailAddress::parse(requester)?;
        properties.validate()?;
        Ok(Self {
            app_id,
            requester,
            section_index,
            field_index,
            field_type,
            properties,
        })
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }
}

#[derive(Debug, Clone)]
pub struct UpdateFieldRequest {
    pub(crate) app_id: Identifier,
    pub(crate) requester: EmailAddress,
    pub(crate) field_name: String,
    pub(crate) properties: FieldProperties,
}

impl UpdateFieldRequest {
    pub fn new(
        app_id: &str,
        requester: &str,
        field_name: &str,
        properties: FieldProperties,
    ) -> Result<Self, ValidationError> {
        let app_id = validate_app_id(app_id)?;
        let requester = EmailAddress::parse(requester)?;
        let field_name = require_text("field_name", field_name)?;
        properties.validate()?;
        Ok(Self {
            app_id,
            requester,
            field_name,
            properties,
        })
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }
}

/// Submission data must be a non-empty JSON object keyed by field name.
fn validate_submission_data(data: Value) -> Result<Value, ValidationError> {
    match &data {
        Value::Object(map) if map.is_empty() => Err(ValidationError::EmptyValue {
            what: "Submission data",
        }),
        Value::Object(_) => Ok(data),
        other => Err(ValidationError::DataNotObject {
            actual: json_type_name(other),
        }),
    }
}

#[derive(Debug, Clone)]
pub struct CreateSubmissionRequest {
    pub(crate) app_id: Identifier,
    pub(crate) requester: EmailAddress,
    pub(crate) data: Value,
}

impl CreateSubmissionRequest {
    pub fn new(app_id: &str, requester: &str, data: Value) -> Result<Self, ValidationError> {
        Ok(Self {
            app_id: validate_app_id(app_id)?,
            requester: EmailAddress::parse(requester)?,
            data: validate_submission_data(data)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct EditSubmissionRequest {
    pub(crate) app_id: Identifier,
    pub(crate) submission_id: Identifier,
    pub(crate) requester: EmailAddress,
    pub(crate) data: Value,
}

impl EditSubmissionRequest {
    pub fn new(
        app_id: &str,
        submission_id: &str,
        requester: &str,
        data: Value,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            app_id: validate_app_id(app_id)?,
            submission_id: validate_submission_id(submission_id)?,
            requester: EmailAddress::parse(requester)?,
            data: validate_submission_data(data)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct UpdateSubmissionStatusRequest {
    pub(crate) app_id: Identifier,
    pub(crate) submission_id: Identifier,
    pub(crate) requester: EmailAddress,
    pub(crate) status_name: String,
    pub(crate) comments: Option<String>,
}

impl UpdateSubmissionStatusRequest {
    pub fn new(
        app_id: &str,
        submission_id: &str,
        requester: &str,
        status_name: &str,
        comments: Option<&str>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            app_id: validate_app_id(app_id)?,
            submission_id: validate_submission_id(submission_id)?,
            requester: EmailAddress::parse(requester)?,
            status_name: require_text("Status name", status_name)?,
            comments: comments
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
        })
    }

    pub fn status_name(&self) -> &str {
        &self.status_name
    }
}

#[derive(Debug, Clone)]
pub struct UpdateSubmissionOwnersRequest {
    pub(crate) app_id: Identifier,
    pub(crate) submission_id: Identifier,
    pub(crate) requester: EmailAddress,
    pub(crate) owners: Vec<EmailAddress>,
    pub(crate) skipped: Vec<String>,
}

impl UpdateSubmissionOwnersRequest {
    /// Invalid owner addresses are dropped and remembered in
    /// [`skipped`](Self::skipped); only an all-invalid list is an error.
    pub fn new<S: AsRef<str>>(
        app_id: &str,
        submission_id: &str,
        requester: &str,
        email_ids: &[S],
    ) -> Result<Self, ValidationError> {
        let app_id = validate_app_id(app_id)?;
        let submission_id = validate_submission_id(submission_id)?;
        let requester = EmailAddress::parse(requester)?;
        let check = validate_email_list(email_ids)?;
        let skipped = check.invalid.clone();
        let owners = check.into_valid()?;
        Ok(Self {
            app_id,
            submission_id,
            requester,
            owners,
            skipped,
        })
    }

    pub fn owners(&self) -> &[EmailAddress] {
        &self.owners
    }

    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }
}

fn validate_page_size(page_size: u32) -> Result<u32, ValidationError> {
    if (1..=MAX_PAGE_SIZE).contains(&page_size) {
        Ok(page_size)
    } else {
        Err(ValidationError::OutOfRange {
            what: "Page size",
            value: i64::from(page_size),
            expected: format!("between 1 and {MAX_PAGE_SIZE}"),
        })
    }
}

/// Paging and filtering for submission listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionQuery {
    pub page_size: u32,
    pub forward: bool,
    pub filters: Option<SubmissionFilters>,
}

impl Default for SubmissionQuery {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            forward: true,
            filters: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GetSubmissionsRequest {
    pub(crate) app_id: Identifier,
    pub(crate) requester: EmailAddress,
    pub(crate) query: SubmissionQuery,
}

impl GetSubmissionsRequest {
    pub fn new(
        app_id: &str,
        requester: &str,
        query: SubmissionQuery,
    ) -> Result<Self, ValidationError> {
        let app_id = validate_app_id(app_id)?;
        let requester = EmailAddress::parse(requester)?;
        validate_page_size(query.page_size)?;
        if let Some(filters) = &query.filters {
            filters.validate()?;
        }
        Ok(Self {
            app_id,
            requester,
            query,
        })
    }

    pub fn query(&self) -> &SubmissionQuery {
        &self.query
    }
}

/// Grouping, metrics, paging and filtering for aggregations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationQuery {
    pub dimensions: Vec<AggregationDimension>,
    pub metrics: Vec<AggregationMetric>,
    pub x_axis_labels: Vec<String>,
    pub forward: bool,
    pub page_size: u32,
    pub filters: Option<SubmissionFilters>,
}

impl Default for AggregationQuery {
    fn default() -> Self {
        Self {
            dimensions: Vec::new(),
            metrics: Vec::new(),
            x_axis_labels: Vec::new(),
            forward: true,
            page_size: DEFAULT_AGGREGATION_PAGE_SIZE,
            filters: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GetSubmissionsAggregationRequest {
    pub(crate) app_id: Identifier,
    pub(crate) requester: EmailAddress,
    pub(crate) query: AggregationQuery,
}

impl GetSubmissionsAggregationRequest {
    pub fn new(
        app_id: &str,
        requester: &str,
        query: AggregationQuery,
    ) -> Result<Self, ValidationError> {
        let app_id = validate_app_id(app_id)?;
        let requester = EmailAddress::parse(requester)?;
        validate_page_size(query.page_size)?;
        for dimension in &query.dimensions {
            dimension.validate()?;
        }
        for metric in &query.metrics {
            metric.validate()?;
        }
        if let Some(filters) = &query.filters {
            filters.validate()?;
        }
        Ok(Self {
            app_id,
            requester,
            query,
        })
    }
}

/// Format, columns and filtering for submission exports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportOptions {
    pub format: ExportFormat,
    pub field_names: Option<Vec<String>>,
    pub filters: Option<SubmissionFilters>,
}

#[derive(Debug, Clone)]
pub struct ExportSubmissionsRequest {
    pub(crate) app_id: Identifier,
    pub(crate) requester: EmailAddress,
    pub(crate) format: ExportFormat,
    pub(crate) field_names: Option<Vec<String>>,
    pub(crate) filters: Option<SubmissionFilters>,
}

impl ExportSubmissionsRequest {
    pub fn new(
        app_id: &str,
        requester: &str,
        options: ExportOptions,
    ) -> Result<Self, ValidationError> {
        let app_id = validate_app_id(app_id)?;
        let requester = EmailAddress::parse(requester)?;
        let field_names = options
            .field_names
            .map(|names| {
                names
                    .iter()
                    .map(|name| require_text("Export field name", name))
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?;
        if let Some(filters) = &options.filters {
            filters.validate()?;
        }
        Ok(Self {
            app_id,
            requester,
            format: options.format,
            field_names,
            filters: options.filters,
        })
    }

    pub fn format(&self) -> ExportFormat {
        self.format
    }

    pub fn requester(&self) -> &EmailAddress {
        &self.requester
    }
}
