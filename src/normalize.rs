//! Request normalization: validated requests to wire payloads.
//!
//! Optional field properties only reach the wire when they were supplied
//! *and* apply to the field's type. Which types a property applies to is
//! data, kept in [`PROPERTY_APPLICABILITY`]:
//!
//! | Property | Applies to |
//! |----------|------------|
//! | `label`, `description`, `required`, block widths, `displayCondition`, `retainValues`, `isEditable`, `editabilityCondition`, `validation` | every type |
//! | `defaultValue` | `singleLineText` |
//! | `options` | `singleSelector`, `multiSelector`, `dropDown` |
//! | `style`, `numberOfCols` | `singleSelector`, `multiSelector` |
//! | `allowedFileTypes`, `maxFileAllowed`, `imageQuality`, `imageText`, `fileNamePrefix` | `file` |
//! | `formula`, `hidden` | `calculationsAndLogic` |
//!
//! Unsupplied or inapplicable properties are left out entirely; string
//! values are trimmed.

use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::error::ValidationError;
use crate::field::{
    AllowedFileType, FieldType, FieldValidation, ImageQuality, SelectorStyle,
    SELECTOR_FIELD_TYPES,
};
use crate::request::{
    AddFieldRequest, CreateAppRequest, CreateSubmissionRequest, EditSubmissionRequest,
    ExportSubmissionsRequest, GetAppDefinitionRequest, GetSubmissionsAggregationRequest,
    GetSubmissionsRequest, UpdateFieldRequest, UpdateSubmissionOwnersRequest,
    UpdateSubmissionStatusRequest,
};
use crate::types::wire_enum;
use crate::validator::{EmailAddress, Identifier};

wire_enum! {
    /// Optional properties of a field, named by their wire key.
    pub enum FieldProperty ("field property") {
        Label => "label",
        Description => "description",
        Required => "required",
        BlockWidthPercentageDesktop => "blockWidthPercentageDesktop",
        BlockWidthPercentageMobile => "blockWidthPercentageMobile",
        DisplayCondition => "displayCondition",
        RetainValues => "retainValues",
        IsEditable => "isEditable",
        EditabilityCondition => "editabilityCondition",
        Validation => "validation",
        DefaultValue => "defaultValue",
        Options => "options",
        Style => "style",
        NumberOfCols => "numberOfCols",
        AllowedFileTypes => "allowedFileTypes",
        MaxFileAllowed => "maxFileAllowed",
        ImageQuality => "imageQuality",
        ImageText => "imageText",
        FileNamePrefix => "fileNamePrefix",
        Formula => "formula",
        Hidden => "hidden",
    }
}

/// Field types a property may be sent for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applicability {
    AnyField,
    Only(&'static [FieldType]),
}

impl Applicability {
    pub fn admits(&self, field_type: FieldType) -> bool {
        match self {
            Applicability::AnyField => true,
            Applicability::Only(types) => types.contains(&field_type),
        }
    }
}

const CHOICE_FIELD_TYPES: &[FieldType] = &[FieldType::SingleSelector, FieldType::MultiSelector];
const FILE_FIELD_TYPES: &[FieldType] = &[FieldType::File];
const TEXT_FIELD_TYPES: &[FieldType] = &[FieldType::SingleLineText];
const CALCULATION_FIELD_TYPES: &[FieldType] = &[FieldType::CalculationsAndLogic];

/// Property → applicable field types. Every [`FieldProperty`] has one entry.
pub const PROPERTY_APPLICABILITY: &[(FieldProperty, Applicability)] = &[
    (FieldProperty::Label, Applicability::AnyField),
    (FieldProperty::Description, Applicability::AnyField),
    (FieldProperty::Required, Applicability::AnyField),
    (FieldProperty::BlockWidthPercentageDesktop, Applicability::AnyField),
    (FieldProperty::BlockWidthPercentageMobile, Applicability::AnyField),
    (FieldProperty::DisplayCondition, Applicability::AnyField),
    (FieldProperty::RetainValues, Applicability::AnyField),
    (FieldProperty::IsEditable, Applicability::AnyField),
    (FieldProperty::EditabilityCondition, Applicability::AnyField),
    (FieldProperty::Validation, Applicability::AnyField),
    (FieldProperty::DefaultValue, Applicability::Only(TEXT_FIELD_TYPES)),
    (FieldProperty::Options, Applicability::Only(SELECTOR_FIELD_TYPES)),
    (FieldProperty::Style, Applicability::Only(CHOICE_FIELD_TYPES)),
    (FieldProperty::NumberOfCols, Applicability::Only(CHOICE_FIELD_TYPES)),
    (FieldProperty::AllowedFileTypes, Applicability::Only(FILE_FIELD_TYPES)),
    (FieldProperty::MaxFileAllowed, Applicability::Only(FILE_FIELD_TYPES)),
    (FieldProperty::ImageQuality, Applicability::Only(FILE_FIELD_TYPES)),
    (FieldProperty::ImageText, Applicability::Only(FILE_FIELD_TYPES)),
    (FieldProperty::FileNamePrefix, Applicability::Only(FILE_FIELD_TYPES)),
    (FieldProperty::Formula, Applicability::Only(CALCULATION_FIELD_TYPES)),
    (FieldProperty::Hidden, Applicability::Only(CALCULATION_FIELD_TYPES)),
];

impl FieldProperty {
    pub fn applicability(&self) -> Applicability {
        PROPERTY_APPLICABILITY
            .iter()
            .find(|(property, _)| property == self)
            .map_or(Applicability::AnyField, |(_, applicability)| *applicability)
    }

    pub fn applies_to(&self, field_type: FieldType) -> bool {
        self.applicability().admits(field_type)
    }
}

const DESKTOP_WIDTHS: &[u32] = &[25, 50, 75, 100];
const MOBILE_WIDTHS: &[u32] = &[50, 100];
const MAX_FILES: u32 = 10;

/// Optional properties supplied when adding or updating a field.
///
/// Deserializes from the camelCase wire keys; unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct FieldProperties {
    pub label: Option<String>,
    pub description: Option<String>,
    pub required: Option<bool>,
    pub block_width_percentage_desktop: Option<u32>,
    pub block_width_percentage_mobile: Option<u32>,
    pub display_condition: Option<String>,
    pub retain_values: Option<bool>,
    pub is_editable: Option<bool>,
    pub editability_condition: Option<String>,
    pub validation: Option<FieldValidation>,
    pub default_value: Option<String>,
    pub options: Option<Vec<String>>,
    pub style: Option<SelectorStyle>,
    pub number_of_cols: Option<u32>,
    pub allowed_file_types: Option<Vec<AllowedFileType>>,
    pub max_file_allowed: Option<u32>,
    pub image_quality: Option<ImageQuality>,
    pub image_text: Option<String>,
    pub file_name_prefix: Option<String>,
    pub formula: Option<String>,
    pub hidden: Option<bool>,
}

fn one_of(what: &'static str, value: Option<u32>, allowed: &[u32]) -> Result<(), ValidationError> {
    match value {
        Some(v) if !allowed.contains(&v) => Err(ValidationError::OutOfRange {
            what,
            value: i64::from(v),
            expected: format!(
                "one of {}",
                allowed
                    .iter()
                    .map(u32::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }),
        _ => Ok(()),
    }
}

impl FieldProperties {
    /// Check numeric constraints the enums cannot express.
    pub fn validate(&self) -> Result<(), ValidationError> {
        one_of(
            "blockWidthPercentageDesktop",
            self.block_width_percentage_desktop,
            DESKTOP_WIDTHS,
        )?;
        one_of(
            "blockWidthPercentageMobile",
            self.block_width_percentage_mobile,
            MOBILE_WIDTHS,
        )?;
        if let Some(max) = self.max_file_allowed {
            if !(1..=MAX_FILES).contains(&max) {
                return Err(ValidationError::OutOfRange {
                    what: "maxFileAllowed",
                    value: i64::from(max),
                    expected: format!("between 1 and {MAX_FILES}"),
                });
            }
        }
        if self.number_of_cols == Some(0) {
            return Err(ValidationError::OutOfRange {
                what: "numberOfCols",
                value: 0,
                expected: "at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Supplied properties as wire values, in table order.
    pub fn supplied(&self) -> Vec<(FieldProperty, Value)> {
        fn text(
            out: &mut Vec<(FieldProperty, Value)>,
            property: FieldProperty,
            value: &Option<String>,
        ) {
            if let Some(v) = value {
                out.push((property, json!(v.trim())));
            }
        }
        fn plain<T: serde::Serialize>(
            out: &mut Vec<(FieldProperty, Value)>,
            property: FieldProperty,
            value: &Option<T>,
        ) {
            if let Some(v) = value {
                out.push((property, json!(v)));
            }
        }

        let mut out = Vec::new();
        text(&mut out, FieldProperty::Label, &self.label);
        text(&mut out, FieldProperty::Description, &self.description);
        plain(&mut out, FieldProperty::Required, &self.required);
        plain(
            &mut out,
            FieldProperty::BlockWidthPercentageDesktop,
            &self.block_width_percentage_desktop,
        );
        plain(
            &mut out,
            FieldProperty::BlockWidthPercentageMobile,
            &self.block_width_percentage_mobile,
        );
        text(&mut out, FieldProperty::DisplayCondition, &self.display_condition);
        plain(&mut out, FieldProperty::RetainValues, &self.retain_values);
        plain(&mut out, FieldProperty::IsEditable, &self.is_editable);
        text(
            &mut out,
            FieldProperty::EditabilityCondition,
            &self.editability_condition,
        );
        plain(&mut out, FieldProperty::Validation, &self.validation);
        text(&mut out, FieldProperty::DefaultValue, &self.default_value);
        plain(&mut out, FieldProperty::Options, &self.options);
        plain(&mut out, FieldProperty::Style, &self.style);
        plain(&mut out, FieldProperty::NumberOfCols, &self.number_of_cols);
        plain(&mut out, FieldProperty::AllowedFileTypes, &self.allowed_file_types);
        plain(&mut out, FieldProperty::MaxFileAllowed, &self.max_file_allowed);
        plain(&mut out, FieldProperty::ImageQuality, &self.image_quality);
        text(&mut out, FieldProperty::ImageText, &self.image_text);
        text(&mut out, FieldProperty::FileNamePrefix, &self.file_name_prefix);
        text(&mut out, FieldProperty::Formula, &self.formula);
        plain(&mut out, FieldProperty::Hidden, &self.hidden);
        out
    }
}

/// Insert supplied properties into `payload`.
///
/// With `Some(field_type)` only applicable properties are kept; with `None`
/// (field type unknown, as for updates) every supplied property is kept.
/// Returns the wire keys that were inserted.
pub fn apply_field_properties(
    payload: &mut Map<String, Value>,
    properties: &FieldProperties,
    field_type: Option<FieldType>,
) -> Vec<&'static str> {
    let mut applied = Vec::new();
    for (property, value) in properties.supplied() {
        if field_type.map_or(true, |ft| property.applies_to(ft)) {
            payload.insert(property.as_str().to_string(), value);
            applied.push(property.as_str());
        }
    }
    applied
}

fn base_payload(
    workplace_id: &str,
    app_id: &Identifier,
    requester: &EmailAddress,
) -> Map<String, Value> {
    let mut payload = Map::new();
    payload.insert("workplaceId".into(), json!(workplace_id));
    payload.insert("appId".into(), json!(app_id.as_str()));
    payload.insert(
        "requestingUserEmailAddress".into(),
        json!(requester.as_str()),
    );
    payload
}

impl GetAppDefinitionRequest {
    /// Query parameters for the definition read.
    pub fn to_query(&self, workplace_id: &str) -> Vec<(String, String)> {
        vec![
            ("appId".into(), self.app_id.to_string()),
            ("workplaceId".into(), workplace_id.to_string()),
            ("language".into(), self.language.clone()),
            ("stripHtml".into(), self.strip_html.to_string()),
            ("includeTags".into(), self.include_tags.to_string()),
        ]
    }
}

impl CreateAppRequest {
    pub fn to_payload(&self, workplace_id: &str) -> Value {
        json!({
            "workplaceId": workplace_id,
            "appName": self.app_name,
            "requestingUserEmailAddress": self.requester.as_str(),
            "sections": self.sections.iter().map(|s| s.to_wire()).collect::<Vec<_>>(),
        })
    }
}

impl AddFieldRequest {
    pub fn to_payload(&self, workplace_id: &str) -> Value {
        let mut payload = base_payload(workplace_id, &self.app_id, &self.requester);
        payload.insert("sectionIndex".into(), json!(self.section_index));
        payload.insert("fieldIndex".into(), json!(self.field_index));
        payload.insert("fieldType".into(), json!(self.field_type.as_str()));
        apply_field_properties(&mut payload, &self.properties, Some(self.field_type));
        Value::Object(payload)
    }
}

impl UpdateFieldRequest {
    pub fn to_payload(&self, workplace_id: &str) -> Value {
        let mut payload = base_payload(workplace_id, &self.app_id, &self.requester);
        payload.insert("fieldName".into(), json!(self.field_name));
        apply_field_properties(&mut payload, &self.properties, None);
        Value::Object(payload)
    }

    /// Wire keys of the properties this update carries.
    pub fn updated_properties(&self) -> Vec<&'static str> {
        self.properties
            .supplied()
            .into_iter()
            .map(|(property, _)| property.as_str())
            .collect()
    }
}

impl CreateSubmissionRequest {
    pub fn to_payload(&self, workplace_id: &str) -> Value {
        let mut payload = base_payload(workplace_id, &self.app_id, &self.requester);
        payload.insert("data".into(), self.data.clone());
        Value::Object(payload)
    }
}

impl EditSubmissionRequest {
    pub fn to_payload(&self, workplace_id: &str) -> Value {
        let mut payload = base_payload(workplace_id, &self.app_id, &self.requester);
        payload.insert("submissionId".into(), json!(self.submission_id.as_str()));
        payload.insert("data".into(), self.data.clone());
        Value::Object(payload)
    }
}

impl UpdateSubmissionStatusRequest {
    pub fn to_payload(&self, workplace_id: &str) -> Value {
        let mut payload = base_payload(workplace_id, &self.app_id, &self.requester);
        payload.insert("submissionId".into(), json!(self.submission_id.as_str()));
        let mut status = Map::new();
        status.insert("name".into(), json!(self.status_name));
        if let Some(comments) = &self.comments {
            status.insert("comments".into(), json!(comments));
        }
        payload.insert("status".into(), Value::Object(status));
        Value::Object(payload)
    }
}

impl UpdateSubmissionOwnersRequest {
    pub fn to_payload(&self, workplace_id: &str) -> Value {
        let mut payload = base_payload(workplace_id, &self.app_id, &self.requester);
        payload.insert("submissionId".into(), json!(self.submission_id.as_str()));
        payload.insert(
            "emailIds".into(),
            json!(self.owners.iter().map(EmailAddress::as_str).collect::<Vec<_>>()),
        );
        Value::Object(payload)
    }
}

impl GetSubmissionsRequest {
    pub fn to_payload(&self, workplace_id: &str) -> Value {
        let mut payload = base_payload(workplace_id, &self.app_id, &self.requester);
        payload.insert("pageSize".into(), json!(self.query.page_size));
        payload.insert("forward".into(), json!(self.query.forward));
        if let Some(filters) = &self.query.filters {
            payload.insert("filters".into(), filters.to_wire());
        }
        Value::Object(payload)
    }
}

impl GetSubmissionsAggregationRequest {
    pub fn to_payload(&self, workplace_id: &str) -> Value {
        let query = &self.query;
        let mut payload = base_payload(workplace_id, &self.app_id, &self.requester);
        if !query.dimensions.is_empty() {
            payload.insert(
                "dimensions".into(),
                json!(query.dimensions.iter().map(|d| d.to_wire()).collect::<Vec<_>>()),
            );
        }
        if !query.metrics.is_empty() {
            payload.insert(
                "aggregationDimensions".into(),
                json!(query.metrics.iter().map(|m| m.to_wire()).collect::<Vec<_>>()),
            );
        }
        if !query.x_axis_labels.is_empty() {
            payload.insert(
                "xAxisLabels".into(),
                json!(query
                    .x_axis_labels
                    .iter()
                    .map(|l| l.trim())
                    .collect::<Vec<_>>()),
            );
        }
        payload.insert("forward".into(), json!(query.forward));
        payload.insert("pageSize".into(), json!(query.page_size));
        if let Some(filters) = &query.filters {
            payload.insert("filters".into(), filters.to_wire());
        }
        Value::Object(payload)
    }
}

impl ExportSubmissionsRequest {
    pub fn to_payload(&self, workplace_id: &str) -> Value {
        let mut payload = base_payload(workplace_id, &self.app_id, &self.requester);
        payload.insert("format".into(), json!(self.format.as_str()));
        if let Some(names) = &self.field_names {
            payload.insert("fieldNames".into(), json!(names));
        }
        if let Some(filters) = &self.filters {
            payload.insert("filters".into(), filters.to_wire());
        }
        Value::Object(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::{AggregationDimension, AggregationMetric};
    use crate::field::{AppField, AppSection};
    use crate::filter::SubmissionFilters;
    use crate::request::{AggregationQuery, DefinitionOptions, ExportOptions, SubmissionQuery};
    use crate::types::{DimensionType, ExportFormat};

    const WP: &str = "WP123";

    fn add_field(field_type: FieldType, properties: FieldProperties) -> Value {
        AddFieldRequest::new("APP1", "a@b.com", 1, 2, field_type, properties)
            .unwrap()
            .to_payload(WP)
    }

    /// Every property supplied at once.
    fn everything() -> FieldProperties {
        FieldProperties {
            label: Some(" Label ".into()),
            description: Some(" Desc ".into()),
            required: Some(true),
            block_width_percentage_desktop: Some(50),
            block_width_percentage_mobile: Some(100),
            display_condition: Some(" {a} == 1 ".into()),
            retain_values: Some(false),
            is_editable: Some(true),
            editability_condition: Some(" {b} ".into()),
            validation: Some(FieldValidation::Email),
            default_value: Some(" hello ".into()),
            options: Some(vec!["A".into(), "B".into()]),
            style: Some(SelectorStyle::Chips),
            number_of_cols: Some(2),
            allowed_file_types: Some(vec![AllowedFileType::Documents]),
            max_file_allowed: Some(3),
            image_quality: Some(ImageQuality::High),
            image_text: Some(" stamp ".into()),
            file_name_prefix: Some(" doc_ ".into()),
            formula: Some(" x+1 ".into()),
            hidden: Some(true),
        }
    }

    fn keys(payload: &Value) -> Vec<String> {
        let mut keys: Vec<String> = payload.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }

    fn expected_keys(extra: &[&str]) -> Vec<String> {
        let mut keys: Vec<String> = [
            "workplaceId",
            "appId",
            "requestingUserEmailAddress",
            "sectionIndex",
            "fieldIndex",
            "fieldType",
            "label",
            "description",
            "required",
            "blockWidthPercentageDesktop",
            "blockWidthPercentageMobile",
            "displayCondition",
            "retainValues",
            "isEditable",
            "editabilityCondition",
            "validation",
        ]
        .iter()
        .chain(extra)
        .map(|k| k.to_string())
        .collect();
        keys.sort();
        keys
    }

    #[test]
    fn properties_deserialize_from_wire_keys() {
        let props: FieldProperties = serde_json::from_value(json!({
            "label": "Qty",
            "blockWidthPercentageDesktop": 50,
            "allowedFileTypes": ["videos"]
        }))
        .unwrap();
        assert_eq!(props.block_width_percentage_desktop, Some(50));
        assert_eq!(props.allowed_file_types, Some(vec![AllowedFileType::Videos]));

        assert!(serde_json::from_value::<FieldProperties>(json!({ "colour": "red" })).is_err());
        let bad_quality = json!({ "imageQuality": "ultra" });
        assert!(serde_json::from_value::<FieldProperties>(bad_quality).is_err());
    }

    #[test]
    fn numeric_constraints() {
        let bad = FieldProperties {
            block_width_percentage_desktop: Some(40),
            ..Default::default()
        };
        assert!(matches!(
            bad.validate(),
            Err(ValidationError::OutOfRange { what: "blockWidthPercentageDesktop", value: 40, .. })
        ));
        let bad = FieldProperties {
            block_width_percentage_mobile: Some(75),
            ..Default::default()
        };
        assert!(bad.validate().is_err());
        let bad = FieldProperties {
            number_of_cols: Some(0),
            ..Default::default()
        };
        assert!(bad.validate().is_err());
        assert!(everything().validate().is_ok());
    }

    #[test]
    fn table_covers_every_property() {
        assert_eq!(PROPERTY_APPLICABILITY.len(), FieldProperty::ALL.len());
        for property in FieldProperty::ALL {
            assert!(
                PROPERTY_APPLICABILITY.iter().any(|(p, _)| p == property),
                "{property} missing from table"
            );
        }
    }

    #[test]
    fn formula_omitted_for_file_field() {
        let props = FieldProperties {
            formula: Some("x+1".into()),
            ..Default::default()
        };
        let payload = add_field(FieldType::File, props);
        assert!(payload.get("formula").is_none());
    }

    #[test]
    fn formula_included_and_trimmed_for_calculation_field() {
        let props = FieldProperties {
            formula: Some("  x+1 ".into()),
            ..Default::default()
        };
        let payload = add_field(FieldType::CalculationsAndLogic, props);
        assert_eq!(payload["formula"], "x+1");
    }

    #[test]
    fn payload_shape_for_single_line_text() {
        let payload = add_field(FieldType::SingleLineText, everything());
        assert_eq!(keys(&payload), expected_keys(&["defaultValue"]));
        assert_eq!(payload["defaultValue"], "hello");
        assert_eq!(payload["label"], "Label");
        assert_eq!(payload["displayCondition"], "{a} == 1");
        assert_eq!(payload["validation"], "email");
        assert_eq!(payload["sectionIndex"], 1);
        assert_eq!(payload["fieldIndex"], 2);
        assert_eq!(payload["fieldType"], "singleLineText");
    }

    #[test]
    fn payload_shape_for_selectors() {
        let payload = add_field(FieldType::SingleSelector, everything());
        assert_eq!(keys(&payload), expected_keys(&["options", "style", "numberOfCols"]));
        assert_eq!(payload["options"], json!(["A", "B"]));
        assert_eq!(payload["style"], "Chips");

        let payload = add_field(FieldType::DropDown, everything());
        assert_eq!(keys(&payload), expected_keys(&["options"]));
    }

    #[test]
    fn payload_shape_for_file() {
        let payload = add_field(FieldType::File, everything());
        assert_eq!(
            keys(&payload),
            expected_keys(&[
                "allowedFileTypes",
                "maxFileAllowed",
                "imageQuality",
                "imageText",
                "fileNamePrefix"
            ])
        );
        assert_eq!(payload["allowedFileTypes"], json!(["documents"]));
        assert_eq!(payload["imageQuality"], "high");
        assert_eq!(payload["imageText"], "stamp");
        assert_eq!(payload["fileNamePrefix"], "doc_");
    }

    #[test]
    fn payload_shape_for_calculation() {
        let payload = add_field(FieldType::CalculationsAndLogic, everything());
        assert_eq!(keys(&payload), expected_keys(&["formula", "hidden"]));
        assert_eq!(payload["hidden"], true);
    }

    #[test]
    fn payload_shape_for_type_without_extras() {
        let payload = add_field(FieldType::Signature, everything());
        assert_eq!(keys(&payload), expected_keys(&[]));
    }

    #[test]
    fn unsupplied_properties_are_absent_not_null() {
        let payload = add_field(FieldType::SingleLineText, FieldProperties::default());
        assert_eq!(
            payload,
            json!({
                "workplaceId": WP,
                "appId": "APP1",
                "requestingUserEmailAddress": "a@b.com",
                "sectionIndex": 1,
                "fieldIndex": 2,
                "fieldType": "singleLineText"
            })
        );
    }

    #[test]
    fn update_includes_every_supplied_property() {
        let req = UpdateFieldRequest::new("APP1", "a@b.com", " name ", everything()).unwrap();
        let payload = req.to_payload(WP);
        assert_eq!(payload["fieldName"], "name");
        assert_eq!(payload["formula"], "x+1");
        assert_eq!(payload["options"], json!(["A", "B"]));
        assert_eq!(payload["defaultValue"], "hello");
        assert_eq!(req.updated_properties().len(), FieldProperty::ALL.len());
    }

    #[test]
    fn update_with_only_label() {
        let props = FieldProperties {
            label: Some("New".into()),
            ..Default::default()
        };
        let req = UpdateFieldRequest::new("APP1", "a@b.com", "name", props).unwrap();
        assert_eq!(req.updated_properties(), ["label"]);
        assert_eq!(keys(&req.to_payload(WP)).len(), 5);
    }

    #[test]
    fn definition_query_params() {
        let req = GetAppDefinitionRequest::new(
            "APP1",
            DefinitionOptions {
                strip_html: false,
                ..Default::default()
            },
        )
        .unwrap();
        let query = req.to_query(WP);
        assert!(query.contains(&("appId".into(), "APP1".into())));
        assert!(query.contains(&("workplaceId".into(), WP.into())));
        assert!(query.contains(&("stripHtml".into(), "false".into())));
        assert!(query.contains(&("includeTags".into(), "true".into())));
    }

    #[test]
    fn create_app_payload() {
        let sections = vec![AppSection::new(
            "Main",
            vec![
                AppField::new(FieldType::DropDown, "Size", Some(vec!["S".into(), "M".into()]))
                    .unwrap(),
            ],
        )
        .unwrap()];
        let req = CreateAppRequest::new(" Inventory ", " ops@acme.io ", sections).unwrap();
        assert_eq!(
            req.to_payload(WP),
            json!({
                "workplaceId": WP,
                "appName": "Inventory",
                "requestingUserEmailAddress": "ops@acme.io",
                "sections": [{
                    "sectionName": "Main",
                    "fields": [{ "fieldType": "dropDown", "label": "Size", "options": ["S", "M"] }]
                }]
            })
        );
    }

    #[test]
    fn status_payload_nests_status() {
        let req =
            UpdateSubmissionStatusRequest::new("APP1", "SUB1", "a@b.com", "Approved", Some(" ok "))
                .unwrap();
        let payload = req.to_payload(WP);
        assert_eq!(payload["submissionId"], "SUB1");
        assert_eq!(payload["status"], json!({ "name": "Approved", "comments": "ok" }));

        let req = UpdateSubmissionStatusRequest::new("APP1", "SUB1", "a@b.com", "Approved", None)
            .unwrap();
        assert_eq!(req.to_payload(WP)["status"], json!({ "name": "Approved" }));
    }

    #[test]
    fn owners_payload_sends_valid_subset() {
        let owners = ["x@y.com", "bad", " z@y.com"];
        let req = UpdateSubmissionOwnersRequest::new("APP1", "SUB1", "a@b.com", &owners).unwrap();
        assert_eq!(req.to_payload(WP)["emailIds"], json!(["x@y.com", "z@y.com"]));
    }

    #[test]
    fn submissions_payload_with_filters() {
        let filters = SubmissionFilters::from_value(&json!({ "queries": [{ "queries": [{ "conditions": [
            { "operator": "EQ", "filterKeyType": "STANDARD", "key": "$status", "value": "Open" }
        ] }] }] }))
        .unwrap();
        let req = GetSubmissionsRequest::new(
            "APP1",
            "a@b.com",
            SubmissionQuery {
                filters: Some(filters),
                ..Default::default()
            },
        )
        .unwrap();
        let payload = req.to_payload(WP);
        assert_eq!(payload["pageSize"], 10);
        assert_eq!(payload["forward"], true);
        assert_eq!(
            payload["filters"]["queries"][0]["queries"][0]["conditions"][0]["key"],
            "$status"
        );

        let req =
            GetSubmissionsRequest::new("APP1", "a@b.com", SubmissionQuery::default()).unwrap();
        assert!(req.to_payload(WP).get("filters").is_none());
    }

    #[test]
    fn aggregation_payload_omits_empty_lists() {
        let req =
            GetSubmissionsAggregationRequest::new("APP1", "a@b.com", AggregationQuery::default())
                .unwrap();
        let payload = req.to_payload(WP);
        assert!(payload.get("dimensions").is_none());
        assert!(payload.get("aggregationDimensions").is_none());
        assert!(payload.get("xAxisLabels").is_none());
        assert_eq!(payload["pageSize"], 1000);

        let query = AggregationQuery {
            dimensions: vec![AggregationDimension::new("region", DimensionType::Custom)],
            metrics: vec![AggregationMetric::count()],
            x_axis_labels: vec![" Region ".into()],
            ..Default::default()
        };
        let payload = GetSubmissionsAggregationRequest::new("APP1", "a@b.com", query)
            .unwrap()
            .to_payload(WP);
        assert_eq!(payload["dimensions"][0]["fieldName"], "region");
        assert_eq!(payload["aggregationDimensions"], json!([{ "type": "count" }]));
        assert_eq!(payload["xAxisLabels"], json!(["Region"]));
    }

    #[test]
    fn export_payload() {
        let options = ExportOptions {
            format: ExportFormat::Csv,
            field_names: Some(vec!["name".into()]),
            filters: None,
        };
        let payload = ExportSubmissionsRequest::new("APP1", "a@b.com", options)
            .unwrap()
            .to_payload(WP);
        assert_eq!(payload["format"], "Csv");
        assert_eq!(payload["fieldNames"], json!(["name"]));
        assert!(payload.get("filters").is_none());
    }
}
