//! Form field and section definitions.
//!
//! `AppField` and `AppSection` enforce their invariants at construction
//! (including when deserialized), so a value of either type is always
//! well-formed and can be serialized to the wire without further checks.

use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::error::ValidationError;
use crate::types::wire_enum;

wire_enum! {
    /// Every field type the platform knows about.
    pub enum FieldType ("field type") {
        SingleLineText => "singleLineText",
        MultiLineText => "multiLineText",
        SingleSelector => "singleSelector",
        MultiSelector => "multiSelector",
        DropDown => "dropDown",
        DateSelector => "dateSelector",
        TimeSelector => "timeSelector",
        PhoneNumber => "phoneNumber",
        UniqueNumbering => "uniqueNumbering",
        File => "file",
        GpsLocation => "gpsLocation",
        Html => "html",
        CalculationsAndLogic => "calculationsAndLogic",
        CodeScanner => "codeScanner",
        Counter => "counter",
        Slider => "slider",
        Signature => "signature",
        Validation => "validation",
        LiveTracking => "liveTracking",
        NfcReader => "nfcReader",
        Address => "address",
    }
}

/// Field types whose definition must carry a non-empty option list.
pub const SELECTOR_FIELD_TYPES: &[FieldType] = &[
    FieldType::SingleSelector,
    FieldType::MultiSelector,
    FieldType::DropDown,
];

/// Field types that may be declared inline when creating an app.
///
/// Narrower than [`FieldType::ALL`]: the remaining types can only be added
/// to an existing app.
pub const CREATE_APP_FIELD_TYPES: &[FieldType] = &[
    FieldType::SingleLineText,
    FieldType::MultiLineText,
    FieldType::SingleSelector,
    FieldType::MultiSelector,
    FieldType::DropDown,
    FieldType::DateSelector,
    FieldType::TimeSelector,
    FieldType::PhoneNumber,
];

impl FieldType {
    pub fn requires_options(&self) -> bool {
        SELECTOR_FIELD_TYPES.contains(self)
    }

    pub fn creatable_with_app(&self) -> bool {
        CREATE_APP_FIELD_TYPES.contains(self)
    }
}

wire_enum! {
    /// Input validation the platform applies to a field's value.
    pub enum FieldValidation ("validation") {
        None => "none",
        Number => "number",
        Email => "email",
        Url => "url",
        Custom => "custom",
    }
}

wire_enum! {
    /// Rendering style of selector fields.
    pub enum SelectorStyle ("style") {
        Standard => "Standard",
        Chips => "Chips",
    }
}

wire_enum! {
    pub enum ImageQuality ("image quality") {
        Low => "low",
        Medium => "medium",
        High => "high",
    }
}

wire_enum! {
    /// Upload sources accepted by file fields.
    pub enum AllowedFileType ("allowed file type") {
        ImagesCameraUpload => "images_camera_upload",
        ImagesGalleryUpload => "images_gallery_upload",
        Videos => "videos",
        Documents => "documents",
    }
}

/// A field declared as part of an app's initial structure.
///
/// # Invariants
/// - `label` is non-empty and trimmed.
/// - Selector types always carry a non-empty `options` list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawAppField")]
pub struct AppField {
    field_type: FieldType,
    label: String,
    options: Option<Vec<String>>,
}

#[derive(Deserialize)]
struct RawAppField {
    #[serde(alias = "fieldType")]
    field_type: FieldType,
    label: String,
    #[serde(default)]
    options: Option<Vec<String>>,
}

impl TryFrom<RawAppField> for AppField {
    type Error = ValidationError;

    fn try_from(raw: RawAppField) -> Result<Self, Self::Error> {
        AppField::new(raw.field_type, &raw.label, raw.options)
    }
}

impl AppField {
    /// Build a field, enforcing the label and options invariants.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyValue` for a blank label and
    /// `ValidationError::MissingOptions` for a selector type without options.
    pub fn new(
        field_type: FieldType,
        label: &str,
        options: Option<Vec<String>>,
    ) -> Result<Self, ValidationError> {
        let label = label.trim();
        if label.is_empty() {
            return Err(ValidationError::EmptyValue {
                what: "Field label",
            });
        }

        if field_type.requires_options() && options.as_ref().map_or(true, Vec::is_empty) {
            return Err(ValidationError::MissingOptions { field_type });
        }

        Ok(Self {
            field_type,
            label: label.to_string(),
            options,
        })
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn options(&self) -> Option<&[String]> {
        self.options.as_deref()
    }

    /// Wire form: `{fieldType, label}` plus `options` when present.
    pub fn to_wire(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("fieldType".into(), json!(self.field_type.as_str()));
        obj.insert("label".into(), json!(self.label));
        if let Some(options) = &self.options {
            obj.insert("options".into(), json!(options));
        }
        Value::Object(obj)
    }
}

/// A named, ordered group of fields.
///
/// # Invariants
/// - `section_name` is non-empty and trimmed.
/// - `fields` is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawAppSection")]
pub struct AppSection {
    section_name: String,
    fields: Vec<AppField>,
}

#[derive(Deserialize)]
struct RawAppSection {
    #[serde(alias = "sectionName")]
    section_name: String,
    #[serde(default)]
    fields: Vec<AppField>,
}

impl TryFrom<RawAppSection> for AppSection {
    type Error = ValidationError;

    fn try_from(raw: RawAppSection) -> Result<Self, Self::Error> {
        AppSection::new(&raw.section_name, raw.fields)
    }
}

impl AppSection {
    /// Build a section.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyValue` for a blank name and
    /// `ValidationError::EmptySection` when `fields` is empty.
    pub fn new(section_name: &str, fields: Vec<AppField>) -> Result<Self, ValidationError> {
        let section_name = section_name.trim();
        if section_name.is_empty() {
            return Err(ValidationError::EmptyValue {
                what: "Section name",
            });
        }
        if fields.is_empty() {
            return Err(ValidationError::EmptySection {
                section: section_name.to_string(),
            });
        }
        Ok(Self {
            section_name: section_name.to_string(),
            fields,
        })
    }

    pub fn section_name(&self) -> &str {
        &self.section_name
    }

    pub fn fields(&self) -> &[AppField] {
        &self.fields
    }

    /// Wire form: `{sectionName, fields: [...]}` preserving field order.
    pub fn to_wire(&self) -> Value {
        json!({
            "sectionName": self.section_name,
            "fields": self.fields.iter().map(AppField::to_wire).collect::<Vec<_>>(),
        })
    }
}

/// Check an app's initial structure against the app-creation allow-list.
///
/// # Errors
///
/// Returns `ValidationError::NoSections` for an empty list and
/// `ValidationError::FieldTypeNotCreatable` for the first field whose type
/// cannot be created inline.
pub fn validate_app_structure(sections: &[AppSection]) -> Result<(), ValidationError> {
    if sections.is_empty() {
        return Err(ValidationError::NoSections);
    }

    for section in sections {
        for field in section.fields() {
            if !field.field_type().creatable_with_app() {
                return Err(ValidationError::FieldTypeNotCreatable {
                    field_type: field.field_type(),
                    section: section.section_name().to_string(),
                    allowed: CREATE_APP_FIELD_TYPES
                        .iter()
                        .map(|t| t.as_str())
                        .collect::<Vec<_>>()
                        .join(", "),
                });
            }
        }
    }
    Ok(())
}
