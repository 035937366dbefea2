//! App-definition operations: read, create, add field, update field.

use serde_json::{json, Value};
use tracing::info;

use crate::client::{endpoint, report, str_field, ClappiaClient};
use crate::error::ClientError;
use crate::field::{AppSection, FieldType};
use crate::http::Transport;
use crate::normalize::FieldProperties;
use crate::request::{
    AddFieldRequest, CreateAppRequest, DefinitionOptions, GetAppDefinitionRequest,
    UpdateFieldRequest,
};
use crate::response::{
    AppCreationResponse, AppDefinitionResponse, FieldOperationResponse, Operation, Outcome,
};

/// Condensed view of a definition reply.
///
/// Counts pages, sections and fields; the app name comes from
/// `metadata.sectionName` and defaults to `"Unknown"`.
pub fn summarize_definition(body: &Value) -> Value {
    let len = |key: &str| match body.get(key) {
        Some(Value::Array(items)) => items.len(),
        Some(Value::Object(map)) => map.len(),
        _ => 0,
    };
    let metadata = body.get("metadata");
    let metadata_str = |key: &str| metadata.and_then(|m| m.get(key)).and_then(Value::as_str);

    json!({
        "app_id": body.get("appId").cloned().unwrap_or(Value::Null),
        "version": body.get("version").cloned().unwrap_or(Value::Null),
        "state": body.get("state").cloned().unwrap_or(Value::Null),
        "page_count": len("pageIds"),
        "section_count": len("sectionIds"),
        "field_count": len("fieldDefinitions"),
        "app_name": metadata_str("sectionName").unwrap_or("Unknown"),
        "description": metadata_str("description").unwrap_or(""),
        "field_definitions": body.get("fieldDefinitions").cloned().unwrap_or_else(|| json!({})),
    })
}

impl<T: Transport> ClappiaClient<T> {
    /// Fetch an app's definition.
    pub fn get_definition(
        &self,
        app_id: &str,
        options: DefinitionOptions,
    ) -> AppDefinitionResponse {
        self.try_get_definition(app_id, options)
            .unwrap_or_else(|err| AppDefinitionResponse {
                outcome: Outcome::failed(&report("get_definition", err)),
                app_id: Some(app_id.trim().to_string()),
            })
    }

    fn try_get_definition(
        &self,
        app_id: &str,
        options: DefinitionOptions,
    ) -> Result<AppDefinitionResponse, ClientError> {
        let request = GetAppDefinitionRequest::new(app_id, options)?;
        self.ensure_configured()?;

        let body = self.get(
            endpoint::GET_APP_DEFINITION,
            &request.to_query(self.workplace_id()),
        )?;
        info!(app_id = %request.app_id(), "Retrieved app definition");

        Ok(AppDefinitionResponse {
            outcome: Outcome::ok(
                "Successfully retrieved app definition",
                Some(summarize_definition(&body)),
            ),
            app_id: Some(request.app_id().to_string()),
        })
    }

    /// Create an app from its initial sections.
    pub fn create_app(
        &self,
        app_name: &str,
        requester: &str,
        sections: Vec<AppSection>,
    ) -> AppCreationResponse {
        let sections_created = sections.len();
        self.try_create_app(app_name, requester, sections)
            .unwrap_or_else(|err| AppCreationResponse {
                outcome: Outcome::failed(&report("create_app", err)),
                app_id: None,
                app_name: Some(app_name.trim().to_string()),
                sections_created: Some(sections_created),
            })
    }

    fn try_create_app(
        &self,
        app_name: &str,
        requester: &str,
        sections: Vec<AppSection>,
    ) -> Result<AppCreationResponse, ClientError> {
        let request = CreateAppRequest::new(app_name, requester, sections)?;
        self.ensure_configured()?;

        let body = self.post(endpoint::CREATE_APP, &request.to_payload(self.workplace_id()))?;
        let app_id = str_field(&body, "appId");
        let app_url = str_field(&body, "appUrl");
        info!(app_id = ?app_id, "App created");

        Ok(AppCreationResponse {
            outcome: Outcome::ok(
                "App created successfully",
                Some(json!({ "app_id": app_id, "app_url": app_url })),
            ),
            app_id,
            app_name: Some(request.app_name().to_string()),
            sections_created: Some(request.sections().len()),
        })
    }

    /// Add a field at `section_index`/`field_index`.
    ///
    /// Only properties applicable to `field_type` are sent.
    pub fn add_field(
        &self,
        app_id: &str,
        requester: &str,
        section_index: usize,
        field_index: usize,
        field_type: FieldType,
        properties: FieldProperties,
    ) -> FieldOperationResponse {
        self.try_add_field(app_id, requester, section_index, field_index, field_type, properties)
            .unwrap_or_else(|err| FieldOperationResponse {
                field_type: Some(field_type),
                section_index: Some(section_index),
                field_index: Some(field_index),
                ..FieldOperationResponse::failed(
                    &report("add_field", err),
                    app_id,
                    Operation::AddField,
                )
            })
    }

    fn try_add_field(
        &self,
        app_id: &str,
        requester: &str,
        section_index: usize,
        field_index: usize,
        field_type: FieldType,
        properties: FieldProperties,
    ) -> Result<FieldOperationResponse, ClientError> {
        let request = AddFieldRequest::new(
            app_id,
            requester,
            section_index,
            field_index,
            field_type,
            properties,
        )?;
        self.ensure_configured()?;

        let body = self.post(endpoint::ADD_FIELD, &request.to_payload(self.workplace_id()))?;
        let field_name = str_field(&body, "fieldName");
        info!(app_id = %request.app_id, field_name = ?field_name, %field_type, "Field added");

        Ok(FieldOperationResponse {
            outcome: Outcome::ok(
                format!("Successfully added {} field to app {}", field_type, request.app_id),
                Some(body),
            ),
            app_id: Some(request.app_id.to_string()),
            field_name,
            operation: Operation::AddField,
            field_type: Some(field_type),
            section_index: Some(section_index),
            field_index: Some(field_index),
            updated_properties: None,
        })
    }

    /// Update an existing field's properties.
    ///
    /// The field's type is not known here, so every supplied property is sent.
    pub fn update_field(
        &self,
        app_id: &str,
        requester: &str,
        field_name: &str,
        properties: FieldProperties,
    ) -> FieldOperationResponse {
        self.try_update_field(app_id, requester, field_name, properties)
            .unwrap_or_else(|err| FieldOperationResponse {
                field_name: Some(field_name.trim().to_string()),
                ..FieldOperationResponse::failed(
                    &report("update_field", err),
                    app_id,
                    Operation::UpdateField,
                )
            })
    }

    fn try_update_field(
        &self,
        app_id: &str,
        requester: &str,
        field_name: &str,
        properties: FieldProperties,
    ) -> Result<FieldOperationResponse, ClientError> {
        let request = UpdateFieldRequest::new(app_id, requester, field_name, properties)?;
        self.ensure_configured()?;

        let body = self.post(endpoint::UPDATE_FIELD, &request.to_payload(self.workplace_id()))?;
        let updated = request.updated_properties();
        info!(
            app_id = %request.app_id,
            field_name = request.field_name(),
            properties = ?updated,
            "Field updated"
        );

        Ok(FieldOperationResponse {
            outcome: Outcome::ok(
                format!(
                    "Successfully updated field '{}' in app {}",
                    request.field_name(),
                    request.app_id
                ),
                Some(body),
            ),
            app_id: Some(request.app_id.to_string()),
            field_name: Some(request.field_name().to_string()),
            operation: Operation::UpdateField,
            field_type: None,
            section_index: None,
            field_index: None,
            updated_properties: Some(updated.into_iter().map(str::to_string).collect()),
        })
    }
}
