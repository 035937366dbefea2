//! Operation client shared state.
//!
//! The operations themselves live in [`crate::app_definition`] and
//! [`crate::submissions`]; each one runs validate, configuration check,
//! normalize, send, then shapes a typed response. Errors never escape an
//! operation: they become a failure-shaped response.

use serde_json::Value;
use tracing::error;

use crate::config::ClientConfig;
use crate::error::{ClientError, RequestError};
use crate::http::{ApiClient, ReqwestTransport, Transport};

pub(crate) mod endpoint {
    pub const GET_APP_DEFINITION: &str = "appdefinitionv2/getAppDefinition";
    pub const CREATE_APP: &str = "appdefinitionv2/createApp";
    pub const ADD_FIELD: &str = "appdefinitionv2/addField";
    pub const UPDATE_FIELD: &str = "appdefinitionv2/updateField";
    pub const CREATE_SUBMISSION: &str = "submissions/create";
    pub const EDIT_SUBMISSION: &str = "submissions/edit";
    pub const UPDATE_STATUS: &str = "submissions/updateStatus";
    pub const UPDATE_OWNERS: &str = "submissions/updateSubmissionOwners";
    pub const GET_SUBMISSIONS: &str = "submissions/getSubmissions";
    pub const GET_AGGREGATION: &str = "submissions/getSubmissionsAggregation";
    pub const EXPORT: &str = "submissions/getSubmissionsExcel";
}

/// Client for the Clappia app-definition and submission APIs.
///
/// Holds only immutable configuration, so it is `Send + Sync` whenever the
/// transport is.
#[derive(Debug, Clone)]
pub struct ClappiaClient<T = ReqwestTransport> {
    api: ApiClient<T>,
}

impl ClappiaClient<ReqwestTransport> {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            api: ApiClient::new(config),
        }
    }

    /// Client configured from `CLAPPIA_*` environment variables.
    pub fn from_env() -> Self {
        Self::new(ClientConfig::from_env())
    }
}

impl<T: Transport> ClappiaClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            api: ApiClient::with_transport(config, transport),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        self.api.config()
    }

    pub fn transport(&self) -> &T {
        self.api.transport()
    }

    pub(crate) fn workplace_id(&self) -> &str {
        &self.api.config().workplace_id
    }

    /// Fail before building a payload when configuration is incomplete.
    pub(crate) fn ensure_configured(&self) -> Result<(), RequestError> {
        self.api.config().validate()
    }

    pub(crate) fn get(
        &self,
        endpoint: &str,
        query: &[(String, String)],
    ) -> Result<Value, ClientError> {
        Ok(self.api.get(endpoint, query)?)
    }

    pub(crate) fn post(&self, endpoint: &str, body: &Value) -> Result<Value, ClientError> {
        Ok(self.api.post(endpoint, body)?)
    }
}

/// Log a failed operation and hand the error back for shaping.
pub(crate) fn report(operation: &str, err: ClientError) -> ClientError {
    error!(operation, kind = err.kind(), "Error: {}", err);
    err
}

/// String member of a reply body, if present.
pub(crate) fn str_field(body: &Value, key: &str) -> Option<String> {
    body.get(key).and_then(Value::as_str).map(str::to_string)
}
