//! HTTP request/response wrapper.
//!
//! Every operation funnels through [`ApiClient::send`], which checks the
//! configuration, attaches the Clappia headers, performs exactly one attempt
//! through a [`Transport`] and classifies the outcome.

use std::time::Duration;

use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::RequestError;

/// Statuses whose body is reported as a structured API error.
const API_ERROR_STATUSES: &[u16] = &[400, 401, 403, 404];

/// A fully resolved outbound request.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub timeout: Duration,
}

/// Status and raw body of a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Why a request produced no reply at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportFailure {
    Timeout,
    Connect(String),
    Other(String),
}

/// Performs a single HTTP exchange. No retries.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportFailure>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportFailure> {
        (**self).execute(request)
    }
}

/// Blocking transport backed by `reqwest`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReqwestTransport;

fn transport_failure(err: reqwest::Error) -> TransportFailure {
    if err.is_timeout() {
        TransportFailure::Timeout
    } else if err.is_connect() {
        TransportFailure::Connect(err.to_string())
    } else {
        TransportFailure::Other(err.to_string())
    }
}

impl Transport for ReqwestTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportFailure> {
        let client = reqwest::blocking::Client::builder()
            .timeout(request.timeout)
            .build()
            .map_err(|e| TransportFailure::Other(e.to_string()))?;

        let mut builder = client.request(request.method.clone(), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().map_err(transport_failure)?;
        let status = response.status().as_u16();
        let body = response.text().map_err(transport_failure)?;
        Ok(HttpResponse { status, body })
    }
}

/// Turn a reply into a payload or a typed error.
///
/// # Errors
///
/// Returns `RequestError::Api` for 400/401/403/404 (body pretty-printed when
/// it is JSON) and `RequestError::UnexpectedStatus` for any other non-200.
pub fn classify_response(response: HttpResponse) -> Result<Value, RequestError> {
    let HttpResponse { status, body } = response;

    if status == 200 {
        return match serde_json::from_str(&body) {
            Ok(value) => Ok(value),
            Err(_) => {
                warn!(body = %body, "Valid response but invalid JSON");
                Ok(json!({ "raw_response": body }))
            }
        };
    }

    if API_ERROR_STATUSES.contains(&status) {
        let body = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|value| serde_json::to_string_pretty(&value).ok())
            .unwrap_or(body);
        return Err(RequestError::Api { status, body });
    }

    Err(RequestError::UnexpectedStatus { status, body })
}

/// Configuration plus transport; the only component that performs I/O.
#[derive(Debug, Clone)]
pub struct ApiClient<T = ReqwestTransport> {
    config: ClientConfig,
    transport: T,
}

impl ApiClient<ReqwestTransport> {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_transport(config, ReqwestTransport)
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Headers sent with every request.
    pub fn headers(&self) -> Vec<(String, String)> {
        vec![
            ("x-api-key".to_string(), self.config.api_key.clone()),
            ("Content-Type".to_string(), "application/json".to_string()),
            ("workplaceId".to_string(), self.config.workplace_id.clone()),
        ]
    }

    /// Issue one request to `endpoint` and classify the outcome.
    ///
    /// Configuration is checked first; an incomplete configuration fails
    /// without touching the transport.
    ///
    /// # Errors
    ///
    /// Returns a [`RequestError`] for configuration gaps, error statuses,
    /// timeouts, connection failures and anything else the transport reports.
    pub fn send(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
        query: &[(String, String)],
    ) -> Result<Value, RequestError> {
        self.config.validate()?;

        let request = HttpRequest {
            url: self.config.url_for(endpoint),
            method,
            headers: self.headers(),
            query: query.to_vec(),
            body: body.cloned(),
            timeout: self.config.timeout(),
        };

        info!(method = %request.method, url = %request.url, "Making request");
        if let Some(body) = &request.body {
            debug!(
                "Request data: {}",
                serde_json::to_string_pretty(body).unwrap_or_default()
            );
        }

        let response = self
            .transport
            .execute(&request)
            .map_err(|failure| match failure {
                TransportFailure::Timeout => RequestError::Timeout {
                    seconds: self.config.timeout_secs,
                },
                TransportFailure::Connect(message) => RequestError::Connection { message },
                TransportFailure::Other(message) => RequestError::Unknown { message },
            })?;

        info!(status = response.status, "Response status");
        classify_response(response)
    }

    pub fn get(&self, endpoint: &str, query: &[(String, String)]) -> Result<Value, RequestError> {
        self.send(Method::GET, endpoint, None, query)
    }

    pub fn post(&self, endpoint: &str, body: &Value) -> Result<Value, RequestError> {
        self.send(Method::POST, endpoint, Some(body), &[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Replays one canned result and records the requests it saw.
    struct Canned {
        result: Result<HttpResponse, TransportFailure>,
        seen: RefCell<Vec<HttpRequest>>,
    }

    impl Canned {
        fn new(result: Result<HttpResponse, TransportFailure>) -> Self {
            Self {
                result,
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl Transport for Canned {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportFailure> {
            self.seen.borrow_mut().push(request.clone());
            self.result.clone()
        }
    }

    fn client(result: Result<HttpResponse, TransportFailure>) -> ApiClient<Canned> {
        let config = ClientConfig::new("key-1", "https://api.test/", "WP1").with_timeout(7);
        ApiClient::with_transport(config, Canned::new(result))
    }

    #[test]
    fn success_parses_json() {
        let api = client(Ok(HttpResponse::new(200, r#"{"appId":"APP1"}"#)));
        let value = api.post("appdefinitionv2/createApp", &json!({ "a": 1 })).unwrap();
        assert_eq!(value["appId"], "APP1");

        let seen = api.transport().seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].url, "https://api.test/appdefinitionv2/createApp");
        assert_eq!(seen[0].method, Method::POST);
        assert_eq!(seen[0].timeout, Duration::from_secs(7));
        assert!(seen[0]
            .headers
            .contains(&("x-api-key".to_string(), "key-1".to_string())));
        assert!(seen[0]
            .headers
            .contains(&("workplaceId".to_string(), "WP1".to_string())));
    }

    #[test]
    fn success_with_non_json_body_is_lenient() {
        let api = client(Ok(HttpResponse::new(200, "OK")));
        let value = api.get("x", &[]).unwrap();
        assert_eq!(value, json!({ "raw_response": "OK" }));
    }

    #[test]
    fn not_found_embeds_json_body() {
        let api = client(Ok(HttpResponse::new(404, r#"{"error":"not found"}"#)));
        let err = api.get("x", &[]).unwrap_err();
        assert_eq!(err.kind(), "api_error");
        assert_eq!(err.status(), Some(404));
        let message = err.to_string();
        assert!(message.starts_with("API Error (404): "));
        assert!(message.contains(r#""error": "not found""#));
    }

    #[test]
    fn api_error_with_text_body() {
        let api = client(Ok(HttpResponse::new(401, "denied")));
        assert_eq!(
            api.get("x", &[]).unwrap_err().to_string(),
            "API Error (401): denied"
        );
    }

    #[test]
    fn client_error_statuses_are_api_errors() {
        for status in [400, 401, 403, 404] {
            let api = client(Ok(HttpResponse::new(status, "rejected")));
            let err = api.post("x", &json!({})).unwrap_err();
            assert_eq!(err.kind(), "api_error");
            assert_eq!(err.status(), Some(status));
            assert_eq!(err.to_string(), format!("API Error ({status}): rejected"));
        }
    }

    #[test]
    fn other_status_is_unexpected() {
        let api = client(Ok(HttpResponse::new(500, "boom")));
        let err = api.get("x", &[]).unwrap_err();
        assert_eq!(err.to_string(), "Unexpected API response (500): boom");
    }

    #[test]
    fn timeout_reports_configured_seconds() {
        let api = client(Err(TransportFailure::Timeout));
        let err = api.get("x", &[]).unwrap_err();
        assert_eq!(err, RequestError::Timeout { seconds: 7 });
        assert!(err.to_string().contains('7'));
    }

    #[test]
    fn connection_and_other_failures() {
        let api = client(Err(TransportFailure::Connect("refused".into())));
        assert_eq!(api.get("x", &[]).unwrap_err().kind(), "connection_error");

        let api = client(Err(TransportFailure::Other("weird".into())));
        assert_eq!(
            api.get("x", &[]).unwrap_err().to_string(),
            "Unexpected error: weird"
        );
    }

    #[test]
    fn missing_configuration_skips_transport() {
        let config = ClientConfig::new("", "https://api.test", "WP1");
        let api = ApiClient::with_transport(config, Canned::new(Ok(HttpResponse::new(200, "{}"))));
        let err = api.get("x", &[]).unwrap_err();
        assert!(err.to_string().contains("not configured"));
        assert!(api.transport().seen.borrow().is_empty());
    }
}
