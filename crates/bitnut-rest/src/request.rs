//! Request descriptors
//!
//! A [`Request`] describes one logical API call before signing. Endpoint
//! services build one per call and hand it to the client, which consumes it.

use crate::error::{RestError, RestResult};
use crate::params::Params;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use std::fmt::Display;
use std::sync::Arc;

/// Callback receiving the final request URL
pub type UrlObserver = Arc<dyn Fn(&str) + Send + Sync>;

/// How a request must be authenticated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SecurityType {
    /// Public endpoint, no credentials sent
    #[default]
    None,
    /// API key header only
    ApiKey,
    /// API key header, `timestamp` query parameter and body signature
    Signed,
}

impl SecurityType {
    /// Whether the API key header is sent
    pub fn requires_api_key(self) -> bool {
        matches!(self, Self::ApiKey | Self::Signed)
    }

    /// Whether the request is timestamped and signed
    pub fn is_signed(self) -> bool {
        self == Self::Signed
    }
}

/// One logical API call, before signing
pub struct Request {
    method: Method,
    path: String,
    security: SecurityType,
    query: Params,
    form: Params,
    headers: HeaderMap,
    url_observers: Vec<UrlObserver>,
}

impl Request {
    /// Create a request for `method` and `path`
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            security: SecurityType::None,
            query: Params::new(),
            form: Params::new(),
            headers: HeaderMap::new(),
            url_observers: Vec::new(),
        }
    }

    /// Shorthand for a GET request
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Shorthand for a POST request
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Shorthand for a DELETE request
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Set the security classification
    #[must_use]
    pub fn with_security(mut self, security: SecurityType) -> Self {
        self.security = security;
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn set_method(&mut self, method: Method) {
        self.method = method;
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn set_path(&mut self, path: impl Into<String>) {
        self.path = path.into();
    }

    pub fn security(&self) -> SecurityType {
        self.security
    }

    pub fn set_security(&mut self, security: SecurityType) {
        self.security = security;
    }

    /// Query-string parameters
    pub fn query(&self) -> &Params {
        &self.query
    }

    /// Form-body parameters
    pub fn form(&self) -> &Params {
        &self.form
    }

    /// Caller-supplied headers
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Set a query-string parameter
    pub fn set_param(&mut self, key: impl Into<String>, value: impl Display) -> &mut Self {
        self.query.set(key, value);
        self
    }

    /// Set a form-body parameter
    pub fn set_form_param(&mut self, key: impl Into<String>, value: impl Display) -> &mut Self {
        self.form.set(key, value);
        self
    }

    /// Set a caller-supplied header
    ///
    /// Pipeline headers (content type, API key, signature) are applied on top.
    pub fn set_header(&mut self, name: HeaderName, value: HeaderValue) -> &mut Self {
        self.headers.insert(name, value);
        self
    }

    /// Register a callback that receives the final URL
    pub fn observe_full_url(&mut self, observer: UrlObserver) {
        self.url_observers.push(observer);
    }

    /// Check the request is well formed
    pub fn validate(&self) -> RestResult<()> {
        if self.path.is_empty() {
            return Err(RestError::Validation("request path is empty".to_string()));
        }
        if !self.path.starts_with('/') {
            return Err(RestError::Validation(format!(
                "request path must start with '/': {}",
                self.path
            )));
        }
        if ![Method::GET, Method::POST, Method::DELETE].contains(&self.method) {
            return Err(RestError::Validation(format!(
                "unsupported HTTP method: {}",
                self.method
            )));
        }
        Ok(())
    }

    /// Split into the parts the signing pipeline consumes
    pub(crate) fn into_parts(self) -> RequestParts {
        RequestParts {
            method: self.method,
            path: self.path,
            security: self.security,
            query: self.query,
            form: self.form,
            headers: self.headers,
            url_observers: self.url_observers,
        }
    }
}

impl std::fmt::Debug for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Request")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("security", &self.security)
            .field("query", &self.query)
            .field("form", &self.form)
            .field("headers", &self.headers)
            .field("url_observers", &self.url_observers.len())
            .finish()
    }
}

pub(crate) struct RequestParts {
    pub method: Method,
    pub path: String,
    pub security: SecurityType,
    pub query: Params,
    pub form: Params,
    pub headers: HeaderMap,
    pub url_observers: Vec<UrlObserver>,
}

/// Fully resolved request, ready for the transport
#[derive(Debug, Clone)]
pub struct SignedRequest {
    /// HTTP method
    pub method: Method,
    /// Base URL + path, with `?query` when the query is non-empty
    pub url: String,
    /// Caller headers merged with pipeline headers
    pub headers: HeaderMap,
    /// Form-encoded body (empty for parameterless requests)
    pub body: String,
}

impl SignedRequest {
    /// Value of a header as a string, if present and visible ASCII
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Query string portion of the URL
    pub fn query_string(&self) -> Option<&str> {
        self.url.split_once('?').map(|(_, query)| query)
    }

    /// Value of a query parameter, if present
    pub fn query_param(&self, key: &str) -> Option<String> {
        let query = self.query_string()?;
        serde_urlencoded::from_str::<Vec<(String, String)>>(query)
            .ok()?
            .into_iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_supported_methods() {
        assert!(Request::get("/v1/time").validate().is_ok());
        assert!(Request::post("/v1/trade/order").validate().is_ok());
        assert!(Request::delete("/v1/trade/order").validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_path() {
        let request = Request::get("");
        assert!(matches!(request.validate(), Err(RestError::Validation(_))));
    }

    #[test]
    fn test_validate_rejects_relative_path() {
        let request = Request::get("v1/time");
        assert!(matches!(request.validate(), Err(RestError::Validation(_))));
    }

    #[test]
    fn test_validate_rejects_unsupported_method() {
        let request = Request::new(Method::PUT, "/v1/trade/order");
        assert!(matches!(request.validate(), Err(RestError::Validation(_))));
    }

    #[test]
    fn test_query_and_form_are_independent() {
        let mut request = Request::post("/v1/spot/user/orderInfo");
        request.set_param("symbol", "BTCUSDT");
        request.set_form_param("symbol", "BTCUSDT").set_form_param("orderId", "42");

        assert_eq!(request.query().len(), 1);
        assert_eq!(request.form().len(), 2);
    }

    #[test]
    fn test_security_flags() {
        assert!(!SecurityType::None.requires_api_key());
        assert!(SecurityType::ApiKey.requires_api_key());
        assert!(!SecurityType::ApiKey.is_signed());
        assert!(SecurityType::Signed.requires_api_key());
        assert!(SecurityType::Signed.is_signed());
    }

    #[test]
    fn test_signed_request_query_param() {
        let signed = SignedRequest {
            method: Method::GET,
            url: "https://api.example.com/v1/x?symbol=BTCUSDT&timestamp=1000".to_string(),
            headers: HeaderMap::new(),
            body: String::new(),
        };
        assert_eq!(signed.query_param("timestamp").as_deref(), Some("1000"));
        assert_eq!(signed.query_param("missing"), None);
    }
}
