//! HTTP transport seam
//!
//! The client only needs "send this request, give me status, headers and
//! body". Connection pooling, TLS and proxies belong to the transport.

use crate::error::BoxError;
use crate::request::SignedRequest;
use async_trait::async_trait;
use reqwest::header::HeaderMap;

/// Raw HTTP response
#[derive(Debug, Clone, Default)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: HeaderMap,
    /// Full response body
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Response with a status and body and no headers
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Whether the status signals an error (>= 400)
    pub fn is_error(&self) -> bool {
        self.status >= 400
    }
}

/// Sends signed requests over the network
///
/// Implementations must be safe to share between concurrent calls.
/// Cancellation is handled by the caller dropping the returned future.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send the request and read the full response body
    async fn send(&self, request: SignedRequest) -> Result<HttpResponse, BoxError>;
}

#[async_trait]
impl Transport for reqwest::Client {
    async fn send(&self, request: SignedRequest) -> Result<HttpResponse, BoxError> {
        let mut builder = self
            .request(request.method, &request.url)
            .headers(request.headers);

        if !request.body.is_empty() {
            builder = builder.body(request.body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
