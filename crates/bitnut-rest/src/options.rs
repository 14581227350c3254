//! Per-call request customization
//!
//! A [`RequestOption`] mutates the [`Request`] right before it is signed.
//! Options run in the order they were supplied.

use crate::request::Request;
use reqwest::header::{HeaderName, HeaderValue};
use std::fmt::Display;
use std::sync::Arc;
use tokio::sync::watch;

/// Receives the final URL of a request built with [`RequestOption::capture_full_url`]
pub type FullUrlReceiver = watch::Receiver<Option<String>>;

/// Mutation hook applied to a request before dispatch
#[derive(Clone)]
pub struct RequestOption(Arc<dyn Fn(&mut Request) + Send + Sync>);

impl RequestOption {
    /// Wrap an arbitrary mutation
    pub fn new(f: impl Fn(&mut Request) + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Inject a header
    pub fn header(name: HeaderName, value: HeaderValue) -> Self {
        Self::new(move |request| {
            request.set_header(name.clone(), value.clone());
        })
    }

    /// Add a query-string parameter
    pub fn query_param(key: impl Into<String>, value: impl Display) -> Self {
        let key = key.into();
        let value = value.to_string();
        Self::new(move |request| {
            request.set_param(key.clone(), &value);
        })
    }

    /// Capture the final URL, including the query string
    ///
    /// The receiver holds `None` until the request has been signed.
    pub fn capture_full_url() -> (Self, FullUrlReceiver) {
        let (tx, rx) = watch::channel(None);
        let tx = Arc::new(tx);

        let option = Self::new(move |request| {
            let tx = Arc::clone(&tx);
            request.observe_full_url(Arc::new(move |url: &str| {
                tx.send_replace(Some(url.to_string()));
            }));
        });

        (option, rx)
    }

    pub(crate) fn apply(&self, request: &mut Request) {
        (self.0)(request);
    }
}

impl std::fmt::Debug for RequestOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("RequestOption(..)")
    }
}
