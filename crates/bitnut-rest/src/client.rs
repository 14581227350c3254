//! Main REST client implementation
//!
//! [`BitnutClient`] owns the session (credentials, base URL, transport, clock
//! offset) and the signing pipeline every endpoint goes through.

use crate::clock::{Clock, SystemClock};
use crate::endpoints::{AccountEndpoints, MarketEndpoints, TradingEndpoints};
use crate::error::{ApiError, RestError, RestResult};
use crate::options::RequestOption;
use crate::request::{Request, SignedRequest};
use crate::transport::{HttpResponse, Transport};
use crate::types::{Balance, Depth, ErrorBody, OrderRequest, SymbolTicker, TickerQuery};
use bitnut_auth::{AuthError, Credentials, API_KEY_ENV, SECRET_KEY_ENV};
use reqwest::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Production REST endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.binance.com";

/// Environment variable overriding the base URL
pub const BASE_URL_ENV: &str = "BITNUT_BASE_URL";

/// Header carrying the API key
pub const API_KEY_HEADER: &str = "bu-access-key";

/// Header carrying the body signature
pub const SIGNATURE_HEADER: &str = "bu-access-sign";

/// Query parameter carrying the request time of signed calls
pub const TIMESTAMP_KEY: &str = "timestamp";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Default request timeout
const DEFAULT_TIMEOUT_SECS: u64 = 30;

const DEFAULT_USER_AGENT: &str = "Bitnut/rust";

/// Bitnut REST API client
///
/// Cheap to clone; clones share the transport and the clock offset.
///
/// # Example
///
/// ```no_run
/// use bitnut_rest::{BitnutClient, Credentials};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = BitnutClient::with_credentials(Credentials::from_env()?)?;
///     client.sync_clock_offset().await?;
///
///     let balance = client.get_balance("BTC").await?;
///     println!("{} free: {}", balance.coin, balance.free);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct BitnutClient {
    transport: Arc<dyn Transport>,
    credentials: Option<Credentials>,
    base_url: String,
    clock: Arc<dyn Clock>,
    time_offset: Arc<AtomicI64>,
}

impl BitnutClient {
    /// Create a client without authentication
    ///
    /// Only public endpoints will be available.
    pub fn new() -> RestResult<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a client with credentials
    pub fn with_credentials(credentials: Credentials) -> RestResult<Self> {
        Self::with_config(ClientConfig::new().with_credentials(credentials))
    }

    /// Create a client backed by `reqwest`
    pub fn with_config(config: ClientConfig) -> RestResult<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT));

        if let Some(proxy) = &config.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy).map_err(RestError::ClientBuild)?);
        }

        let http_client = builder.build().map_err(RestError::ClientBuild)?;

        info!(base_url = %config.base_url, "Created Bitnut REST client");

        Ok(Self::with_transport(config, Arc::new(http_client)))
    }

    /// Create a client over a custom transport
    ///
    /// `timeout_secs`, `user_agent` and `proxy` are the transport's concern and
    /// are ignored here.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            credentials: config.credentials,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            clock: Arc::new(SystemClock),
            time_offset: Arc::new(AtomicI64::new(0)),
        }
    }

    /// Replace the clock used for request timestamps
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Check if the client has credentials for private endpoints
    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Milliseconds the local clock runs ahead of the server
    pub fn time_offset(&self) -> i64 {
        self.time_offset.load(Ordering::SeqCst)
    }

    /// Set the clock offset manually
    ///
    /// Signed requests already in flight keep the value they read.
    pub fn set_time_offset(&self, offset_ms: i64) {
        self.time_offset.store(offset_ms, Ordering::SeqCst);
    }

    /// Local clock reading in milliseconds
    pub fn local_time(&self) -> i64 {
        self.clock.now_millis()
    }

    // ========================================================================
    // Signing Pipeline
    // ========================================================================

    /// Resolve a request into its signed wire form without sending it
    ///
    /// Applies `options` in order, validates, stamps and signs the request and
    /// assembles the final URL.
    pub fn prepare(
        &self,
        mut request: Request,
        options: &[RequestOption],
    ) -> RestResult<SignedRequest> {
        for option in options {
            option.apply(&mut request);
        }
        request.validate()?;

        let mut parts = request.into_parts();

        if parts.security.is_signed() {
            let timestamp = self.clock.now_millis() - self.time_offset();
            parts.query.set(TIMESTAMP_KEY, timestamp);
        }

        let query_string = parts.query.encode()?;
        let body = parts.form.encode()?;

        let mut headers = parts.headers;
        if !body.is_empty() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));
        }

        if parts.security.requires_api_key() {
            let credentials = self.credentials.as_ref().ok_or(RestError::AuthRequired)?;
            headers.insert(
                HeaderName::from_static(API_KEY_HEADER),
                header_value(credentials.api_key())?,
            );

            // Only the form body is signed; the query string is not
            if parts.security.is_signed() {
                let signature = credentials.sign(&body)?;
                headers.insert(
                    HeaderName::from_static(SIGNATURE_HEADER),
                    header_value(&signature)?,
                );
            }
        }

        let mut url = format!("{}{}", self.base_url, parts.path);
        if !query_string.is_empty() {
            url.push('?');
            url.push_str(&query_string);
        }

        for observer in &parts.url_observers {
            observer(&url);
        }

        debug!(method = %parts.method, url = %url, body = %body, "Prepared request");

        Ok(SignedRequest {
            method: parts.method,
            url,
            headers,
            body,
        })
    }

    /// Sign and send a request, returning the raw success body
    ///
    /// Responses with status >= 400 become [`RestError::Api`]. If `cancel`
    /// fires before the transport answers, the call is abandoned and
    /// [`RestError::Cancelled`] is returned.
    pub async fn dispatch(
        &self,
        request: Request,
        options: &[RequestOption],
        cancel: &CancellationToken,
    ) -> RestResult<Vec<u8>> {
        let signed = self.prepare(request, options)?;

        let response = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                debug!("Request cancelled before a response arrived");
                return Err(RestError::Cancelled);
            }
            result = self.transport.send(signed) => result.map_err(RestError::Transport)?,
        };

        debug!(status = response.status, bytes = response.body.len(), "Received response");

        if response.is_error() {
            return Err(api_error_from_response(&response).into());
        }

        Ok(response.body)
    }

    // ========================================================================
    // Public Market Endpoints
    // ========================================================================

    /// Get market endpoints
    pub fn market(&self) -> MarketEndpoints<'_> {
        MarketEndpoints::new(self)
    }

    /// Get the server time in milliseconds
    pub async fn server_time(&self) -> RestResult<i64> {
        self.market().server_time().await
    }

    /// Measure and store the local/server clock offset
    ///
    /// Call before signed requests whenever clock drift is suspected; the
    /// client never re-syncs on its own.
    pub async fn sync_clock_offset(&self) -> RestResult<i64> {
        self.market().sync_clock_offset().await
    }

    /// Get order book depth for a symbol
    pub async fn get_depth(&self, symbol: &str, limit: Option<u32>) -> RestResult<Depth> {
        self.market().depth(symbol, limit).await
    }

    /// Get 24h ticker statistics
    pub async fn get_tickers(&self, query: TickerQuery) -> RestResult<Vec<SymbolTicker>> {
        self.market().tickers(query).await
    }

    // ========================================================================
    // Private Account Endpoints
    // ========================================================================

    /// Get account endpoints (requires credentials)
    pub fn account(&self) -> RestResult<AccountEndpoints<'_>> {
        self.require_credentials()?;
        Ok(AccountEndpoints::new(self))
    }

    /// Get the balance of one coin
    pub async fn get_balance(&self, coin: &str) -> RestResult<Balance> {
        self.account()?.balance(coin).await
    }

    // ========================================================================
    // Private Trading Endpoints
    // ========================================================================

    /// Get trading endpoints (requires credentials)
    pub fn trading(&self) -> RestResult<TradingEndpoints<'_>> {
        self.require_credentials()?;
        Ok(TradingEndpoints::new(self))
    }

    /// Place a new order, returning the assigned order IDs
    pub async fn create_order(&self, order: &OrderRequest) -> RestResult<Vec<String>> {
        self.trading()?.create_order(order).await
    }

    /// Cancel an order by ID
    pub async fn cancel_order(
        &self,
        symbol: &str,
        order_id: &str,
    ) -> RestResult<Vec<serde_json::Value>> {
        self.trading()?.cancel_order(symbol, Some(order_id)).await
    }

    /// Cancel all open orders on a symbol
    pub async fn cancel_open_orders(&self, symbol: &str) -> RestResult<Vec<serde_json::Value>> {
        self.trading()?.cancel_open_orders(symbol).await
    }

    fn require_credentials(&self) -> RestResult<&Credentials> {
        self.credentials.as_ref().ok_or(RestError::AuthRequired)
    }
}

impl std::fmt::Debug for BitnutClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BitnutClient")
            .field("base_url", &self.base_url)
            .field("has_credentials", &self.has_credentials())
            .field("time_offset", &self.time_offset())
            .finish()
    }
}

fn header_value(value: &str) -> RestResult<HeaderValue> {
    HeaderValue::from_str(value).map_err(|_| {
        AuthError::InvalidCredentials("value is not a valid HTTP header".to_string()).into()
    })
}

fn api_error_from_response(response: &HttpResponse) -> ApiError {
    match serde_json::from_slice::<ErrorBody>(&response.body) {
        Ok(body) => {
            let err = ApiError::from(body);
            warn!(status = response.status, code = %err.code, message = %err.message, "API error");
            err
        }
        Err(e) => {
            let raw = String::from_utf8_lossy(&response.body).into_owned();
            warn!(status = response.status, error = %e, "Unparseable error body");
            ApiError::unknown(raw)
        }
    }
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API credentials (optional)
    pub credentials: Option<Credentials>,
    /// REST base URL
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Custom user agent
    pub user_agent: Option<String>,
    /// Proxy URL for all requests
    pub proxy: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            credentials: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: None,
            proxy: None,
        }
    }
}

impl ClientConfig {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from the environment
    ///
    /// Credentials come from `BITNUT_API_KEY` / `BITNUT_SECRET_KEY`; with
    /// neither set the client is public-only. `BITNUT_BASE_URL` overrides the
    /// base URL.
    ///
    /// # Errors
    /// Returns [`AuthError::EnvVarNotSet`] when only one of the key pair is set.
    pub fn from_env() -> RestResult<Self> {
        let mut config = Self::default();

        let has_key = std::env::var_os(API_KEY_ENV).is_some();
        let has_secret = std::env::var_os(SECRET_KEY_ENV).is_some();
        if has_key || has_secret {
            config.credentials = Some(Credentials::from_env()?);
        } else {
            debug!("No credentials in environment, public endpoints only");
        }

        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            config.base_url = base_url;
        }

        Ok(config)
    }

    /// Set credentials
    #[must_use]
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Set the base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set timeout
    #[must_use]
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set user agent
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Route requests through a proxy
    #[must_use]
    pub fn with_proxy(mut self, proxy_url: impl Into<String>) -> Self {
        self.proxy = Some(proxy_url.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::SecurityType;

    struct FixedClock(i64);

    impl Clock for FixedClock {
        fn now_millis(&self) -> i64 {
            self.0
        }
    }

    fn client(credentials: Option<Credentials>) -> BitnutClient {
        let mut config = ClientConfig::new().with_base_url("https://api.test/");
        config.credentials = credentials;
        BitnutClient::with_config(config)
            .unwrap()
            .with_clock(Arc::new(FixedClock(1_700_000_000_000)))
    }

    fn creds() -> Credentials {
        Credentials::new("my-api-key", "secret").unwrap()
    }

    #[test]
    fn test_client_without_credentials() {
        let client = BitnutClient::new().unwrap();
        assert!(!client.has_credentials());
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_client_config_builder() {
        let config = ClientConfig::new()
            .with_timeout(60)
            .with_user_agent("test-agent")
            .with_base_url("http://localhost:8080");

        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.user_agent, Some("test-agent".to_string()));
        assert_eq!(config.base_url, "http://localhost:8080");
    }

    #[test]
    fn test_config_from_env() {
        // Env vars are process-wide; every case runs in this one test
        std::env::remove_var(API_KEY_ENV);
        std::env::remove_var(SECRET_KEY_ENV);
        std::env::remove_var(BASE_URL_ENV);

        let config = ClientConfig::from_env().unwrap();
        assert!(config.credentials.is_none());
        assert_eq!(config.base_url, DEFAULT_BASE_URL);

        std::env::set_var(API_KEY_ENV, "only-the-key");
        match ClientConfig::from_env() {
            Err(RestError::Auth(AuthError::EnvVarNotSet(var))) => assert_eq!(var, SECRET_KEY_ENV),
            other => panic!("Expected missing secret, got {other:?}"),
        }

        std::env::remove_var(API_KEY_ENV);
        std::env::set_var(SECRET_KEY_ENV, "only-the-secret");
        match ClientConfig::from_env() {
            Err(RestError::Auth(AuthError::EnvVarNotSet(var))) => assert_eq!(var, API_KEY_ENV),
            other => panic!("Expected missing key, got {other:?}"),
        }

        std::env::set_var(API_KEY_ENV, "env-key");
        std::env::set_var(BASE_URL_ENV, "https://api.env.test");
        let config = ClientConfig::from_env().unwrap();
        assert_eq!(
            config.credentials.as_ref().map(Credentials::api_key),
            Some("env-key")
        );
        assert_eq!(config.base_url, "https://api.env.test");

        std::env::remove_var(API_KEY_ENV);
        std::env::remove_var(SECRET_KEY_ENV);
        std::env::remove_var(BASE_URL_ENV);
    }

    #[test]
    fn test_invalid_proxy_is_client_build_error() {
        let config = ClientConfig::new().with_proxy("http://proxy.invalid:99999");
        assert!(matches!(
            BitnutClient::with_config(config),
            Err(RestError::ClientBuild(_))
        ));
    }

    #[test]
    fn test_auth_required_error() {
        let client = client(None);
        assert!(matches!(client.account(), Err(RestError::AuthRequired)));
        assert!(matches!(client.trading(), Err(RestError::AuthRequired)));
    }

    #[test]
    fn test_prepare_public_request() {
        let client = client(None);
        let mut request = Request::get("/v1/tick/depth");
        request.set_param("symbol", "BTCUSDT");

        let signed = client.prepare(request, &[]).unwrap();
        assert_eq!(signed.url, "https://api.test/v1/tick/depth?symbol=BTCUSDT");
        assert!(signed.body.is_empty());
        assert!(signed.header(API_KEY_HEADER).is_none());
        assert!(signed.header(CONTENT_TYPE.as_str()).is_none());
    }

    #[test]
    fn test_prepare_omits_question_mark_without_query() {
        let client = client(None);
        let signed = client.prepare(Request::get("/v1/time"), &[]).unwrap();
        assert_eq!(signed.url, "https://api.test/v1/time");
    }

    #[test]
    fn test_prepare_api_key_request() {
        let client = client(Some(creds()));
        let request = Request::get("/v1/user/stream").with_security(SecurityType::ApiKey);

        let signed = client.prepare(request, &[]).unwrap();
        assert_eq!(signed.header(API_KEY_HEADER), Some("my-api-key"));
        assert!(signed.header(SIGNATURE_HEADER).is_none());
        assert!(signed.query_param(TIMESTAMP_KEY).is_none());
    }

    #[test]
    fn test_prepare_signed_request() {
        let client = client(Some(creds()));
        let mut request = Request::post("/v1/asset/balance").with_security(SecurityType::Signed);
        request.set_form_param("coin", "BTC");

        let signed = client.prepare(request, &[]).unwrap();
        assert_eq!(signed.url, "https://api.test/v1/asset/balance?timestamp=1700000000000");
        assert_eq!(signed.body, "coin=BTC");
        assert_eq!(signed.header("content-type"), Some(FORM_CONTENT_TYPE));
        assert_eq!(signed.header(API_KEY_HEADER), Some("my-api-key"));
        assert_eq!(
            signed.header(SIGNATURE_HEADER),
            Some("Ob+zqo7lkcJ+hTHFna5DgPna2d58zjCaFSUSEDVnaec=")
        );
    }

    #[test]
    fn test_signed_request_without_credentials() {
        let client = client(None);
        let request = Request::post("/v1/asset/balance").with_security(SecurityType::Signed);
        assert!(matches!(
            client.prepare(request, &[]),
            Err(RestError::AuthRequired)
        ));
    }

    #[test]
    fn test_timestamp_applies_offset() {
        let client = client(Some(creds()));
        client.set_time_offset(250);

        let request = Request::get("/v1/spot/user/order").with_security(SecurityType::Signed);
        let signed = client.prepare(request, &[]).unwrap();
        assert_eq!(
            signed.query_param(TIMESTAMP_KEY).as_deref(),
            Some("1699999999750")
        );
    }

    #[test]
    fn test_caller_headers_are_kept() {
        let client = client(Some(creds()));
        let option = RequestOption::header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("req-1"),
        );
        let request = Request::post("/v1/trade/cancel").with_security(SecurityType::Signed);

        let signed = client.prepare(request, &[option]).unwrap();
        assert_eq!(signed.header("x-request-id"), Some("req-1"));
        assert!(signed.header(SIGNATURE_HEADER).is_some());
    }

    #[test]
    fn test_validation_runs_after_options() {
        let client = client(None);
        let option = RequestOption::new(|r| r.set_path(""));
        assert!(matches!(
            client.prepare(Request::get("/v1/time"), &[option]),
            Err(RestError::Validation(_))
        ));
    }

    #[test]
    fn test_clones_share_offset() {
        let client = client(None);
        let clone = client.clone();
        client.set_time_offset(42);
        assert_eq!(clone.time_offset(), 42);
    }
}
