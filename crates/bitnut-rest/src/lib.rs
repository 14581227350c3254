//! REST API client for the Bitnut cryptocurrency exchange
//!
//! This crate provides a REST client for trading on Bitnut, covering market
//! data, account balances and order management.
//!
//! # Features
//!
//! - **Market Data**: Server time, order book depth, 24h tickers
//! - **Account**: Coin balances
//! - **Trading**: Place, query, list and cancel orders
//!
//! # Authentication
//!
//! Signed endpoints carry a `timestamp` query parameter and an HMAC-SHA256
//! signature of the form body. Timestamps are corrected by a clock offset
//! that the caller refreshes with [`BitnutClient::sync_clock_offset`].
//!
//! # Example
//!
//! ```no_run
//! use bitnut_rest::{BitnutClient, Credentials, OrderRequest, Side};
//! use rust_decimal::Decimal;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Public endpoints (no auth required)
//!     let client = BitnutClient::new()?;
//!     let depth = client.get_depth("BTCUSDT", Some(5)).await?;
//!     println!("Best bid: {:?}", depth.best_bid());
//!
//!     // Private endpoints (auth required)
//!     let auth_client = BitnutClient::with_credentials(Credentials::from_env()?)?;
//!     auth_client.sync_clock_offset().await?;
//!
//!     let (quantity, price) = (Decimal::new(1, 3), Decimal::new(25_000, 0));
//!     let order = OrderRequest::limit("BTCUSDT", Side::Buy, quantity, price);
//!     let ids = auth_client.create_order(&order).await?;
//!     println!("Placed: {:?}", ids);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Request Options and Cancellation
//!
//! Endpoint groups accept [`RequestOption`]s, which run against each request
//! before signing, and a [`CancellationToken`] that aborts in-flight calls.
//!
//! This layer does not retry and does not rate limit.

pub mod client;
pub mod clock;
pub mod endpoints;
pub mod error;
pub mod options;
pub mod params;
pub mod request;
pub mod transport;
pub mod types;

// Re-export main types
pub use bitnut_auth::Credentials;
pub use client::{BitnutClient, ClientConfig};
pub use clock::{Clock, SystemClock};
pub use error::{ApiError, RestError, RestResult};
pub use options::{FullUrlReceiver, RequestOption};
pub use params::Params;
pub use request::{Request, SecurityType, SignedRequest};
pub use tokio_util::sync::CancellationToken;
pub use transport::{HttpResponse, Transport};

// Re-export endpoint-specific types
pub use types::{
    // Market data
    Depth, SymbolTicker, TickerQuery,
    // Account
    Balance,
    // Trading
    Order, OrderListQuery, OrderLookup, OrderRequest, OrderStatus, OrderType, Side,
    // Responses
    Envelope, ResponseCode,
};
