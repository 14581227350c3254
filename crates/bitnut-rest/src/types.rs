//! Types for Bitnut REST API requests and responses

use crate::error::{ApiError, RestResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Response Wrappers
// ============================================================================

/// Envelope code; some endpoints send numbers, others strings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ResponseCode {
    Number(i64),
    Text(String),
}

impl Default for ResponseCode {
    fn default() -> Self {
        Self::Number(0)
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Standard `{code, msg, data}` response wrapper
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    /// Status code reported by the exchange
    #[serde(default)]
    pub code: ResponseCode,
    /// Human readable status message
    #[serde(default)]
    pub msg: String,
    /// Payload (absent or null when the call failed)
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// Extract the payload
    ///
    /// A missing payload is reported as an [`ApiError`] carrying the
    /// envelope's code and message.
    pub fn into_data(self) -> RestResult<T> {
        match self.data {
            Some(data) => Ok(data),
            None => Err(ApiError::new(self.code.to_string(), self.msg).into()),
        }
    }
}

/// A JSON value that is either a single item or an array of items
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    /// Normalize into a list
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::Many(items) => items,
            Self::One(item) => vec![item],
        }
    }
}

/// Error body returned with HTTP status >= 400
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub code: ResponseCode,
    #[serde(alias = "msg")]
    pub message: String,
}

impl From<ErrorBody> for ApiError {
    fn from(body: ErrorBody) -> Self {
        ApiError::new(body.code.to_string(), body.message)
    }
}

// ============================================================================
// Enums
// ============================================================================

/// Order side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

/// Order type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    Limit,
    Market,
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Limit => write!(f, "LIMIT"),
            Self::Market => write!(f, "MARKET"),
        }
    }
}

/// Order status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    New,
    Filled,
    Canceled,
    /// Any status this client does not know about
    #[serde(other)]
    Unknown,
}

impl OrderStatus {
    /// Whether the order can no longer fill
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Filled | Self::Canceled)
    }
}

// ============================================================================
// Market Data Types
// ============================================================================

/// Server time payload
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ServerTime {
    /// Server time in milliseconds since the Unix epoch
    pub ts: i64,
}

/// Order book depth, `[price, quantity]` pairs
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Depth {
    #[serde(default)]
    pub bids: Vec<[String; 2]>,
    #[serde(default)]
    pub asks: Vec<[String; 2]>,
}

impl Depth {
    /// Best bid price
    pub fn best_bid(&self) -> Option<Decimal> {
        self.bids.first().and_then(|[price, _]| price.parse().ok())
    }

    /// Best ask price
    pub fn best_ask(&self) -> Option<Decimal> {
        self.asks.first().and_then(|[price, _]| price.parse().ok())
    }

    /// Best ask minus best bid
    pub fn spread(&self) -> Option<Decimal> {
        Some(self.best_ask()? - self.best_bid()?)
    }
}

/// 24-hour rolling ticker statistics
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolTicker {
    pub symbol: String,
    #[serde(default)]
    pub price_change: String,
    #[serde(default)]
    pub price_change_percent: String,
    #[serde(default)]
    pub high_price: String,
    #[serde(default)]
    pub low_price: String,
    #[serde(default)]
    pub last_price: String,
    #[serde(default)]
    pub volume: String,
    #[serde(default)]
    pub quote_volume: String,
}

impl SymbolTicker {
    /// Last traded price
    pub fn last(&self) -> Option<Decimal> {
        self.last_price.parse().ok()
    }

    /// 24h base volume
    pub fn volume_decimal(&self) -> Option<Decimal> {
        self.volume.parse().ok()
    }
}

/// Which tickers to fetch
#[derive(Debug, Clone, Default)]
pub enum TickerQuery {
    /// Every listed symbol
    #[default]
    All,
    /// A single symbol
    Symbol(String),
    /// Several symbols, sent as a JSON array
    Symbols(Vec<String>),
}

// ============================================================================
// Account Types
// ============================================================================

/// Balance of one coin
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Balance {
    pub coin: String,
    /// Available amount
    pub free: String,
    /// Amount locked in open orders
    #[serde(default)]
    pub freeze: String,
}

impl Balance {
    /// Available amount as a decimal
    pub fn free_decimal(&self) -> Option<Decimal> {
        self.free.parse().ok()
    }

    /// Locked amount as a decimal
    pub fn freeze_decimal(&self) -> Option<Decimal> {
        self.freeze.parse().ok()
    }

    /// Available plus locked
    pub fn total(&self) -> Option<Decimal> {
        Some(self.free_decimal()? + self.freeze_decimal()?)
    }
}

// ============================================================================
// Trading Types
// ============================================================================

/// Parameters for placing an order
#[derive(Debug, Clone)]
pub struct OrderRequest {
    /// Trading symbol (e.g., "BTCUSDT")
    pub symbol: String,
    /// Buy or sell
    pub side: Side,
    /// Limit or market
    pub order_type: OrderType,
    /// Base asset quantity
    pub quantity: Option<Decimal>,
    /// Quote asset amount (market orders)
    pub quote_order_qty: Option<Decimal>,
    /// Limit price
    pub price: Option<Decimal>,
    /// Client-assigned order ID
    pub client_order_id: Option<String>,
}

impl OrderRequest {
    /// Create an order with only the required fields set
    pub fn new(symbol: impl Into<String>, side: Side, order_type: OrderType) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            order_type,
            quantity: None,
            quote_order_qty: None,
            price: None,
            client_order_id: None,
        }
    }

    /// Create a limit order
    pub fn limit(symbol: impl Into<String>, side: Side, quantity: Decimal, price: Decimal) -> Self {
        Self::new(symbol, side, OrderType::Limit)
            .quantity(quantity)
            .price(price)
    }

    /// Create a market order for a base quantity
    pub fn market(symbol: impl Into<String>, side: Side, quantity: Decimal) -> Self {
        Self::new(symbol, side, OrderType::Market).quantity(quantity)
    }

    /// Create a market buy spending a quote amount
    pub fn market_quote(symbol: impl Into<String>, quote_order_qty: Decimal) -> Self {
        Self::new(symbol, Side::Buy, OrderType::Market).quote_order_qty(quote_order_qty)
    }

    #[must_use]
    pub fn quantity(mut self, quantity: Decimal) -> Self {
        self.quantity = Some(quantity);
        self
    }

    #[must_use]
    pub fn quote_order_qty(mut self, quote_order_qty: Decimal) -> Self {
        self.quote_order_qty = Some(quote_order_qty);
        self
    }

    #[must_use]
    pub fn price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    #[must_use]
    pub fn client_order_id(mut self, id: impl Into<String>) -> Self {
        self.client_order_id = Some(id.into());
        self
    }
}

/// How to identify an existing order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderLookup {
    /// Exchange-assigned order ID
    OrderId(String),
    /// Client-assigned order ID
    ClientOrderId(String),
}

/// Filters for listing orders
#[derive(Debug, Clone, Default)]
pub struct OrderListQuery {
    pub symbol: String,
    /// Return orders with ID >= this one
    pub order_id: Option<i64>,
    /// Start of the time range (ms)
    pub start_time: Option<i64>,
    /// End of the time range (ms)
    pub end_time: Option<i64>,
    /// Maximum number of orders
    pub limit: Option<u32>,
}

impl OrderListQuery {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn order_id(mut self, order_id: i64) -> Self {
        self.order_id = Some(order_id);
        self
    }

    #[must_use]
    pub fn time_range(mut self, start_time: i64, end_time: i64) -> Self {
        self.start_time = Some(start_time);
        self.end_time = Some(end_time);
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Order details
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub symbol: String,
    pub order_id: String,
    #[serde(default)]
    pub client_order_id: String,
    pub price: String,
    #[serde(rename = "origQty")]
    pub orig_quantity: String,
    #[serde(rename = "executedQty")]
    pub executed_quantity: String,
    pub status: OrderStatus,
    pub side: Side,
    /// Creation time (ms)
    pub time: i64,
    /// Last update time (ms)
    pub update_time: i64,
}

impl Order {
    /// Unfilled quantity
    pub fn remaining(&self) -> Option<Decimal> {
        let orig: Decimal = self.orig_quantity.parse().ok()?;
        let executed: Decimal = self.executed_quantity.parse().ok()?;
        Some(orig - executed)
    }
}
