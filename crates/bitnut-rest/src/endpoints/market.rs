//! Public market data endpoints
//!
//! These endpoints don't require authentication.

use super::{impl_call_settings, CallContext};
use crate::client::BitnutClient;
use crate::error::{RestError, RestResult};
use crate::request::Request;
use crate::types::{Depth, Envelope, OneOrMany, ServerTime, SymbolTicker, TickerQuery};
use tracing::{debug, info, instrument};

const SERVER_TIME_PATH: &str = "/v1/time";
const DEPTH_PATH: &str = "/v1/tick/depth";
const TICKER_PATH: &str = "/v1/tick/24info";

/// Public market data endpoints
pub struct MarketEndpoints<'a> {
    call: CallContext<'a>,
}

impl_call_settings!(MarketEndpoints);

impl<'a> MarketEndpoints<'a> {
    pub fn new(client: &'a BitnutClient) -> Self {
        Self {
            call: CallContext::new(client),
        }
    }

    /// Get server time in milliseconds since the Unix epoch
    #[instrument(skip(self))]
    pub async fn server_time(&self) -> RestResult<i64> {
        debug!("Fetching server time");

        let envelope: Envelope<ServerTime> =
            self.call.send_json(Request::get(SERVER_TIME_PATH)).await?;
        Ok(envelope.into_data()?.ts)
    }

    /// Measure `local - server` time and store it on the client
    ///
    /// Returns the new offset in milliseconds.
    #[instrument(skip(self))]
    pub async fn sync_clock_offset(&self) -> RestResult<i64> {
        let server_time = self.server_time().await?;
        let offset = self.call.client.local_time() - server_time;
        self.call.client.set_time_offset(offset);

        info!(offset_ms = offset, "Synchronized clock offset");
        Ok(offset)
    }

    /// Get order book depth
    ///
    /// # Arguments
    /// * `symbol` - Trading symbol (e.g., "BTCUSDT")
    /// * `limit` - Maximum number of levels per side
    #[instrument(skip(self))]
    pub async fn depth(&self, symbol: &str, limit: Option<u32>) -> RestResult<Depth> {
        let mut request = Request::get(DEPTH_PATH);
        request.set_param("symbol", symbol);
        if let Some(limit) = limit {
            request.set_param("limit", limit);
        }

        debug!("Fetching depth for {}", symbol);

        let envelope: Envelope<Depth> = self.call.send_json(request).await?;
        envelope.into_data()
    }

    /// Get 24h rolling ticker statistics
    ///
    /// The endpoint answers with a bare object for a single symbol and an
    /// array otherwise; both come back as a list.
    #[instrument(skip(self))]
    pub async fn tickers(&self, query: TickerQuery) -> RestResult<Vec<SymbolTicker>> {
        let mut request = Request::get(TICKER_PATH);
        match &query {
            TickerQuery::All => {}
            TickerQuery::Symbol(symbol) => {
                request.set_param("symbol", symbol);
            }
            TickerQuery::Symbols(symbols) => {
                let symbols = serde_json::to_string(symbols)
                    .map_err(|e| RestError::Validation(format!("cannot encode symbols: {e}")))?;
                request.set_param("symbols", symbols);
            }
        }

        let tickers: OneOrMany<SymbolTicker> = self.call.send_json(request).await?;
        Ok(tickers.into_vec())
    }
}
