//! Trading endpoints for order management
//!
//! These endpoints require authentication.

use super::{impl_call_settings, CallContext};
use crate::client::BitnutClient;
use crate::error::RestResult;
use crate::request::{Request, SecurityType};
use crate::types::{Envelope, Order, OrderListQuery, OrderLookup, OrderRequest};
use tracing::{debug, instrument};

const CREATE_ORDER_PATH: &str = "/v1/trade/order";
const ORDER_INFO_PATH: &str = "/v1/spot/user/orderInfo";
const LIST_ORDERS_PATH: &str = "/v1/spot/user/order";
const CANCEL_ORDER_PATH: &str = "/v1/trade/cancel";
const CANCEL_OPEN_ORDERS_PATH: &str = "/v1/trade/open-cancel";

/// Trading endpoints for order management
pub struct TradingEndpoints<'a> {
    call: CallContext<'a>,
}

impl_call_settings!(TradingEndpoints);

impl<'a> TradingEndpoints<'a> {
    pub fn new(client: &'a BitnutClient) -> Self {
        Self {
            call: CallContext::new(client),
        }
    }

    /// Place a new order
    ///
    /// # Returns
    /// The order IDs assigned by the exchange
    #[instrument(
        skip(self, order),
        fields(symbol = %order.symbol, side = %order.side, order_type = %order.order_type)
    )]
    pub async fn create_order(&self, order: &OrderRequest) -> RestResult<Vec<String>> {
        let mut request = Request::post(CREATE_ORDER_PATH).with_security(SecurityType::Signed);
        request
            .set_form_param("symbol", &order.symbol)
            .set_form_param("side", order.side)
            .set_form_param("type", order.order_type);

        if let Some(quantity) = &order.quantity {
            request.set_form_param("quantity", quantity);
        }
        if let Some(quote_order_qty) = &order.quote_order_qty {
            request.set_form_param("quoteOrderQty", quote_order_qty);
        }
        if let Some(price) = &order.price {
            request.set_form_param("price", price);
        }
        if let Some(client_order_id) = &order.client_order_id {
            request.set_form_param("newClientOrderId", client_order_id);
        }

        debug!("Placing {} {} order for {}", order.side, order.order_type, order.symbol);

        let envelope: Envelope<Vec<String>> = self.call.send_json(request).await?;
        envelope.into_data()
    }

    /// Query a single order
    ///
    /// The symbol is sent both as a query parameter and in the signed body.
    #[instrument(skip(self))]
    pub async fn get_order(&self, symbol: &str, lookup: &OrderLookup) -> RestResult<Order> {
        let mut request = Request::post(ORDER_INFO_PATH).with_security(SecurityType::Signed);
        request.set_param("symbol", symbol);
        request.set_form_param("symbol", symbol);

        match lookup {
            OrderLookup::OrderId(id) => request.set_form_param("orderId", id),
            OrderLookup::ClientOrderId(id) => request.set_form_param("origClientOrderId", id),
        };

        let envelope: Envelope<Order> = self.call.send_json(request).await?;
        envelope.into_data()
    }

    /// List orders on a symbol: active, canceled or filled
    ///
    /// This endpoint answers with a bare array, not an envelope.
    #[instrument(skip(self))]
    pub async fn list_orders(&self, query: &OrderListQuery) -> RestResult<Vec<Order>> {
        let mut request = Request::get(LIST_ORDERS_PATH).with_security(SecurityType::Signed);
        request.set_param("symbol", &query.symbol);

        if let Some(order_id) = query.order_id {
            request.set_param("orderId", order_id);
        }
        if let Some(start_time) = query.start_time {
            request.set_param("startTime", start_time);
        }
        if let Some(end_time) = query.end_time {
            request.set_param("endTime", end_time);
        }
        if let Some(limit) = query.limit {
            request.set_param("limit", limit);
        }

        self.call.send_json(request).await
    }

    /// Cancel an order
    ///
    /// Without `order_id` the exchange decides which orders on `symbol` match.
    #[instrument(skip(self))]
    pub async fn cancel_order(
        &self,
        symbol: &str,
        order_id: Option<&str>,
    ) -> RestResult<Vec<serde_json::Value>> {
        let mut request = Request::post(CANCEL_ORDER_PATH).with_security(SecurityType::Signed);
        request.set_form_param("symbol", symbol);
        if let Some(order_id) = order_id {
            request.set_form_param("orderId", order_id);
        }

        let envelope: Envelope<Vec<serde_json::Value>> = self.call.send_json(request).await?;
        envelope.into_data()
    }

    /// Cancel all open orders on a symbol
    #[instrument(skip(self))]
    pub async fn cancel_open_orders(&self, symbol: &str) -> RestResult<Vec<serde_json::Value>> {
        let mut request =
            Request::post(CANCEL_OPEN_ORDERS_PATH).with_security(SecurityType::Signed);
        request.set_form_param("symbol", symbol);

        let envelope: Envelope<Vec<serde_json::Value>> = self.call.send_json(request).await?;
        envelope.into_data()
    }
}
