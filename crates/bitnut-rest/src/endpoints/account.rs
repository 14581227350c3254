//! Private account endpoints
//!
//! These endpoints require authentication.

use super::{impl_call_settings, CallContext};
use crate::client::BitnutClient;
use crate::error::RestResult;
use crate::request::{Request, SecurityType};
use crate::types::{Balance, Envelope};
use tracing::instrument;

const BALANCE_PATH: &str = "/v1/asset/balance";

/// Private account endpoints
pub struct AccountEndpoints<'a> {
    call: CallContext<'a>,
}

impl_call_settings!(AccountEndpoints);

impl<'a> AccountEndpoints<'a> {
    pub fn new(client: &'a BitnutClient) -> Self {
        Self {
            call: CallContext::new(client),
        }
    }

    /// Get the balance of one coin
    ///
    /// # Arguments
    /// * `coin` - Asset symbol (e.g., "BTC")
    #[instrument(skip(self))]
    pub async fn balance(&self, coin: &str) -> RestResult<Balance> {
        let mut request = Request::post(BALANCE_PATH).with_security(SecurityType::Signed);
        request.set_form_param("coin", coin);

        let envelope: Envelope<Balance> = self.call.send_json(request).await?;
        envelope.into_data()
    }
}
