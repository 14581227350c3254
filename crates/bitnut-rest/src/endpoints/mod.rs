//! API endpoint implementations

pub mod account;
pub mod market;
pub mod trading;

pub use account::AccountEndpoints;
pub use market::MarketEndpoints;
pub use trading::TradingEndpoints;

use crate::client::BitnutClient;
use crate::error::RestResult;
use crate::options::RequestOption;
use crate::request::Request;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

/// Per-group call settings shared by every endpoint in the group
struct CallContext<'a> {
    client: &'a BitnutClient,
    options: Vec<RequestOption>,
    cancel: CancellationToken,
}

impl<'a> CallContext<'a> {
    fn new(client: &'a BitnutClient) -> Self {
        Self {
            client,
            options: Vec::new(),
            cancel: CancellationToken::new(),
        }
    }

    async fn send(&self, request: Request) -> RestResult<Vec<u8>> {
        self.client
            .dispatch(request, &self.options, &self.cancel)
            .await
    }

    async fn send_json<T: DeserializeOwned>(&self, request: Request) -> RestResult<T> {
        let body = self.send(request).await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

macro_rules! impl_call_settings {
    ($group:ident) => {
        impl<'a> $group<'a> {
            /// Apply `option` to every request made through this group
            #[must_use]
            pub fn with_option(mut self, option: $crate::options::RequestOption) -> Self {
                self.call.options.push(option);
                self
            }

            /// Abort requests made through this group when `token` is cancelled
            #[must_use]
            pub fn with_cancellation(
                mut self,
                token: ::tokio_util::sync::CancellationToken,
            ) -> Self {
                self.call.cancel = token;
                self
            }
        }
    };
}

pub(crate) use impl_call_settings;
