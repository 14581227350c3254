//! Common test utilities: a scripted transport and a manual clock
//!
//! Response bodies mirror the shapes the Bitnut REST API returns.

#![allow(dead_code)]

use async_trait::async_trait;
use bitnut_rest::error::BoxError;
use bitnut_rest::{
    BitnutClient, ClientConfig, Clock, Credentials, HttpResponse, SignedRequest, Transport,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

pub const BASE_URL: &str = "https://api.test";
pub const API_KEY: &str = "test-api-key";
pub const SECRET_KEY: &str = "test-secret-key";

/// 2023-11-14T22:13:20Z
pub const LOCAL_NOW: i64 = 1_700_000_000_000;

pub const SERVER_TIME_RESPONSE: &str = r#"{"code":0,"msg":"ok","data":{"ts":1700000000000}}"#;

pub const BALANCE_RESPONSE: &str =
    r#"{"code":0,"msg":"ok","data":{"coin":"BTC","free":"1.5","freeze":"0"}}"#;

pub const DEPTH_RESPONSE: &str = r#"{
    "code": 0,
    "msg": "ok",
    "data": {
        "bids": [["29999.5", "0.8"], ["29999.0", "1.2"]],
        "asks": [["30000.5", "0.4"], ["30001.0", "2.0"]]
    }
}"#;

pub const SINGLE_TICKER_RESPONSE: &str = r#"{
    "symbol": "BTCUSDT",
    "priceChange": "150.00",
    "priceChangePercent": "0.50",
    "highPrice": "30100.00",
    "lowPrice": "29700.00",
    "lastPrice": "30000.00",
    "volume": "1234.5",
    "quoteVolume": "37035000.00"
}"#;

pub const TICKER_LIST_RESPONSE: &str = r#"[
    {"symbol": "BTCUSDT", "lastPrice": "30000.00", "volume": "1234.5"},
    {"symbol": "ETHUSDT", "lastPrice": "2000.00", "volume": "9876.5"}
]"#;

pub const CREATE_ORDER_RESPONSE: &str = r#"{"code":0,"msg":"ok","data":["88123456789"]}"#;

pub const ORDER_INFO_RESPONSE: &str = r#"{
    "code": "0",
    "msg": "ok",
    "data": {
        "symbol": "BTCUSDT",
        "orderId": "88123456789",
        "clientOrderId": "my-order-1",
        "price": "30000.00",
        "origQty": "0.010",
        "executedQty": "0.004",
        "status": "NEW",
        "side": "BUY",
        "time": 1700000000000,
        "updateTime": 1700000001000
    }
}"#;

pub const ORDER_LIST_RESPONSE: &str = r#"[
    {
        "symbol": "BTCUSDT",
        "orderId": "1",
        "clientOrderId": "a",
        "price": "29000.00",
        "origQty": "0.5",
        "executedQty": "0.5",
        "status": "FILLED",
        "side": "BUY",
        "time": 1699990000000,
        "updateTime": 1699990005000
    },
    {
        "symbol": "BTCUSDT",
        "orderId": "2",
        "clientOrderId": "b",
        "price": "31000.00",
        "origQty": "0.5",
        "executedQty": "0",
        "status": "CANCELED",
        "side": "SELL",
        "time": 1699995000000,
        "updateTime": 1699996000000
    }
]"#;

pub const CANCEL_RESPONSE: &str = r#"{"code":"0","msg":"ok","data":["88123456789"]}"#;

/// What the mock does with the next request
pub enum MockReply {
    Respond(HttpResponse),
    Fail(String),
    Hang,
}

/// Transport that replays queued replies and records every request
#[derive(Default)]
pub struct MockTransport {
    replies: Mutex<VecDeque<MockReply>>,
    requests: Mutex<Vec<SignedRequest>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, status: u16, body: &str) {
        self.push(MockReply::Respond(HttpResponse::new(status, body)));
    }

    pub fn fail(&self, message: &str) {
        self.push(MockReply::Fail(message.to_string()));
    }

    pub fn hang(&self) {
        self.push(MockReply::Hang);
    }

    pub fn requests(&self) -> Vec<SignedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> SignedRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was sent")
    }

    fn push(&self, reply: MockReply) {
        self.replies.lock().unwrap().push_back(reply);
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: SignedRequest) -> Result<HttpResponse, BoxError> {
        self.requests.lock().unwrap().push(request);
        let reply = self.replies.lock().unwrap().pop_front();

        match reply {
            Some(MockReply::Respond(response)) => Ok(response),
            Some(MockReply::Fail(message)) => Err(message.into()),
            Some(MockReply::Hang) => {
                std::future::pending::<()>().await;
                unreachable!()
            }
            None => Ok(HttpResponse::new(500, "no reply queued")),
        }
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock(AtomicI64);

impl ManualClock {
    pub fn new(now: i64) -> Arc<Self> {
        Arc::new(Self(AtomicI64::new(now)))
    }

    pub fn set(&self, now: i64) {
        self.0.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, ms: i64) {
        self.0.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

pub fn credentials() -> Credentials {
    Credentials::new(API_KEY, SECRET_KEY).unwrap()
}

/// Client over `transport` with credentials and a manual clock at `LOCAL_NOW`
pub fn signed_client(transport: &Arc<MockTransport>) -> (BitnutClient, Arc<ManualClock>) {
    let clock = ManualClock::new(LOCAL_NOW);
    let config = ClientConfig::new()
        .with_base_url(BASE_URL)
        .with_credentials(credentials());
    let client = BitnutClient::with_transport(config, transport.clone())
        .with_clock(clock.clone());
    (client, clock)
}

/// Client over `transport` without credentials
pub fn public_client(transport: &Arc<MockTransport>) -> BitnutClient {
    let config = ClientConfig::new().with_base_url(BASE_URL);
    BitnutClient::with_transport(config, transport.clone())
}
