use async_trait::async_trait;
use serde_json::Value;

use crate::remote::ExchangeError;
use crate::remote::requests::{CancelOrderRequest, PlaceOrderRequest, SetLeverageRequest};

/// The three private trading endpoints the bot drives.
///
/// Every call returns the exchange's raw JSON body, whatever its `code`, so the
/// caller can decide what counts as a rejection and echo the body back for
/// diagnosis. `Err` is reserved for transport-level failures.
#[async_trait]
pub trait TradeApi: Send + Sync {
    async fn set_leverage(&self, request: &SetLeverageRequest) -> Result<Value, ExchangeError>;

    async fn cancel_order(&self, request: &CancelOrderRequest) -> Result<Value, ExchangeError>;

    async fn place_order(&self, request: &PlaceOrderRequest) -> Result<Value, ExchangeError>;
}
