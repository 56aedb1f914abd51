use thiserror::Error;

pub mod okx_client;
pub mod order_response;
pub mod requests;
pub mod signer;

pub use okx_client::OkxClient;
pub use order_response::{OkxResponse, OrderAck, order_id_from, response_ok};
pub use requests::{CancelOrderRequest, MarginMode, OrderType, PlaceOrderRequest, SetLeverageRequest};
pub use signer::{AuthHeaders, Signer};

pub const SET_LEVERAGE_PATH: &str = "/api/v5/account/set-leverage";
pub const CANCEL_ORDER_PATH: &str = "/api/v5/trade/cancel-order";
pub const PLACE_ORDER_PATH: &str = "/api/v5/trade/order";

#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("request to OKX failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("OKX returned a non-JSON body (HTTP {status}): {body}")]
    Decode { status: u16, body: String },
    #[error("failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("invalid OKX base url: {0}")]
    Url(#[from] url::ParseError),
}
