use async_trait::async_trait;
use common::config::ExchangeSettings;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, Request};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

use crate::remote::order_response::OkxResponse;
use crate::remote::requests::{CancelOrderRequest, PlaceOrderRequest, SetLeverageRequest};
use crate::remote::signer::Signer;
use crate::remote::{CANCEL_ORDER_PATH, ExchangeError, PLACE_ORDER_PATH, SET_LEVERAGE_PATH};
use crate::traits::TradeApi;

pub const HEADER_ACCESS_KEY: &str = "OK-ACCESS-KEY";
pub const HEADER_ACCESS_SIGN: &str = "OK-ACCESS-SIGN";
pub const HEADER_ACCESS_TIMESTAMP: &str = "OK-ACCESS-TIMESTAMP";
pub const HEADER_ACCESS_PASSPHRASE: &str = "OK-ACCESS-PASSPHRASE";
pub const HEADER_SIMULATED: &str = "x-simulated-trading";

#[derive(Clone)]
pub struct OkxClient {
    client: Client,
    base_url: Url,
    signer: Signer,
    simulated: bool,
}

impl OkxClient {
    pub fn new(settings: &ExchangeSettings) -> Result<Self, ExchangeError> {
        let mut builder = Client::builder();
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: Url::parse(&settings.base_url)?,
            signer: Signer::new(
                settings.api_key.clone(),
                settings.api_secret.clone(),
                settings.passphrase.clone(),
            ),
            simulated: settings.simulated,
        })
    }

    /// Serializes `payload` once and signs exactly the bytes that are sent.
    fn signed_post<B: Serialize>(&self, path: &str, payload: &B) -> Result<Request, ExchangeError> {
        let body = serde_json::to_string(payload)?;
        let auth = self.signer.headers(Method::POST.as_str(), path, &body);
        let url = self.base_url.join(path)?;

        let mut builder = self
            .client
            .request(Method::POST, url)
            .header(HEADER_ACCESS_KEY, auth.access_key)
            .header(HEADER_ACCESS_SIGN, auth.signature)
            .header(HEADER_ACCESS_TIMESTAMP, auth.timestamp)
            .header(HEADER_ACCESS_PASSPHRASE, auth.passphrase)
            .header(CONTENT_TYPE, "application/json")
            .body(body);
        if self.simulated {
            builder = builder.header(HEADER_SIMULATED, "1");
        }
        Ok(builder.build()?)
    }

    async fn post<B: Serialize + Sync>(&self, path: &str, payload: &B) -> Result<Value, ExchangeError> {
        let request = self.signed_post(path, payload)?;
        debug!("POST {}", path);

        let resp = self.client.execute(request).await?;
        let status = resp.status();
        let text = resp.text().await?;

        // OKX answers rejected calls with a JSON envelope too, often with a
        // non-2xx status, so the body is returned regardless of status.
        let body: Value = serde_json::from_str(&text).map_err(|_| ExchangeError::Decode {
            status: status.as_u16(),
            body: text.clone(),
        })?;

        match serde_json::from_value::<OkxResponse<Value>>(body.clone()) {
            Ok(envelope) if envelope.is_success() => info!("OKX {} -> ok", path),
            Ok(envelope) => warn!(
                "OKX {} -> HTTP {} code={} msg={}",
                path, status, envelope.code, envelope.msg
            ),
            Err(_) => warn!("OKX {} -> HTTP {} unrecognised body: {}", path, status, text),
        }
        Ok(body)
    }
}

#[async_trait]
impl TradeApi for OkxClient {
    async fn set_leverage(&self, request: &SetLeverageRequest) -> Result<Value, ExchangeError> {
        self.post(SET_LEVERAGE_PATH, request).await
    }

    async fn cancel_order(&self, request: &CancelOrderRequest) -> Result<Value, ExchangeError> {
        self.post(CANCEL_ORDER_PATH, request).await
    }

    async fn place_order(&self, request: &PlaceOrderRequest) -> Result<Value, ExchangeError> {
        self.post(PLACE_ORDER_PATH, request).await
    }
}
