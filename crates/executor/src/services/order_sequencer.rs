use std::sync::Arc;

use common::models::{CurrentOrder, TradeSignal};
use exchange::remote::{
    CancelOrderRequest, PlaceOrderRequest, SetLeverageRequest, order_id_from, response_ok,
};
use exchange::{ExchangeError, TradeApi};
use serde_json::{Value, json};
use storage::{OrderStore, StoreError};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

#[derive(Error, Debug)]
pub enum PlacementError {
    #[error("{0}")]
    Transport(#[source] ExchangeError),
    #[error("{message}")]
    Rejected { message: String, response: Value },
}

impl PlacementError {
    /// What the exchange said, or `{"error": ...}` when nothing came back.
    pub fn raw_response(&self) -> Value {
        match self {
            PlacementError::Transport(e) => json!({ "error": e.to_string() }),
            PlacementError::Rejected { response, .. } => response.clone(),
        }
    }
}

#[derive(Error, Debug)]
pub enum SequenceError {
    #[error(transparent)]
    Placement(#[from] PlacementError),
    #[error("order store unavailable: {0}")]
    Store(#[from] StoreError),
    #[error("order {order_id} was placed but could not be saved: {source}")]
    Persist {
        order_id: String,
        #[source]
        source: StoreError,
    },
}

/// Runs set-leverage, cancel-previous and place for one signal, and keeps the
/// store pointing at the order it placed.
pub struct OrderSequencer {
    api: Arc<dyn TradeApi>,
    store: Arc<dyn OrderStore>,
    // One signal at a time: the store read, cancel, clear and save must not
    // interleave with another signal's.
    lock: Mutex<()>,
}

impl OrderSequencer {
    pub fn new(api: Arc<dyn TradeApi>, store: Arc<dyn OrderStore>) -> Self {
        Self {
            api,
            store,
            lock: Mutex::new(()),
        }
    }

    pub async fn execute(&self, signal: &TradeSignal) -> Result<String, SequenceError> {
        let _guard = self.lock.lock().await;

        self.set_leverage(signal).await;
        self.cancel_previous(signal).await?;

        let order_id = self.place(signal).await?;
        if let Err(source) = self.store.set(&CurrentOrder::new(order_id.clone())).await {
            error!("Order {} placed but not saved: {}", order_id, source);
            return Err(SequenceError::Persist { order_id, source });
        }

        info!("ORDER PLACED: ID={} {}", order_id, signal.symbol);
        Ok(order_id)
    }

    async fn set_leverage(&self, signal: &TradeSignal) {
        let request = SetLeverageRequest::isolated(signal);
        match self.api.set_leverage(&request).await {
            Ok(resp) if response_ok(&resp) => {
                info!("Leverage set to {}x on {}", request.lever, request.inst_id)
            }
            Ok(resp) => warn!("Set leverage on {} rejected: {}", request.inst_id, resp),
            Err(e) => warn!("Set leverage on {} failed: {}", request.inst_id, e),
        }
    }

    /// Best effort. Whatever the cancel outcome, the stored id is dropped.
    async fn cancel_previous(&self, signal: &TradeSignal) -> Result<(), StoreError> {
        let Some(previous) = self.store.get().await? else {
            return Ok(());
        };

        let request = CancelOrderRequest::new(signal.symbol.clone(), previous.ord_id);
        match self.api.cancel_order(&request).await {
            Ok(resp) if response_ok(&resp) => info!("Cancelled previous order {}", request.ord_id),
            Ok(resp) => warn!("Cancel of order {} not confirmed: {}", request.ord_id, resp),
            Err(e) => warn!("Cancel of order {} failed: {}", request.ord_id, e),
        }

        self.store.clear().await
    }

    async fn place(&self, signal: &TradeSignal) -> Result<String, PlacementError> {
        let request = PlaceOrderRequest::limit_with_take_profit(signal);
        info!("Placing order: {:?}", request);

        let response = self
            .api
            .place_order(&request)
            .await
            .map_err(PlacementError::Transport)?;

        order_id_from(&response).map_err(|message| {
            error!("ORDER FAILED: {} response={}", message, response);
            PlacementError::Rejected {
                message,
                response: response.clone(),
            }
        })
    }
}
