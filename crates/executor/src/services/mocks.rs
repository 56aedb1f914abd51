use async_trait::async_trait;
use common::models::CurrentOrder;
use exchange::remote::{CancelOrderRequest, PlaceOrderRequest, SetLeverageRequest};
use exchange::{ExchangeError, TradeApi};
use mockall::mock;
use serde_json::Value;
use storage::{OrderStore, StoreError};

mock! {
    pub Api {}

    #[async_trait]
    impl TradeApi for Api {
        async fn set_leverage(&self, request: &SetLeverageRequest) -> Result<Value, ExchangeError>;
        async fn cancel_order(&self, request: &CancelOrderRequest) -> Result<Value, ExchangeError>;
        async fn place_order(&self, request: &PlaceOrderRequest) -> Result<Value, ExchangeError>;
    }
}

mock! {
    pub Store {}

    #[async_trait]
    impl OrderStore for Store {
        async fn get(&self) -> Result<Option<CurrentOrder>, StoreError>;
        async fn set(&self, order: &CurrentOrder) -> Result<(), StoreError>;
        async fn clear(&self) -> Result<(), StoreError>;
    }
}
