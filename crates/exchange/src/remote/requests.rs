use common::models::{PositionSide, Side, TradeSignal};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarginMode {
    Isolated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    Limit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetLeverageRequest {
    pub inst_id: String,
    pub lever: String,
    pub mgn_mode: MarginMode,
}

impl SetLeverageRequest {
    pub fn isolated(signal: &TradeSignal) -> Self {
        Self {
            inst_id: signal.symbol.clone(),
            lever: signal.leverage.clone(),
            mgn_mode: MarginMode::Isolated,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelOrderRequest {
    pub inst_id: String,
    pub ord_id: String,
}

impl CancelOrderRequest {
    pub fn new(inst_id: impl Into<String>, ord_id: impl Into<String>) -> Self {
        Self {
            inst_id: inst_id.into(),
            ord_id: ord_id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub inst_id: String,
    pub td_mode: MarginMode,
    pub side: Side,
    pub pos_side: PositionSide,
    pub ord_type: OrderType,
    pub px: String,
    pub sz: String,
    pub tp_trigger_px: String,
    pub tp_ord_px: String,
}

impl PlaceOrderRequest {
    /// Isolated limit order whose attached take-profit triggers and fills at
    /// the same price.
    pub fn limit_with_take_profit(signal: &TradeSignal) -> Self {
        Self {
            inst_id: signal.symbol.clone(),
            td_mode: MarginMode::Isolated,
            side: signal.side,
            pos_side: signal.pos_side,
            ord_type: OrderType::Limit,
            px: signal.limit_price.clone(),
            sz: signal.quantity.clone(),
            tp_trigger_px: signal.take_profit.clone(),
            tp_ord_px: signal.take_profit.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn signal() -> TradeSignal {
        TradeSignal {
            symbol: "BTC-USDT-SWAP".to_string(),
            limit_price: "60000".to_string(),
            take_profit: "61000".to_string(),
            quantity: "0.01".to_string(),
            leverage: "10".to_string(),
            side: Side::Buy,
            pos_side: PositionSide::Long,
        }
    }

    #[test]
    fn test_set_leverage_body() {
        let body = serde_json::to_value(SetLeverageRequest::isolated(&signal())).unwrap();
        assert_eq!(
            body,
            json!({"instId": "BTC-USDT-SWAP", "lever": "10", "mgnMode": "isolated"})
        );
    }

    #[test]
    fn test_cancel_body() {
        let body = serde_json::to_string(&CancelOrderRequest::new("BTC-USDT-SWAP", "111")).unwrap();
        assert_eq!(body, r#"{"instId":"BTC-USDT-SWAP","ordId":"111"}"#);
    }

    #[test]
    fn test_place_order_body() {
        let body = serde_json::to_value(PlaceOrderRequest::limit_with_take_profit(&signal())).unwrap();
        assert_eq!(
            body,
            json!({
                "instId": "BTC-USDT-SWAP",
                "tdMode": "isolated",
                "side": "buy",
                "posSide": "long",
                "ordType": "limit",
                "px": "60000",
                "sz": "0.01",
                "tpTriggerPx": "61000",
                "tpOrdPx": "61000"
            })
        );
    }
}
