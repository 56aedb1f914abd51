use serde::{Deserialize, Serialize};

/// The single order this bot is tracking. Stored as `{"ordId": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentOrder {
    #[serde(rename = "ordId")]
    pub ord_id: String,
}

impl CurrentOrder {
    pub fn new(ord_id: impl Into<String>) -> Self {
        Self {
            ord_id: ord_id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_with_okx_field_name() {
        let order = CurrentOrder::new("123");
        let json = serde_json::to_string(&order).unwrap();
        assert_eq!(json, r#"{"ordId":"123"}"#);

        let back: CurrentOrder = serde_json::from_str(&json).unwrap();
        assert_eq!(back, order);
    }
}
