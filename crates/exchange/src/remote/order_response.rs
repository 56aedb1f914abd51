use serde::Deserialize;
use serde_json::Value;

/// Envelope shared by every OKX v5 REST response.
#[derive(Deserialize, Debug)]
pub struct OkxResponse<T> {
    #[serde(default)]
    pub code: Value,
    #[serde(default)]
    pub msg: String,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

impl<T> OkxResponse<T> {
    pub fn is_success(&self) -> bool {
        match &self.code {
            Value::String(code) => code == "0",
            Value::Number(code) => code.as_i64() == Some(0),
            _ => false,
        }
    }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct OrderAck {
    #[serde(default)]
    pub ord_id: Option<String>,
    #[serde(default)]
    pub s_code: Option<String>,
    #[serde(default)]
    pub s_msg: Option<String>,
}

/// True when `raw` is an OKX envelope with `code` 0.
pub fn response_ok(raw: &Value) -> bool {
    OkxResponse::<Value>::deserialize(raw)
        .map(|response| response.is_success())
        .unwrap_or(false)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Pulls the order id out of `data[0].ordId`. On failure returns the most
/// specific reason the response offers.
pub fn order_id_from(raw: &Value) -> Result<String, String> {
    let response: OkxResponse<OrderAck> = serde_json::from_value(raw.clone())
        .map_err(|e| format!("unexpected response shape: {}", e))?;

    let envelope_msg = non_empty(Some(response.msg));
    let ack = response
        .data
        .into_iter()
        .next()
        .ok_or_else(|| envelope_msg.clone().unwrap_or_else(|| "response has no data".to_string()))?;

    let accepted = ack.s_code.as_deref().is_none_or(|code| code == "0");
    match non_empty(ack.ord_id) {
        Some(ord_id) if accepted => Ok(ord_id),
        _ => Err(non_empty(ack.s_msg)
            .or(envelope_msg)
            .unwrap_or_else(|| "response has no ordId".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_order_id_from_bare_data() {
        let raw = json!({"data": [{"ordId": "123"}]});
        assert_eq!(order_id_from(&raw), Ok("123".to_string()));
    }

    #[test]
    fn test_order_id_from_full_ack() {
        let raw = json!({
            "code": "0",
            "msg": "",
            "data": [{"clOrdId": "", "ordId": "312269865356374016", "sCode": "0", "sMsg": ""}]
        });
        assert_eq!(order_id_from(&raw), Ok("312269865356374016".to_string()));
    }

    #[test]
    fn test_empty_data_is_rejected() {
        assert_eq!(
            order_id_from(&json!({"data": []})),
            Err("response has no data".to_string())
        );
        assert_eq!(
            order_id_from(&json!({"code": "50113", "msg": "Invalid Sign", "data": []})),
            Err("Invalid Sign".to_string())
        );
    }

    #[test]
    fn test_rejected_order_uses_s_msg() {
        let raw = json!({
            "code": "1",
            "msg": "All operations failed",
            "data": [{"ordId": "", "sCode": "51008", "sMsg": "Order failed. Insufficient margin"}]
        });
        assert_eq!(
            order_id_from(&raw),
            Err("Order failed. Insufficient margin".to_string())
        );
    }

    #[test]
    fn test_malformed_response() {
        assert!(order_id_from(&json!({"error": "connection reset"})).is_err());
        assert!(order_id_from(&json!({"data": "nope"})).is_err());
        assert!(order_id_from(&json!({"data": [{}]})).is_err());
    }

    #[test]
    fn test_response_ok() {
        assert!(response_ok(&json!({"code": "0", "msg": "", "data": []})));
        assert!(!response_ok(&json!({"code": "51400", "msg": "Cancellation failed"})));
        assert!(!response_ok(&json!({"error": "timeout"})));
        assert!(!response_ok(&json!("not an object")));
    }

    #[test]
    fn test_envelope_success_code() {
        let ok: OkxResponse<Value> = serde_json::from_value(json!({"code": "0"})).unwrap();
        assert!(ok.is_success());
        let numeric: OkxResponse<Value> = serde_json::from_value(json!({"code": 0})).unwrap();
        assert!(numeric.is_success());
        let failed: OkxResponse<Value> =
            serde_json::from_value(json!({"code": "51000", "msg": "Parameter lever error"})).unwrap();
        assert!(!failed.is_success());
    }
}
