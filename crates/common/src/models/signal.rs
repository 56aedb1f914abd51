use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

pub const DEFAULT_QUANTITY: &str = "1";
pub const DEFAULT_LEVERAGE: &str = "10";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("invalid value {value:?} for field `{field}`")]
    InvalidValue { field: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }
}

impl FromStr for Side {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "buy" => Ok(Side::Buy),
            "sell" => Ok(Side::Sell),
            _ => Err(ValidationError::InvalidValue {
                field: "side",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionSide {
    Long,
    Short,
    Net,
}

impl PositionSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            PositionSide::Long => "long",
            PositionSide::Short => "short",
            PositionSide::Net => "net",
        }
    }
}

impl FromStr for PositionSide {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "long" => Ok(PositionSide::Long),
            "short" => Ok(PositionSide::Short),
            "net" => Ok(PositionSide::Net),
            _ => Err(ValidationError::InvalidValue {
                field: "posSide",
                value: s.to_string(),
            }),
        }
    }
}

/// Raw webhook body. Every field is optional here; `TradeSignal::try_from`
/// decides what is required.
#[derive(Deserialize, Default, Clone)]
pub struct WebhookPayload {
    #[serde(default)]
    pub secret: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub limit_price: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub take_profit: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub quantity: Option<String>,
    /// OKX spelling of `quantity`; `quantity` wins when both are sent.
    #[serde(default, deserialize_with = "string_or_number")]
    pub sz: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub leverage: Option<String>,
    #[serde(default)]
    pub side: Option<String>,
    #[serde(default, rename = "posSide")]
    pub pos_side: Option<String>,
}

impl fmt::Debug for WebhookPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookPayload")
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("symbol", &self.symbol)
            .field("limit_price", &self.limit_price)
            .field("take_profit", &self.take_profit)
            .field("quantity", &self.quantity)
            .field("sz", &self.sz)
            .field("leverage", &self.leverage)
            .field("side", &self.side)
            .field("pos_side", &self.pos_side)
            .finish()
    }
}

// TradingView alerts send `{{close}}` style placeholders unquoted, so prices
// may arrive as JSON numbers.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    }))
}

/// A validated signal with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TradeSignal {
    pub symbol: String,
    pub limit_price: String,
    pub take_profit: String,
    pub quantity: String,
    pub leverage: String,
    pub side: Side,
    pub pos_side: PositionSide,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn required(field: &'static str, value: Option<String>) -> Result<String, ValidationError> {
    non_blank(value).ok_or(ValidationError::MissingField(field))
}

impl TryFrom<WebhookPayload> for TradeSignal {
    type Error = ValidationError;

    fn try_from(payload: WebhookPayload) -> Result<Self, Self::Error> {
        let side = match non_blank(payload.side) {
            Some(s) => s.parse()?,
            None => Side::Buy,
        };
        let pos_side = match non_blank(payload.pos_side) {
            Some(s) => s.parse()?,
            None => PositionSide::Long,
        };

        Ok(Self {
            symbol: required("symbol", payload.symbol)?,
            limit_price: required("limit_price", payload.limit_price)?,
            take_profit: required("take_profit", payload.take_profit)?,
            quantity: non_blank(payload.quantity)
                .or_else(|| non_blank(payload.sz))
                .unwrap_or_else(|| DEFAULT_QUANTITY.to_string()),
            leverage: non_blank(payload.leverage).unwrap_or_else(|| DEFAULT_LEVERAGE.to_string()),
            side,
            pos_side,
        })
    }
}
