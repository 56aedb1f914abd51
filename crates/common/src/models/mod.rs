pub mod order;
pub mod signal;

pub use order::CurrentOrder;
pub use signal::{PositionSide, Side, TradeSignal, ValidationError, WebhookPayload};
