pub mod remote;
pub mod traits;

pub use remote::{ExchangeError, OkxClient};
pub use traits::TradeApi;
