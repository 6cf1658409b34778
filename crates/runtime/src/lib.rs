pub mod engine;
pub mod logging;

pub use engine::{spawn_ticker, PriceTicker, TickerHandle, DEFAULT_TICK_PERIOD};
pub use logging::{init_tracing, DEFAULT_LOG_FILTER};
