pub mod routes;
pub mod state;
mod ws;

use axum::Router;
use core_sim::SharedMarket;

pub use state::{AppState, TradeRequest};

pub fn app(state: AppState) -> Router {
    routes::router(state)
}

/// Router plus the state handle the caller needs to drive ticks.
pub fn app_for_market(market: SharedMarket) -> (Router, AppState) {
    let state = AppState::new(market);
    (app(state.clone()), state)
}
