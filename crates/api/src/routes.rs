use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use core_sim::{HistoryPoint, Position, PriceUpdate, TradeResult, Transaction};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::debug;

use crate::{
    state::{AppState, TradeRequest},
    ws,
};

pub const MISSING_FIELDS_MESSAGE: &str = "Action and shares are required";

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/stock/history", get(stock_history))
        .route("/api/stock/info", get(stock_info))
        .route("/api/user/position", get(user_position))
        .route("/api/user/transactions", get(user_transactions))
        .route("/api/trade", post(trade))
        .route("/ws", get(ws::market_socket))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn stock_history(State(state): State<AppState>) -> Json<Vec<HistoryPoint>> {
    Json(state.history())
}

async fn stock_info(State(state): State<AppState>) -> Json<PriceUpdate> {
    Json(state.stock_info())
}

async fn user_position(State(state): State<AppState>) -> Json<Position> {
    Json(state.position())
}

async fn user_transactions(State(state): State<AppState>) -> Json<Vec<Transaction>> {
    Json(state.transactions())
}

async fn trade(
    State(state): State<AppState>,
    payload: Result<Json<TradeRequest>, JsonRejection>,
) -> (StatusCode, Json<TradeResult>) {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            debug!(%rejection, "trade body rejected");
            TradeRequest::default()
        }
    };

    if !request.has_required_fields() {
        return (
            StatusCode::BAD_REQUEST,
            Json(TradeResult::rejected(MISSING_FIELDS_MESSAGE)),
        );
    }

    let result = state.execute_trade(&request);
    let status = if result.success {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };

    (status, Json(result))
}
