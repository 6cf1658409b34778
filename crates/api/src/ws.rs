use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use core_sim::{MarketEvent, TradeResult};
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use crate::state::{AppState, TradeRequest};

/// Frames a client may send, shaped like outbound events.
#[derive(Debug, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
enum ClientMessage {
    Trade(TradeRequest),
}

#[derive(Debug, Error)]
enum SendError {
    #[error("failed to encode event: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("socket closed: {0}")]
    Socket(#[from] axum::Error),
}

pub async fn market_socket(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| stream_market(socket, state))
}

async fn stream_market(mut socket: WebSocket, state: AppState) {
    let connection_id = state.next_connection_id();
    info!(connection_id, "client connected");

    // Subscribe first so nothing published during the greeting is missed.
    let mut events = state.subscribe_events();
    let greeting = [
        MarketEvent::StockInfo(state.stock_info()),
        MarketEvent::PositionUpdate(state.position()),
    ];
    for event in &greeting {
        if let Err(err) = send_event(&mut socket, event).await {
            debug!(connection_id, %err, "greeting failed");
            return;
        }
    }

    loop {
        tokio::select! {
            inbound = socket.recv() => {
                match inbound {
                    Some(Ok(Message::Text(text))) => {
                        let Some(result) = handle_client_message(&state, &text) else {
                            continue;
                        };
                        if let Err(err) = send_event(&mut socket, &MarketEvent::TradeResult(result)).await {
                            debug!(connection_id, %err, "trade result not delivered");
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(err)) => {
                        debug!(connection_id, %err, "socket receive failed");
                        break;
                    }
                }
            }
            event = events.recv() => {
                match event {
                    Ok(event) => {
                        if let Err(err) = send_event(&mut socket, &event).await {
                            debug!(connection_id, event = event.name(), %err, "broadcast not delivered");
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(connection_id, skipped, "subscriber lagged behind market events");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }
    }

    info!(connection_id, "client disconnected");
}

fn handle_client_message(state: &AppState, text: &str) -> Option<TradeResult> {
    match serde_json::from_str::<ClientMessage>(text) {
        Ok(ClientMessage::Trade(request)) => Some(state.execute_trade(&request)),
        Err(err) => {
            debug!(%err, "ignoring unrecognised client frame");
            None
        }
    }
}

async fn send_event(socket: &mut WebSocket, event: &MarketEvent) -> Result<(), SendError> {
    let payload = serde_json::to_string(event)?;
    socket.send(Message::Text(payload)).await?;
    Ok(())
}
