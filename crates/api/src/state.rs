use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use core_sim::{
    lock_market, parse_share_count, EventSink, HistoryPoint, MarketEvent, Position, PriceUpdate,
    SharedMarket, TradeError, TradeResult, Transaction,
};
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{debug, info};

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Trade submission as sent by clients. Both fields stay loosely typed so
/// that malformed input surfaces as a trade rejection rather than a decode
/// failure.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct TradeRequest {
    #[serde(default)]
    pub action: Value,
    #[serde(default)]
    pub shares: Value,
}

impl TradeRequest {
    pub fn new(action: impl Into<Value>, shares: impl Into<Value>) -> Self {
        Self {
            action: action.into(),
            shares: shares.into(),
        }
    }

    /// `false` when either field is missing, null, empty, zero or `false`.
    pub fn has_required_fields(&self) -> bool {
        is_present(&self.action) && is_present(&self.shares)
    }

    pub fn action(&self) -> &str {
        self.action.as_str().unwrap_or_default()
    }

    /// Integer share count; fractional numbers are truncated toward zero and
    /// counts outside `i64` saturate.
    pub fn share_count(&self) -> Option<i64> {
        match &self.shares {
            Value::Number(number) => number.as_i64().or_else(|| {
                number
                    .as_f64()
                    .filter(|value| value.is_finite())
                    .map(|value| value.trunc() as i64)
            }),
            Value::String(raw) => parse_share_count(raw),
            _ => None,
        }
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|value| value != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[derive(Clone, Debug)]
pub struct AppState {
    market: SharedMarket,
    events_tx: broadcast::Sender<MarketEvent>,
    next_connection_id: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(market: SharedMarket) -> Self {
        let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            market,
            events_tx,
            next_connection_id: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn market(&self) -> &SharedMarket {
        &self.market
    }

    pub fn next_connection_id(&self) -> u64 {
        self.next_connection_id
            .fetch_add(1, Ordering::Relaxed)
            .wrapping_add(1)
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<MarketEvent> {
        self.events_tx.subscribe()
    }

    pub fn publish_event(
        &self,
        event: MarketEvent,
    ) -> Result<usize, broadcast::error::SendError<MarketEvent>> {
        self.events_tx.send(event)
    }

    pub fn stock_info(&self) -> PriceUpdate {
        lock_market(&self.market).info()
    }

    pub fn history(&self) -> Vec<HistoryPoint> {
        lock_market(&self.market).history()
    }

    pub fn position(&self) -> Position {
        lock_market(&self.market).position()
    }

    pub fn transactions(&self) -> Vec<Transaction> {
        lock_market(&self.market).transactions().to_vec()
    }

    /// Runs the trade under the market lock, then broadcasts the new
    /// position to every subscriber when it filled.
    pub fn execute_trade(&self, request: &TradeRequest) -> TradeResult {
        let Some(shares) = request.share_count() else {
            debug!(shares = %request.shares, "trade rejected: unreadable share count");
            return TradeError::InvalidQuantity.into();
        };

        let outcome = lock_market(&self.market).trade(request.action(), shares);
        match outcome {
            Ok(receipt) => {
                info!(
                    action = receipt.transaction.kind.as_str(),
                    shares = receipt.transaction.shares,
                    price = %receipt.transaction.price,
                    cash = %receipt.position.cash_balance,
                    "trade filled"
                );
                self.publish(MarketEvent::PositionUpdate(receipt.position));
                TradeResult::filled(receipt.position, receipt.transaction)
            }
            Err(err) => {
                debug!(action = %request.action, shares, reason = %err, "trade rejected");
                err.into()
            }
        }
    }
}

impl EventSink for AppState {
    fn publish(&self, event: MarketEvent) {
        // No subscribers is not an error; events are live-only.
        let _ = self.publish_event(event);
    }
}
