use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;

use crate::{
    ledger::{Position, Transaction},
    price::PriceUpdate,
    TradeError,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction: Option<Transaction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl TradeResult {
    pub fn filled(position: Position, transaction: Transaction) -> Self {
        Self {
            success: true,
            position: Some(position),
            transaction: Some(transaction),
            message: None,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            position: None,
            transaction: None,
            message: Some(message.into()),
        }
    }
}

impl From<TradeError> for TradeResult {
    fn from(err: TradeError) -> Self {
        Self::rejected(err.to_string())
    }
}

/// Outbound notifications, framed as `{"event": ..., "data": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum MarketEvent {
    StockInfo(PriceUpdate),
    StockUpdate(PriceUpdate),
    PositionUpdate(Position),
    TradeResult(TradeResult),
}

impl MarketEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::StockInfo(_) => "stock_info",
            Self::StockUpdate(_) => "stock_update",
            Self::PositionUpdate(_) => "position_update",
            Self::TradeResult(_) => "trade_result",
        }
    }
}

/// Receives events meant for every connected subscriber.
pub trait EventSink: Send + Sync {
    fn publish(&self, event: MarketEvent);
}

impl<T: EventSink + ?Sized> EventSink for Arc<T> {
    fn publish(&self, event: MarketEvent) {
        (**self).publish(event);
    }
}

#[derive(Debug, Default)]
pub struct InMemoryEventSink {
    events: Mutex<Vec<MarketEvent>>,
}

impl InMemoryEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<MarketEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl EventSink for InMemoryEventSink {
    fn publish(&self, event: MarketEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}
