use std::collections::VecDeque;

use rust_decimal::Decimal;
use serde::Serialize;
use time::OffsetDateTime;

use crate::{
    config::SimConfig,
    generators::{walk_step, RandomSource},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryPoint {
    pub price: Decimal,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

/// Price quote relative to the last recorded history point.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceUpdate {
    pub symbol: String,
    pub price: Decimal,
    pub change: Decimal,
    /// Percent units: `1.5` means +1.5%.
    pub change_percent: Decimal,
}

#[derive(Debug, Clone)]
pub struct PriceSimulator {
    symbol: String,
    current_price: Decimal,
    history: VecDeque<HistoryPoint>,
    capacity: usize,
    volatility: Decimal,
}

impl PriceSimulator {
    /// Builds a simulator with an empty history at `config.start_price`.
    pub fn new(config: &SimConfig) -> Self {
        let capacity = config.history_capacity.max(1);
        Self {
            symbol: config.symbol.clone(),
            current_price: config.start_price,
            history: VecDeque::with_capacity(capacity),
            capacity,
            volatility: config.volatility,
        }
    }

    /// Builds a simulator whose history holds `config.seed_points` walk steps
    /// spaced `config.seed_interval` apart and ending one interval before `now`.
    pub fn seeded(config: &SimConfig, source: &mut dyn RandomSource, now: OffsetDateTime) -> Self {
        let mut simulator = Self::new(config);
        let mut price = config.start_price;

        for back in (1..=config.seed_points).rev() {
            let offset = config.seed_interval * back as u32;
            price = walk_step(price, source.next_unit(), simulator.volatility).price;
            simulator.record(HistoryPoint {
                price,
                timestamp: now - offset,
            });
        }

        simulator.current_price = price;
        simulator
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn current_price(&self) -> Decimal {
        self.current_price
    }

    pub fn history(&self) -> impl ExactSizeIterator<Item = &HistoryPoint> {
        self.history.iter()
    }

    pub fn history_snapshot(&self) -> Vec<HistoryPoint> {
        self.history.iter().cloned().collect()
    }

    pub fn advance(&mut self, source: &mut dyn RandomSource, now: OffsetDateTime) -> PriceUpdate {
        let step = walk_step(self.current_price, source.next_unit(), self.volatility);

        self.record(HistoryPoint {
            price: self.current_price,
            timestamp: now,
        });
        self.current_price = step.price;

        self.info()
    }

    pub fn info(&self) -> PriceUpdate {
        let (change, change_percent) = match self.history.back() {
            Some(previous) => relative_change(self.current_price, previous.price),
            None => (Decimal::ZERO, Decimal::ZERO),
        };

        PriceUpdate {
            symbol: self.symbol.clone(),
            price: self.current_price,
            change,
            change_percent,
        }
    }

    fn record(&mut self, point: HistoryPoint) {
        while self.history.len() >= self.capacity {
            self.history.pop_front();
        }
        self.history.push_back(point);
    }
}

fn relative_change(current: Decimal, previous: Decimal) -> (Decimal, Decimal) {
    let change = current - previous;
    let change_percent = if previous.is_zero() {
        Decimal::ZERO
    } else {
        (current / previous - Decimal::ONE) * Decimal::ONE_HUNDRED
    };
    (change, change_percent)
}
