use std::{
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use time::OffsetDateTime;

use crate::{
    config::SimConfig,
    error::TradeError,
    generators::RandomSource,
    ledger::{validate_quantity, Ledger, Position, TradeAction, Transaction},
    price::{HistoryPoint, PriceSimulator, PriceUpdate},
};

pub type SharedMarket = Arc<Mutex<Market>>;

/// Every operation on a shared market runs inside this guard. Engine
/// operations never leave partial state, so a poisoned lock is still usable.
pub fn lock_market(market: &SharedMarket) -> MutexGuard<'_, Market> {
    market.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Clone, PartialEq)]
pub struct TradeReceipt {
    pub position: Position,
    pub transaction: Transaction,
}

/// Price walk and ledger for the single simulated instrument and user.
pub struct Market {
    simulator: PriceSimulator,
    ledger: Ledger,
    source: Box<dyn RandomSource>,
}

impl fmt::Debug for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Market")
            .field("simulator", &self.simulator)
            .field("ledger", &self.ledger)
            .finish_non_exhaustive()
    }
}

impl Market {
    pub fn new(config: &SimConfig, source: Box<dyn RandomSource>) -> Self {
        Self::seeded_at(config, source, OffsetDateTime::now_utc())
    }

    pub fn seeded_at(
        config: &SimConfig,
        mut source: Box<dyn RandomSource>,
        now: OffsetDateTime,
    ) -> Self {
        let simulator = PriceSimulator::seeded(config, source.as_mut(), now);
        Self {
            simulator,
            ledger: Ledger::new(config.starting_cash),
            source,
        }
    }

    pub fn into_shared(self) -> SharedMarket {
        Arc::new(Mutex::new(self))
    }

    pub fn symbol(&self) -> &str {
        self.simulator.symbol()
    }

    pub fn advance(&mut self) -> PriceUpdate {
        self.advance_at(OffsetDateTime::now_utc())
    }

    pub fn advance_at(&mut self, now: OffsetDateTime) -> PriceUpdate {
        self.simulator.advance(self.source.as_mut(), now)
    }

    pub fn info(&self) -> PriceUpdate {
        self.simulator.info()
    }

    pub fn history(&self) -> Vec<HistoryPoint> {
        self.simulator.history_snapshot()
    }

    pub fn position(&self) -> Position {
        self.ledger.position(self.simulator.current_price())
    }

    pub fn transactions(&self) -> &[Transaction] {
        self.ledger.transactions()
    }

    /// Fills at the current price. Quantity is checked before the action.
    pub fn trade(&mut self, action: &str, shares: i64) -> Result<TradeReceipt, TradeError> {
        self.trade_at(action, shares, OffsetDateTime::now_utc())
    }

    pub fn trade_at(
        &mut self,
        action: &str,
        shares: i64,
        now: OffsetDateTime,
    ) -> Result<TradeReceipt, TradeError> {
        let shares = validate_quantity(shares)?;
        let action = TradeAction::parse(action)?;
        let price = self.simulator.current_price();

        let transaction = self.ledger.execute(action, shares, price, now)?;

        Ok(TradeReceipt {
            position: self.position(),
            transaction,
        })
    }
}
