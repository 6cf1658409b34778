mod config;
mod error;
mod events;
mod generators;
mod ledger;
mod market;
mod price;

pub use config::{SimConfig, DEFAULT_SYMBOL};
pub use error::TradeError;
pub use events::{EventSink, InMemoryEventSink, MarketEvent, TradeResult};
pub use generators::{
    draw_change, walk_step, RandomSource, ScriptedSource, SeededSource, WalkStep, MIN_PRICE,
};
pub use ledger::{parse_share_count, validate_quantity, Ledger, Position, TradeAction, Transaction};
pub use market::{lock_market, Market, SharedMarket, TradeReceipt};
pub use price::{HistoryPoint, PriceSimulator, PriceUpdate};

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use super::{Ledger, SimConfig};

    #[test]
    fn sim_config_defaults_match_demo_market() {
        let config = SimConfig::default();
        assert_eq!(config.symbol, "TALAVERA");
        assert_eq!(config.start_price, dec!(100.00));
        assert_eq!(config.starting_cash, dec!(10000.00));
        assert_eq!(config.volatility, dec!(0.01));
        assert_eq!(config.history_capacity, 100);
        assert_eq!(config.seed_points, 30);
        assert_eq!(config.seed_interval, time::Duration::seconds(1));
    }

    #[test]
    fn fresh_ledger_holds_only_cash() {
        let ledger = Ledger::new(SimConfig::default().starting_cash);
        assert_eq!(ledger.cash(), dec!(10000.00));
        assert_eq!(ledger.shares(), 0);
        assert!(ledger.transactions().is_empty());
        assert_eq!(ledger.position(dec!(100)).portfolio_value, Decimal::ZERO);
    }
}
