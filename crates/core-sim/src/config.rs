use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub const DEFAULT_SYMBOL: &str = "TALAVERA";

#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    pub symbol: String,
    pub start_price: Decimal,
    pub starting_cash: Decimal,
    /// Maximum per-tick move as a fraction of the current price (0.01 = 1%).
    pub volatility: Decimal,
    pub history_capacity: usize,
    pub seed_points: usize,
    pub seed_interval: time::Duration,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            symbol: DEFAULT_SYMBOL.to_owned(),
            start_price: dec!(100.00),
            starting_cash: dec!(10000.00),
            volatility: dec!(0.01),
            history_capacity: 100,
            seed_points: 30,
            seed_interval: time::Duration::seconds(1),
        }
    }
}
