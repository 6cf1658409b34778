use rand::{rngs::StdRng, Rng, SeedableRng};
use rust_decimal::{prelude::FromPrimitive, Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Smallest price the walk can produce; one cent.
pub const MIN_PRICE: Decimal = dec!(0.01);

/// Source of uniform samples in `[0, 1)` driving the price walk.
pub trait RandomSource: Send {
    fn next_unit(&mut self) -> f64;
}

#[derive(Debug, Clone)]
pub struct SeededSource {
    rng: StdRng,
}

impl SeededSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl RandomSource for SeededSource {
    fn next_unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Replays a fixed list of samples, wrapping around at the end.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    units: Vec<f64>,
    cursor: usize,
}

impl ScriptedSource {
    pub fn new(units: Vec<f64>) -> Self {
        Self { units, cursor: 0 }
    }

    /// Always samples the midpoint, so every step is a zero change.
    pub fn flat() -> Self {
        Self::new(vec![0.5])
    }
}

impl RandomSource for ScriptedSource {
    fn next_unit(&mut self) -> f64 {
        if self.units.is_empty() {
            return 0.5;
        }
        let unit = self.units[self.cursor % self.units.len()];
        self.cursor = self.cursor.wrapping_add(1);
        unit
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WalkStep {
    pub price: Decimal,
    /// Drawn fractional change before rounding, within `[-volatility, volatility]`.
    pub change: Decimal,
}

/// Maps a unit sample onto `[-volatility, volatility]`.
pub fn draw_change(unit: f64, volatility: Decimal) -> Decimal {
    let unit = if unit.is_finite() {
        unit.clamp(0.0, 1.0)
    } else {
        0.5
    };
    let unit = Decimal::from_f64(unit).unwrap_or(dec!(0.5));
    (unit * dec!(2) - Decimal::ONE) * volatility
}

/// Applies one drawn change to `price`. A step that would overflow `Decimal`
/// holds the previous price.
pub fn walk_step(price: Decimal, unit: f64, volatility: Decimal) -> WalkStep {
    let change = draw_change(unit, volatility);
    let Some(raw) = price.checked_mul(Decimal::ONE + change) else {
        return WalkStep { price, change };
    };
    let price = raw
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .max(MIN_PRICE);

    WalkStep { price, change }
}
