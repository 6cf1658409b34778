use rust_decimal::Decimal;
use serde::Serialize;
use time::OffsetDateTime;

use crate::error::TradeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeAction {
    Buy,
    Sell,
}

impl TradeAction {
    /// Accepts exactly `"buy"` or `"sell"`.
    pub fn parse(value: &str) -> Result<Self, TradeError> {
        match value {
            "buy" => Ok(Self::Buy),
            "sell" => Ok(Self::Sell),
            _ => Err(TradeError::InvalidAction),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    #[serde(rename = "type")]
    pub kind: TradeAction,
    pub shares: u64,
    pub price: Decimal,
    pub total: Decimal,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub cash_balance: Decimal,
    pub shares: u64,
    pub portfolio_value: Decimal,
    pub total_value: Decimal,
}

/// Cash and share holdings of the simulated user plus the fill log.
#[derive(Debug, Clone, PartialEq)]
pub struct Ledger {
    cash: Decimal,
    shares: u64,
    transactions: Vec<Transaction>,
}

impl Ledger {
    pub fn new(starting_cash: Decimal) -> Self {
        Self {
            cash: starting_cash.max(Decimal::ZERO),
            shares: 0,
            transactions: Vec::new(),
        }
    }

    pub fn cash(&self) -> Decimal {
        self.cash
    }

    pub fn shares(&self) -> u64 {
        self.shares
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn position(&self, price: Decimal) -> Position {
        let portfolio_value = Decimal::from(self.shares).saturating_mul(price);
        Position {
            cash_balance: self.cash,
            shares: self.shares,
            portfolio_value,
            total_value: self.cash.saturating_add(portfolio_value),
        }
    }

    /// Fills `shares` at `price`. All checks run before any field is written.
    pub fn execute(
        &mut self,
        action: TradeAction,
        shares: u64,
        price: Decimal,
        now: OffsetDateTime,
    ) -> Result<Transaction, TradeError> {
        if shares == 0 {
            return Err(TradeError::InvalidQuantity);
        }

        let total = match action {
            TradeAction::Buy => {
                let cost = Decimal::from(shares)
                    .checked_mul(price)
                    .ok_or(TradeError::InsufficientFunds)?;
                if cost > self.cash {
                    return Err(TradeError::InsufficientFunds);
                }
                let held = self
                    .shares
                    .checked_add(shares)
                    .ok_or(TradeError::InsufficientFunds)?;
                self.cash -= cost;
                self.shares = held;
                cost
            }
            TradeAction::Sell => {
                if shares > self.shares {
                    return Err(TradeError::InsufficientShares);
                }
                let revenue = Decimal::from(shares).saturating_mul(price);
                self.cash = self.cash.saturating_add(revenue);
                self.shares -= shares;
                revenue
            }
        };

        let transaction = Transaction {
            kind: action,
            shares,
            price,
            total,
            timestamp: now,
        };
        self.transactions.push(transaction.clone());
        Ok(transaction)
    }
}

/// Turns a requested share count into a fillable quantity.
pub fn validate_quantity(shares: i64) -> Result<u64, TradeError> {
    u64::try_from(shares)
        .ok()
        .filter(|shares| *shares > 0)
        .ok_or(TradeError::InvalidQuantity)
}

/// Reads an optional sign and the leading decimal digits of `raw`, ignoring
/// leading whitespace and anything after the digits. Counts too large for
/// `i64` saturate.
pub fn parse_share_count(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let digits = &digits[..end];
    if digits.is_empty() {
        return None;
    }
    // Only overflow can fail once the digits are non-empty.
    let value = digits.parse::<i64>().unwrap_or(i64::MAX);

    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use time::macros::datetime;

    use super::{parse_share_count, validate_quantity, Ledger, TradeAction};
    use crate::error::TradeError;

    #[test]
    fn buy_debits_cash_and_records_fill() {
        let now = datetime!(2024-05-01 12:00:00 UTC);
        let mut ledger = Ledger::new(dec!(10000.00));

        let fill = ledger
            .execute(TradeAction::Buy, 10, dec!(100.00), now)
            .unwrap();

        assert_eq!(ledger.cash(), dec!(9000.00));
        assert_eq!(ledger.shares(), 10);
        assert_eq!(fill.kind, TradeAction::Buy);
        assert_eq!(fill.total, dec!(1000.00));
        assert_eq!(ledger.transactions(), &[fill]);
    }

    #[test]
    fn buy_of_exactly_all_cash_is_allowed() {
        let now = datetime!(2024-05-01 12:00:00 UTC);
        let mut ledger = Ledger::new(dec!(1000.00));

        ledger
            .execute(TradeAction::Buy, 10, dec!(100.00), now)
            .unwrap();

        assert_eq!(ledger.cash(), dec!(0));
    }

    #[test]
    fn sell_credits_cash_and_reduces_shares() {
        let now = datetime!(2024-05-01 12:00:00 UTC);
        let mut ledger = Ledger::new(dec!(10000.00));
        ledger
            .execute(TradeAction::Buy, 10, dec!(100.00), now)
            .unwrap();

        let fill = ledger
            .execute(TradeAction::Sell, 4, dec!(102.50), now)
            .unwrap();

        assert_eq!(ledger.cash(), dec!(9410.00));
        assert_eq!(ledger.shares(), 6);
        assert_eq!(fill.total, dec!(410.00));
        assert_eq!(ledger.transactions().len(), 2);
    }

    #[test]
    fn refused_trades_leave_ledger_untouched() {
        let now = datetime!(2024-05-01 12:00:00 UTC);
        let mut ledger = Ledger::new(dec!(500.00));
        ledger.execute(TradeAction::Buy, 2, dec!(100.00), now).unwrap();
        let before = ledger.clone();

        assert_eq!(
            ledger.execute(TradeAction::Buy, 4, dec!(100.00), now),
            Err(TradeError::InsufficientFunds)
        );
        assert_eq!(
            ledger.execute(TradeAction::Sell, 3, dec!(100.00), now),
            Err(TradeError::InsufficientShares)
        );
        assert_eq!(
            ledger.execute(TradeAction::Sell, 0, dec!(100.00), now),
            Err(TradeError::InvalidQuantity)
        );
        assert_eq!(ledger, before);
    }

    #[test]
    fn overflowing_cost_is_insufficient_funds() {
        let now = datetime!(2024-05-01 12:00:00 UTC);
        let mut ledger = Ledger::new(dec!(10000.00));

        let result = ledger.execute(TradeAction::Buy, u64::MAX, rust_decimal::Decimal::MAX, now);

        assert_eq!(result, Err(TradeError::InsufficientFunds));
        assert_eq!(ledger.shares(), 0);
    }

    #[test]
    fn overflowing_share_count_is_refused_before_cash_moves() {
        let now = datetime!(2024-05-01 12:00:00 UTC);
        let mut ledger = Ledger::new(dec!(100000000000000000000));
        ledger
            .execute(TradeAction::Buy, u64::MAX - 1, dec!(0.01), now)
            .unwrap();
        let before = ledger.clone();

        let result = ledger.execute(TradeAction::Buy, 2, dec!(0.01), now);

        assert_eq!(result, Err(TradeError::InsufficientFunds));
        assert_eq!(ledger, before);
        assert_eq!(ledger.transactions().len(), 1);
    }

    #[test]
    fn position_derives_portfolio_and_total_value() {
        let now = datetime!(2024-05-01 12:00:00 UTC);
        let mut ledger = Ledger::new(dec!(10000.00));
        ledger.execute(TradeAction::Buy, 10, dec!(100.00), now).unwrap();

        let position = ledger.position(dec!(110.00));

        assert_eq!(position.cash_balance, dec!(9000.00));
        assert_eq!(position.shares, 10);
        assert_eq!(position.portfolio_value, dec!(1100.00));
        assert_eq!(position.total_value, dec!(10100.00));
    }

    #[test]
    fn parses_only_exact_actions() {
        assert_eq!(TradeAction::parse("buy"), Ok(TradeAction::Buy));
        assert_eq!(TradeAction::parse("sell"), Ok(TradeAction::Sell));
        assert_eq!(TradeAction::parse("hold"), Err(TradeError::InvalidAction));
        assert_eq!(TradeAction::parse("BUY"), Err(TradeError::InvalidAction));
        assert_eq!(TradeAction::parse(""), Err(TradeError::InvalidAction));
    }

    #[test]
    fn quantity_must_be_positive() {
        assert_eq!(validate_quantity(5), Ok(5));
        assert_eq!(validate_quantity(0), Err(TradeError::InvalidQuantity));
        assert_eq!(validate_quantity(-3), Err(TradeError::InvalidQuantity));
    }

    #[test]
    fn share_count_parsing_takes_leading_integer() {
        assert_eq!(parse_share_count("12"), Some(12));
        assert_eq!(parse_share_count("  7 shares"), Some(7));
        assert_eq!(parse_share_count("3.7"), Some(3));
        assert_eq!(parse_share_count("-3"), Some(-3));
        assert_eq!(parse_share_count("+4"), Some(4));
        assert_eq!(parse_share_count("abc"), None);
        assert_eq!(parse_share_count(""), None);
        assert_eq!(parse_share_count("-"), None);
        assert_eq!(parse_share_count("99999999999999999999"), Some(i64::MAX));
        assert_eq!(parse_share_count("-99999999999999999999"), Some(-i64::MAX));
    }

    #[test]
    fn transaction_serializes_kind_as_type() {
        let now = datetime!(2024-05-01 12:00:00 UTC);
        let mut ledger = Ledger::new(dec!(10000.00));
        let fill = ledger.execute(TradeAction::Buy, 1, dec!(99.5), now).unwrap();

        let json = serde_json::to_value(fill).unwrap();

        assert_eq!(json["type"], "buy");
        assert_eq!(json["shares"], 1);
        assert_eq!(json["total"], 99.5);
        assert_eq!(json["timestamp"], "2024-05-01T12:00:00Z");
    }
}
