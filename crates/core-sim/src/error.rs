use thiserror::Error;

/// Reasons a trade is refused. A refused trade never touches the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TradeError {
    #[error("Invalid number of shares. Must be a positive number.")]
    InvalidQuantity,
    #[error("Invalid action. Use \"buy\" or \"sell\".")]
    InvalidAction,
    #[error("Insufficient funds for this purchase.")]
    InsufficientFunds,
    #[error("Not enough shares to sell.")]
    InsufficientShares,
}
