use {
    crate::traits::OrderbookError,
    alloy::primitives::{Address, TxHash},
};

/// Terminal failures of an order placement run.
///
/// None of them is retried. On-chain effects that were confirmed before the
/// failure (a placement, an approval, a funding transfer) stay in place.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Bad input detected before any network interaction, or configuration
    /// that contradicts what the chain reports.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// The node could not be queried before the workflow started.
    #[error("ethereum node request failed: {0}")]
    NodeUnavailable(String),
    /// The pre-flight `eth_call` of the placement was rejected.
    #[error("placement simulation reverted: {0}")]
    SimulationReverted(String),
    /// The placement transaction could not be submitted or did not confirm.
    #[error("placement transaction failed: {0}")]
    TransactionFailed(String),
    #[error("no OrderPlacement event for transaction {tx}: {reason}")]
    EventNotFound { tx: TxHash, reason: String },
    #[error("funding order instance {instance} failed: {reason}")]
    FundingFailed { instance: Address, reason: String },
    #[error("off-chain order submission failed: {0}")]
    OffchainSubmissionFailed(#[source] OrderbookError),
}
