//! Trait definitions for external system boundaries.
//!
//! These traits abstract blockchain and order book interactions to enable
//! unit testing of the placement workflow with mocks.

use {
    crate::order::Salt,
    alloy::primitives::{Address, Bytes, Log, TxHash, U256},
    anyhow::Result,
    contracts::alloy::SwapOrderFactory::Order,
    model::order::{OrderCreation, OrderUid},
};

/// Outcome of the simulated placement call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlacementResult {
    /// EIP-1271 signature the order instance accepts for the order.
    pub signature: Bytes,
    /// Address the order instance gets deployed to. Funds go here.
    pub instance: Address,
}

/// Confirmation record of a mined transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Receipt {
    pub tx_hash: TxHash,
    /// `false` if the transaction reverted.
    pub success: bool,
    pub logs: Vec<Log>,
}

#[derive(Debug, thiserror::Error)]
pub enum OrderbookError {
    #[error("order book rejected the order with status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("malformed order book response {body:?}")]
    Malformed {
        body: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// Abstracts the order factory contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SettlementContract: Send + Sync {
    /// Address of the factory contract.
    fn address(&self) -> Address;

    /// Runs `placeWaitingSwap` as an `eth_call` from the configured account.
    ///
    /// Errors carry the revert reason reported by the node.
    async fn simulate_placement(&self, order: &Order, salt: Salt) -> Result<PlacementResult>;

    /// Sends the `placeWaitingSwap` transaction without waiting for it to be
    /// mined.
    async fn submit_placement(&self, order: &Order, salt: Salt, gas_limit: u64) -> Result<TxHash>;
}

/// Abstracts ERC-20 token interactions of the configured account.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait TokenContract: Send + Sync {
    async fn allowance(&self, token: Address, owner: Address, spender: Address) -> Result<U256>;

    /// Sends `approve(spender, amount)` without waiting for it to be mined.
    async fn submit_approve(&self, token: Address, spender: Address, amount: U256)
    -> Result<TxHash>;

    /// Sends `transfer(to, amount)` without waiting for it to be mined.
    async fn submit_transfer(&self, token: Address, to: Address, amount: U256) -> Result<TxHash>;
}

/// Abstracts blockchain read operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ChainRead: Send + Sync {
    /// Waits until the transaction is mined and returns its receipt.
    async fn wait_for_receipt(&self, tx: TxHash) -> Result<Receipt>;
}

/// Abstracts the off-chain order book API.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait OrderbookApi: Send + Sync {
    /// Publishes the order and returns the uid assigned by the order book.
    async fn create_order(&self, order: &OrderCreation) -> Result<OrderUid, OrderbookError>;
}
