//! Contains the order types with the serialization described by the order
//! book's openapi documentation.

use {
    crate::signature::SigningScheme,
    alloy::primitives::{Address, B256, Bytes, U256},
    number::serialization::DecimalU256,
    serde::{Deserialize, Serialize},
    serde_with::serde_as,
    std::fmt::{self, Display},
};

/// An order as submitted to `POST /api/v1/orders`.
///
/// Field order matches the order book documentation, so serializing the same
/// value always yields the same JSON document.
#[serde_as]
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreation {
    pub from: Address,
    pub sell_token: Address,
    pub buy_token: Address,
    pub receiver: Address,
    #[serde_as(as = "DecimalU256")]
    pub sell_amount: U256,
    #[serde_as(as = "DecimalU256")]
    pub buy_amount: U256,
    pub valid_to: u32,
    pub app_data: B256,
    #[serde_as(as = "DecimalU256")]
    pub fee_amount: U256,
    pub kind: OrderKind,
    pub partially_fillable: bool,
    pub sell_token_balance: SellTokenSource,
    pub buy_token_balance: BuyTokenDestination,
    pub signing_scheme: SigningScheme,
    pub signature: Bytes,
}

/// The order book also knows buy orders. Orders placed through the factory
/// always sell a fixed amount.
#[derive(Eq, PartialEq, Clone, Copy, Debug, Deserialize, Serialize, Hash)]
#[serde(rename_all = "lowercase")]
pub enum OrderKind {
    Sell,
}

/// Source from which the sellAmount should be drawn upon order fulfillment.
#[derive(Eq, PartialEq, Clone, Copy, Debug, Deserialize, Serialize, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SellTokenSource {
    /// Direct ERC20 allowances to the Vault relayer contract
    Erc20,
}

/// Destination for which the buyAmount should be transferred to order's
/// receiver to upon fulfillment.
#[derive(Eq, PartialEq, Clone, Copy, Debug, Deserialize, Serialize, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BuyTokenDestination {
    /// Pay trade proceeds as an ERC20 token transfer
    Erc20,
}

/// Identifier the order book assigns to an accepted order.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(transparent)]
pub struct OrderUid(pub String);

impl Display for OrderUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
