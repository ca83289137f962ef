use serde::{Deserialize, Serialize};

/// How the order book verifies that the owner authorized an order.
#[derive(Eq, PartialEq, Clone, Copy, Debug, Deserialize, Serialize, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SigningScheme {
    /// The owner is a smart contract that validates the signature bytes via
    /// `isValidSignature`.
    Eip1271,
}
