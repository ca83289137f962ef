//! Contains the models of the order book API that are produced when mirroring
//! an on-chain order off-chain.

pub mod order;
pub mod signature;
