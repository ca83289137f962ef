pub mod blockchain;
pub mod orderbook;

pub use self::{blockchain::Ethereum, orderbook::Orderbook};
