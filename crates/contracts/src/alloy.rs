pub mod networks {
    pub const GNOSIS: u64 = 100;
}

use {
    alloy::primitives::{Address, address},
    std::{collections::HashMap, sync::LazyLock},
};

#[allow(non_snake_case)]
pub mod SwapOrderFactory {
    alloy::sol! {
        #[allow(missing_docs)]
        #[sol(rpc, all_derives)]
        contract SwapOrderFactory {
            /// A swap that only becomes tradeable once the referenced market
            /// resolved to `marketWantedResult`. A `marketId` of zero makes
            /// the swap unconditional.
            struct Order {
                address sellToken;
                address buyToken;
                address receiver;
                uint256 sellAmount;
                uint256 buyAmount;
                uint32 validTo;
                uint256 marketId;
                uint256 marketWantedResult;
                uint256 feeAmount;
                bytes meta;
            }

            /// Emitted by the order instance once it is initialized.
            event OrderPlacement(address indexed sender, Order order, bytes signature);

            /// Deploys the order instance for `(order, salt)` and returns the
            /// EIP-1271 signature the instance accepts for it.
            function placeWaitingSwap(Order order, bytes32 salt)
                external
                returns (bytes signature, address instance);
        }
    }

    pub use self::SwapOrderFactory::{Order, OrderPlacement};
    pub type Instance = SwapOrderFactory::SwapOrderFactoryInstance<alloy::providers::DynProvider>;
}

#[allow(non_snake_case)]
pub mod ERC20 {
    alloy::sol! {
        #[allow(missing_docs)]
        #[sol(rpc)]
        contract ERC20 {
            function allowance(address owner, address spender) external view returns (uint256);
            function approve(address spender, uint256 amount) external returns (bool);
            function transfer(address to, uint256 amount) external returns (bool);
        }
    }

    pub type Instance = ERC20::ERC20Instance<alloy::providers::DynProvider>;
}

/// Known order factory deployments by chain id.
pub static SWAP_ORDER_FACTORY_DEPLOYMENTS: LazyLock<HashMap<u64, Address>> =
    LazyLock::new(|| {
        HashMap::from([(
            networks::GNOSIS,
            address!("0xF1D37c91cfE1C3bF137898CF89B96D196d02acCb"),
        )])
    });
