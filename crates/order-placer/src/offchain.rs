//! Publishes a confirmed placement to the off-chain order book.

use {
    crate::{Error, inspector::Placement, traits::OrderbookApi},
    alloy::primitives::keccak256,
    model::{
        order::{BuyTokenDestination, OrderCreation, OrderKind, OrderUid, SellTokenSource},
        signature::SigningScheme,
    },
    std::sync::Arc,
};

/// Order book representation of a placement. The instance contract is the
/// order's signer, so the order is always a fill-or-kill sell order verified
/// through EIP-1271.
pub fn order_creation(placement: &Placement) -> OrderCreation {
    let order = &placement.order;
    OrderCreation {
        from: placement.sender,
        sell_token: order.sellToken,
        buy_token: order.buyToken,
        receiver: order.receiver,
        sell_amount: order.sellAmount,
        buy_amount: order.buyAmount,
        valid_to: order.validTo,
        app_data: keccak256(&order.meta),
        fee_amount: order.feeAmount,
        kind: OrderKind::Sell,
        partially_fillable: false,
        sell_token_balance: SellTokenSource::Erc20,
        buy_token_balance: BuyTokenDestination::Erc20,
        signing_scheme: SigningScheme::Eip1271,
        signature: placement.signature.clone(),
    }
}

pub struct OffchainSubmitter {
    orderbook: Arc<dyn OrderbookApi>,
}

impl OffchainSubmitter {
    pub fn new(orderbook: Arc<dyn OrderbookApi>) -> Self {
        Self { orderbook }
    }

    /// Submits the placement once. Rejections are final.
    pub async fn submit(&self, placement: &Placement) -> Result<OrderUid, Error> {
        let order = order_creation(placement);
        tracing::debug!(?order, "publishing order");
        self.orderbook
            .create_order(&order)
            .await
            .map_err(Error::OffchainSubmissionFailed)
    }
}
