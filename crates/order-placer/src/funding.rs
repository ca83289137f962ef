//! Moves the sell token (plus fee) from the configured account to a freshly
//! placed order instance.

use {
    crate::{
        Error,
        inspector::Placement,
        traits::{ChainRead, TokenContract},
    },
    alloy::primitives::{Address, TxHash, U256},
    contracts::alloy::SwapOrderFactory::Order,
    std::sync::Arc,
    tracing::instrument,
};

/// A funding transfer that was sent but is not known to be mined yet.
#[derive(Clone, Debug, PartialEq, Eq)]
#[must_use = "a submitted transfer has to be awaited"]
pub struct PendingTransfer {
    pub token: Address,
    pub instance: Address,
    pub amount: U256,
    pub tx_hash: TxHash,
}

/// A funding transfer that was mined successfully.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfirmedTransfer {
    pub token: Address,
    pub instance: Address,
    pub amount: U256,
    pub tx_hash: TxHash,
}

/// Amount the order instance needs to be able to settle the order.
pub fn funding_amount(order: &Order) -> Option<U256> {
    order.sellAmount.checked_add(order.feeAmount)
}

pub struct FundTransferAgent {
    token: Arc<dyn TokenContract>,
    chain: Arc<dyn ChainRead>,
    owner: Address,
    spender: Address,
}

impl FundTransferAgent {
    pub fn new(
        token: Arc<dyn TokenContract>,
        chain: Arc<dyn ChainRead>,
        owner: Address,
        spender: Address,
    ) -> Self {
        Self {
            token,
            chain,
            owner,
            spender,
        }
    }

    /// Funds the order instance of `placement`: allowance pre-step, then the
    /// transfer and its confirmation.
    pub async fn fund(&self, placement: &Placement) -> Result<ConfirmedTransfer, Error> {
        let failed = |reason: String| Error::FundingFailed {
            instance: placement.instance,
            reason,
        };
        let amount = funding_amount(&placement.order)
            .ok_or_else(|| failed("sell amount plus fee overflows".to_string()))?;
        let token = placement.order.sellToken;

        self.ensure_allowance(token, amount)
            .await
            .map_err(|err| failed(format!("{err:#}")))?;
        let pending = self
            .submit_transfer(token, placement.instance, amount)
            .await
            .map_err(|err| failed(format!("{err:#}")))?;
        self.await_transfer(pending)
            .await
            .map_err(|err| failed(format!("{err:#}")))
    }

    /// Approves the spender for the maximum amount unless the current
    /// allowance already covers `amount`. Returns the approval transaction
    /// if one was needed.
    #[instrument(skip(self))]
    pub async fn ensure_allowance(
        &self,
        token: Address,
        amount: U256,
    ) -> anyhow::Result<Option<TxHash>> {
        let allowance = self.token.allowance(token, self.owner, self.spender).await?;
        if allowance >= amount {
            tracing::debug!(?allowance, "allowance sufficient");
            return Ok(None);
        }

        tracing::info!(?allowance, spender = ?self.spender, "approving sell token");
        let tx = self
            .token
            .submit_approve(token, self.spender, U256::MAX)
            .await?;
        let receipt = self.chain.wait_for_receipt(tx).await?;
        anyhow::ensure!(receipt.success, "approval transaction {tx:?} reverted");
        Ok(Some(tx))
    }

    #[instrument(skip(self))]
    pub async fn submit_transfer(
        &self,
        token: Address,
        instance: Address,
        amount: U256,
    ) -> anyhow::Result<PendingTransfer> {
        let tx_hash = self.token.submit_transfer(token, instance, amount).await?;
        tracing::info!(?tx_hash, "submitted funding transfer");
        Ok(PendingTransfer {
            token,
            instance,
            amount,
            tx_hash,
        })
    }

    #[instrument(skip(self))]
    pub async fn await_transfer(
        &self,
        pending: PendingTransfer,
    ) -> anyhow::Result<ConfirmedTransfer> {
        let receipt = self.chain.wait_for_receipt(pending.tx_hash).await?;
        anyhow::ensure!(
            receipt.success,
            "funding transfer {:?} reverted",
            pending.tx_hash
        );
        Ok(ConfirmedTransfer {
            token: pending.token,
            instance: pending.instance,
            amount: pending.amount,
            tx_hash: pending.tx_hash,
        })
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::traits::{MockChainRead, MockTokenContract, Receipt},
        alloy::primitives::{Bytes, address, b256},
        mockall::predicate::eq,
    };

    const OWNER: Address = address!("0xDcdD79bf63c1E8E2d54Ad2aBbB4342b152640B44");
    const SPENDER: Address = address!("0xF1D37c91cfE1C3bF137898CF89B96D196d02acCb");
    const INSTANCE: Address = address!("0x00000000000000000000000000000000000000aa");
    const WETH: Address = address!("0x6A023CCd1ff6F2045C3309768eAd9E68F978f6e1");
    const APPROVE_TX: TxHash =
        b256!("0x0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a");
    const TRANSFER_TX: TxHash =
        b256!("0x0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b");

    fn placement() -> Placement {
        Placement {
            sender: OWNER,
            order: Order {
                sellToken: WETH,
                buyToken: address!("0x4ECaBa5870353805a9F068101A40E0f32ed605C6"),
                receiver: OWNER,
                sellAmount: U256::from(10_000_000_000_000_u64),
                buyAmount: U256::from(2_000),
                validTo: 1_700_001_200,
                marketId: U256::ZERO,
                marketWantedResult: U256::ZERO,
                feeAmount: U256::from(500),
                meta: Bytes::new(),
            },
            signature: Bytes::new(),
            instance: INSTANCE,
        }
    }

    fn mined(tx_hash: TxHash, success: bool) -> Receipt {
        Receipt {
            tx_hash,
            success,
            logs: vec![],
        }
    }

    fn agent(token: MockTokenContract, chain: MockChainRead) -> FundTransferAgent {
        FundTransferAgent::new(Arc::new(token), Arc::new(chain), OWNER, SPENDER)
    }

    #[tokio::test]
    async fn transfers_sell_amount_plus_fee_without_approval() {
        let expected = U256::from(10_000_000_000_500_u64);
        let mut token = MockTokenContract::new();
        token
            .expect_allowance()
            .with(eq(WETH), eq(OWNER), eq(SPENDER))
            .times(1)
            .returning(|_, _, _| Ok(U256::MAX));
        token.expect_submit_approve().never();
        token
            .expect_submit_transfer()
            .with(eq(WETH), eq(INSTANCE), eq(expected))
            .times(1)
            .returning(|_, _, _| Ok(TRANSFER_TX));
        let mut chain = MockChainRead::new();
        chain
            .expect_wait_for_receipt()
            .with(eq(TRANSFER_TX))
            .times(1)
            .returning(|tx| Ok(mined(tx, true)));

        let confirmed = agent(token, chain).fund(&placement()).await.unwrap();

        assert_eq!(
            confirmed,
            ConfirmedTransfer {
                token: WETH,
                instance: INSTANCE,
                amount: expected,
                tx_hash: TRANSFER_TX,
            }
        );
    }

    #[tokio::test]
    async fn approves_when_allowance_is_insufficient() {
        let mut seq = mockall::Sequence::new();
        let mut token = MockTokenContract::new();
        let mut chain = MockChainRead::new();
        token
            .expect_allowance()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(U256::from(1)));
        token
            .expect_submit_approve()
            .with(eq(WETH), eq(SPENDER), eq(U256::MAX))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(APPROVE_TX));
        chain
            .expect_wait_for_receipt()
            .with(eq(APPROVE_TX))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|tx| Ok(mined(tx, true)));
        token
            .expect_submit_transfer()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(TRANSFER_TX));
        chain
            .expect_wait_for_receipt()
            .with(eq(TRANSFER_TX))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|tx| Ok(mined(tx, true)));

        let confirmed = agent(token, chain).fund(&placement()).await.unwrap();
        assert_eq!(confirmed.tx_hash, TRANSFER_TX);
    }

    #[tokio::test]
    async fn reverted_approval_stops_funding() {
        let mut token = MockTokenContract::new();
        token
            .expect_allowance()
            .returning(|_, _, _| Ok(U256::ZERO));
        token
            .expect_submit_approve()
            .times(1)
            .returning(|_, _, _| Ok(APPROVE_TX));
        token.expect_submit_transfer().never();
        let mut chain = MockChainRead::new();
        chain
            .expect_wait_for_receipt()
            .returning(|tx| Ok(mined(tx, false)));

        let err = agent(token, chain).fund(&placement()).await.unwrap_err();
        assert!(matches!(err, Error::FundingFailed { instance, .. } if instance == INSTANCE));
    }

    #[tokio::test]
    async fn reverted_transfer_is_not_resubmitted() {
        let mut token = MockTokenContract::new();
        token
            .expect_allowance()
            .returning(|_, _, _| Ok(U256::MAX));
        token
            .expect_submit_transfer()
            .times(1)
            .returning(|_, _, _| Ok(TRANSFER_TX));
        let mut chain = MockChainRead::new();
        chain
            .expect_wait_for_receipt()
            .times(1)
            .returning(|tx| Ok(mined(tx, false)));

        let err = agent(token, chain).fund(&placement()).await.unwrap_err();
        assert!(matches!(err, Error::FundingFailed { .. }));
    }

    #[test]
    fn funding_amount_overflow() {
        let mut order = placement().order;
        order.sellAmount = U256::MAX;
        order.feeAmount = U256::from(1);
        assert_eq!(funding_amount(&order), None);
    }
}
