//! The placement workflow as a typed state machine:
//! `Built -> Simulated -> Submitted -> Confirmed -> Inspected -> Funded ->
//! Published`.
//!
//! Every transition consumes the previous state, so a stage can only run
//! once its predecessor succeeded. Every failure is terminal and nothing that
//! was already mined gets reverted.

use {
    crate::{
        Error,
        funding::{ConfirmedTransfer, FundTransferAgent},
        inspector::{self, Placement},
        offchain::OffchainSubmitter,
        order::{Salt, derive_instance_address},
        traits::{
            ChainRead,
            OrderbookApi,
            PlacementResult,
            Receipt,
            SettlementContract,
            TokenContract,
        },
    },
    alloy::primitives::{Address, B256, TxHash},
    contracts::alloy::SwapOrderFactory::Order,
    model::order::OrderUid,
    std::sync::Arc,
    tracing::instrument,
};

pub const DEFAULT_PLACEMENT_GAS_LIMIT: u64 = 3_000_000;

#[derive(Clone, Debug)]
pub struct Config {
    /// Account placing and funding the order.
    pub owner: Address,
    /// Spender the sell token allowance is granted to.
    pub allowance_spender: Address,
    pub placement_gas_limit: u64,
    /// Init code hash of the order instance. If set, the simulated instance
    /// address is checked against the locally derived one.
    pub instance_init_code_hash: Option<B256>,
}

#[derive(Clone, Debug)]
pub struct Built {
    pub order: Order,
    pub salt: Salt,
}

#[derive(Clone, Debug)]
pub struct Simulated {
    pub order: Order,
    pub salt: Salt,
    pub result: PlacementResult,
}

#[derive(Clone, Debug)]
pub struct Submitted {
    pub order: Order,
    pub result: PlacementResult,
    pub tx_hash: TxHash,
}

#[derive(Clone, Debug)]
pub struct Confirmed {
    pub order: Order,
    pub result: PlacementResult,
    pub receipt: Receipt,
}

#[derive(Clone, Debug)]
pub struct Inspected {
    pub placement: Placement,
    pub tx_hash: TxHash,
}

#[derive(Clone, Debug)]
pub struct Funded {
    pub placement: Placement,
    pub tx_hash: TxHash,
    pub transfer: ConfirmedTransfer,
}

#[derive(Clone, Debug)]
pub struct Published {
    pub placement: Placement,
    /// Placement transaction.
    pub tx_hash: TxHash,
    pub transfer: ConfirmedTransfer,
    pub uid: OrderUid,
}

pub struct Orchestrator {
    config: Config,
    factory: Arc<dyn SettlementContract>,
    chain: Arc<dyn ChainRead>,
    funding: FundTransferAgent,
    offchain: OffchainSubmitter,
}

impl Orchestrator {
    pub fn new(
        config: Config,
        factory: Arc<dyn SettlementContract>,
        token: Arc<dyn TokenContract>,
        chain: Arc<dyn ChainRead>,
        orderbook: Arc<dyn OrderbookApi>,
    ) -> Self {
        let funding = FundTransferAgent::new(
            token,
            chain.clone(),
            config.owner,
            config.allowance_spender,
        );
        Self {
            config,
            factory,
            chain,
            funding,
            offchain: OffchainSubmitter::new(orderbook),
        }
    }

    /// Drives a built order through all remaining stages.
    pub async fn run(&self, built: Built) -> Result<Published, Error> {
        let simulated = self.simulate(built).await?;
        let submitted = self.submit(simulated).await?;
        let confirmed = self.confirm(submitted).await?;
        let inspected = self.inspect(confirmed)?;
        let funded = self.fund(inspected).await?;
        self.publish(funded).await
    }

    #[instrument(skip_all, fields(salt = %built.salt))]
    pub async fn simulate(&self, built: Built) -> Result<Simulated, Error> {
        let result = self
            .factory
            .simulate_placement(&built.order, built.salt)
            .await
            .map_err(|err| Error::SimulationReverted(format!("{err:#}")))?;
        if result.instance.is_zero() {
            return Err(Error::SimulationReverted(
                "simulation returned the zero instance address".to_string(),
            ));
        }
        if let Some(init_code_hash) = self.config.instance_init_code_hash {
            let expected = derive_instance_address(
                self.factory.address(),
                &built.order,
                built.salt,
                init_code_hash,
            );
            if expected != result.instance {
                return Err(Error::InvalidConfiguration(format!(
                    "factory would deploy the instance to {} but {expected} was derived \
                     locally",
                    result.instance
                )));
            }
        }
        tracing::info!(instance = ?result.instance, "simulated placement");

        Ok(Simulated {
            order: built.order,
            salt: built.salt,
            result,
        })
    }

    #[instrument(skip_all, fields(instance = ?simulated.result.instance))]
    pub async fn submit(&self, simulated: Simulated) -> Result<Submitted, Error> {
        let tx_hash = self
            .factory
            .submit_placement(
                &simulated.order,
                simulated.salt,
                self.config.placement_gas_limit,
            )
            .await
            .map_err(|err| Error::TransactionFailed(format!("{err:#}")))?;
        tracing::info!(?tx_hash, "submitted placement transaction");

        Ok(Submitted {
            order: simulated.order,
            result: simulated.result,
            tx_hash,
        })
    }

    #[instrument(skip_all, fields(tx_hash = ?submitted.tx_hash))]
    pub async fn confirm(&self, submitted: Submitted) -> Result<Confirmed, Error> {
        let receipt = self
            .chain
            .wait_for_receipt(submitted.tx_hash)
            .await
            .map_err(|err| {
                Error::TransactionFailed(format!(
                    "no receipt for {:?}: {err:#}",
                    submitted.tx_hash
                ))
            })?;
        if !receipt.success {
            return Err(Error::TransactionFailed(format!(
                "placement transaction {:?} reverted",
                submitted.tx_hash
            )));
        }
        tracing::info!("placement transaction mined");

        Ok(Confirmed {
            order: submitted.order,
            result: submitted.result,
            receipt,
        })
    }

    pub fn inspect(&self, confirmed: Confirmed) -> Result<Inspected, Error> {
        let placement = inspector::inspect(
            &confirmed.receipt,
            self.factory.address(),
            confirmed.result.instance,
            &confirmed.order,
        )?;
        tracing::debug!(sender = ?placement.sender, "found OrderPlacement event");

        Ok(Inspected {
            placement,
            tx_hash: confirmed.receipt.tx_hash,
        })
    }

    #[instrument(skip_all, fields(instance = ?inspected.placement.instance))]
    pub async fn fund(&self, inspected: Inspected) -> Result<Funded, Error> {
        let transfer = self.funding.fund(&inspected.placement).await?;
        tracing::info!(
            amount = ?transfer.amount,
            tx_hash = ?transfer.tx_hash,
            "funded order instance"
        );

        Ok(Funded {
            placement: inspected.placement,
            tx_hash: inspected.tx_hash,
            transfer,
        })
    }

    #[instrument(skip_all, fields(instance = ?funded.placement.instance))]
    pub async fn publish(&self, funded: Funded) -> Result<Published, Error> {
        let uid = self.offchain.submit(&funded.placement).await?;
        tracing::info!(%uid, "order published");

        Ok(Published {
            placement: funded.placement,
            tx_hash: funded.tx_hash,
            transfer: funded.transfer,
            uid,
        })
    }
}
