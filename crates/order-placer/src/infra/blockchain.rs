//! Chain access of the placement workflow through an alloy provider that
//! signs with the configured account.

use {
    crate::{
        Error,
        order::Salt,
        traits::{ChainRead, PlacementResult, Receipt, SettlementContract, TokenContract},
    },
    alloy::{
        network::EthereumWallet,
        primitives::{Address, TxHash, U256},
        providers::{DynProvider, PendingTransactionBuilder, Provider, ProviderBuilder},
        signers::local::PrivateKeySigner,
    },
    anyhow::{Context, Result},
    contracts::alloy::{
        ERC20,
        SWAP_ORDER_FACTORY_DEPLOYMENTS,
        SwapOrderFactory::{self, Order},
    },
    url::Url,
};

pub struct Ethereum {
    provider: DynProvider,
    account: Address,
    factory: SwapOrderFactory::Instance,
}

impl Ethereum {
    /// Connects to the node and resolves the order factory, falling back to
    /// the known deployment of the connected chain.
    pub async fn new(
        node_url: Url,
        signer: PrivateKeySigner,
        factory: Option<Address>,
    ) -> Result<Self, Error> {
        let account = signer.address();
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::new(signer))
            .connect_http(node_url)
            .erased();
        let factory = match factory {
            Some(address) => address,
            None => {
                let chain_id = provider.get_chain_id().await.map_err(|err| {
                    Error::NodeUnavailable(format!("could not fetch current chain id: {err}"))
                })?;
                *SWAP_ORDER_FACTORY_DEPLOYMENTS
                    .get(&chain_id)
                    .ok_or_else(|| {
                        Error::InvalidConfiguration(format!(
                            "no order factory deployment known for chain {chain_id}"
                        ))
                    })?
            }
        };

        Ok(Self {
            factory: SwapOrderFactory::Instance::new(factory, provider.clone()),
            provider,
            account,
        })
    }

    fn token(&self, address: Address) -> ERC20::Instance {
        ERC20::Instance::new(address, self.provider.clone())
    }
}

#[async_trait::async_trait]
impl SettlementContract for Ethereum {
    fn address(&self) -> Address {
        *self.factory.address()
    }

    async fn simulate_placement(&self, order: &Order, salt: Salt) -> Result<PlacementResult> {
        let result = self
            .factory
            .placeWaitingSwap(order.clone(), salt.0)
            .from(self.account)
            .call()
            .await?;
        Ok(PlacementResult {
            signature: result.signature,
            instance: result.instance,
        })
    }

    async fn submit_placement(&self, order: &Order, salt: Salt, gas_limit: u64) -> Result<TxHash> {
        let pending = self
            .factory
            .placeWaitingSwap(order.clone(), salt.0)
            .from(self.account)
            .gas(gas_limit)
            .send()
            .await
            .context("failed to send placeWaitingSwap transaction")?;
        Ok(*pending.tx_hash())
    }
}

#[async_trait::async_trait]
impl TokenContract for Ethereum {
    async fn allowance(&self, token: Address, owner: Address, spender: Address) -> Result<U256> {
        self.token(token)
            .allowance(owner, spender)
            .call()
            .await
            .with_context(|| format!("failed to read allowance of token {token}"))
    }

    async fn submit_approve(
        &self,
        token: Address,
        spender: Address,
        amount: U256,
    ) -> Result<TxHash> {
        let pending = self
            .token(token)
            .approve(spender, amount)
            .from(self.account)
            .send()
            .await
            .with_context(|| format!("failed to send approval of token {token}"))?;
        Ok(*pending.tx_hash())
    }

    async fn submit_transfer(&self, token: Address, to: Address, amount: U256) -> Result<TxHash> {
        let pending = self
            .token(token)
            .transfer(to, amount)
            .from(self.account)
            .send()
            .await
            .with_context(|| format!("failed to send transfer of token {token}"))?;
        Ok(*pending.tx_hash())
    }
}

#[async_trait::async_trait]
impl ChainRead for Ethereum {
    async fn wait_for_receipt(&self, tx: TxHash) -> Result<Receipt> {
        let receipt = PendingTransactionBuilder::new(self.provider.root().clone(), tx)
            .get_receipt()
            .await
            .with_context(|| format!("failed to get receipt of {tx:?}"))?;
        Ok(Receipt {
            tx_hash: receipt.transaction_hash,
            success: receipt.status(),
            logs: receipt
                .inner
                .logs()
                .iter()
                .map(|log| log.inner.clone())
                .collect(),
        })
    }
}
