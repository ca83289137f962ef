pub mod arguments;
mod error;
pub mod funding;
pub mod infra;
pub mod inspector;
pub mod offchain;
pub mod order;
pub mod traits;
pub mod workflow;

pub use error::Error;
use {
    alloy::primitives::Address,
    anyhow::Context,
    arguments::Arguments,
    clap::Parser,
    number::units::to_smallest_unit,
    order::OrderRequest,
    std::sync::Arc,
    traits::SettlementContract,
    workflow::{Config, Orchestrator, Published},
};

pub async fn start(args: impl Iterator<Item = String>) {
    let args = Arguments::parse_from(args);
    let obs_config = observe::Config::new(
        &args.log_filter,
        args.log_stderr_threshold,
        args.use_json_logs,
    );
    observe::tracing::initialize(&obs_config);
    observe::panic_hook::install();
    tracing::info!("running order placer with validated arguments:\n{}", args);

    match run(args).await {
        Ok(published) => tracing::info!(
            uid = %published.uid,
            instance = ?published.placement.instance,
            placement_tx = ?published.tx_hash,
            funding_tx = ?published.transfer.tx_hash,
            "order placed"
        ),
        Err(err) => {
            tracing::error!(?err, "order placement failed");
            std::process::exit(1);
        }
    }
}

/// Places, funds and publishes a single order as configured by `args`.
///
/// All input is validated before the node is contacted.
pub async fn run(args: Arguments) -> Result<Published, Error> {
    let owner = args.private_key.address();
    let built = order_request(&args, owner)?.build(order::now_in_epoch_seconds())?;
    let orderbook = infra::Orderbook::new(reqwest::Client::new(), args.orderbook_url)
        .map_err(|err| Error::InvalidConfiguration(format!("{err:#}")))?;

    let ethereum =
        infra::Ethereum::new(args.node_url, args.private_key, args.order_factory).await?;
    let factory = ethereum.address();
    tracing::info!(order = ?built.order, salt = %built.salt, ?factory, "built order");

    let config = Config {
        owner,
        allowance_spender: args.allowance_spender.unwrap_or(factory),
        placement_gas_limit: args.placement_gas_limit,
        instance_init_code_hash: args.instance_init_code_hash,
    };
    let ethereum = Arc::new(ethereum);
    Orchestrator::new(
        config,
        ethereum.clone(),
        ethereum.clone(),
        ethereum,
        Arc::new(orderbook),
    )
    .run(built)
    .await
}

fn order_request(args: &Arguments, owner: Address) -> Result<OrderRequest, Error> {
    let amount = |amount: &str, decimals: u8, name: &str| {
        to_smallest_unit(amount, decimals)
            .with_context(|| format!("invalid {name} {amount:?}"))
            .map_err(|err| Error::InvalidConfiguration(format!("{err:#}")))
    };

    Ok(OrderRequest {
        sell_token: args.sell_token,
        buy_token: args.buy_token,
        receiver: args.receiver.unwrap_or(owner),
        sell_amount: amount(&args.sell_amount, args.sell_token_decimals, "sell amount")?,
        buy_amount: amount(&args.buy_amount, args.buy_token_decimals, "buy amount")?,
        fee_amount: amount(&args.fee_amount, args.sell_token_decimals, "fee amount")?,
        validity: args.validity,
        market_id: args.market_id,
        market_wanted_result: args.market_wanted_result,
        meta: args.meta.clone(),
    })
}
