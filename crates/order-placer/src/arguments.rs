use {
    alloy::{
        primitives::{Address, B256, Bytes, U256},
        signers::local::PrivateKeySigner,
    },
    std::{
        fmt::{self, Display, Formatter},
        time::Duration,
    },
    tracing::level_filters::LevelFilter,
    url::Url,
};

#[derive(clap::Parser)]
pub struct Arguments {
    #[clap(long, env, default_value = "warn,order_placer=debug")]
    pub log_filter: String,

    #[clap(long, env, default_value = "error")]
    pub log_stderr_threshold: LevelFilter,

    /// Emit log events as JSON.
    #[clap(long, env)]
    pub use_json_logs: bool,

    /// The Ethereum node URL to connect to.
    #[clap(long, env, default_value = "http://localhost:8545")]
    pub node_url: Url,

    /// Private key of the account that places and funds the order.
    #[clap(long, env)]
    pub private_key: PrivateKeySigner,

    /// Address of the order factory. Defaults to the known deployment of the
    /// connected chain.
    #[clap(long, env)]
    pub order_factory: Option<Address>,

    /// Init code hash of the order instance contract. When set, the instance
    /// address reported by the simulation has to match the locally derived
    /// CREATE2 address.
    #[clap(long, env)]
    pub instance_init_code_hash: Option<B256>,

    /// Spender of the sell token allowance. Defaults to the order factory.
    #[clap(long, env)]
    pub allowance_spender: Option<Address>,

    /// Base URL of the order book API.
    #[clap(long, env, default_value = "https://api.cow.fi/xdai/")]
    pub orderbook_url: Url,

    #[clap(long, env)]
    pub sell_token: Address,

    #[clap(long, env, default_value = "18")]
    pub sell_token_decimals: u8,

    #[clap(long, env)]
    pub buy_token: Address,

    #[clap(long, env, default_value = "6")]
    pub buy_token_decimals: u8,

    /// Amount of sell token in token units, e.g. `0.00001`.
    #[clap(long, env)]
    pub sell_amount: String,

    /// Minimum amount of buy token in token units, e.g. `0.002`.
    #[clap(long, env)]
    pub buy_amount: String,

    /// Fee in sell token units.
    #[clap(long, env, default_value = "0")]
    pub fee_amount: String,

    /// Receiver of the bought tokens. Defaults to the placing account.
    #[clap(long, env)]
    pub receiver: Option<Address>,

    /// How long the order stays valid, e.g. `20m` or `1200s`.
    #[clap(
        long,
        env,
        default_value = "20m",
        value_parser = humantime::parse_duration,
    )]
    pub validity: Duration,

    /// Market the swap is conditional on, 0 for an unconditional swap.
    #[clap(long, env, default_value = "0")]
    pub market_id: U256,

    #[clap(long, env, default_value = "0")]
    pub market_wanted_result: U256,

    /// Hex encoded order meta data.
    #[clap(long, env, default_value = "0x")]
    pub meta: Bytes,

    /// Gas limit of the placement transaction.
    #[clap(long, env, default_value = "3000000")]
    pub placement_gas_limit: u64,
}

fn display_option(f: &mut Formatter<'_>, name: &str, option: &Option<impl Display>) -> fmt::Result {
    match option {
        Some(value) => writeln!(f, "{name}: {value}"),
        None => writeln!(f, "{name}: None"),
    }
}

impl Display for Arguments {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "log_filter: {}", self.log_filter)?;
        writeln!(f, "log_stderr_threshold: {}", self.log_stderr_threshold)?;
        writeln!(f, "use_json_logs: {}", self.use_json_logs)?;
        writeln!(f, "node_url: {}", self.node_url)?;
        writeln!(f, "private_key: SECRET")?;
        display_option(f, "order_factory", &self.order_factory)?;
        display_option(f, "instance_init_code_hash", &self.instance_init_code_hash)?;
        display_option(f, "allowance_spender", &self.allowance_spender)?;
        writeln!(f, "orderbook_url: {}", self.orderbook_url)?;
        writeln!(f, "sell_token: {}", self.sell_token)?;
        writeln!(f, "sell_token_decimals: {}", self.sell_token_decimals)?;
        writeln!(f, "buy_token: {}", self.buy_token)?;
        writeln!(f, "buy_token_decimals: {}", self.buy_token_decimals)?;
        writeln!(f, "sell_amount: {}", self.sell_amount)?;
        writeln!(f, "buy_amount: {}", self.buy_amount)?;
        writeln!(f, "fee_amount: {}", self.fee_amount)?;
        display_option(f, "receiver", &self.receiver)?;
        writeln!(f, "validity: {:?}", self.validity)?;
        writeln!(f, "market_id: {}", self.market_id)?;
        writeln!(f, "market_wanted_result: {}", self.market_wanted_result)?;
        writeln!(f, "meta: {}", self.meta)?;
        writeln!(f, "placement_gas_limit: {}", self.placement_gas_limit)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use {super::*, clap::Parser};

    const PRIVATE_KEY: &str = "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

    fn try_parse(extra: &[&str]) -> Result<Arguments, clap::Error> {
        let args = [
            "order-placer",
            "--private-key",
            PRIVATE_KEY,
            "--sell-token",
            "0x6A023CCd1ff6F2045C3309768eAd9E68F978f6e1",
            "--buy-token",
            "0x4ECaBa5870353805a9F068101A40E0f32ed605C6",
            "--sell-amount",
            "0.00001",
            "--buy-amount",
            "0.002",
        ];
        Arguments::try_parse_from(args.iter().chain(extra))
    }

    fn parse(extra: &[&str]) -> Arguments {
        try_parse(extra).unwrap()
    }

    #[test]
    fn defaults() {
        let args = parse(&[]);

        assert_eq!(args.log_filter, "warn,order_placer=debug");
        assert_eq!(args.log_stderr_threshold, LevelFilter::ERROR);
        assert_eq!(args.node_url.as_str(), "http://localhost:8545/");
        assert_eq!(args.orderbook_url.as_str(), "https://api.cow.fi/xdai/");
        assert_eq!(args.sell_token_decimals, 18);
        assert_eq!(args.buy_token_decimals, 6);
        assert_eq!(args.fee_amount, "0");
        assert_eq!(args.validity, Duration::from_secs(1200));
        assert_eq!(args.market_id, U256::ZERO);
        assert!(args.meta.is_empty());
        assert_eq!(args.placement_gas_limit, 3_000_000);
        assert!(args.order_factory.is_none());
        assert!(args.receiver.is_none());
    }

    #[test]
    fn parses_validity() {
        assert_eq!(parse(&["--validity", "90s"]).validity, Duration::from_secs(90));
        assert_eq!(parse(&["--validity=1h"]).validity, Duration::from_secs(3600));
    }

    #[test]
    fn rejects_invalid_validity() {
        for validity in ["--validity=-5", "--validity=inf", "--validity=NaN", "--validity=5"] {
            assert!(try_parse(&[validity]).is_err(), "{validity}");
        }
    }

    #[test]
    fn hides_private_key() {
        let args = parse(&["--meta", "0xc0ffee"]);

        let display = args.to_string();
        assert!(display.contains("private_key: SECRET"));
        assert!(!display.contains(&PRIVATE_KEY[2..]));
        assert!(display.contains("meta: 0xc0ffee"));
    }
}
