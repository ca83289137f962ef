//! Construction of the on-chain order and of the salt that, together with the
//! order, determines the address of the order instance.

use {
    crate::{Error, workflow::Built},
    alloy::{
        primitives::{Address, B256, Bytes, U256, keccak256},
        sol_types::SolValue,
    },
    contracts::alloy::SwapOrderFactory::Order,
    std::{
        fmt,
        time::{Duration, SystemTime, UNIX_EPOCH},
    },
};

/// Cryptographically random value that makes the order instance unique.
///
/// Placing an identical order with the same salt twice targets the same
/// instance address and is expected to fail on-chain.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Salt(pub B256);

impl Salt {
    pub fn random() -> Self {
        Self(B256::from(rand::random::<[u8; 32]>()))
    }
}

impl fmt::Display for Salt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

/// Everything needed to draft an order. Amounts are already expressed in the
/// smallest unit of the respective token.
#[derive(Clone, Debug)]
pub struct OrderRequest {
    pub sell_token: Address,
    pub buy_token: Address,
    pub receiver: Address,
    pub sell_amount: U256,
    pub buy_amount: U256,
    pub fee_amount: U256,
    /// How long the order stays valid after it was built.
    pub validity: Duration,
    /// Market gating settlement, `U256::ZERO` for an unconditional swap.
    pub market_id: U256,
    pub market_wanted_result: U256,
    pub meta: Bytes,
}

impl OrderRequest {
    /// Builds the order valid until `now + validity` together with a fresh
    /// salt. Performs no I/O.
    pub fn build(self, now: u64) -> Result<Built, Error> {
        let invalid = |reason: &str| Err(Error::InvalidConfiguration(reason.to_string()));
        if self.sell_token.is_zero() {
            return invalid("sell token must not be the zero address");
        }
        if self.buy_token.is_zero() {
            return invalid("buy token must not be the zero address");
        }
        if self.sell_token == self.buy_token {
            return invalid("sell and buy token must differ");
        }
        if self.receiver.is_zero() {
            return invalid("receiver must not be the zero address");
        }
        if self.sell_amount.is_zero() {
            return invalid("sell amount must not be zero");
        }
        if self.buy_amount.is_zero() {
            return invalid("buy amount must not be zero");
        }
        if self.validity.is_zero() {
            return invalid("validity must not be zero");
        }
        let valid_to = now
            .checked_add(self.validity.as_secs())
            .and_then(|valid_to| u32::try_from(valid_to).ok())
            .ok_or_else(|| {
                Error::InvalidConfiguration(format!(
                    "validity of {:?} from {now} overflows the order's validTo",
                    self.validity
                ))
            })?;

        Ok(Built {
            order: Order {
                sellToken: self.sell_token,
                buyToken: self.buy_token,
                receiver: self.receiver,
                sellAmount: self.sell_amount,
                buyAmount: self.buy_amount,
                validTo: valid_to,
                marketId: self.market_id,
                marketWantedResult: self.market_wanted_result,
                feeAmount: self.fee_amount,
                meta: self.meta,
            },
            salt: Salt::random(),
        })
    }
}

/// Current UNIX time in seconds.
pub fn now_in_epoch_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default()
}

/// Predicts the address the factory deploys the order instance to.
///
/// The factory uses CREATE2 with `keccak256(abi.encode(order, salt))` as the
/// salt, so the address only depends on the factory, the order, the salt and
/// the instance init code.
pub fn derive_instance_address(
    factory: Address,
    order: &Order,
    salt: Salt,
    init_code_hash: B256,
) -> Address {
    let create2_salt = keccak256((order.clone(), salt.0).abi_encode_params());
    factory.create2(create2_salt, init_code_hash)
}
