use {
    alloy::primitives::{
        U256,
        utils::{ParseUnits, parse_units},
    },
    anyhow::{Context, Result, anyhow},
};

/// Converts a human readable decimal amount (e.g. `"0.00001"`) into the
/// token's smallest unit given its number of decimals.
///
/// Fails for negative amounts and for amounts with more fractional digits
/// than the token supports, instead of silently truncating them.
pub fn to_smallest_unit(amount: &str, decimals: u8) -> Result<U256> {
    let amount = amount.trim();
    if let Some((_, fraction)) = amount.split_once('.') {
        anyhow::ensure!(
            fraction.len() <= usize::from(decimals),
            "{amount:?} has more than {decimals} fractional digits"
        );
    }
    match parse_units(amount, decimals).with_context(|| format!("invalid amount {amount:?}"))? {
        ParseUnits::U256(value) => Ok(value),
        ParseUnits::I256(_) => Err(anyhow!("negative amount {amount:?}")),
    }
}
