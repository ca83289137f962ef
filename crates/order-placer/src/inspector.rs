//! Extracts the `OrderPlacement` event from the placement receipt.

use {
    crate::{Error, traits::Receipt},
    alloy::{
        primitives::{Address, Bytes},
        sol_types::SolEvent,
    },
    contracts::alloy::SwapOrderFactory::{Order, OrderPlacement},
};

/// An order as it was confirmed on-chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placement {
    /// Account that placed the order, the order's owner off-chain.
    pub sender: Address,
    pub order: Order,
    pub signature: Bytes,
    /// Contract that holds the funds and validates the signature.
    pub instance: Address,
}

/// Finds the unique `OrderPlacement` log for `submitted` in the receipt.
///
/// Only logs emitted by the factory or by the simulated instance are
/// considered. Logs carrying the event topic that fail to decode are skipped.
pub fn inspect(
    receipt: &Receipt,
    factory: Address,
    instance: Address,
    submitted: &Order,
) -> Result<Placement, Error> {
    let not_found = |reason: String| Error::EventNotFound {
        tx: receipt.tx_hash,
        reason,
    };

    let mut events = Vec::new();
    let mut undecodable = 0;
    for log in receipt
        .logs
        .iter()
        .filter(|log| log.address == factory || log.address == instance)
        .filter(|log| log.topics().first() == Some(&OrderPlacement::SIGNATURE_HASH))
    {
        match OrderPlacement::decode_log(log) {
            Ok(event) => events.push(event.data),
            Err(err) => {
                tracing::debug!(
                    ?err,
                    emitter = ?log.address,
                    "skipping undecodable OrderPlacement log"
                );
                undecodable += 1;
            }
        }
    }
    let skipped = match undecodable {
        0 => String::new(),
        n => format!(" ({n} undecodable OrderPlacement logs skipped)"),
    };

    if events.is_empty() {
        return Err(not_found(format!("no OrderPlacement log in receipt{skipped}")));
    }

    let mut matching = events.into_iter().filter(|event| &event.order == submitted);
    let event = matching.next().ok_or_else(|| {
        not_found(format!(
            "OrderPlacement order does not match the submitted order{skipped}"
        ))
    })?;
    if matching.next().is_some() {
        return Err(not_found(
            "multiple OrderPlacement logs for the submitted order".to_string(),
        ));
    }

    Ok(Placement {
        sender: event.sender,
        order: event.order,
        signature: event.signature,
        instance,
    })
}
