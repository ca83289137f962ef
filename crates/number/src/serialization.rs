use {
    alloy::primitives::U256,
    serde::{
        Deserializer,
        Serializer,
        de::{self, Visitor},
    },
    serde_with::{DeserializeAs, SerializeAs},
    std::fmt,
};

/// Serializes [`U256`] as a decimal string and deserializes it from either a
/// decimal string or a 0x prefixed hex string.
///
/// Use it through `serde_with`:
///
/// ```ignore
/// #[serde_as(as = "DecimalU256")]
/// pub amount: U256,
/// ```
pub struct DecimalU256;

impl SerializeAs<U256> for DecimalU256 {
    fn serialize_as<S: Serializer>(source: &U256, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(source)
    }
}

impl<'de> DeserializeAs<'de, U256> for DecimalU256 {
    fn deserialize_as<D>(deserializer: D) -> Result<U256, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct U256Visitor;

        impl Visitor<'_> for U256Visitor {
            type Value = U256;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                write!(
                    formatter,
                    "a u256 encoded either as 0x hex prefixed or decimal encoded string"
                )
            }

            fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                let s = s.trim();
                match s.strip_prefix("0x") {
                    Some(hex) => U256::from_str_radix(hex, 16).map_err(|err| {
                        E::custom(format!("failed to decode {s:?} as hex u256: {err}"))
                    }),
                    None => U256::from_str_radix(s, 10).map_err(|err| {
                        E::custom(format!("failed to decode {s:?} as decimal u256: {err}"))
                    }),
                }
            }
        }

        deserializer.deserialize_str(U256Visitor)
    }
}
