use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use num_bigint::{BigInt, Sign};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SerializeError {
    #[error("invalid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
}

/// Base-64 of the big-endian magnitude. Values in this crate are never
/// negative, so no sign is carried.
pub fn bigint_to_base64(value: &BigInt) -> String {
    let (_, bytes) = value.to_bytes_be();
    STANDARD.encode(bytes)
}

pub fn bigint_from_base64(encoded: &str) -> Result<BigInt, SerializeError> {
    let bytes = STANDARD.decode(encoded)?;
    Ok(BigInt::from_bytes_be(Sign::Plus, &bytes))
}

/// serde adapter for a base-64 bigint field.
pub mod b64 {
    use num_bigint::BigInt;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &BigInt, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::bigint_to_base64(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigInt, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        super::bigint_from_base64(&encoded).map_err(serde::de::Error::custom)
    }
}

/// serde adapter for a sequence of base-64 bigints.
pub mod b64_seq {
    use num_bigint::BigInt;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(values: &[BigInt], serializer: S) -> Result<S::Ok, S::Error> {
        let encoded: Vec<String> = values.iter().map(|v| super::bigint_to_base64(v)).collect();
        serde::Serialize::serialize(&encoded, serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<BigInt>, D::Error> {
        let encoded = Vec::<String>::deserialize(deserializer)?;
        encoded
            .iter()
            .map(|s| super::bigint_from_base64(s).map_err(serde::de::Error::custom))
            .collect()
    }
}
