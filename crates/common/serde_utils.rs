use serde::{Deserialize, Deserializer, Serializer, de::Error};

/// Serde helpers for `Bytes` fields carried as base64 strings, the way Go's
/// `encoding/json` marshals `[]byte`.
pub mod bytes_base64 {
    use super::*;
    use bytes::Bytes;

    pub fn deserialize<'de, D>(d: D) -> Result<Bytes, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(d)?;
        crate::base64::decode(&value)
            .map(Bytes::from)
            .map_err(|e| D::Error::custom(e.to_string()))
    }

    pub fn serialize<S>(value: &Bytes, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&crate::base64::encode(value))
    }
}
