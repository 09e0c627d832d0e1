//! Value serialization strategies
//!
//! Typed values are encoded straight to the bytes written to the backing
//! store. The binary strategy is the default for every cache configuration.

use crate::errors::CacheError;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Bytes stored in place of a cached "no result".
pub const NULL_VALUE: &[u8] = b"\0duck-cache:null";

/// Converts cache values to and from the bytes written to the backing store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueSerializer {
    /// Compact binary `serde` encoding, usable for any serializable type
    #[default]
    Binary,
    /// JSON documents, readable with `redis-cli`. Restricted to JSON's data
    /// model: non-string map keys and non-finite floats do not survive.
    Json,
}

impl ValueSerializer {
    /// Stable identifier of the strategy
    pub fn id(&self) -> &'static str {
        match self {
            ValueSerializer::Binary => "binary",
            ValueSerializer::Json => "json",
        }
    }

    pub fn serialize<T>(&self, value: &T) -> Result<Vec<u8>, CacheError>
    where
        T: Serialize + ?Sized,
    {
        match self {
            ValueSerializer::Binary => Ok(bincode::serde::encode_to_vec(
                value,
                bincode::config::standard(),
            )?),
            ValueSerializer::Json => Ok(serde_json::to_vec(value)?),
        }
    }

    pub fn deserialize<T>(&self, bytes: &[u8]) -> Result<T, CacheError>
    where
        T: DeserializeOwned,
    {
        match self {
            ValueSerializer::Binary => {
                let (value, read) =
                    bincode::serde::decode_from_slice(bytes, bincode::config::standard())?;
                if read != bytes.len() {
                    return Err(CacheError::General(format!(
                        "{} trailing bytes after cached value",
                        bytes.len() - read
                    )));
                }
                Ok(value)
            }
            ValueSerializer::Json => Ok(serde_json::from_slice(bytes)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::HashMap;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Order {
        id: u64,
        lines: Vec<(String, u32)>,
        note: Option<String>,
    }

    #[test]
    fn test_binary_is_default() {
        assert_eq!(ValueSerializer::default(), ValueSerializer::Binary);
        assert_eq!(ValueSerializer::default().id(), "binary");
    }

    #[test]
    fn test_binary_preserves_struct() {
        let order = Order {
            id: 7,
            lines: vec![("apple".to_string(), 3)],
            note: None,
        };
        let bytes = ValueSerializer::Binary.serialize(&order).unwrap();

        assert_eq!(ValueSerializer::Binary.deserialize::<Order>(&bytes).unwrap(), order);
    }

    #[test]
    fn test_binary_handles_values_outside_json() {
        let bytes = ValueSerializer::Binary.serialize(&f64::NAN).unwrap();
        assert!(ValueSerializer::Binary.deserialize::<f64>(&bytes).unwrap().is_nan());

        let grid: HashMap<(u8, u8), u8> = HashMap::from([((1, 2), 3), ((4, 5), 6)]);
        let bytes = ValueSerializer::Binary.serialize(&grid).unwrap();
        assert_eq!(
            ValueSerializer::Binary
                .deserialize::<HashMap<(u8, u8), u8>>(&bytes)
                .unwrap(),
            grid
        );
    }

    #[test]
    fn test_json_rejects_non_string_keys() {
        let grid: HashMap<(u8, u8), u8> = HashMap::from([((1, 2), 3)]);
        let result = ValueSerializer::Json.serialize(&grid);
        assert!(matches!(result, Err(CacheError::SerializationError(_))));
    }

    #[test]
    fn test_binary_rejects_trailing_bytes() {
        let mut bytes = ValueSerializer::Binary.serialize(&5u8).unwrap();
        bytes.push(0);

        let result = ValueSerializer::Binary.deserialize::<u8>(&bytes);
        assert!(matches!(result, Err(CacheError::General(_))));
    }

    #[test]
    fn test_truncated_bytes_fail() {
        let result = ValueSerializer::Binary.deserialize::<String>(&[10, b'a']);
        assert!(matches!(result, Err(CacheError::DecodeError(_))));

        let result = ValueSerializer::Json.deserialize::<Order>(b"{not json");
        assert!(matches!(result, Err(CacheError::SerializationError(_))));
    }
}
