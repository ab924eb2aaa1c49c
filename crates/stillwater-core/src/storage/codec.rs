//! Length-prefixed record codec.
//!
//! Stored values are a 4-byte little-endian payload length followed by the
//! JSON payload. The prefix lets the repository reject truncated blobs
//! before handing them to serde; any mismatch decodes as
//! [`StorageError::Deserialization`], which the repository treats as
//! "absent" rather than a crash so a schema change never blocks startup.

use serde::{de::DeserializeOwned, Serialize};

use crate::error::StorageError;

/// Encode `value` as length-prefixed JSON bytes.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, StorageError> {
    let payload =
        serde_json::to_vec(value).map_err(|e| StorageError::Serialization(e.to_string()))?;
    let mut buf = Vec::with_capacity(payload.len() + 4);
    buf.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    buf.extend_from_slice(&payload);
    Ok(buf)
}

/// Decode length-prefixed JSON bytes back into a record.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, StorageError> {
    if bytes.len() < 4 {
        return Err(StorageError::Deserialization(format!(
            "record too short for length prefix ({} bytes)",
            bytes.len()
        )));
    }
    let mut prefix = [0u8; 4];
    prefix.copy_from_slice(&bytes[..4]);
    let expected = u32::from_le_bytes(prefix) as usize;
    let payload = &bytes[4..];
    if payload.len() != expected {
        return Err(StorageError::Deserialization(format!(
            "length prefix says {expected} bytes, got {}",
            payload.len()
        )));
    }
    serde_json::from_slice(payload).map_err(|e| StorageError::Deserialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UserStats;

    #[test]
    fn round_trip() {
        let stats = UserStats::default();
        let bytes = encode(&stats).unwrap();
        let back: UserStats = decode(&bytes).unwrap();
        assert_eq!(back, stats);
    }

    #[test]
    fn rejects_truncated_record() {
        let bytes = encode(&UserStats::default()).unwrap();
        let err = decode::<UserStats>(&bytes[..bytes.len() - 2]);
        assert!(matches!(err, Err(StorageError::Deserialization(_))));
    }

    #[test]
    fn rejects_short_blob() {
        assert!(matches!(
            decode::<UserStats>(&[1, 0]),
            Err(StorageError::Deserialization(_))
        ));
    }

    #[test]
    fn rejects_schema_mismatch() {
        let bytes = encode(&vec![1u32, 2, 3]).unwrap();
        assert!(matches!(
            decode::<UserStats>(&bytes),
            Err(StorageError::Deserialization(_))
        ));
    }
}
