use serde::Serialize;

/// Snapshot of one alternate data stream at enumeration time.
///
/// The size is authoritative only at the instant of observation; the stream
/// is external shared state and may change (or vanish) immediately after.
/// Consumers must treat a descriptor as a hint and be prepared for
/// `StreamNotFound` on any follow-up open or delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamDescriptor {
    /// User-facing stream name, without the `:name:$DATA` decoration.
    pub name: String,
    /// Declared byte length at enumeration time.
    pub size: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_serializes_to_plain_fields() {
        let desc = StreamDescriptor {
            name: "notes".to_string(),
            size: 5,
        };
        let json = serde_json::to_string(&desc).unwrap();
        assert_eq!(json, r#"{"name":"notes","size":5}"#);
    }
}
