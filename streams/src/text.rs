// Text rendering helper
// Display is a caller-side concern layered on read_all; the documented
// default encoding is strict UTF-8 and invalid bytes fail loudly instead
// of being silently substituted.

use adsview_core::AdsError;

/// Decode stream bytes as UTF-8 for display.
pub fn decode_text(bytes: &[u8]) -> Result<String, AdsError> {
    String::from_utf8(bytes.to_vec()).map_err(|e| {
        AdsError::DecodeError(format!(
            "invalid UTF-8 at byte {}",
            e.utf8_error().valid_up_to()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_valid_utf8() {
        assert_eq!(decode_text(b"hello streams").unwrap(), "hello streams");
    }

    #[test]
    fn test_decode_empty() {
        assert_eq!(decode_text(b"").unwrap(), "");
    }

    #[test]
    fn test_decode_rejects_invalid_bytes() {
        let err = decode_text(&[0x68, 0x69, 0xFF, 0x68]).unwrap_err();
        match err {
            AdsError::DecodeError(msg) => assert!(msg.contains("byte 2"), "got {}", msg),
            other => panic!("expected DecodeError, got {:?}", other),
        }
    }
}
