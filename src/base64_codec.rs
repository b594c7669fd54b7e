//! Base64 wrapper around the generic decoder (`fromBase64`/`toBase64` in the
//! reference API), for wire-transport and test ergonomics.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::{Asn1Error, Asn1Result};

/// Decode a base64 string to raw bytes, ready to hand to [`crate::decode`].
pub fn from_base64(input: &str) -> Asn1Result<Vec<u8>> {
    STANDARD
        .decode(input.trim())
        .map_err(|e| Asn1Error::Base64(e.to_string()))
}

/// Encode raw bytes (typically the output of [`crate::encode`]) as base64.
pub fn to_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrips_arbitrary_bytes() {
        let bytes = vec![0x01, 0x02, 0xFF, 0x00, 0x7F];
        let encoded = to_base64(&bytes);
        assert_eq!(from_base64(&encoded).unwrap(), bytes);
    }

    #[test]
    fn rejects_invalid_base64() {
        assert!(from_base64("not valid base64!!").is_err());
    }
}
