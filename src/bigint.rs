//! BigInt ↔ bytes: minimal two's-complement signed encoding.
//!
//! This is the byte-level half of the INTEGER variant (`AsnValue::Integer`'s
//! content is exactly `bigint_to_buffer(n)`), and is also exposed directly to
//! callers per the reference API (`bigIntToBuffer`, `bufferToBigInt`).
//!
//! The two's-complement logic is written out explicitly rather than deferred
//! to a library helper: a prior JS implementation of this routine
//! (`NodeASN1BigIntToBuffer`) had a known bug on negative values, so the
//! encoding rule here is spelled out in full to make it auditable.

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{One, Zero};

use crate::error::{Asn1Error, Asn1Result};

/// Encode `n` as the minimal two's-complement big-endian byte sequence BER
/// requires for an INTEGER's content octets.
pub fn bigint_to_buffer(n: &BigInt) -> Vec<u8> {
    if n.is_zero() {
        return vec![0x00];
    }

    if n.sign() == Sign::Minus {
        encode_negative(n.magnitude())
    } else {
        encode_non_negative(n.magnitude())
    }
}

fn encode_non_negative(magnitude: &BigUint) -> Vec<u8> {
    let mut bytes = magnitude.to_bytes_be();
    if bytes.first().is_some_and(|b| b & 0x80 != 0) {
        bytes.insert(0, 0x00);
    }
    bytes
}

/// Two's complement of `-magnitude` at the minimal width whose sign bit is 1.
///
/// Derivation: for a width-`w` two's-complement representation, the encoded
/// value is `2^(8w) - magnitude`. Since `2^(8w) - 1` is all-ones, that equals
/// the bitwise complement of `(magnitude - 1)` zero-padded to `w` bytes. `w`
/// is the smallest byte count with `magnitude <= 2^(8w - 1)` (the largest
/// magnitude representable with the sign bit set).
fn encode_negative(magnitude: &BigUint) -> Vec<u8> {
    let width = minimal_twos_complement_width(magnitude);
    let predecessor = magnitude - BigUint::one();

    let mut bytes = predecessor.to_bytes_be();
    if bytes.len() < width {
        let mut padded = vec![0u8; width - bytes.len()];
        padded.extend_from_slice(&bytes);
        bytes = padded;
    }
    for byte in bytes.iter_mut() {
        *byte = !*byte;
    }
    bytes
}

fn minimal_twos_complement_width(magnitude: &BigUint) -> usize {
    let mut width = (((magnitude.bits() + 7) / 8).max(1)) as usize;
    loop {
        let threshold = BigUint::one() << (8 * width - 1);
        if *magnitude <= threshold {
            return width;
        }
        width += 1;
    }
}

/// Decode a BER INTEGER's content octets back to a [`BigInt`].
pub fn buffer_to_bigint(bytes: &[u8]) -> Asn1Result<BigInt> {
    if bytes.is_empty() {
        return Err(Asn1Error::TruncatedInput {
            offset: 0,
            needed: 1,
        });
    }

    if bytes[0] & 0x80 == 0 {
        Ok(BigInt::from_bytes_be(Sign::Plus, bytes))
    } else {
        let inverted: Vec<u8> = bytes.iter().map(|b| !b).collect();
        let magnitude = BigUint::from_bytes_be(&inverted) + BigUint::one();
        Ok(-BigInt::from_biguint(Sign::Plus, magnitude))
    }
}

/// Widen a native host integer to arbitrary precision (`integerToBigInt`).
pub fn integer_to_bigint(n: i64) -> BigInt {
    BigInt::from(n)
}

/// Parse a base-10 ASCII literal to arbitrary precision (`stringToBigInt`).
pub fn string_to_bigint(s: &str) -> Asn1Result<BigInt> {
    s.trim()
        .parse::<BigInt>()
        .map_err(|_| Asn1Error::InvalidBigIntLiteral(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_single_zero_byte() {
        assert_eq!(bigint_to_buffer(&BigInt::zero()), vec![0x00]);
    }

    #[test]
    fn positive_42() {
        assert_eq!(bigint_to_buffer(&BigInt::from(42)), vec![0x2A]);
    }

    #[test]
    fn positive_needs_leading_zero_for_sign() {
        // 0x80 alone would look negative; must gain a leading 0x00.
        assert_eq!(bigint_to_buffer(&BigInt::from(0x80)), vec![0x00, 0x80]);
    }

    #[test]
    fn negative_0xffff() {
        assert_eq!(
            bigint_to_buffer(&BigInt::from(-0xFFFFi64)),
            vec![0xFF, 0x00, 0x01]
        );
    }

    #[test]
    fn negative_128_fits_one_byte() {
        assert_eq!(bigint_to_buffer(&BigInt::from(-128i64)), vec![0x80]);
    }

    #[test]
    fn large_positive_and_negated() {
        let positive = BigInt::parse_bytes(b"10203040506070809", 16).unwrap();
        assert_eq!(
            bigint_to_buffer(&positive),
            vec![0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09]
        );
        let negative = -positive;
        assert_eq!(
            bigint_to_buffer(&negative),
            vec![0xFE, 0xFD, 0xFC, 0xFB, 0xFA, 0xF9, 0xF8, 0xF7, 0xF7]
        );
    }

    #[test]
    fn roundtrip_is_exact_for_many_values() {
        for n in [
            0i64, 1, -1, 42, -42, 127, 128, -127, -128, -129, 255, -255, 65535, -65535,
            i64::MAX, i64::MIN,
        ] {
            let n = BigInt::from(n);
            let encoded = bigint_to_buffer(&n);
            assert_eq!(buffer_to_bigint(&encoded).unwrap(), n);
        }
    }

    #[test]
    fn already_minimal_buffer_roundtrips_through_decode_then_encode() {
        let buffers: &[&[u8]] = &[&[0x00], &[0x2A], &[0x00, 0x80], &[0xFF, 0x00, 0x01], &[0x80]];
        for buf in buffers {
            let n = buffer_to_bigint(buf).unwrap();
            assert_eq!(bigint_to_buffer(&n), *buf);
        }
    }

    #[test]
    fn string_to_bigint_parses_decimal() {
        assert_eq!(string_to_bigint("12345").unwrap(), BigInt::from(12345));
        assert_eq!(string_to_bigint("-12345").unwrap(), BigInt::from(-12345));
        assert!(string_to_bigint("not a number").is_err());
    }

    #[test]
    fn integer_to_bigint_widens() {
        assert_eq!(integer_to_bigint(-7), BigInt::from(-7));
    }
}
