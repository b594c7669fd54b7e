//! BER decoder: `decode(bytes) -> AsnValue`, recursive-descent over
//! tag+length+content, per §4.5. [`Decoder`] is the lazy façade over a
//! parsed tree with typed `into_*` accessors.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use num_bigint::BigInt;

use crate::bigint::buffer_to_bigint;
use crate::error::{Asn1Error, Asn1Result};
use crate::length::Length;
use crate::oid::decode_oid;
use crate::tag::{Tag, TagClass};
use crate::value::{AsnValue, ContextContent, ContextTag, ContextTagKind};

const MAX_DEPTH: usize = 256;

/// Decode a complete top-level BER object from `bytes`.
///
/// Trailing bytes after the object are a hard error (§4.5).
pub fn decode(bytes: &[u8]) -> Asn1Result<AsnValue> {
    let (value, consumed) = decode_value(bytes, 0, 0)?;
    if consumed != bytes.len() {
        log::warn!(
            "malformed top-level decode: {} trailing byte(s) after offset {consumed}",
            bytes.len() - consumed
        );
        return Err(Asn1Error::TrailingBytes {
            offset: consumed,
            count: bytes.len() - consumed,
        });
    }
    Ok(value)
}

fn read_tlv<'a>(bytes: &'a [u8], offset: usize) -> Asn1Result<(Tag, &'a [u8], usize)> {
    let (tag, tag_len) = Tag::decode(bytes, offset)?;
    let (length, length_len) = Length::decode(&bytes[tag_len..], offset + tag_len)?;
    let content_start = tag_len + length_len;
    let content_end = content_start
        .checked_add(length.0)
        .ok_or(Asn1Error::LengthOverflow { offset })?;
    let content = bytes
        .get(content_start..content_end)
        .ok_or(Asn1Error::TruncatedInput {
            offset: offset + content_start,
            needed: length.0,
        })?;
    Ok((tag, content, content_end))
}

fn decode_value(bytes: &[u8], offset: usize, depth: usize) -> Asn1Result<(AsnValue, usize)> {
    if depth > MAX_DEPTH {
        log::warn!("rejecting input at offset {offset}: recursion depth exceeded {MAX_DEPTH}");
        return Err(Asn1Error::DepthExceeded {
            offset,
            max: MAX_DEPTH,
        });
    }

    let (tag, content, consumed) = read_tlv(bytes, offset)?;

    let value = match tag.class {
        TagClass::Universal => decode_universal(tag.number, content, offset, depth)?,
        TagClass::ContextSpecific => decode_context_tag(&tag, content, offset, depth)?,
        TagClass::Application | TagClass::Private => {
            return Err(Asn1Error::UnknownTag {
                offset,
                tag: tag.encode(),
            })
        }
    };

    Ok((value, consumed))
}

fn decode_universal(
    number: u8,
    content: &[u8],
    offset: usize,
    depth: usize,
) -> Asn1Result<AsnValue> {
    Ok(match number {
        0x01 => AsnValue::Bool(content.iter().any(|&b| b != 0)),
        0x02 => AsnValue::Integer(buffer_to_bigint(content)?),
        0x03 => decode_bit_string(content, offset)?,
        0x04 => AsnValue::OctetString(content.to_vec()),
        0x05 => AsnValue::Null,
        0x06 => AsnValue::Oid(decode_oid(content)?),
        // BmpString/GeneralString/GraphicString/CharacterString are accepted
        // for decode-tolerance but are never emitted (§4.5).
        0x0C | 0x1E | 0x1B | 0x19 | 0x1D => AsnValue::Utf8String(decode_utf8(content, offset)?),
        0x13 => AsnValue::PrintableString(decode_utf8(content, offset)?),
        0x16 => AsnValue::Ia5String(decode_utf8(content, offset)?),
        0x17 => AsnValue::UtcTime(decode_utc_time(content, offset)?),
        0x18 => AsnValue::GeneralizedTime(decode_generalized_time(content, offset)?),
        0x10 => AsnValue::Sequence(decode_members(content, offset, depth)?),
        0x11 => decode_set(content, offset, depth)?,
        _ => {
            return Err(Asn1Error::UnknownTag {
                offset,
                tag: number,
            })
        }
    })
}

fn decode_members(content: &[u8], offset: usize, depth: usize) -> Asn1Result<Vec<AsnValue>> {
    let mut items = Vec::new();
    let mut pos = 0;
    while pos < content.len() {
        let (value, consumed) = decode_value(&content[pos..], offset + pos, depth + 1)?;
        items.push(value);
        pos += consumed;
    }
    Ok(items)
}

fn decode_set(content: &[u8], offset: usize, depth: usize) -> Asn1Result<AsnValue> {
    let members = decode_members(content, offset, depth + 1)?;
    let shape_ok = members.len() == 1
        && matches!(&members[0], AsnValue::Sequence(inner) if inner.len() == 2
            && matches!(inner[0], AsnValue::Oid(_))
            && matches!(
                inner[1],
                AsnValue::PrintableString(_) | AsnValue::Ia5String(_) | AsnValue::Utf8String(_)
            ));
    if !shape_ok {
        return Err(Asn1Error::SetShapeUnsupported { offset });
    }
    Ok(AsnValue::Set(members))
}

fn decode_context_tag(tag: &Tag, content: &[u8], offset: usize, depth: usize) -> Asn1Result<AsnValue> {
    if tag.constructed {
        let (inner, consumed) = decode_value(content, offset, depth + 1)?;
        if consumed != content.len() {
            return Err(Asn1Error::TrailingBytes {
                offset: offset + consumed,
                count: content.len() - consumed,
            });
        }
        Ok(AsnValue::ContextTag(ContextTag {
            number: tag.number,
            kind: ContextTagKind::Explicit,
            content: ContextContent::Value(Box::new(inner)),
        }))
    } else {
        Ok(AsnValue::ContextTag(ContextTag {
            number: tag.number,
            kind: ContextTagKind::Implicit,
            content: ContextContent::Opaque(content.to_vec()),
        }))
    }
}

fn decode_bit_string(content: &[u8], offset: usize) -> Asn1Result<AsnValue> {
    let &unused_bits = content
        .first()
        .ok_or(Asn1Error::TruncatedInput { offset, needed: 1 })?;
    if unused_bits > 7 {
        return Err(Asn1Error::OidMalformed { offset });
    }
    Ok(AsnValue::BitString {
        unused_bits,
        bytes: content[1..].to_vec(),
    })
}

fn decode_utf8(content: &[u8], offset: usize) -> Asn1Result<String> {
    String::from_utf8(content.to_vec()).map_err(|_| Asn1Error::Utf8 { offset })
}

fn decode_utc_time(content: &[u8], offset: usize) -> Asn1Result<DateTime<Utc>> {
    let s = decode_utf8(content, offset)?;
    let bytes = s.as_bytes();
    if bytes.len() != 13 || bytes[12] != b'Z' {
        return Err(Asn1Error::DateOutOfRange {
            path: format!("offset {offset}"),
        });
    }
    let digits = &s[..12];
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Asn1Error::DateOutOfRange {
            path: format!("offset {offset}"),
        });
    }
    let yy: i32 = parse_digits(&digits[0..2], offset)?;
    let year = if yy < 50 { 2000 + yy } else { 1900 + yy };
    let month: u32 = parse_digits(&digits[2..4], offset)?;
    let day: u32 = parse_digits(&digits[4..6], offset)?;
    let hour: u32 = parse_digits(&digits[6..8], offset)?;
    let minute: u32 = parse_digits(&digits[8..10], offset)?;
    let second: u32 = parse_digits(&digits[10..12], offset)?;

    build_datetime(year, month, day, hour, minute, second, 0, offset)
}

fn decode_generalized_time(content: &[u8], offset: usize) -> Asn1Result<DateTime<Utc>> {
    let s = decode_utf8(content, offset)?;
    let s = s.strip_suffix('Z').ok_or(Asn1Error::DateOutOfRange {
        path: format!("offset {offset}"),
    })?;
    // Accept both whole-second (no fractional part) and millisecond form on
    // decode, per §9's note on source inconsistency; encode always emits ms.
    let (whole, millis) = match s.split_once('.') {
        Some((whole, frac)) => {
            let mut frac = frac.to_string();
            while frac.len() < 3 {
                frac.push('0');
            }
            frac.truncate(3);
            let millis: u32 = frac.parse().map_err(|_| Asn1Error::DateOutOfRange {
                path: format!("offset {offset}"),
            })?;
            (whole, millis)
        }
        None => (s, 0),
    };

    if whole.len() != 14 || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Asn1Error::DateOutOfRange {
            path: format!("offset {offset}"),
        });
    }
    let year: i32 = parse_digits(&whole[0..4], offset)?;
    let month: u32 = parse_digits(&whole[4..6], offset)?;
    let day: u32 = parse_digits(&whole[6..8], offset)?;
    let hour: u32 = parse_digits(&whole[8..10], offset)?;
    let minute: u32 = parse_digits(&whole[10..12], offset)?;
    let second: u32 = parse_digits(&whole[12..14], offset)?;

    build_datetime(year, month, day, hour, minute, second, millis, offset)
}

/// Parse an ASCII digit run already validated by `is_ascii_digit`, still
/// propagating a typed error instead of panicking — the digit guard is an
/// invariant enforced by the caller, not a guarantee this function should
/// assume will never be violated after a refactor.
fn parse_digits<T: std::str::FromStr>(digits: &str, offset: usize) -> Asn1Result<T> {
    digits.parse().map_err(|_| Asn1Error::DateOutOfRange {
        path: format!("offset {offset}"),
    })
}

#[allow(clippy::too_many_arguments)]
fn build_datetime(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
    millis: u32,
    offset: usize,
) -> Asn1Result<DateTime<Utc>> {
    let date = NaiveDate::from_ymd_opt(year, month, day).ok_or(Asn1Error::DateOutOfRange {
        path: format!("offset {offset}"),
    })?;
    let time = date
        .and_hms_milli_opt(hour, minute, second, millis)
        .ok_or(Asn1Error::DateOutOfRange {
            path: format!("offset {offset}"),
        })?;
    Ok(Utc.from_utc_datetime(&time))
}

/// A lazy façade over a parsed BER tree: owns the original bytes and the
/// decoded [`AsnValue`], and exposes typed accessors that each fail with
/// `TypeMismatch` when the root variant doesn't match (§4.5).
pub struct Decoder {
    root: AsnValue,
}

impl Decoder {
    /// Parse `input` (raw BER bytes or a base64 string of them).
    pub fn new(input: impl AsRef<[u8]>) -> Asn1Result<Self> {
        Ok(Self {
            root: decode(input.as_ref())?,
        })
    }

    /// Parse a base64-encoded BER payload.
    pub fn from_base64(input: &str) -> Asn1Result<Self> {
        let bytes = crate::base64_codec::from_base64(input)?;
        Self::new(bytes)
    }

    fn mismatch(&self, expected: &'static str) -> Asn1Error {
        Asn1Error::TypeMismatch {
            path: "$".to_string(),
            expected,
            found: self.root.variant_name(),
        }
    }

    pub fn into_bool(&self) -> Asn1Result<bool> {
        match &self.root {
            AsnValue::Bool(b) => Ok(*b),
            _ => Err(self.mismatch("Bool")),
        }
    }

    pub fn into_bigint(&self) -> Asn1Result<BigInt> {
        match &self.root {
            AsnValue::Integer(n) => Ok(n.clone()),
            _ => Err(self.mismatch("Integer")),
        }
    }

    /// Host-width integer; fails `IntegerOverflow` if the value doesn't fit
    /// in an `i64` (§4.5).
    pub fn into_integer(&self) -> Asn1Result<i64> {
        use num_traits::cast::ToPrimitive;
        let n = self.into_bigint()?;
        n.to_i64().ok_or(Asn1Error::IntegerOverflow { offset: 0 })
    }

    pub fn into_string(&self) -> Asn1Result<String> {
        match &self.root {
            AsnValue::Utf8String(s) | AsnValue::PrintableString(s) | AsnValue::Ia5String(s) => {
                Ok(s.clone())
            }
            _ => Err(self.mismatch("String")),
        }
    }

    pub fn into_date(&self) -> Asn1Result<DateTime<Utc>> {
        match &self.root {
            AsnValue::UtcTime(dt) | AsnValue::GeneralizedTime(dt) => Ok(*dt),
            _ => Err(self.mismatch("Date")),
        }
    }

    pub fn into_buffer(&self) -> Asn1Result<Vec<u8>> {
        match &self.root {
            AsnValue::OctetString(bytes) => Ok(bytes.clone()),
            _ => Err(self.mismatch("OctetString")),
        }
    }

    pub fn into_oid(&self) -> Asn1Result<String> {
        match &self.root {
            AsnValue::Oid(name) => Ok(name.clone()),
            _ => Err(self.mismatch("Oid")),
        }
    }

    pub fn into_bit_string(&self) -> Asn1Result<(u8, Vec<u8>)> {
        match &self.root {
            AsnValue::BitString { unused_bits, bytes } => Ok((*unused_bits, bytes.clone())),
            _ => Err(self.mismatch("BitString")),
        }
    }

    pub fn into_array(&self) -> Asn1Result<Vec<AsnValue>> {
        match &self.root {
            AsnValue::Sequence(items) => Ok(items.clone()),
            _ => Err(self.mismatch("Sequence")),
        }
    }

    pub fn into_set(&self) -> Asn1Result<Vec<AsnValue>> {
        match &self.root {
            AsnValue::Set(items) => Ok(items.clone()),
            _ => Err(self.mismatch("Set")),
        }
    }

    pub fn into_context_tag(&self) -> Asn1Result<ContextTag> {
        match &self.root {
            AsnValue::ContextTag(ctx) => Ok(ctx.clone()),
            _ => Err(self.mismatch("ContextTag")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::encode;
    use chrono::TimeZone;

    #[test]
    fn decodes_bool() {
        assert_eq!(decode(&[0x01, 0x01, 0xFF]).unwrap(), AsnValue::Bool(true));
        assert_eq!(decode(&[0x01, 0x01, 0x00]).unwrap(), AsnValue::Bool(false));
    }

    #[test]
    fn decodes_any_nonzero_byte_as_true() {
        assert_eq!(decode(&[0x01, 0x01, 0x01]).unwrap(), AsnValue::Bool(true));
    }

    #[test]
    fn decodes_integer_roundtrip() {
        let encoded = encode(&AsnValue::Integer(BigInt::from(-1000))).unwrap();
        assert_eq!(decode(&encoded).unwrap(), AsnValue::Integer(BigInt::from(-1000)));
    }

    #[test]
    fn rejects_trailing_bytes() {
        let mut bytes = vec![0x01, 0x01, 0xFF];
        bytes.push(0x00);
        assert!(matches!(
            decode(&bytes),
            Err(Asn1Error::TrailingBytes { .. })
        ));
    }

    #[test]
    fn set_shape_enforced() {
        // A Set containing a single Bool instead of Sequence[Oid, String].
        let bytes = [0x31, 0x03, 0x01, 0x01, 0xFF];
        assert!(matches!(
            decode(&bytes),
            Err(Asn1Error::SetShapeUnsupported { .. })
        ));
    }

    #[test]
    fn decodes_set_roundtrip() {
        let set = AsnValue::Set(vec![AsnValue::Sequence(vec![
            AsnValue::Oid("commonName".to_string()),
            AsnValue::PrintableString("test".to_string()),
        ])]);
        let encoded = encode(&set).unwrap();
        assert_eq!(decode(&encoded).unwrap(), set);
    }

    #[test]
    fn decodes_explicit_context_tag() {
        let bytes = [0xA3, 0x03, 0x02, 0x01, 0x2A];
        let decoded = decode(&bytes).unwrap();
        match decoded {
            AsnValue::ContextTag(ctx) => {
                assert_eq!(ctx.number, 3);
                assert_eq!(ctx.kind, ContextTagKind::Explicit);
                assert_eq!(
                    ctx.content,
                    ContextContent::Value(Box::new(AsnValue::Integer(BigInt::from(42))))
                );
            }
            other => panic!("expected ContextTag, got {other:?}"),
        }
    }

    #[test]
    fn decoding_random_bytes_as_a_printable_string_fails() {
        // "Never gonna give you up" has bytes in it that are not tag 0x13.
        let bytes = b"Never gonna give you up";
        assert!(decode(bytes).is_err());
    }

    #[test]
    fn generalized_time_accepts_whole_second_form_on_decode() {
        let bytes = [
            0x18, 0x0F, b'2', b'0', b'3', b'0', b'0', b'6', b'1', b'5', b'1', b'2', b'3', b'0',
            b'0', b'0', b'Z',
        ];
        let decoded = decode(&bytes).unwrap();
        let expected = Utc.with_ymd_and_hms(2030, 6, 15, 12, 30, 0).unwrap();
        assert_eq!(decoded, AsnValue::GeneralizedTime(expected));
    }

    #[test]
    fn decoder_handle_typed_accessors() {
        let encoded = encode(&AsnValue::Integer(BigInt::from(42))).unwrap();
        let handle = Decoder::new(&encoded).unwrap();
        assert_eq!(handle.into_integer().unwrap(), 42);
        assert!(handle.into_bool().is_err());
    }

    #[test]
    fn decoder_handle_reports_type_mismatch() {
        let encoded = encode(&AsnValue::Bool(true)).unwrap();
        let handle = Decoder::new(&encoded).unwrap();
        assert!(matches!(
            handle.into_oid(),
            Err(Asn1Error::TypeMismatch { .. })
        ));
    }

    #[test]
    fn rejects_depth_beyond_cap() {
        let mut bytes = vec![0x02, 0x01, 0x2A];
        for _ in 0..(MAX_DEPTH + 10) {
            let mut wrapped = vec![0x30, (bytes.len()) as u8];
            wrapped.extend(bytes);
            bytes = wrapped;
        }
        assert!(matches!(
            decode(&bytes),
            Err(Asn1Error::DepthExceeded { .. })
        ));
    }
}
