//! BER encoder: `encode(AsnValue) -> bytes`, dispatching on variant and
//! recursing for constructed types, per §4.4.

use chrono::{DateTime, Datelike, Timelike, Utc};

use crate::bigint::bigint_to_buffer;
use crate::error::{Asn1Error, Asn1Result};
use crate::length::Length;
use crate::oid::encode_oid;
use crate::tag::Tag;
use crate::value::{AsnValue, ContextContent, ContextTagKind};

/// Recursion depth cap; hostile or accidentally-cyclic trees fail with
/// `DepthExceeded` rather than blowing the stack (§5).
const MAX_DEPTH: usize = 256;

/// Encode a top-level [`AsnValue`] to BER bytes.
pub fn encode(value: &AsnValue) -> Asn1Result<Vec<u8>> {
    encode_value(value, 0, "$")
}

fn encode_tlv(tag: Tag, content: Vec<u8>) -> Vec<u8> {
    let mut out = Vec::with_capacity(content.len() + 6);
    out.push(tag.encode());
    out.extend(Length(content.len()).encode());
    out.extend(content);
    out
}

/// `path` is the dotted/indexed path of tagged-object keys leading to
/// `value`, used to annotate `StringCharsetViolation`/`DateOutOfRange` per
/// §7 ("the path of tagged-object keys... where available").
fn encode_value(value: &AsnValue, depth: usize, path: &str) -> Asn1Result<Vec<u8>> {
    if depth > MAX_DEPTH {
        return Err(Asn1Error::DepthExceeded {
            offset: 0,
            max: MAX_DEPTH,
        });
    }

    Ok(match value {
        AsnValue::Bool(b) => {
            encode_tlv(Tag::universal(false, 0x01), vec![if *b { 0xFF } else { 0x00 }])
        }
        AsnValue::Integer(n) => encode_tlv(Tag::universal(false, 0x02), bigint_to_buffer(n)),
        AsnValue::BitString { unused_bits, bytes } => {
            let mut content = Vec::with_capacity(1 + bytes.len());
            content.push(*unused_bits);
            content.extend_from_slice(bytes);
            encode_tlv(Tag::universal(false, 0x03), content)
        }
        AsnValue::OctetString(bytes) => {
            encode_tlv(Tag::universal(false, 0x04), bytes.clone())
        }
        AsnValue::Null => encode_tlv(Tag::universal(false, 0x05), Vec::new()),
        AsnValue::Oid(name) => encode_tlv(Tag::universal(false, 0x06), encode_oid(name)?),
        AsnValue::Utf8String(s) => {
            encode_tlv(Tag::universal(false, 0x0C), s.as_bytes().to_vec())
        }
        AsnValue::PrintableString(s) => encode_tlv(
            Tag::universal(false, 0x13),
            encode_restricted_ascii(s, is_printable_char, path)?,
        ),
        AsnValue::Ia5String(s) => encode_tlv(
            Tag::universal(false, 0x16),
            encode_restricted_ascii(s, |c| c.is_ascii(), path)?,
        ),
        AsnValue::UtcTime(dt) => {
            encode_tlv(Tag::universal(false, 0x17), encode_utc_time(dt, path)?)
        }
        AsnValue::GeneralizedTime(dt) => {
            encode_tlv(Tag::universal(false, 0x18), encode_generalized_time(dt))
        }
        AsnValue::Sequence(items) => {
            let content = encode_members(items, depth, path)?;
            encode_tlv(Tag::universal(true, 0x10), content)
        }
        AsnValue::Set(items) => {
            let content = encode_members(items, depth, path)?;
            encode_tlv(Tag::universal(true, 0x11), content)
        }
        AsnValue::ContextTag(ctx) => match &ctx.content {
            ContextContent::Opaque(bytes) => {
                encode_tlv(Tag::context(false, ctx.number), bytes.clone())
            }
            ContextContent::Value(inner) => {
                let content = encode_value(inner, depth + 1, &format!("{path}.content"))?;
                encode_tlv(Tag::context(true, ctx.number), content)
            }
        },
    })
}

fn encode_members(items: &[AsnValue], depth: usize, path: &str) -> Asn1Result<Vec<u8>> {
    let mut content = Vec::new();
    for (i, item) in items.iter().enumerate() {
        content.extend(encode_value(item, depth + 1, &format!("{path}[{i}]"))?);
    }
    Ok(content)
}

pub(crate) fn is_printable_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, ' ' | '\'' | '(' | ')' | '+' | ',' | '-' | '.' | '/' | ':' | '=' | '?')
}

fn encode_restricted_ascii(s: &str, allowed: impl Fn(char) -> bool, path: &str) -> Asn1Result<Vec<u8>> {
    for c in s.chars() {
        if !allowed(c) {
            return Err(Asn1Error::StringCharsetViolation {
                path: path.to_string(),
                ch: c,
            });
        }
    }
    Ok(s.as_bytes().to_vec())
}

fn encode_utc_time(dt: &DateTime<Utc>, path: &str) -> Asn1Result<Vec<u8>> {
    let year = dt.year();
    if !(1950..=2049).contains(&year) {
        return Err(Asn1Error::DateOutOfRange {
            path: path.to_string(),
        });
    }
    let yy = ((year % 100) + 100) % 100;
    let s = format!(
        "{:02}{:02}{:02}{:02}{:02}{:02}Z",
        yy,
        dt.month(),
        dt.day(),
        dt.hour(),
        dt.minute(),
        dt.second()
    );
    Ok(s.into_bytes())
}

fn encode_generalized_time(dt: &DateTime<Utc>) -> Vec<u8> {
    let millis = dt.timestamp_subsec_millis();
    format!(
        "{:04}{:02}{:02}{:02}{:02}{:02}.{:03}Z",
        dt.year(),
        dt.month(),
        dt.day(),
        dt.hour(),
        dt.minute(),
        dt.second(),
        millis
    )
    .into_bytes()
}
