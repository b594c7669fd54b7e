//! Host-value adapter: converts idiomatic Rust values to/from [`AsnValue`],
//! including canonical-form inference for types with more than one legal
//! ASN.1 representation (§4.7).

use chrono::{DateTime, Datelike, TimeZone, Utc};
use num_bigint::BigInt;
use num_traits::cast::ToPrimitive;

use crate::encoder::is_printable_char;
use crate::error::{Asn1Error, Asn1Result};
use crate::length::Length;
use crate::tag::Tag;
use crate::value::{AsnValue, ContextContent, ContextTag, ContextTagKind};

/// Which context-tag form a `HostValue::Context` should be encoded as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextKind {
    Implicit,
    Explicit,
}

/// Forces a particular String variant on encode, bypassing narrowing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringKind {
    Printable,
    Ia5,
    Utf8,
}

/// Forces a particular timestamp variant on encode, or `Default` to apply
/// the usual inference rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateKind {
    Utc,
    General,
    Default,
}

/// Options controlling `encode`'s handling of the `undefined` sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    pub allow_undefined: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            allow_undefined: false,
        }
    }
}

/// The idiomatic Rust value model callers build and receive ASN.1 from.
///
/// `Undefined` and `Null` are distinct sentinels (§4.7): `Null` always
/// encodes as `AsnValue::Null`, while `Undefined` is rejected unless
/// [`EncodeOptions::allow_undefined`] is set, in which case it is elided
/// (and skipped inside arrays).
#[derive(Debug, Clone, PartialEq)]
pub enum HostValue {
    Bool(bool),
    Integer(i64),
    BigInt(BigInt),
    Buffer(Vec<u8>),
    Null,
    Undefined,
    Timestamp(DateTime<Utc>),
    String(String),
    Array(Vec<HostValue>),
    Oid(String),
    Set {
        name: String,
        value: String,
    },
    BitString {
        bytes: Vec<u8>,
        unused_bits: u8,
    },
    Context {
        number: u8,
        kind: ContextKind,
        contains: Box<HostValue>,
    },
    TypedString {
        kind: StringKind,
        value: String,
    },
    Date {
        kind: DateKind,
        date: DateTime<Utc>,
    },
}

/// Convert a host value to its `AsnValue`, or `Ok(None)` when it is an
/// elided `Undefined` (§4.7, §6 `allowUndefined`).
pub fn to_asn_value(value: &HostValue, options: &EncodeOptions) -> Asn1Result<Option<AsnValue>> {
    Ok(Some(match value {
        HostValue::Undefined => {
            if options.allow_undefined {
                return Ok(None);
            }
            return Err(Asn1Error::UndefinedRejected);
        }
        HostValue::Null => AsnValue::Null,
        HostValue::Bool(b) => AsnValue::Bool(*b),
        HostValue::Integer(n) => AsnValue::Integer(BigInt::from(*n)),
        HostValue::BigInt(n) => AsnValue::Integer(n.clone()),
        HostValue::Buffer(bytes) => AsnValue::OctetString(bytes.clone()),
        HostValue::Timestamp(dt) => infer_timestamp(dt),
        HostValue::String(s) => infer_string(s),
        HostValue::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                if let Some(v) = to_asn_value(item, options)? {
                    out.push(v);
                }
            }
            AsnValue::Sequence(out)
        }
        HostValue::Oid(name) => AsnValue::Oid(name.clone()),
        HostValue::Set { name, value } => AsnValue::Set(vec![AsnValue::Sequence(vec![
            AsnValue::Oid(name.clone()),
            infer_string(value),
        ])]),
        HostValue::BitString { bytes, unused_bits } => AsnValue::BitString {
            unused_bits: *unused_bits,
            bytes: bytes.clone(),
        },
        HostValue::TypedString { kind, value } => match kind {
            StringKind::Printable => AsnValue::PrintableString(value.clone()),
            StringKind::Ia5 => AsnValue::Ia5String(value.clone()),
            StringKind::Utf8 => AsnValue::Utf8String(value.clone()),
        },
        HostValue::Date { kind, date } => match kind {
            DateKind::Utc => AsnValue::UtcTime(*date),
            DateKind::General => AsnValue::GeneralizedTime(*date),
            DateKind::Default => infer_timestamp(date),
        },
        HostValue::Context {
            number,
            kind,
            contains,
        } => AsnValue::ContextTag(encode_context_tag(*number, *kind, contains, options)?),
    }))
}

fn encode_context_tag(
    number: u8,
    kind: ContextKind,
    contains: &HostValue,
    options: &EncodeOptions,
) -> Asn1Result<ContextTag> {
    let content = match kind {
        ContextKind::Explicit => {
            let inner = to_asn_value(contains, options)?.ok_or(Asn1Error::UndefinedRejected)?;
            ContextContent::Value(Box::new(inner))
        }
        ContextKind::Implicit => {
            let bytes = match contains {
                HostValue::Buffer(bytes) => bytes.clone(),
                primitive => primitive_content_octets(primitive, options)?,
            };
            ContextContent::Opaque(bytes)
        }
    };
    Ok(ContextTag {
        number,
        kind: match kind {
            ContextKind::Implicit => ContextTagKind::Implicit,
            ContextKind::Explicit => ContextTagKind::Explicit,
        },
        content,
    })
}

/// The content octets (no tag/length) of a primitive host value, for use as
/// an Implicit context tag's opaque payload (§4.7).
fn primitive_content_octets(value: &HostValue, options: &EncodeOptions) -> Asn1Result<Vec<u8>> {
    let asn = to_asn_value(value, options)?.ok_or(Asn1Error::UndefinedRejected)?;
    let full = crate::encoder::encode(&asn)?;
    let (_, tag_len) = Tag::decode(&full, 0)?;
    let (length, length_len) = Length::decode(&full[tag_len..], tag_len)?;
    let start = tag_len + length_len;
    Ok(full[start..start + length.0].to_vec())
}

fn infer_string(s: &str) -> AsnValue {
    if s.chars().all(is_printable_char) {
        AsnValue::PrintableString(s.to_string())
    } else if s.is_ascii() {
        AsnValue::Ia5String(s.to_string())
    } else {
        AsnValue::Utf8String(s.to_string())
    }
}

fn infer_timestamp(dt: &DateTime<Utc>) -> AsnValue {
    let millis = dt.timestamp_subsec_millis();
    let year = dt.year();
    if millis == 0 && (1950..=2049).contains(&year) {
        AsnValue::UtcTime(*dt)
    } else {
        let truncated = Utc
            .timestamp_millis_opt(dt.timestamp_millis())
            .single()
            .unwrap_or(*dt);
        AsnValue::GeneralizedTime(truncated)
    }
}

/// Convert a decoded `AsnValue` back to a host value (the inverse of
/// [`to_asn_value`]). Tagged objects are produced only where lossless
/// round-trip requires them — BitString and ContextTag always do; plain
/// strings, dates, and integers decode to their plain forms (§4.7).
pub fn from_asn_value(value: &AsnValue) -> Asn1Result<HostValue> {
    Ok(match value {
        AsnValue::Null => HostValue::Null,
        AsnValue::Bool(b) => HostValue::Bool(*b),
        AsnValue::Integer(n) => HostValue::BigInt(n.clone()),
        AsnValue::OctetString(bytes) => HostValue::Buffer(bytes.clone()),
        AsnValue::Utf8String(s) | AsnValue::PrintableString(s) | AsnValue::Ia5String(s) => {
            HostValue::String(s.clone())
        }
        AsnValue::UtcTime(dt) | AsnValue::GeneralizedTime(dt) => HostValue::Timestamp(*dt),
        AsnValue::Oid(name) => HostValue::Oid(name.clone()),
        AsnValue::Sequence(items) => HostValue::Array(
            items
                .iter()
                .map(from_asn_value)
                .collect::<Asn1Result<Vec<_>>>()?,
        ),
        AsnValue::Set(members) => from_set(members)?,
        AsnValue::BitString { unused_bits, bytes } => HostValue::BitString {
            bytes: bytes.clone(),
            unused_bits: *unused_bits,
        },
        AsnValue::ContextTag(ctx) => HostValue::Context {
            number: ctx.number,
            kind: match ctx.kind {
                ContextTagKind::Implicit => ContextKind::Implicit,
                ContextTagKind::Explicit => ContextKind::Explicit,
            },
            contains: Box::new(match &ctx.content {
                ContextContent::Opaque(bytes) => HostValue::Buffer(bytes.clone()),
                ContextContent::Value(inner) => from_asn_value(inner)?,
            }),
        },
    })
}

fn from_set(members: &[AsnValue]) -> Asn1Result<HostValue> {
    let (oid, string) = match members {
        [AsnValue::Sequence(inner)] if inner.len() == 2 => match (&inner[0], &inner[1]) {
            (AsnValue::Oid(name), AsnValue::PrintableString(s))
            | (AsnValue::Oid(name), AsnValue::Ia5String(s))
            | (AsnValue::Oid(name), AsnValue::Utf8String(s)) => (name.clone(), s.clone()),
            _ => return Err(Asn1Error::SetShapeUnsupported { offset: 0 }),
        },
        _ => return Err(Asn1Error::SetShapeUnsupported { offset: 0 }),
    };
    Ok(HostValue::Set { name: oid, value: string })
}

/// Widen a native integer to the host-width accessor result, failing
/// `IntegerOverflow` if `n` does not fit an `i64` (mirrors
/// [`crate::decoder::Decoder::into_integer`] for adapter-level callers).
pub fn bigint_to_host_integer(n: &BigInt) -> Asn1Result<i64> {
    n.to_i64().ok_or(Asn1Error::IntegerOverflow { offset: 0 })
}

/// A loosely-typed value as it arrives across a dynamic boundary — the
/// reference API's duck-typed `any`, where a tagged object is just
/// `{ type: "...", ...fields }` with no static shape. `HostValue` itself is
/// a closed Rust enum and by construction cannot represent "neither a
/// primitive nor a recognized tagged object"; `DynValue` plus [`resolve`]
/// is the fallible boundary that actually performs that validation
/// (§4.7, §6) and can fail with `UnsupportedHostType`/`UnknownTaggedType`.
#[derive(Debug, Clone, PartialEq)]
pub enum DynValue {
    Bool(bool),
    Integer(i64),
    BigInt(BigInt),
    Buffer(Vec<u8>),
    Null,
    Undefined,
    Timestamp(DateTime<Utc>),
    String(String),
    Array(Vec<DynValue>),
    /// `{ type: "...", ...fields }`, in field-insertion order.
    Object(Vec<(String, DynValue)>),
}

fn field<'a>(fields: &'a [(String, DynValue)], key: &str) -> Option<&'a DynValue> {
    fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
}

fn expect_string(value: &DynValue, path: &str) -> Asn1Result<String> {
    match value {
        DynValue::String(s) => Ok(s.clone()),
        _ => Err(Asn1Error::UnsupportedHostType {
            path: path.to_string(),
        }),
    }
}

fn expect_buffer(value: &DynValue, path: &str) -> Asn1Result<Vec<u8>> {
    match value {
        DynValue::Buffer(bytes) => Ok(bytes.clone()),
        _ => Err(Asn1Error::UnsupportedHostType {
            path: path.to_string(),
        }),
    }
}

fn require<'a>(
    fields: &'a [(String, DynValue)],
    key: &str,
    path: &str,
) -> Asn1Result<&'a DynValue> {
    field(fields, key).ok_or_else(|| Asn1Error::UnsupportedHostType {
        path: format!("{path}.{key}"),
    })
}

/// Resolve a dynamic value to a [`HostValue`], per §4.7's host-to-ASN.1
/// mapping table. `path` is the dotted/indexed path of tagged-object keys
/// so far, carried into `UnsupportedHostType`/`UnknownTaggedType` per §7.
pub fn resolve(value: &DynValue, path: &str) -> Asn1Result<HostValue> {
    Ok(match value {
        DynValue::Bool(b) => HostValue::Bool(*b),
        DynValue::Integer(n) => HostValue::Integer(*n),
        DynValue::BigInt(n) => HostValue::BigInt(n.clone()),
        DynValue::Buffer(bytes) => HostValue::Buffer(bytes.clone()),
        DynValue::Null => HostValue::Null,
        DynValue::Undefined => HostValue::Undefined,
        DynValue::Timestamp(dt) => HostValue::Timestamp(*dt),
        DynValue::String(s) => HostValue::String(s.clone()),
        DynValue::Array(items) => HostValue::Array(
            items
                .iter()
                .enumerate()
                .map(|(i, item)| resolve(item, &format!("{path}[{i}]")))
                .collect::<Asn1Result<Vec<_>>>()?,
        ),
        DynValue::Object(fields) => resolve_tagged(fields, path)?,
    })
}

fn resolve_tagged(fields: &[(String, DynValue)], path: &str) -> Asn1Result<HostValue> {
    let type_name = match field(fields, "type") {
        Some(DynValue::String(s)) => s.as_str(),
        _ => {
            return Err(Asn1Error::UnsupportedHostType {
                path: path.to_string(),
            })
        }
    };

    Ok(match type_name {
        "oid" => {
            let oid = require(fields, "oid", path)?;
            HostValue::Oid(expect_string(oid, &format!("{path}.oid"))?)
        }
        "set" => {
            let name = require(fields, "name", path)?;
            let value = require(fields, "value", path)?;
            HostValue::Set {
                name: expect_string(name, &format!("{path}.name"))?,
                value: expect_string(value, &format!("{path}.value"))?,
            }
        }
        "bitstring" => {
            let value = require(fields, "value", path)?;
            let bytes = expect_buffer(value, &format!("{path}.value"))?;
            let unused_bits = match field(fields, "unusedBits") {
                Some(DynValue::Integer(n)) if (0..=7).contains(n) => *n as u8,
                None => 0,
                _ => {
                    return Err(Asn1Error::UnsupportedHostType {
                        path: format!("{path}.unusedBits"),
                    })
                }
            };
            HostValue::BitString { bytes, unused_bits }
        }
        "context" => {
            let number = match field(fields, "value") {
                Some(DynValue::Integer(n)) if (0..=30).contains(n) => *n as u8,
                _ => {
                    return Err(Asn1Error::UnsupportedHostType {
                        path: format!("{path}.value"),
                    })
                }
            };
            let kind = match field(fields, "kind") {
                Some(DynValue::String(s)) if s == "implicit" => ContextKind::Implicit,
                Some(DynValue::String(s)) if s == "explicit" => ContextKind::Explicit,
                None => ContextKind::Explicit,
                _ => {
                    return Err(Asn1Error::UnsupportedHostType {
                        path: format!("{path}.kind"),
                    })
                }
            };
            let contains = require(fields, "contains", path)?;
            let inner = resolve(contains, &format!("{path}.contains"))?;
            HostValue::Context {
                number,
                kind,
                contains: Box::new(inner),
            }
        }
        "string" => {
            let kind = match field(fields, "kind") {
                Some(DynValue::String(s)) => match s.as_str() {
                    "printable" => StringKind::Printable,
                    "ia5" => StringKind::Ia5,
                    "utf8" => StringKind::Utf8,
                    _ => {
                        return Err(Asn1Error::UnsupportedHostType {
                            path: format!("{path}.kind"),
                        })
                    }
                },
                _ => {
                    return Err(Asn1Error::UnsupportedHostType {
                        path: format!("{path}.kind"),
                    })
                }
            };
            let value = require(fields, "value", path)?;
            HostValue::TypedString {
                kind,
                value: expect_string(value, &format!("{path}.value"))?,
            }
        }
        "date" => {
            let kind = match field(fields, "kind") {
                Some(DynValue::String(s)) => match s.as_str() {
                    "utc" => DateKind::Utc,
                    "general" => DateKind::General,
                    "default" => DateKind::Default,
                    _ => {
                        return Err(Asn1Error::UnsupportedHostType {
                            path: format!("{path}.kind"),
                        })
                    }
                },
                None => DateKind::Default,
                _ => {
                    return Err(Asn1Error::UnsupportedHostType {
                        path: format!("{path}.kind"),
                    })
                }
            };
            let date = require(fields, "date", path)?;
            let date = match date {
                DynValue::Timestamp(dt) => *dt,
                _ => {
                    return Err(Asn1Error::UnsupportedHostType {
                        path: format!("{path}.date"),
                    })
                }
            };
            HostValue::Date { kind, date }
        }
        other => return Err(Asn1Error::UnknownTaggedType(other.to_string())),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::encode;

    fn roundtrip(value: HostValue) -> HostValue {
        let asn = to_asn_value(&value, &EncodeOptions::default())
            .unwrap()
            .unwrap();
        let bytes = encode(&asn).unwrap();
        let decoded = crate::decoder::decode(&bytes).unwrap();
        from_asn_value(&decoded).unwrap()
    }

    #[test]
    fn bool_roundtrips() {
        assert_eq!(roundtrip(HostValue::Bool(true)), HostValue::Bool(true));
    }

    #[test]
    fn native_integer_decodes_as_bigint() {
        assert_eq!(
            roundtrip(HostValue::Integer(42)),
            HostValue::BigInt(BigInt::from(42))
        );
    }

    #[test]
    fn null_is_distinct_from_undefined() {
        assert_eq!(
            to_asn_value(&HostValue::Null, &EncodeOptions::default())
                .unwrap()
                .unwrap(),
            AsnValue::Null
        );
        assert!(matches!(
            to_asn_value(&HostValue::Undefined, &EncodeOptions::default()),
            Err(Asn1Error::UndefinedRejected)
        ));
    }

    #[test]
    fn undefined_elides_when_allowed() {
        let options = EncodeOptions {
            allow_undefined: true,
        };
        assert_eq!(
            to_asn_value(&HostValue::Undefined, &options).unwrap(),
            None
        );
    }

    #[test]
    fn array_elides_undefined_elements() {
        let options = EncodeOptions {
            allow_undefined: true,
        };
        let array = HostValue::Array(vec![
            HostValue::Integer(1),
            HostValue::Undefined,
            HostValue::Integer(2),
        ]);
        let asn = to_asn_value(&array, &options).unwrap().unwrap();
        match asn {
            AsnValue::Sequence(items) => assert_eq!(items.len(), 2),
            other => panic!("expected Sequence, got {other:?}"),
        }
    }

    #[test]
    fn string_narrowing_property() {
        assert!(matches!(infer_string("test"), AsnValue::PrintableString(_)));
        assert!(matches!(infer_string("Test_"), AsnValue::Ia5String(_)));
        assert!(matches!(infer_string("Tes\u{1133}"), AsnValue::Utf8String(_)));
    }

    #[test]
    fn string_decodes_as_plain_string_not_typed() {
        assert_eq!(
            roundtrip(HostValue::String("test".to_string())),
            HostValue::String("test".to_string())
        );
    }

    #[test]
    fn oid_roundtrips_as_oid_variant() {
        assert_eq!(
            roundtrip(HostValue::Oid("commonName".to_string())),
            HostValue::Oid("commonName".to_string())
        );
    }

    #[test]
    fn set_roundtrips() {
        let set = HostValue::Set {
            name: "commonName".to_string(),
            value: "test".to_string(),
        };
        assert_eq!(
            roundtrip(set.clone()),
            HostValue::Set {
                name: "commonName".to_string(),
                value: "test".to_string(),
            }
        );
    }

    #[test]
    fn timestamp_with_no_subseconds_in_range_picks_utc_time() {
        let dt = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
        let asn = infer_timestamp(&dt);
        assert!(matches!(asn, AsnValue::UtcTime(_)));
    }

    #[test]
    fn timestamp_outside_utc_range_picks_generalized_time() {
        let dt = Utc.with_ymd_and_hms(2050, 1, 1, 0, 0, 0).unwrap();
        let asn = infer_timestamp(&dt);
        assert!(matches!(asn, AsnValue::GeneralizedTime(_)));
    }

    #[test]
    fn timestamp_with_subseconds_picks_generalized_time_even_in_utc_range() {
        let dt = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap() + chrono::Duration::milliseconds(5);
        let asn = infer_timestamp(&dt);
        assert!(matches!(asn, AsnValue::GeneralizedTime(_)));
    }

    #[test]
    fn implicit_context_tag_with_primitive_carries_content_octets_only() {
        let ctx = HostValue::Context {
            number: 1,
            kind: ContextKind::Implicit,
            contains: Box::new(HostValue::Integer(42)),
        };
        let asn = to_asn_value(&ctx, &EncodeOptions::default())
            .unwrap()
            .unwrap();
        match asn {
            AsnValue::ContextTag(tag) => {
                assert_eq!(tag.content, ContextContent::Opaque(vec![0x2A]));
            }
            other => panic!("expected ContextTag, got {other:?}"),
        }
    }

    #[test]
    fn explicit_context_tag_roundtrips() {
        let ctx = HostValue::Context {
            number: 3,
            kind: ContextKind::Explicit,
            contains: Box::new(HostValue::Integer(42)),
        };
        let decoded = roundtrip(ctx);
        match decoded {
            HostValue::Context {
                number,
                kind,
                contains,
            } => {
                assert_eq!(number, 3);
                assert_eq!(kind, ContextKind::Explicit);
                assert_eq!(*contains, HostValue::BigInt(BigInt::from(42)));
            }
            other => panic!("expected Context, got {other:?}"),
        }
    }

    #[test]
    fn typed_string_bypasses_inference() {
        let typed = HostValue::TypedString {
            kind: StringKind::Utf8,
            value: "test".to_string(),
        };
        let asn = to_asn_value(&typed, &EncodeOptions::default())
            .unwrap()
            .unwrap();
        assert!(matches!(asn, AsnValue::Utf8String(_)));
    }

    #[test]
    fn forced_date_kind_overrides_inference() {
        let dt = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
        let forced = HostValue::Date {
            kind: DateKind::General,
            date: dt,
        };
        let asn = to_asn_value(&forced, &EncodeOptions::default())
            .unwrap()
            .unwrap();
        assert!(matches!(asn, AsnValue::GeneralizedTime(_)));
    }

    #[test]
    fn resolve_recognizes_oid_tagged_object() {
        let dyn_value = DynValue::Object(vec![
            ("type".to_string(), DynValue::String("oid".to_string())),
            (
                "oid".to_string(),
                DynValue::String("commonName".to_string()),
            ),
        ]);
        assert_eq!(
            resolve(&dyn_value, "$").unwrap(),
            HostValue::Oid("commonName".to_string())
        );
    }

    #[test]
    fn resolve_recognizes_set_tagged_object() {
        let dyn_value = DynValue::Object(vec![
            ("type".to_string(), DynValue::String("set".to_string())),
            (
                "name".to_string(),
                DynValue::String("commonName".to_string()),
            ),
            ("value".to_string(), DynValue::String("test".to_string())),
        ]);
        assert_eq!(
            resolve(&dyn_value, "$").unwrap(),
            HostValue::Set {
                name: "commonName".to_string(),
                value: "test".to_string(),
            }
        );
    }

    #[test]
    fn resolve_rejects_unknown_tagged_type() {
        let dyn_value = DynValue::Object(vec![(
            "type".to_string(),
            DynValue::String("not-a-real-type".to_string()),
        )]);
        assert!(matches!(
            resolve(&dyn_value, "$"),
            Err(Asn1Error::UnknownTaggedType(name)) if name == "not-a-real-type"
        ));
    }

    // §8: "Encoding a host value that is neither a supported primitive nor
    // a recognized tagged object must raise UnsupportedHostType."
    #[test]
    fn resolve_rejects_object_with_no_type_discriminator() {
        let dyn_value = DynValue::Object(vec![("oid".to_string(), DynValue::String("x".to_string()))]);
        assert!(matches!(
            resolve(&dyn_value, "$"),
            Err(Asn1Error::UnsupportedHostType { .. })
        ));
    }

    #[test]
    fn resolve_rejects_tagged_object_missing_required_field() {
        let dyn_value = DynValue::Object(vec![(
            "type".to_string(),
            DynValue::String("oid".to_string()),
        )]);
        assert!(matches!(
            resolve(&dyn_value, "$"),
            Err(Asn1Error::UnsupportedHostType { .. })
        ));
    }

    #[test]
    fn resolve_recognizes_nested_implicit_context_tag() {
        let dyn_value = DynValue::Object(vec![
            ("type".to_string(), DynValue::String("context".to_string())),
            ("value".to_string(), DynValue::Integer(1)),
            ("kind".to_string(), DynValue::String("implicit".to_string())),
            ("contains".to_string(), DynValue::Integer(42)),
        ]);
        let resolved = resolve(&dyn_value, "$").unwrap();
        assert_eq!(
            resolved,
            HostValue::Context {
                number: 1,
                kind: ContextKind::Implicit,
                contains: Box::new(HostValue::Integer(42)),
            }
        );
    }

    #[test]
    fn resolve_full_roundtrip_through_encode_and_decode() {
        let dyn_value = DynValue::Object(vec![
            ("type".to_string(), DynValue::String("set".to_string())),
            (
                "name".to_string(),
                DynValue::String("commonName".to_string()),
            ),
            ("value".to_string(), DynValue::String("test".to_string())),
        ]);
        let resolved = resolve(&dyn_value, "$").unwrap();
        assert_eq!(roundtrip(resolved), HostValue::Set {
            name: "commonName".to_string(),
            value: "test".to_string(),
        });
    }
}
