//! [`AsnValue`]: the tagged sum type every encode/decode operation works
//! over, per §3 of the data model. Trees of `AsnValue` are plain value types
//! with no shared mutation — they're produced by [`crate::decoder::decode`]
//! or [`crate::host::to_asn_value`] and consumed by [`crate::encoder::encode`]
//! or [`crate::host::from_asn_value`].

use chrono::{DateTime, Utc};
use num_bigint::BigInt;

/// Whether a context-specific tag wraps its inner value (Explicit) or
/// replaces the inner value's own tag with the context tag (Implicit).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextTagKind {
    Implicit,
    Explicit,
}

/// Content carried by a `ContextTag`: either opaque bytes (Implicit, no
/// inner tag/length) or a boxed child value (Explicit, a full nested TLV).
#[derive(Debug, Clone, PartialEq)]
pub enum ContextContent {
    Opaque(Vec<u8>),
    Value(Box<AsnValue>),
}

/// A context-specific ASN.1 tag: `{ number, kind, content }` from §3.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextTag {
    pub number: u8,
    pub kind: ContextTagKind,
    pub content: ContextContent,
}

/// The ASN.1 value model. Every variant corresponds to exactly one
/// canonical universal tag (see the table in §3), except `ContextTag`,
/// which is class=context rather than universal.
#[derive(Debug, Clone, PartialEq)]
pub enum AsnValue {
    Bool(bool),
    Integer(BigInt),
    /// Unused trailing bit count (0-7) plus byte payload.
    BitString { unused_bits: u8, bytes: Vec<u8> },
    OctetString(Vec<u8>),
    Null,
    /// Always stored resolved: a known symbolic name, or a dotted string for
    /// OIDs outside the table (see [`crate::oid`]).
    Oid(String),
    Utf8String(String),
    PrintableString(String),
    Ia5String(String),
    /// Second precision, no sub-seconds; constrained to years 1950-2049.
    UtcTime(DateTime<Utc>),
    /// Millisecond precision.
    GeneralizedTime(DateTime<Utc>),
    Sequence(Vec<AsnValue>),
    /// Logically unordered but encoded in insertion order (§3 invariants).
    Set(Vec<AsnValue>),
    ContextTag(ContextTag),
}

impl AsnValue {
    /// A human-readable variant name, used in `TypeMismatch` errors.
    pub fn variant_name(&self) -> &'static str {
        match self {
            AsnValue::Bool(_) => "Bool",
            AsnValue::Integer(_) => "Integer",
            AsnValue::BitString { .. } => "BitString",
            AsnValue::OctetString(_) => "OctetString",
            AsnValue::Null => "Null",
            AsnValue::Oid(_) => "Oid",
            AsnValue::Utf8String(_) => "Utf8String",
            AsnValue::PrintableString(_) => "PrintableString",
            AsnValue::Ia5String(_) => "Ia5String",
            AsnValue::UtcTime(_) => "UtcTime",
            AsnValue::GeneralizedTime(_) => "GeneralizedTime",
            AsnValue::Sequence(_) => "Sequence",
            AsnValue::Set(_) => "Set",
            AsnValue::ContextTag(_) => "ContextTag",
        }
    }
}
