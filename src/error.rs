//! Error taxonomy for the ASN.1 codec.
//!
//! One `thiserror`-derived enum for the whole crate, in the style of
//! `dlms-core::error::DlmsError`: every layer (tag/length, BigInt, OID,
//! encoder, decoder, adapter) returns this same type instead of a
//! per-module error.

use thiserror::Error;

/// Errors produced by encoding, decoding, or adapting ASN.1 values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Asn1Error {
    #[error("truncated input at offset {offset}: needed {needed} more byte(s)")]
    TruncatedInput { offset: usize, needed: usize },

    #[error("length encoding overflow at offset {offset}")]
    LengthOverflow { offset: usize },

    #[error("{count} trailing byte(s) after top-level object at offset {offset}")]
    TrailingBytes { offset: usize, count: usize },

    #[error("unknown or unsupported tag at offset {offset}: {tag:#04x}")]
    UnknownTag { offset: usize, tag: u8 },

    #[error("integer at offset {offset} does not fit in the requested width")]
    IntegerOverflow { offset: usize },

    #[error("malformed OID encoding at offset {offset}")]
    OidMalformed { offset: usize },

    #[error("unknown OID symbolic name: {0:?}")]
    OidUnknownName(String),

    #[error("character {ch:?} at path {path} is not valid for the requested string charset")]
    StringCharsetViolation { path: String, ch: char },

    #[error("date out of representable range at path {path}")]
    DateOutOfRange { path: String },

    #[error("unsupported Set shape at offset {offset}: expected one Sequence of [Oid, String]")]
    SetShapeUnsupported { offset: usize },

    #[error("type mismatch at path {path}: expected {expected}, found {found}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("undefined value rejected (set allow_undefined to elide it)")]
    UndefinedRejected,

    #[error("unknown tagged-object type {0:?}")]
    UnknownTaggedType(String),

    #[error("recursion depth exceeded (max {max}) at offset {offset}")]
    DepthExceeded { offset: usize, max: usize },

    #[error("host value at path {path} has no corresponding ASN.1 representation")]
    UnsupportedHostType { path: String },

    #[error("invalid base64 input: {0}")]
    Base64(String),

    #[error("invalid UTF-8 in string content at offset {offset}")]
    Utf8 { offset: usize },

    #[error("invalid decimal integer literal: {0:?}")]
    InvalidBigIntLiteral(String),
}

/// Result type alias used throughout this crate.
pub type Asn1Result<T> = Result<T, Asn1Error>;
