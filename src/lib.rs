//! ASN.1 BER encoding/decoding for KeetaNet structures.
//!
//! This crate provides a bidirectional codec between an idiomatic Rust value
//! model and ASN.1 BER (Basic Encoding Rules): tag/length coding, content
//! encoding per universal tag, canonical-form selection for host types that
//! have more than one legal ASN.1 representation, a symbolic object-identifier
//! table, and recursive composition/decomposition of constructed types.
//!
//! # Layout
//!
//! - [`tag`] / [`length`]: the tag-octet and length-octet coders (BER's TLV
//!   framing).
//! - [`bigint`]: two's-complement BigInt↔bytes conversion, used by the
//!   INTEGER variant and exposed directly to callers.
//! - [`oid`]: the symbolic-name ↔ dotted-OID table and the base-128
//!   subidentifier codec.
//! - [`value`]: [`value::AsnValue`], the tagged sum type every encode/decode
//!   operation works over.
//! - [`encoder`] / [`decoder`]: the BER codec proper, plus [`decoder::Decoder`],
//!   a lazy façade over a parsed tree.
//! - [`host`]: the host-value adapter ([`host::HostValue`]) that converts
//!   idiomatic Rust values to/from [`value::AsnValue`], including canonical-form
//!   inference, plus [`host::DynValue`]/[`host::resolve`] for resolving a
//!   loosely-typed (duck-typed `{type: ...}`-style) value into a `HostValue`.
//! - [`base64_codec`]: a thin base64 wrapper around the decoder, for test and
//!   wire-transport ergonomics.

pub mod base64_codec;
pub mod bigint;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod host;
pub mod length;
pub mod oid;
pub mod tag;
pub mod value;

pub use bigint::{bigint_to_buffer, buffer_to_bigint, integer_to_bigint, string_to_bigint};
pub use decoder::Decoder;
pub use error::{Asn1Error, Asn1Result};
pub use host::{resolve as resolve_dynamic, DynValue, EncodeOptions, HostValue};
pub use value::AsnValue;

/// Encode a host value to BER bytes (`JStoASN1` in the reference API).
///
/// Equivalent to [`encode_with_options`] with the default [`EncodeOptions`]
/// (an `undefined` sentinel is rejected rather than elided).
pub fn encode(value: &HostValue) -> Asn1Result<Vec<u8>> {
    encode_with_options(value, &EncodeOptions::default())
}

/// Encode a host value to BER bytes, honoring `options.allow_undefined`.
pub fn encode_with_options(value: &HostValue, options: &EncodeOptions) -> Asn1Result<Vec<u8>> {
    let asn = host::to_asn_value(value, options)?
        .ok_or(Asn1Error::UndefinedRejected)?;
    encoder::encode(&asn)
}

/// Decode BER bytes (or a base64 string of them) to a host value
/// (`ASN1toJS` in the reference API).
pub fn decode(input: impl AsRef<[u8]>) -> Asn1Result<HostValue> {
    let bytes = input.as_ref();
    let asn = decoder::decode(bytes)?;
    host::from_asn_value(&asn)
}

/// Decode a base64-encoded BER payload to a host value.
pub fn decode_base64(input: &str) -> Asn1Result<HostValue> {
    let bytes = base64_codec::from_base64(input)?;
    decode(bytes)
}
