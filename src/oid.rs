//! Object identifier codec: dotted-string ↔ base-128 subidentifier bytes,
//! plus the process-wide symbolic-name alias table KeetaNet structures rely
//! on (e.g. `commonName` for `2.5.4.3`).

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::error::{Asn1Error, Asn1Result};

/// `(symbolic name, dotted OID)` pairs that MUST be present in both
/// directions of the table.
const SYMBOLIC_OIDS: &[(&str, &str)] = &[
    ("sha256", "2.16.840.1.101.3.4.2.1"),
    ("sha3-256", "2.16.840.1.101.3.4.2.8"),
    ("sha3-256WithEcDSA", "2.16.840.1.101.3.4.3.10"),
    ("sha256WithEcDSA", "1.2.840.10045.4.3.2"),
    ("ecdsa", "1.2.840.10045.2.1"),
    ("ed25519", "1.3.101.112"),
    ("secp256k1", "1.3.132.0.10"),
    ("account", "2.23.42.2.7.11"),
    ("serialNumber", "2.5.4.5"),
    ("member", "2.5.4.31"),
    ("commonName", "2.5.4.3"),
    ("hash", "1.3.6.1.4.1.8301.3.2.2.1.1"),
    ("hashData", "2.16.840.1.101.3.3.1.3"),
];

struct OidTable {
    name_to_dotted: HashMap<&'static str, &'static str>,
    dotted_to_name: HashMap<&'static str, &'static str>,
}

fn table() -> &'static OidTable {
    static TABLE: OnceLock<OidTable> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut name_to_dotted = HashMap::with_capacity(SYMBOLIC_OIDS.len());
        let mut dotted_to_name = HashMap::with_capacity(SYMBOLIC_OIDS.len());
        for &(name, dotted) in SYMBOLIC_OIDS {
            name_to_dotted.insert(name, dotted);
            dotted_to_name.insert(dotted, name);
        }
        OidTable {
            name_to_dotted,
            dotted_to_name,
        }
    })
}

/// Resolve a symbolic name or dotted string to the dotted form, per §4.3:
/// a name present in the table resolves to its dotted OID; a name absent
/// from the table but containing a `.` is treated as already-dotted;
/// anything else is `OidUnknownName`.
pub fn resolve_to_dotted(name_or_dotted: &str) -> Asn1Result<String> {
    if let Some(&dotted) = table().name_to_dotted.get(name_or_dotted) {
        return Ok(dotted.to_string());
    }
    if name_or_dotted.contains('.') {
        return Ok(name_or_dotted.to_string());
    }
    log::debug!("OID symbolic table miss for name {name_or_dotted:?}");
    Err(Asn1Error::OidUnknownName(name_or_dotted.to_string()))
}

/// Resolve a dotted OID back to its symbolic name if the table has one,
/// otherwise return the dotted form unchanged.
pub fn resolve_from_dotted(dotted: &str) -> String {
    table()
        .dotted_to_name
        .get(dotted)
        .map(|&name| name.to_string())
        .unwrap_or_else(|| dotted.to_string())
}

fn parse_dotted(dotted: &str) -> Asn1Result<Vec<u64>> {
    dotted
        .split('.')
        .map(|arc| {
            arc.parse::<u64>()
                .map_err(|_| Asn1Error::OidMalformed { offset: 0 })
        })
        .collect()
}

/// Encode a symbolic name or dotted OID string to base-128 subidentifier
/// bytes (the content octets of a BER OBJECT IDENTIFIER).
pub fn encode_oid(name_or_dotted: &str) -> Asn1Result<Vec<u8>> {
    let dotted = resolve_to_dotted(name_or_dotted)?;
    let arcs = parse_dotted(&dotted)?;
    encode_arcs(&arcs)
}

fn encode_arcs(arcs: &[u64]) -> Asn1Result<Vec<u8>> {
    if arcs.len() < 2 {
        return Err(Asn1Error::OidMalformed { offset: 0 });
    }

    let arc0 = arcs[0];
    let arc1 = arcs[1];
    if arc0 > 2 {
        return Err(Asn1Error::OidMalformed { offset: 0 });
    }
    if arc0 < 2 && arc1 >= 40 {
        return Err(Asn1Error::OidMalformed { offset: 0 });
    }

    let mut out = vec![(40 * arc0 + arc1) as u8];
    for &arc in &arcs[2..] {
        out.extend(encode_base128(arc));
    }
    Ok(out)
}

fn encode_base128(mut value: u64) -> Vec<u8> {
    let mut groups = vec![(value & 0x7F) as u8];
    value >>= 7;
    while value > 0 {
        groups.push((value & 0x7F) as u8);
        value >>= 7;
    }
    groups.reverse();
    let last = groups.len() - 1;
    for (i, byte) in groups.iter_mut().enumerate() {
        if i != last {
            *byte |= 0x80;
        }
    }
    groups
}

/// Decode base-128 subidentifier bytes back to arcs, resolving the result
/// against the symbolic table (§4.3).
pub fn decode_oid(content: &[u8]) -> Asn1Result<String> {
    if content.is_empty() {
        return Err(Asn1Error::OidMalformed { offset: 0 });
    }

    let first = content[0];
    let arc0 = (first / 40) as u64;
    let arc1 = (first % 40) as u64;
    let mut arcs = vec![arc0, arc1];

    let mut pos = 1;
    while pos < content.len() {
        let mut value: u64 = 0;
        let mut consumed_any = false;
        loop {
            let byte = *content
                .get(pos)
                .ok_or(Asn1Error::OidMalformed { offset: pos })?;
            value = value
                .checked_shl(7)
                .and_then(|v| v.checked_add((byte & 0x7F) as u64))
                .ok_or(Asn1Error::OidMalformed { offset: pos })?;
            pos += 1;
            consumed_any = true;
            if byte & 0x80 == 0 {
                break;
            }
        }
        if !consumed_any {
            return Err(Asn1Error::OidMalformed { offset: pos });
        }
        arcs.push(value);
    }

    let dotted = arcs
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(".");
    Ok(resolve_from_dotted(&dotted))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_encodes_to_known_bytes() {
        let encoded = encode_oid("sha256").unwrap();
        assert_eq!(
            encoded,
            vec![0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x01]
        );
    }

    #[test]
    fn symbolic_names_roundtrip() {
        for &(name, _) in SYMBOLIC_OIDS {
            let encoded = encode_oid(name).unwrap();
            assert_eq!(decode_oid(&encoded).unwrap(), name);
        }
    }

    #[test]
    fn dotted_oid_outside_table_roundtrips_as_dotted() {
        let dotted = "1.2.3.4.5";
        let encoded = encode_oid(dotted).unwrap();
        assert_eq!(decode_oid(&encoded).unwrap(), dotted);
    }

    #[test]
    fn unknown_name_without_dot_fails() {
        assert!(matches!(
            encode_oid("totallyMadeUp"),
            Err(Asn1Error::OidUnknownName(_))
        ));
    }

    #[test]
    fn truncated_base128_group_fails_to_decode() {
        // 0x06 0x03 0x55 0x04 continuation-bit-set-with-nothing-after
        let content = [0x55, 0x04, 0x80];
        assert!(decode_oid(&content).is_err());
    }

    #[test]
    fn first_arc_rule_matches_commonname() {
        // commonName = 2.5.4.3 -> first byte = 40*2 + 5 = 85 = 0x55
        let encoded = encode_oid("commonName").unwrap();
        assert_eq!(encoded[0], 0x55);
    }
}
