//! Leader decoding
//!
//! Layout (MARC21):
//! - 00-04: record length (5 digits)
//! - 05-11: status, type, level, control, coding, indicator and code counts
//! - 12-16: base address of data (5 digits)
//! - 17-19: encoding level, cataloging form, multipart level
//! - 20-23: entry map

use crate::marc::types::error::{MarcError, Result};
use crate::marc::types::models::{Leader, LEADER_LEN};
use crate::marc::utils;

/// Decode a leader from its raw bytes.
///
/// Fails with `MalformedLeader` when fewer than 24 bytes are given, when the
/// record length or base address are not digit strings, or when they cannot
/// describe a record (base address must leave room for the leader and the
/// directory terminator; the record length must extend past it).
pub fn parse(bytes: &[u8]) -> Result<Leader> {
    let malformed = |reason: String| MarcError::MalformedLeader {
        reason,
        raw: utils::lossy(bytes),
    };

    let raw: [u8; LEADER_LEN] = bytes
        .try_into()
        .map_err(|_| malformed(format!("expected {} bytes, found {}", LEADER_LEN, bytes.len())))?;

    let record_length = utils::parse_decimal(&raw[0..5])
        .ok_or_else(|| malformed("record length (00-04) is not numeric".to_string()))?;
    let base_address = utils::parse_decimal(&raw[12..17])
        .ok_or_else(|| malformed("base address of data (12-16) is not numeric".to_string()))?;

    if base_address < LEADER_LEN + 1 {
        return Err(malformed(format!(
            "base address {} leaves no room for the directory",
            base_address
        )));
    }
    if record_length <= base_address {
        return Err(malformed(format!(
            "record length {} does not extend past base address {}",
            record_length, base_address
        )));
    }

    let at = |i: usize| raw[i] as char;
    Ok(Leader {
        raw,
        record_length,
        record_status: at(5),
        type_of_record: at(6),
        bibliographic_level: at(7),
        type_of_control: at(8),
        character_coding: at(9),
        indicator_count: at(10),
        subfield_code_count: at(11),
        base_address,
        encoding_level: at(17),
        cataloging_form: at(18),
        multipart_level: at(19),
        entry_map: [at(20), at(21), at(22), at(23)],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_positions() {
        let leader = parse(b"00714cam a2200205 a 4500").unwrap();
        assert_eq!(leader.record_length, 714);
        assert_eq!(leader.base_address, 205);
        assert_eq!(leader.record_status, 'c');
        assert_eq!(leader.type_of_record, 'a');
        assert_eq!(leader.bibliographic_level, 'm');
        assert_eq!(leader.character_coding, 'a');
        assert_eq!(leader.indicator_count, '2');
        assert_eq!(leader.subfield_code_count, '2');
        assert_eq!(leader.cataloging_form, 'a');
        assert_eq!(leader.entry_map, ['4', '5', '0', '0']);
        assert_eq!(leader.as_bytes(), b"00714cam a2200205 a 4500");
    }

    #[test]
    fn short_leader_is_malformed() {
        let err = parse(b"00714cam a22").unwrap_err();
        assert!(matches!(err, MarcError::MalformedLeader { .. }));
    }

    #[test]
    fn non_numeric_length_is_malformed() {
        let err = parse(b"0x714cam a2200205 a 4500").unwrap_err();
        assert!(matches!(err, MarcError::MalformedLeader { ref reason, .. } if reason.contains("record length")));
    }

    #[test]
    fn base_address_must_precede_end_of_record() {
        let err = parse(b"00100cam a2200205 a 4500").unwrap_err();
        assert!(matches!(err, MarcError::MalformedLeader { .. }));
    }
}
