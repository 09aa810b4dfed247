//! Field value decoding (control and data fields)

use log::trace;

use super::{FIELD_SEPARATOR, SUBFIELD_DELIMITER};
use crate::marc::types::error::{MarcError, Result};
use crate::marc::types::models::{is_control_tag, Field, SubField};
use crate::marc::utils;

/// Decode one field value.
///
/// `bytes` is the full span declared by the directory entry, trailing field
/// separator included. Exactly one separator is stripped.
///
/// Data field layout after stripping:
/// - byte 0: indicator 1
/// - byte 1: indicator 2
/// - then one or more `0x1F <code> <value...>` subfields
pub fn parse(tag: &str, bytes: &[u8]) -> Result<Field> {
    let truncated = |reason: &str| MarcError::TruncatedField {
        tag: tag.to_string(),
        reason: reason.to_string(),
    };

    let (last, data) = bytes
        .split_last()
        .ok_or_else(|| truncated("value of length zero detected"))?;
    if *last != FIELD_SEPARATOR {
        return Err(truncated(&format!(
            "value does not end with a field separator (last byte {:#04x})",
            last
        )));
    }

    if is_control_tag(tag) {
        trace!("Control field {}: {} bytes", tag, data.len());
        return Ok(Field::control(tag, data.to_vec()));
    }

    if data.len() < 3 || data[2] != SUBFIELD_DELIMITER {
        return Err(MarcError::InvalidIndicators {
            tag: tag.to_string(),
            raw: utils::lossy(data),
        });
    }

    let subfields = data[3..]
        .split(|&b| b == SUBFIELD_DELIMITER)
        .enumerate()
        .map(|(index, segment)| match segment.split_first() {
            Some((code, value)) => Ok(SubField::new(*code as char, value.to_vec())),
            None => Err(MarcError::ExtraneousTerminator {
                tag: tag.to_string(),
                index,
                raw: utils::lossy(data),
            }),
        })
        .collect::<Result<Vec<_>>>()?;

    trace!("Data field {}: {} subfields", tag, subfields.len());
    Ok(Field::data(tag, data[0] as char, data[1] as char, subfields))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_field_keeps_raw_value() {
        let field = parse("001", b"123456\x1E").unwrap();
        assert_eq!(field, Field::control("001", "123456"));
        assert!(field.subfields().is_empty());
    }

    #[test]
    fn data_field_splits_subfields_in_order() {
        let field = parse("650", b"0 \x1FaDiabetes\x1FxComplications\x1E").unwrap();
        assert_eq!(field.indicators(), Some(('0', ' ')));
        assert_eq!(
            field.subfields(),
            &[
                SubField::new('a', "Diabetes"),
                SubField::new('x', "Complications")
            ]
        );
    }

    #[test]
    fn empty_slice_is_truncated() {
        assert!(matches!(parse("245", b""), Err(MarcError::TruncatedField { .. })));
    }

    #[test]
    fn missing_separator_is_truncated() {
        assert!(matches!(parse("001", b"12345"), Err(MarcError::TruncatedField { .. })));
    }

    #[test]
    fn short_data_field_has_invalid_indicators() {
        assert!(matches!(parse("245", b"10\x1E"), Err(MarcError::InvalidIndicators { .. })));
        assert!(matches!(parse("245", b"10a\x1E"), Err(MarcError::InvalidIndicators { .. })));
    }

    #[test]
    fn doubled_delimiter_is_extraneous() {
        let err = parse("245", b"10\x1FaTitle\x1F\x1FcAuthor\x1E").unwrap_err();
        assert!(matches!(err, MarcError::ExtraneousTerminator { index: 1, .. }));
    }

    #[test]
    fn empty_subfield_value_is_allowed() {
        let field = parse("500", b"  \x1Fa\x1E").unwrap();
        assert_eq!(field.subfield('a').as_deref(), Some(""));
    }

    #[test]
    fn values_keep_non_utf8_bytes() {
        let field = parse("245", b"10\x1FaCaf\xE2e\x1E").unwrap();
        assert_eq!(field.raw_subfield('a'), Some(&b"Caf\xE2e"[..]));
        assert_eq!(field.subfield('a').as_deref(), Some("Caf\u{FFFD}e"));

        let control = parse("008", b"\xE1\xB0\x1E").unwrap();
        assert_eq!(control.raw_value(), Some(&b"\xE1\xB0"[..]));
    }
}
