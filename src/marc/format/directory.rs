//! Directory decoding
//!
//! Each entry is 12 ASCII bytes:
//! - 3 bytes: tag
//! - 4 bytes: field length, including the field separator
//! - 5 bytes: starting position relative to the base address of data

use log::trace;

use crate::marc::types::error::{MarcError, Result};
use crate::marc::types::models::{DirEntry, DIR_ENTRY_LEN};
use crate::marc::utils;

/// Decode the directory span that follows the leader.
///
/// `span` must not include the terminating field separator.
pub fn parse(span: &[u8]) -> Result<Vec<DirEntry>> {
    let malformed = |reason: String| MarcError::MalformedDirectory {
        reason,
        raw: utils::lossy(span),
    };

    if span.len() % DIR_ENTRY_LEN != 0 {
        return Err(malformed(format!(
            "length {} is not a multiple of {}",
            span.len(),
            DIR_ENTRY_LEN
        )));
    }

    span.chunks_exact(DIR_ENTRY_LEN)
        .enumerate()
        .map(|(i, chunk)| -> Result<DirEntry> {
            let tag = utils::lossy(&chunk[0..3]);
            let length = utils::parse_decimal(&chunk[3..7]).ok_or_else(|| {
                malformed(format!("entry {} ({}) has a non-numeric length", i, tag))
            })?;
            let start = utils::parse_decimal(&chunk[7..12]).ok_or_else(|| {
                malformed(format!("entry {} ({}) has a non-numeric starting position", i, tag))
            })?;
            trace!("Directory entry {}: tag={} length={} start={}", i, tag, length, start);
            Ok(DirEntry { tag, length, start })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_entries_in_order() {
        let entries = parse(b"001001300000245002200013").unwrap();
        assert_eq!(
            entries,
            vec![
                DirEntry { tag: "001".into(), length: 13, start: 0 },
                DirEntry { tag: "245".into(), length: 22, start: 13 },
            ]
        );
    }

    #[test]
    fn empty_directory_has_no_entries() {
        assert!(parse(b"").unwrap().is_empty());
    }

    #[test]
    fn misaligned_span_is_malformed() {
        let err = parse(b"00100130000024500").unwrap_err();
        assert!(matches!(err, MarcError::MalformedDirectory { .. }));
    }

    #[test]
    fn non_numeric_start_is_malformed() {
        let err = parse(b"00100130000x").unwrap_err();
        assert!(matches!(err, MarcError::MalformedDirectory { ref reason, .. } if reason.contains("starting position")));
    }
}
