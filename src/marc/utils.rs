//! Low-level byte reading utilities

use std::io::{self, ErrorKind, Read};

/// Parse a fixed-width run of ASCII digits.
///
/// MARC stores every length and offset as zero-padded decimal text. Returns
/// `None` for an empty slice or any non-digit byte (including spaces).
pub fn parse_decimal(digits: &[u8]) -> Option<usize> {
    if digits.is_empty() {
        return None;
    }
    digits.iter().try_fold(0usize, |acc, &b| {
        if b.is_ascii_digit() {
            acc.checked_mul(10)?.checked_add((b - b'0') as usize)
        } else {
            None
        }
    })
}

/// Read until `buf` is full or the source is exhausted.
///
/// Unlike `read_exact`, a short read is not an error: the number of bytes
/// actually read is returned so callers can tell a clean end of stream
/// (zero) from a truncated structure.
pub fn read_up_to(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Bytes as text for tags and error diagnostics. Field values never pass
/// through here; invalid UTF-8 sequences are replaced.
pub fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_zero_padded_digits() {
        assert_eq!(parse_decimal(b"00042"), Some(42));
        assert_eq!(parse_decimal(b"0000"), Some(0));
    }

    #[test]
    fn rejects_blanks_and_letters() {
        assert_eq!(parse_decimal(b""), None);
        assert_eq!(parse_decimal(b" 042"), None);
        assert_eq!(parse_decimal(b"00a2"), None);
    }

    #[test]
    fn read_up_to_reports_short_reads() {
        let mut src: &[u8] = b"abc";
        let mut buf = [0u8; 5];
        assert_eq!(read_up_to(&mut src, &mut buf).unwrap(), 3);
        assert_eq!(&buf[..3], b"abc");
        assert_eq!(read_up_to(&mut src, &mut buf).unwrap(), 0);
    }
}
