//! Data structures representing MARC21 record components

use std::borrow::Cow;
use std::fmt;
use std::io::{self, Write};

use super::error::{MarcError, Result};

/// Size in bytes of the fixed record leader.
pub const LEADER_LEN: usize = 24;

/// Size in bytes of one directory entry.
pub const DIR_ENTRY_LEN: usize = 12;

/// Returns true if `tag` names a control field (001-009).
pub fn is_control_tag(tag: &str) -> bool {
    tag.starts_with("00")
}

/// Parsed 24-byte record leader.
///
/// The two numeric positions needed to walk the record are decoded; every
/// other position is kept as its raw character. The original bytes are kept
/// too, see [`Leader::as_bytes`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leader {
    pub(crate) raw: [u8; LEADER_LEN],
    /// 00-04: total record length, including the record terminator.
    pub record_length: usize,
    /// 05
    pub record_status: char,
    /// 06
    pub type_of_record: char,
    /// 07
    pub bibliographic_level: char,
    /// 08
    pub type_of_control: char,
    /// 09: `a` for UCS/Unicode, blank for MARC-8.
    pub character_coding: char,
    /// 10
    pub indicator_count: char,
    /// 11
    pub subfield_code_count: char,
    /// 12-16: offset of the first field value from the start of the record.
    pub base_address: usize,
    /// 17
    pub encoding_level: char,
    /// 18
    pub cataloging_form: char,
    /// 19
    pub multipart_level: char,
    /// 20-23
    pub entry_map: [char; 4],
}

impl Leader {
    /// The leader exactly as it appeared in the record.
    pub fn as_bytes(&self) -> &[u8; LEADER_LEN] {
        &self.raw
    }

    /// The leader as text. Non-UTF-8 bytes are replaced.
    pub fn as_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.raw)
    }
}

impl fmt::Display for Leader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str())
    }
}

/// One 12-byte directory slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub tag: String,
    /// Byte length of the field value, including its trailing field separator.
    pub length: usize,
    /// Declared starting offset relative to the base address of data.
    pub start: usize,
}

/// A `(code, value)` pair inside a data field.
///
/// The value is kept as the bytes found in the record; MARC-8 and UTF-8
/// records alike come back unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubField {
    pub code: char,
    pub value: Vec<u8>,
}

impl SubField {
    pub fn new(code: char, value: impl Into<Vec<u8>>) -> Self {
        Self {
            code,
            value: value.into(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.value
    }

    /// The value as text. Non-UTF-8 bytes are replaced.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.value)
    }
}

/// The body of a field: a raw control value or indicators plus subfields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Control(Vec<u8>),
    Data {
        indicator1: char,
        indicator2: char,
        subfields: Vec<SubField>,
    },
}

/// A tagged field of a MARC record.
///
/// For example the mnemonic line `=650  \0$aDiabetes$xComplications` is a
/// data field with tag `650`, indicators `(' ', '0')` and two subfields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub tag: String,
    pub kind: FieldKind,
}

impl Field {
    pub fn control(tag: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            tag: tag.into(),
            kind: FieldKind::Control(value.into()),
        }
    }

    pub fn data(
        tag: impl Into<String>,
        indicator1: char,
        indicator2: char,
        subfields: Vec<SubField>,
    ) -> Self {
        Self {
            tag: tag.into(),
            kind: FieldKind::Data {
                indicator1,
                indicator2,
                subfields,
            },
        }
    }

    pub fn is_control(&self) -> bool {
        matches!(self.kind, FieldKind::Control(_))
    }

    /// Bytes of a control field; `None` for data fields.
    pub fn raw_value(&self) -> Option<&[u8]> {
        match &self.kind {
            FieldKind::Control(value) => Some(value.as_slice()),
            FieldKind::Data { .. } => None,
        }
    }

    /// Value of a control field as text; `None` for data fields.
    pub fn value(&self) -> Option<Cow<'_, str>> {
        self.raw_value().map(String::from_utf8_lossy)
    }

    /// Both indicators of a data field; `None` for control fields.
    pub fn indicators(&self) -> Option<(char, char)> {
        match &self.kind {
            FieldKind::Control(_) => None,
            FieldKind::Data {
                indicator1,
                indicator2,
                ..
            } => Some((*indicator1, *indicator2)),
        }
    }

    /// All subfields in record order. Empty for control fields.
    pub fn subfields(&self) -> &[SubField] {
        match &self.kind {
            FieldKind::Control(_) => &[],
            FieldKind::Data { subfields, .. } => subfields.as_slice(),
        }
    }

    /// Bytes of the first subfield with the given code.
    pub fn raw_subfield(&self, code: char) -> Option<&[u8]> {
        self.subfields()
            .iter()
            .find(|sub| sub.code == code)
            .map(SubField::as_bytes)
    }

    /// Value of the first subfield with the given code, as text.
    pub fn subfield(&self, code: char) -> Option<Cow<'_, str>> {
        self.raw_subfield(code).map(String::from_utf8_lossy)
    }

    /// Subfields whose code appears in `codes` (e.g. `"abu"`), in record order.
    pub fn subfields_in<'a>(&'a self, codes: &'a str) -> impl Iterator<Item = &'a SubField> + 'a {
        self.subfields()
            .iter()
            .filter(move |sub| codes.contains(sub.code))
    }

    /// Case-insensitive substring search over the control value or subfield values.
    pub fn contains(&self, needle: &str) -> bool {
        self.contains_lowercase(&needle.to_lowercase())
    }

    fn contains_lowercase(&self, needle: &str) -> bool {
        match &self.kind {
            FieldKind::Control(value) => bytes_contain(value, needle),
            FieldKind::Data { subfields, .. } => {
                subfields.iter().any(|sub| bytes_contain(&sub.value, needle))
            }
        }
    }

    /// Write the field in mnemonic form with values copied byte for byte.
    pub fn write_mnemonic<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "={}  ", self.tag)?;
        match &self.kind {
            FieldKind::Control(value) => out.write_all(value),
            FieldKind::Data {
                indicator1,
                indicator2,
                subfields,
            } => {
                write!(
                    out,
                    "{}{}",
                    indicator_display(*indicator1),
                    indicator_display(*indicator2)
                )?;
                for sub in subfields {
                    write!(out, "${}", sub.code)?;
                    out.write_all(&sub.value)?;
                }
                Ok(())
            }
        }
    }
}

/// Case-insensitive search of an already lowercased `needle` in raw bytes.
///
/// UTF-8 values are folded with full Unicode lowercasing; anything else
/// (MARC-8) is folded over ASCII only and searched byte-wise.
fn bytes_contain(haystack: &[u8], needle: &str) -> bool {
    match std::str::from_utf8(haystack) {
        Ok(text) => text.to_lowercase().contains(needle),
        Err(_) => {
            let needle = needle.as_bytes();
            needle.is_empty()
                || haystack
                    .to_ascii_lowercase()
                    .windows(needle.len())
                    .any(|window| window == needle)
        }
    }
}

/// Blank indicators are shown as a backslash in mnemonic form.
fn indicator_display(indicator: char) -> char {
    if indicator == ' ' {
        '\\'
    } else {
        indicator
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            FieldKind::Control(value) => {
                write!(f, "={}  {}", self.tag, String::from_utf8_lossy(value))
            }
            FieldKind::Data {
                indicator1,
                indicator2,
                subfields,
            } => {
                write!(
                    f,
                    "={}  {}{}",
                    self.tag,
                    indicator_display(*indicator1),
                    indicator_display(*indicator2)
                )?;
                for sub in subfields {
                    write!(f, "${}{}", sub.code, sub.text())?;
                }
                Ok(())
            }
        }
    }
}

/// A fully decoded MARC record.
///
/// `fields` is index-aligned with `directory`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Zero-based ordinal of this record in its stream.
    pub position: usize,
    pub leader: Leader,
    pub directory: Vec<DirEntry>,
    pub fields: Vec<Field>,
}

impl Record {
    /// All fields with the given tag, in record order.
    pub fn get_fields(&self, tag: &str) -> Vec<&Field> {
        self.fields.iter().filter(|f| f.tag == tag).collect()
    }

    /// The first field with the given tag.
    pub fn get_field(&self, tag: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.tag == tag)
    }

    /// Bytes of the first field with `tag`.
    ///
    /// With `code == None` this is the control value; otherwise the value of
    /// the first subfield with that code.
    pub fn raw_value(&self, tag: &str, code: Option<char>) -> Option<&[u8]> {
        let field = self.get_field(tag)?;
        match code {
            None => field.raw_value(),
            Some(code) => field.raw_subfield(code),
        }
    }

    /// Like [`Record::raw_value`], as text.
    pub fn value(&self, tag: &str, code: Option<char>) -> Option<Cow<'_, str>> {
        self.raw_value(tag, code).map(String::from_utf8_lossy)
    }

    /// Non-empty values of `tag`/`code` across every repetition of the field.
    pub fn values(&self, tag: &str, code: Option<char>) -> Vec<Cow<'_, str>> {
        self.fields
            .iter()
            .filter(|f| f.tag == tag)
            .filter_map(|f| match code {
                None => f.raw_value(),
                Some(code) => f.raw_subfield(code),
            })
            .filter(|v| !v.is_empty())
            .map(String::from_utf8_lossy)
            .collect()
    }

    /// The control number (001), if present.
    pub fn control_number(&self) -> Option<Cow<'_, str>> {
        self.value("001", None)
    }

    /// The title proper (245 $a), if present.
    pub fn title(&self) -> Option<Cow<'_, str>> {
        self.value("245", Some('a'))
    }

    /// Case-insensitive substring search over every control and subfield value.
    pub fn contains(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.fields.iter().any(|f| f.contains_lowercase(&needle))
    }

    /// Like [`Record::contains`], but an empty search matches every record.
    pub fn is_match(&self, search: &str) -> bool {
        search.is_empty() || self.contains(search)
    }

    /// Short identity used in diagnostics: position plus control number.
    pub fn summary(&self) -> String {
        match (self.control_number(), self.fields.first()) {
            (Some(cn), _) => format!("#{} 001={}", self.position, cn),
            (None, Some(first)) => format!("#{} {}", self.position, first),
            (None, None) => format!("#{} (no fields)", self.position),
        }
    }

    /// Write the record in mnemonic form: the leader line, then one line per
    /// field. Field values are written as raw bytes; no trailing newline.
    pub fn write_mnemonic<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        out.write_all(b"=LDR  ")?;
        out.write_all(self.leader.as_bytes())?;
        for field in &self.fields {
            out.write_all(b"\n")?;
            field.write_mnemonic(out)?;
        }
        Ok(())
    }

    /// Reconciles the directory with the lengths declared in the leader.
    ///
    /// Checks that the base address covers exactly the leader and directory,
    /// that the record length equals base address + field lengths + the
    /// record terminator, and that each entry's declared start is the sum of
    /// the preceding lengths.
    pub fn check_lengths(&self) -> Result<()> {
        let computed_base = LEADER_LEN + self.directory.len() * DIR_ENTRY_LEN + 1;
        if self.leader.base_address != computed_base {
            return Err(MarcError::LengthMismatch {
                context: "base address of data",
                declared: self.leader.base_address,
                computed: computed_base,
            });
        }

        let mut running = 0;
        for entry in &self.directory {
            if entry.start != running {
                return Err(MarcError::LengthMismatch {
                    context: "directory starting position",
                    declared: entry.start,
                    computed: running,
                });
            }
            running += entry.length;
        }

        let computed_total = computed_base + running + 1;
        if self.leader.record_length != computed_total {
            return Err(MarcError::LengthMismatch {
                context: "record length",
                declared: self.leader.record_length,
                computed: computed_total,
            });
        }
        Ok(())
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "=LDR  {}", self.leader)?;
        for field in &self.fields {
            write!(f, "\n{}", field)?;
        }
        Ok(())
    }
}
