#![allow(dead_code)]

use std::path::PathBuf;

pub const FS: u8 = 0x1E;
pub const SD: u8 = 0x1F;
pub const RT: u8 = 0x1D;

pub fn fixture_path(parts: &[&str]) -> PathBuf {
    let mut p = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    for part in parts {
        p.push(part);
    }
    p
}

/// Serialises fields into a well-formed MARC21 record for tests.
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    status: [u8; 5],
    fields: Vec<(String, Vec<u8>)>,
}

impl Default for RecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordBuilder {
    pub fn new() -> Self {
        Self {
            status: *b"nam a",
            fields: Vec::new(),
        }
    }

    pub fn control(mut self, tag: &str, value: &str) -> Self {
        self.fields.push((tag.to_string(), value.as_bytes().to_vec()));
        self
    }

    pub fn data(mut self, tag: &str, ind1: char, ind2: char, subfields: &[(char, &str)]) -> Self {
        let mut body = vec![ind1 as u8, ind2 as u8];
        for (code, value) in subfields {
            body.push(SD);
            body.push(*code as u8);
            body.extend_from_slice(value.as_bytes());
        }
        self.fields.push((tag.to_string(), body));
        self
    }

    /// A field body as-is, without the trailing field separator.
    pub fn raw(mut self, tag: &str, body: &[u8]) -> Self {
        self.fields.push((tag.to_string(), body.to_vec()));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut directory = Vec::new();
        let mut data = Vec::new();
        for (tag, body) in &self.fields {
            let length = body.len() + 1;
            directory.extend_from_slice(format!("{}{:04}{:05}", tag, length, data.len()).as_bytes());
            data.extend_from_slice(body);
            data.push(FS);
        }
        let base = 24 + directory.len() + 1;
        let total = base + data.len() + 1;

        let mut out = Vec::with_capacity(total);
        out.extend_from_slice(format!("{:05}", total).as_bytes());
        out.extend_from_slice(&self.status);
        out.extend_from_slice(b"22");
        out.extend_from_slice(format!("{:05}", base).as_bytes());
        out.extend_from_slice(b" a 4500");
        out.extend_from_slice(&directory);
        out.push(FS);
        out.extend_from_slice(&data);
        out.push(RT);
        out
    }
}

/// The record used by most reader tests.
pub fn sample_record() -> RecordBuilder {
    RecordBuilder::new()
        .control("001", "123456")
        .data("245", '1', '0', &[('a', "Diabetes :"), ('c', "John Smith.")])
        .data("650", ' ', '0', &[('a', "Diabetes"), ('x', "Complications")])
}
