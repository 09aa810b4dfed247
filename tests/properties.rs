mod common;

use common::RecordBuilder;
use marc_reader::{Field, MarcReader, SubField};
use proptest::prelude::*;

fn control_field() -> impl Strategy<Value = Field> {
    ("00[1-9]", "[ -~]{0,24}").prop_map(|(tag, value)| Field::control(tag, value))
}

fn data_field() -> impl Strategy<Value = Field> {
    (
        "[1-9][0-9]{2}",
        "[0-9 ]",
        "[0-9 ]",
        prop::collection::vec(("[a-z0-9]", "[ -~]{0,16}"), 1..6),
    )
        .prop_map(|(tag, ind1, ind2, subs)| {
            let subfields = subs
                .into_iter()
                .map(|(code, value)| SubField::new(code.chars().next().unwrap(), value))
                .collect();
            Field::data(
                tag,
                ind1.chars().next().unwrap(),
                ind2.chars().next().unwrap(),
                subfields,
            )
        })
}

fn build(fields: &[Field]) -> Vec<u8> {
    fields.iter().fold(RecordBuilder::new(), |builder, field| {
        match field.indicators() {
            None => builder.control(&field.tag, &field.value().unwrap_or_default()),
            Some((ind1, ind2)) => {
                let texts: Vec<(char, String)> = field
                    .subfields()
                    .iter()
                    .map(|s| (s.code, s.text().into_owned()))
                    .collect();
                let subs: Vec<(char, &str)> =
                    texts.iter().map(|(code, value)| (*code, value.as_str())).collect();
                builder.data(&field.tag, ind1, ind2, &subs)
            }
        }
    })
    .build()
}

proptest! {
    /// Fields survive decoding unchanged and the directory reconciles with the leader.
    #[test]
    fn decoded_fields_match_and_lengths_reconcile(
        fields in prop::collection::vec(prop_oneof![control_field(), data_field()], 0..12)
    ) {
        let bytes = build(&fields);
        let mut reader = MarcReader::new(bytes.as_slice());
        let record = reader.read_record().unwrap().unwrap();

        prop_assert_eq!(&record.fields, &fields);
        let summed: usize = record.directory.iter().map(|e| e.length).sum();
        prop_assert_eq!(summed, record.leader.record_length - record.leader.base_address - 1);
        prop_assert!(record.check_lengths().is_ok());
        prop_assert_eq!(reader.offset(), bytes.len() as u64);
        prop_assert!(reader.read_record().unwrap().is_none());
    }
}
