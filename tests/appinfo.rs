mod common;

use appvdf::appinfo::{scan_for_record, AppInfoReader, AppInfoVersion};
use appvdf::{ErrorKind, Value};
use common::{appinfo_file, object, text};
use quickcheck_macros::quickcheck;
use rstest::*;
use std::io::Cursor;

fn two_records(version: u8) -> Vec<u8> {
    let ten = object(vec![(
        "appinfo",
        Value::Object(object(vec![
            ("appid", Value::Int32(10)),
            (
                "common",
                Value::Object(object(vec![
                    ("name", text("Counter-Strike")),
                    ("type", text("Game")),
                ])),
            ),
        ])),
    )]);

    let twenty = object(vec![(
        "appinfo",
        Value::Object(object(vec![
            ("appid", Value::Int32(20)),
            (
                "common",
                Value::Object(object(vec![("name", text("Team Fortress Classic"))])),
            ),
        ])),
    )]);

    appinfo_file(version, &[(10, ten), (20, twenty)])
}

#[rstest]
#[case(0x27, AppInfoVersion::V27)]
#[case(0x28, AppInfoVersion::V28)]
#[case(0x29, AppInfoVersion::V29)]
fn test_scan_finds_second_record(#[case] magic: u8, #[case] version: AppInfoVersion) {
    let data = two_records(magic);
    let reader = AppInfoReader::new(Cursor::new(&data)).unwrap();
    assert_eq!(reader.header().version(), version);
    assert_eq!(reader.header().key_table().is_some(), magic == 0x29);

    let record = scan_for_record(Cursor::new(&data), 20).unwrap().unwrap();
    assert_eq!(record.appid, 20);
    assert_eq!(record.change_number, 2000);
    assert_eq!(record.info_state, 2);
    assert_eq!(record.sha1, [0xaa; 20]);
    assert_eq!(record.data_sha1.is_some(), magic != 0x27);
    assert_eq!(
        record.to_value().pointer(&["appinfo", "common", "name"]),
        Some(&text("Team Fortress Classic"))
    );
}

#[test]
fn test_scan_missing_record() {
    let data = two_records(0x29);
    assert!(scan_for_record(Cursor::new(&data), 30).unwrap().is_none());
}

#[test]
fn test_records_iterate_in_order() {
    let data = two_records(0x28);
    let mut reader = AppInfoReader::new(Cursor::new(&data)).unwrap();
    let ids: Vec<u32> = reader.records().map(|x| x.unwrap().appid).collect();
    assert_eq!(ids, vec![10, 20]);
    assert!(reader.next_record().unwrap().is_none());
}

#[test]
fn test_record_size_covers_remainder() {
    let data = two_records(0x28);
    let mut reader = AppInfoReader::new(Cursor::new(&data)).unwrap();
    let first = reader.next_record().unwrap().unwrap();

    // appid and size are 8 bytes, the header is 8 bytes
    let second_starts_at = 8 + 8 + first.size as usize;
    assert_eq!(&data[second_starts_at..second_starts_at + 4], &20u32.to_le_bytes());
}

#[test]
fn test_missing_end_marker_is_clean() {
    let mut data = two_records(0x28);
    data.truncate(data.len() - 4);
    let mut reader = AppInfoReader::new(Cursor::new(&data)).unwrap();
    assert_eq!(reader.records().filter_map(Result::ok).count(), 2);
}

#[test]
fn test_truncated_record_fails() {
    let data = two_records(0x28);
    let truncated = &data[..data.len() - 10];
    let err = scan_for_record(Cursor::new(truncated), 20).unwrap_err();
    assert!(err.kind().is_malformed());

    // The scan does not continue after an error
    let mut reader = AppInfoReader::new(Cursor::new(truncated)).unwrap();
    assert_eq!(reader.next_record().unwrap().map(|x| x.appid), Some(10));
    assert!(reader.next_record().is_err());
    assert!(reader.next_record().unwrap().is_none());
}

#[quickcheck]
fn test_invalid_magic(magic: u32) -> bool {
    let magic = magic.to_le_bytes();
    if matches!(magic, [0x27..=0x29, 0x44, 0x56, 0x07]) {
        return true;
    }

    let mut data = magic.to_vec();
    data.extend_from_slice(&[0u8; 12]);
    match AppInfoReader::new(Cursor::new(data)) {
        Err(e) => matches!(e.kind(), ErrorKind::InvalidMagic { magic: x } if *x == magic),
        Ok(_) => false,
    }
}
