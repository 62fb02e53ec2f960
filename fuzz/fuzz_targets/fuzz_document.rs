#![no_main]
use appvdf::binary::{decode_document, KeyTable, Terminator};
use appvdf::steam::AppInfo;
use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    let keys: KeyTable = vec!["appinfo", "common", "name", "config", "launch"]
        .into_iter()
        .collect();

    for merge in [false, true] {
        let inline = decode_document(Cursor::new(data), None, merge, Terminator::Standard);
        if let Ok(value) = inline {
            let _ = appvdf::project::<AppInfo>(&value);
        }

        let _ = decode_document(Cursor::new(data), Some(&keys), merge, Terminator::Alternate);
    }
});
