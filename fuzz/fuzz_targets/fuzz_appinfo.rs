#![no_main]
use appvdf::appinfo::AppInfoReader;
use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    if let Ok(mut reader) = AppInfoReader::new(Cursor::new(data)) {
        for record in reader.records() {
            if record.is_err() {
                break;
            }
        }
    }
});
