#![no_main]
use appvdf::steam::{AppManifest, LibraryFolders};
use appvdf::text::{self, DuplicateKeyMode, TextOptions};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(value) = text::parse(data) {
        let _ = appvdf::project::<AppManifest>(&value);
        let _ = appvdf::project::<LibraryFolders>(&value);
    }

    let _ = TextOptions::new()
        .duplicate_keys(DuplicateKeyMode::Collect)
        .parse(data);
});
