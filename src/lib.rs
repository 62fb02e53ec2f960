/*!

A decoder for Steam's binary application metadata cache (`appcache/appinfo.vdf`)
and a typed projector for Valve KeyValues documents.

## Features

- ✔ Versatile: Decode the binary appinfo cache and parse KeyValues text into the same dynamic tree
- ✔ Lenient: Project documents onto plain structs, skipping (and reporting) what doesn't fit
- ✔ Ergonomic: Derive the projection with `#[derive(VdfShape)]`
- ✔ Streaming: Scan the cache record by record from any `Read + Seek` source

## Quick Start

Below is a demonstration of projecting KeyValues text onto a struct.

```rust
# #[cfg(feature = "derive")] {
use appvdf::{project, text, VdfShape};

#[derive(VdfShape, Debug, Default, PartialEq)]
pub struct Manifest {
    app_state: AppState,
}

#[derive(VdfShape, Debug, Default, PartialEq)]
pub struct AppState {
    appid: u32,
    name: String,
    #[vdf(alias = "BytesDownloaded")]
    downloaded: u64,
}

let data = br#"
"AppState"
{
    "appid"     "4000"
    "name"      "Garry's Mod"
    "StateFlags"    "4"
    "BytesDownloaded"   "not a number"
}
"#;

let value = text::parse(&data[..]).unwrap();
let projection = project::<Manifest>(&value).unwrap();
assert_eq!(projection.value.app_state.appid, 4000);
assert_eq!(projection.value.app_state.name, "Garry's Mod");

// The unparseable value is reported rather than aborting the projection
assert_eq!(projection.value.app_state.downloaded, 0);
assert_eq!(projection.diagnostics.len(), 1);
assert_eq!(projection.diagnostics[0].path, "AppState.BytesDownloaded");
# }
```

## Binary Parsing

A binary document is a sequence of tagged entries. Keys are either inline
strings or, in the newest cache format, indices into a key table.

```rust
use appvdf::binary::{decode_document, KeyTable, Terminator};
use appvdf::Value;
use std::io::Cursor;

let data = [
    0x02, 0x00, 0x00, 0x00, 0x00, // int32 whose key is key table entry 0
    0x0a, 0x00, 0x00, 0x00, 0x00, // int32 value
    0x08, // end of root object
];

let keys: KeyTable = vec!["appid"].into_iter().collect();
let value = decode_document(Cursor::new(&data[..]), Some(&keys), true, Terminator::Standard)?;
assert_eq!(value.pointer(&["appid"]), Some(&Value::Int32(10)));
# Ok::<(), appvdf::Error>(())
```

The [appinfo] module reads the surrounding cache file, and
[scan_for_record](appinfo::scan_for_record) finds a single application's
record.

## Logging

Decoding and projection emit [tracing](https://docs.rs/tracing) events: the
cache header at `debug`, each record passed over at `trace`, and every value
skipped during projection at `warn`.
*/

// Generated derive code refers to `::appvdf` paths
extern crate self as appvdf;

pub mod appinfo;
pub mod binary;
mod encoding;
mod errors;
#[cfg(feature = "json")]
pub mod json;
pub mod project;
#[cfg(feature = "derive")]
pub mod steam;
pub mod text;
mod value;

pub use self::encoding::Windows1252Encoding;
pub use self::errors::*;
pub use self::project::{
    project, Diagnostic, DiagnosticKind, FromValue, Projection, Projector, Shape,
};
pub use self::value::{Object, Value};
#[cfg(feature = "derive")]
pub use appvdf_derive::VdfShape;
