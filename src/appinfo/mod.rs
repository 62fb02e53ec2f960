//! Reading the application metadata cache (`appcache/appinfo.vdf`)
//!
//! The cache is a header followed by a sequence of records, each of which
//! embeds one binary key value document. Newer versions store document keys
//! in a key table at the end of the file.

mod header;
mod reader;
mod record;

pub use self::header::{AppInfoHeader, AppInfoVersion};
pub use self::reader::{scan_for_record, AppInfoReader, Records};
pub use self::record::AppRecord;

#[cfg(feature = "json")]
pub(crate) use self::record::hex;
