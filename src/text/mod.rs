//! Parsing Valve KeyValues text (`.vdf` and `.acf` files)
//!
//! The format is a sequence of `"key" "value"` and `"key" { ... }` entries.
//! Keys and values may be unquoted, `//` starts a line comment, and a
//! trailing `[$CONDITION]` marker is skipped. Every scalar is parsed as a
//! string and it is up to [project](crate::project()) to interpret it.
//!
//! The top level is an implicit object:
//!
//! ```
//! use appvdf::text::{self, DuplicateKeyMode, TextOptions};
//! use appvdf::Value;
//!
//! let data = b"a { x 1 } a { y 2 }";
//! let merged = text::parse(data)?;
//! assert_eq!(merged.pointer(&["a"]).and_then(|x| x.as_object()).map(|x| x.len()), Some(2));
//!
//! let collected = TextOptions::new()
//!     .duplicate_keys(DuplicateKeyMode::Collect)
//!     .parse(data)?;
//! assert!(matches!(collected.pointer(&["a"]), Some(Value::List(_))));
//! # Ok::<(), appvdf::Error>(())
//! ```

mod lexer;
mod parser;

pub use self::parser::{parse, parse_with, DuplicateKeyMode, TextOptions};
