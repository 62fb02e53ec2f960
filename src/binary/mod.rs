//! Types for decoding binary key value documents
//!
//! See the top level module documentation for an overview that includes
//! decoding documents and projecting them onto typed structures.

mod document;
mod keys;
mod reader;
mod tag;

pub use self::document::{decode_document, DocumentDecoder, DocumentDecoderBuilder};
pub use self::keys::KeyTable;
pub use self::reader::ByteReader;
pub use self::tag::{Terminator, TypeTag};
