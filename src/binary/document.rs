use super::{ByteReader, KeyTable, Terminator, TypeTag};
use crate::encoding::decode_text;
use crate::errors::{Error, ErrorKind};
use crate::value::{Object, Value};
use std::io::{Read, Seek};

/// An open object during decoding
#[derive(Debug)]
struct Scope {
    object: Object,

    /// Position of the object's key in the parent scope. A scope without a
    /// slot is decoded and then dropped.
    slot: Option<usize>,
}

/// Decodes binary key value documents into a [Value] tree
///
/// ```rust
/// use appvdf::{binary::DocumentDecoder, Value};
/// use std::io::Cursor;
///
/// let data = b"\x00common\x00\x01name\x00Portal\x00\x02appid\x00\x90\x01\x00\x00\x08\x08";
/// let value = DocumentDecoder::new().decode(Cursor::new(&data[..]))?;
/// assert_eq!(
///     value.pointer(&["common", "name"]),
///     Some(&Value::String(String::from("Portal")))
/// );
/// assert_eq!(value.pointer(&["common", "appid"]), Some(&Value::Int32(400)));
/// # Ok::<(), appvdf::Error>(())
/// ```
///
/// Decoding is atomic: either the root object and every nested object is
/// closed and a value is returned, or an error is returned and the partially
/// decoded data is discarded.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentDecoder<'a> {
    key_table: Option<&'a KeyTable>,
    merge_duplicate_keys: bool,
    terminator: Terminator,
}

impl<'a> DocumentDecoder<'a> {
    /// Decoder with inline keys, no duplicate key merging, and the standard
    /// terminator
    pub fn new() -> Self {
        DocumentDecoder::default()
    }

    /// Returns a builder to customize decoding
    pub fn builder() -> DocumentDecoderBuilder<'a> {
        DocumentDecoderBuilder::new()
    }

    /// Decode one document starting at the current position of the reader.
    /// The reader is left directly after the root's closing tag.
    pub fn decode<R>(&self, reader: R) -> Result<Value, Error>
    where
        R: Read + Seek,
    {
        let mut reader = ByteReader::new(reader)?;
        self.decode_object(&mut reader).map(Value::Object)
    }

    /// Decode one document from an existing [ByteReader]
    pub fn decode_object<R>(&self, reader: &mut ByteReader<R>) -> Result<Object, Error>
    where
        R: Read + Seek,
    {
        let end = self.terminator.tag();
        let mut stack = vec![Scope {
            object: Object::new(),
            slot: None,
        }];

        loop {
            let offset = reader.position();
            let tag = match reader.read_u8()? {
                Some(x) => TypeTag::new(x),
                None => {
                    return Err(ErrorKind::IncompleteDocument {
                        open_scopes: stack.len(),
                    }
                    .into())
                }
            };

            if tag == end {
                if stack.len() > 1 {
                    self.close_scope(&mut stack);
                    continue;
                }

                let root = stack.pop().map(|x| x.object).unwrap_or_default();
                return Ok(root);
            }

            if !tag.is_entry() {
                return Err(ErrorKind::UnknownTypeTag {
                    tag: tag.0,
                    offset: Some(offset),
                }
                .into());
            }

            let key = self.read_key(reader)?;
            let current = match stack.last_mut() {
                Some(x) => x,
                None => return Err(ErrorKind::IncompleteDocument { open_scopes: 0 }.into()),
            };

            let value = match tag {
                TypeTag::OBJECT => {
                    let scope = self.open_scope(&mut current.object, key);
                    stack.push(scope);
                    continue;
                }
                TypeTag::STRING => {
                    let data = reader.read_narrow_string()?;
                    match String::from_utf8(data) {
                        Ok(s) => Value::String(s),
                        Err(e) => Value::Bytes(e.into_bytes()),
                    }
                }
                TypeTag::WIDE_STRING => {
                    let units = reader.read_wide_string()?;
                    Value::WideString(String::from_utf16_lossy(&units))
                }
                TypeTag::INT32 => Value::Int32(reader.read_i32()?),
                TypeTag::POINTER => Value::Pointer(reader.read_i32()?),
                TypeTag::COLOR => Value::Color(reader.read_i32()?),
                TypeTag::UINT64 => Value::UInt64(reader.read_u64()?),
                TypeTag::INT64 => Value::Int64(reader.read_i64()?),
                TypeTag::FLOAT32 => Value::Float32(reader.read_f32()?),
                _ => {
                    return Err(ErrorKind::UnknownTypeTag {
                        tag: tag.0,
                        offset: Some(offset),
                    }
                    .into())
                }
            };

            current.object.insert(key, value);
        }
    }

    fn read_key<R>(&self, reader: &mut ByteReader<R>) -> Result<String, Error>
    where
        R: Read + Seek,
    {
        match self.key_table {
            Some(table) => {
                let offset = reader.position();
                let index = reader.read_i32()?;
                table.resolve(index).map(String::from).ok_or_else(|| {
                    Error::from(ErrorKind::KeyIndexOutOfRange {
                        index,
                        len: table.len(),
                        offset,
                    })
                })
            }
            None => {
                let data = reader.read_narrow_string()?;
                match String::from_utf8(data) {
                    Ok(s) => Ok(s),
                    Err(e) => Ok(decode_text(e.as_bytes()).into_owned()),
                }
            }
        }
    }

    /// Bind a new object under the key in the parent. When merging duplicate
    /// keys, an object already bound to the key is re-entered instead so that
    /// the incoming entries are merged into it. Any other existing binding is
    /// kept and the incoming object is read but not bound.
    fn open_scope(&self, parent: &mut Object, key: String) -> Scope {
        if self.merge_duplicate_keys {
            if let Some(slot) = parent.position(&key) {
                if let Value::Object(existing) = parent.value_at_mut(slot) {
                    tracing::trace!(%key, "merging duplicate object");
                    return Scope {
                        object: std::mem::take(existing),
                        slot: Some(slot),
                    };
                }

                tracing::trace!(%key, "skipping object for key bound to a scalar");
                return Scope {
                    object: Object::new(),
                    slot: None,
                };
            }
        }

        let slot = parent.insert(key, Value::Null);
        Scope {
            object: Object::new(),
            slot: Some(slot),
        }
    }

    fn close_scope(&self, stack: &mut Vec<Scope>) {
        let Some(scope) = stack.pop() else {
            return;
        };

        if let (Some(slot), Some(parent)) = (scope.slot, stack.last_mut()) {
            *parent.object.value_at_mut(slot) = Value::Object(scope.object);
        }
    }
}

/// Builds a tweaked [DocumentDecoder]
///
/// ```rust
/// use appvdf::binary::{DocumentDecoder, KeyTable, Terminator};
///
/// let keys: KeyTable = vec!["appinfo"].into_iter().collect();
/// let decoder = DocumentDecoder::builder()
///     .key_table(&keys)
///     .merge_duplicate_keys(true)
///     .terminator(Terminator::Standard)
///     .build();
/// # let _ = decoder;
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentDecoderBuilder<'a> {
    key_table: Option<&'a KeyTable>,
    merge_duplicate_keys: bool,
    terminator: Terminator,
}

impl<'a> DocumentDecoderBuilder<'a> {
    /// Create a builder with the default options
    pub fn new() -> Self {
        DocumentDecoderBuilder::default()
    }

    /// Resolve keys through the key table instead of reading them inline
    pub fn key_table(mut self, table: &'a KeyTable) -> Self {
        self.key_table = Some(table);
        self
    }

    /// Set an optional key table
    pub fn key_table_opt(mut self, table: Option<&'a KeyTable>) -> Self {
        self.key_table = table;
        self
    }

    /// When an object key repeats within the same object, merge the entries
    /// of the second object into the first instead of replacing it
    pub fn merge_duplicate_keys(mut self, merge: bool) -> Self {
        self.merge_duplicate_keys = merge;
        self
    }

    /// Set which byte closes objects
    pub fn terminator(mut self, terminator: Terminator) -> Self {
        self.terminator = terminator;
        self
    }

    /// Create the decoder
    pub fn build(self) -> DocumentDecoder<'a> {
        DocumentDecoder {
            key_table: self.key_table,
            merge_duplicate_keys: self.merge_duplicate_keys,
            terminator: self.terminator,
        }
    }
}

/// Decode one binary document from the reader
///
/// ```rust
/// use appvdf::{binary::{decode_document, Terminator}, Value};
/// use std::io::Cursor;
///
/// let data = b"\x02a\x00\x01\x00\x00\x00\x08";
/// let value = decode_document(Cursor::new(&data[..]), None, false, Terminator::Standard)?;
/// assert_eq!(value.pointer(&["a"]), Some(&Value::Int32(1)));
/// # Ok::<(), appvdf::Error>(())
/// ```
pub fn decode_document<R>(
    reader: R,
    key_table: Option<&KeyTable>,
    merge_duplicate_keys: bool,
    terminator: Terminator,
) -> Result<Value, Error>
where
    R: Read + Seek,
{
    DocumentDecoder::builder()
        .key_table_opt(key_table)
        .merge_duplicate_keys(merge_duplicate_keys)
        .terminator(terminator)
        .build()
        .decode(reader)
}
