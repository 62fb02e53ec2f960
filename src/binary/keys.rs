use super::ByteReader;
use crate::encoding::decode_text;
use crate::errors::Error;
use std::io::{Read, Seek};

/// Externalized pool of key names referenced by index from binary documents
///
/// Newer appinfo caches store each distinct key once at the end of the file
/// and encode keys inside documents as a 32 bit index into this table.
///
/// ```
/// use appvdf::binary::KeyTable;
///
/// let table: KeyTable = vec!["appinfo", "common", "name"].into_iter().collect();
/// assert_eq!(table.resolve(1), Some("common"));
/// assert_eq!(table.resolve(3), None);
/// assert_eq!(table.resolve(-1), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyTable {
    keys: Vec<String>,
}

impl KeyTable {
    /// Create a key table from the given keys
    pub fn new(keys: Vec<String>) -> Self {
        KeyTable { keys }
    }

    /// Return the key at the zero based index if found
    #[inline]
    pub fn resolve(&self, index: i32) -> Option<&str> {
        usize::try_from(index)
            .ok()
            .and_then(|x| self.keys.get(x))
            .map(|x| x.as_str())
    }

    /// Number of keys in the table
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if there are no keys
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Reads a 32 bit count followed by that many null terminated strings
    /// from the current position
    pub fn read_from<R>(reader: &mut ByteReader<R>) -> Result<Self, Error>
    where
        R: Read + Seek,
    {
        let count = reader.read_u32()?;
        let mut keys = Vec::new();
        for _ in 0..count {
            let data = reader.read_narrow_string()?;
            keys.push(decode_text(&data).into_owned());
        }

        Ok(KeyTable { keys })
    }
}

impl<S: Into<String>> FromIterator<S> for KeyTable {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        KeyTable::new(iter.into_iter().map(Into::into).collect())
    }
}
