use crate::binary::{ByteReader, KeyTable};
use crate::errors::{Error, ErrorKind};
use std::io::{Read, Seek};

/// The trailing bytes shared by every accepted magic value
const MAGIC_TAG: [u8; 3] = *b"DV\x07";

/// The generation of an appinfo cache, selected by the first magic byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AppInfoVersion {
    /// `'DV\x07`: records carry no data hash, keys are inline
    V27,

    /// `(DV\x07`: records carry a data hash, keys are inline
    V28,

    /// `)DV\x07`: records carry a data hash, keys are stored in a key table
    V29,
}

impl AppInfoVersion {
    /// Determine the version from the magic bytes
    ///
    /// ```
    /// use appvdf::appinfo::AppInfoVersion;
    /// assert_eq!(AppInfoVersion::from_magic(*b")DV\x07"), Some(AppInfoVersion::V29));
    /// assert_eq!(AppInfoVersion::from_magic(*b")DV\x08"), None);
    /// assert_eq!(AppInfoVersion::from_magic(*b"&DV\x07"), None);
    /// ```
    pub fn from_magic(magic: [u8; 4]) -> Option<Self> {
        if magic[1..] != MAGIC_TAG {
            return None;
        }

        match magic[0] {
            0x27 => Some(AppInfoVersion::V27),
            0x28 => Some(AppInfoVersion::V28),
            0x29 => Some(AppInfoVersion::V29),
            _ => None,
        }
    }

    /// Returns the magic bytes of this version
    pub fn magic(&self) -> [u8; 4] {
        let first = match self {
            AppInfoVersion::V27 => 0x27,
            AppInfoVersion::V28 => 0x28,
            AppInfoVersion::V29 => 0x29,
        };
        [first, MAGIC_TAG[0], MAGIC_TAG[1], MAGIC_TAG[2]]
    }

    /// Returns true if records carry the hash of their embedded document
    pub fn has_data_sha1(&self) -> bool {
        *self != AppInfoVersion::V27
    }

    /// Returns true if document keys are indices into a key table
    pub fn has_key_table(&self) -> bool {
        *self >= AppInfoVersion::V29
    }
}

/// The file level header of an appinfo cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppInfoHeader {
    version: AppInfoVersion,
    universe: u32,
    key_table: Option<KeyTable>,
}

impl AppInfoHeader {
    /// Parse the header from the start of the file. For versions with a key
    /// table, the table is read from the end of the file and the reader is
    /// restored to the first record.
    pub fn read<R>(reader: &mut ByteReader<R>) -> Result<Self, Error>
    where
        R: Read + Seek,
    {
        let magic = reader.read_array::<4>()?;
        let version = AppInfoVersion::from_magic(magic)
            .ok_or_else(|| Error::from(ErrorKind::InvalidMagic { magic }))?;
        let universe = reader.read_u32()?;

        let key_table = if version.has_key_table() {
            let table_offset = reader.read_u64()?;
            let records_start = reader.position();
            reader.seek_to(table_offset)?;
            let table = KeyTable::read_from(reader)?;
            reader.seek_to(records_start)?;
            tracing::debug!(table_offset, keys = table.len(), "read appinfo key table");
            Some(table)
        } else {
            None
        };

        Ok(AppInfoHeader {
            version,
            universe,
            key_table,
        })
    }

    /// Returns the version of the cache
    pub fn version(&self) -> AppInfoVersion {
        self.version
    }

    /// Returns the steam universe the cache was written for
    pub fn universe(&self) -> u32 {
        self.universe
    }

    /// Returns the key table, if this version has one
    pub fn key_table(&self) -> Option<&KeyTable> {
        self.key_table.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;
    use std::io::Cursor;

    #[rstest]
    #[case(*b"'DV\x07", AppInfoVersion::V27)]
    #[case(*b"(DV\x07", AppInfoVersion::V28)]
    #[case(*b")DV\x07", AppInfoVersion::V29)]
    fn test_magic_roundtrip(#[case] magic: [u8; 4], #[case] version: AppInfoVersion) {
        assert_eq!(AppInfoVersion::from_magic(magic), Some(version));
        assert_eq!(version.magic(), magic);
    }

    #[rstest]
    #[case(*b"VDF\x07")]
    #[case(*b"*DV\x07")]
    #[case(*b"'DV\x06")]
    #[case([0, 0, 0, 0])]
    fn test_invalid_magic(#[case] magic: [u8; 4]) {
        let mut data = magic.to_vec();
        data.extend_from_slice(&[1, 0, 0, 0]);
        let mut reader = ByteReader::new(Cursor::new(data)).unwrap();
        let err = AppInfoHeader::read(&mut reader).unwrap_err();
        match err.kind() {
            ErrorKind::InvalidMagic { magic: found } => assert_eq!(*found, magic),
            x => panic!("unexpected error: {:?}", x),
        }
    }

    #[test]
    fn test_header_with_key_table() {
        let mut data = b")DV\x07\x01\x00\x00\x00".to_vec();
        data.extend_from_slice(&20u64.to_le_bytes());
        data.extend_from_slice(&[0, 0, 0, 0]);
        data.extend_from_slice(b"\x01\x00\x00\x00appid\x00");

        let mut reader = ByteReader::new(Cursor::new(data)).unwrap();
        let header = AppInfoHeader::read(&mut reader).unwrap();
        assert_eq!(header.version(), AppInfoVersion::V29);
        assert_eq!(header.universe(), 1);
        assert_eq!(header.key_table().and_then(|x| x.resolve(0)), Some("appid"));
        assert_eq!(reader.position(), 16);
    }
}
