use super::{AppInfoHeader, AppRecord};
use crate::binary::{ByteReader, DocumentDecoder, Terminator};
use crate::errors::{Error, ErrorKind};
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

/// Reads application records from an appinfo cache
///
/// The header (and key table, when present) is parsed on construction.
/// Records are then read sequentially. Every record's embedded document is
/// fully decoded, even when the caller is only searching for a specific
/// application.
///
/// ```rust
/// use appvdf::appinfo::AppInfoReader;
/// use std::io::Cursor;
///
/// let mut data = b"(DV\x07\x01\x00\x00\x00".to_vec();
/// data.extend_from_slice(&7u32.to_le_bytes()); // appid
/// data.extend_from_slice(&[0u8; 4 * 3 + 8 + 20 + 4 + 20]); // record header
/// data.extend_from_slice(b"\x02a\x00\x05\x00\x00\x00\x08"); // document
/// data.extend_from_slice(&0u32.to_le_bytes()); // end of records
///
/// let mut reader = AppInfoReader::new(Cursor::new(data))?;
/// let record = reader.find(7)?.expect("record to exist");
/// assert_eq!(record.appid, 7);
/// assert!(reader.find(8)?.is_none());
/// # Ok::<(), appvdf::Error>(())
/// ```
#[derive(Debug)]
pub struct AppInfoReader<R> {
    reader: ByteReader<R>,
    header: AppInfoHeader,
    finished: bool,
}

impl AppInfoReader<BufReader<File>> {
    /// Open the appinfo cache at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let file = File::open(path)?;
        AppInfoReader::new(BufReader::new(file))
    }
}

impl<R> AppInfoReader<R>
where
    R: Read + Seek,
{
    /// Parse the header from the current position of the reader
    pub fn new(reader: R) -> Result<Self, Error> {
        let mut reader = ByteReader::new(reader)?;
        let header = AppInfoHeader::read(&mut reader)?;
        tracing::debug!(
            version = ?header.version(),
            universe = header.universe(),
            "parsed appinfo header"
        );

        Ok(AppInfoReader {
            reader,
            header,
            finished: false,
        })
    }

    /// Returns the file header
    pub fn header(&self) -> &AppInfoHeader {
        &self.header
    }

    /// Read the next record, returning none once the end of the records is
    /// reached. An error while decoding a record is fatal: no further records
    /// are returned.
    pub fn next_record(&mut self) -> Result<Option<AppRecord>, Error> {
        if self.finished {
            return Ok(None);
        }

        let result = self.read_record();
        if !matches!(result, Ok(Some(_))) {
            self.finished = true;
        }

        result
    }

    /// Scan for the record of the given application. Records before it are
    /// decoded and discarded and the scan stops on a match.
    pub fn find(&mut self, appid: u32) -> Result<Option<AppRecord>, Error> {
        while let Some(record) = self.next_record()? {
            if record.appid == appid {
                return Ok(Some(record));
            }

            tracing::trace!(appid = record.appid, target = appid, "passed over record");
        }

        Ok(None)
    }

    /// Iterate through the remaining records
    pub fn records(&mut self) -> Records<'_, R> {
        Records { reader: self }
    }

    fn read_record(&mut self) -> Result<Option<AppRecord>, Error> {
        let appid = match self.reader.read_u32() {
            Ok(0) => return Ok(None),
            Ok(x) => x,
            Err(e) if matches!(e.kind(), ErrorKind::Eof { .. }) => return Ok(None),
            Err(e) => return Err(e),
        };

        let size = self.reader.read_u32()?;
        let info_state = self.reader.read_u32()?;
        let last_updated = self.reader.read_u32()?;
        let access_token = self.reader.read_u64()?;
        let sha1 = self.reader.read_array::<20>()?;
        let change_number = self.reader.read_u32()?;
        let data_sha1 = if self.header.version().has_data_sha1() {
            Some(self.reader.read_array::<20>()?)
        } else {
            None
        };

        let data = DocumentDecoder::builder()
            .key_table_opt(self.header.key_table())
            .merge_duplicate_keys(true)
            .terminator(Terminator::Standard)
            .build()
            .decode_object(&mut self.reader)?;

        tracing::trace!(appid, size, change_number, "decoded appinfo record");

        Ok(Some(AppRecord {
            appid,
            size,
            info_state,
            last_updated,
            access_token,
            sha1,
            change_number,
            data_sha1,
            data,
        }))
    }
}

/// An iterator over the records of an appinfo cache. Yields at most one error.
#[derive(Debug)]
pub struct Records<'a, R> {
    reader: &'a mut AppInfoReader<R>,
}

impl<'a, R> Iterator for Records<'a, R>
where
    R: Read + Seek,
{
    type Item = Result<AppRecord, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.next_record().transpose()
    }
}

/// Scan the appinfo cache for the record of the given application
///
/// Returns `Ok(None)` if the end of the records is reached without a match.
pub fn scan_for_record<R>(reader: R, appid: u32) -> Result<Option<AppRecord>, Error>
where
    R: Read + Seek,
{
    AppInfoReader::new(reader)?.find(appid)
}
