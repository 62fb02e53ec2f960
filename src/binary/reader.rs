use crate::errors::{Error, ErrorKind};
use std::io::{self, Read, Seek, SeekFrom};

/// Size of the lookahead window used when searching for string terminators
const CHUNK_LEN: usize = 64;

/// Which string terminator to search for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StringWidth {
    /// single zero byte
    Narrow,

    /// two consecutive zero bytes, with the end rounded up to an even offset
    Wide,
}

/// A little endian reader over a seekable byte source that keeps track of the
/// byte position for error reporting.
///
/// ```rust
/// use appvdf::binary::ByteReader;
/// use std::io::Cursor;
///
/// let mut reader = ByteReader::new(Cursor::new(b"\x01\x00\x00\x00foo\x00")).unwrap();
/// assert_eq!(reader.read_u32().unwrap(), 1);
/// assert_eq!(reader.read_narrow_string().unwrap(), b"foo");
/// assert_eq!(reader.position(), 8);
/// ```
#[derive(Debug)]
pub struct ByteReader<R> {
    reader: R,
    position: u64,
}

impl<R> ByteReader<R>
where
    R: Read + Seek,
{
    /// Wrap a byte source, starting at its current position
    pub fn new(mut reader: R) -> Result<Self, Error> {
        let position = reader.stream_position()?;
        Ok(ByteReader { reader, position })
    }

    /// Returns the byte position of the data stream that has been processed
    #[inline]
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Consume self and return the underlying byte source
    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Jump to an absolute position
    pub fn seek_to(&mut self, position: u64) -> Result<(), Error> {
        self.position = self.reader.seek(SeekFrom::Start(position))?;
        Ok(())
    }

    /// Read a single byte, returning none when the data has been exhausted
    pub fn read_u8(&mut self) -> Result<Option<u8>, Error> {
        let mut buf = [0u8; 1];
        loop {
            match self.reader.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => {
                    self.position += 1;
                    return Ok(Some(buf[0]));
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Read exactly `N` bytes
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], Error> {
        let mut buf = [0u8; N];
        match self.reader.read_exact(&mut buf) {
            Ok(()) => {
                self.position += N as u64;
                Ok(buf)
            }
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Err(Error::eof(self.position)),
            Err(e) => Err(e.into()),
        }
    }

    #[inline]
    pub fn read_i32(&mut self) -> Result<i32, Error> {
        self.read_array().map(i32::from_le_bytes)
    }

    #[inline]
    pub fn read_u32(&mut self) -> Result<u32, Error> {
        self.read_array().map(u32::from_le_bytes)
    }

    #[inline]
    pub fn read_i64(&mut self) -> Result<i64, Error> {
        self.read_array().map(i64::from_le_bytes)
    }

    #[inline]
    pub fn read_u64(&mut self) -> Result<u64, Error> {
        self.read_array().map(u64::from_le_bytes)
    }

    #[inline]
    pub fn read_f32(&mut self) -> Result<f32, Error> {
        self.read_array().map(f32::from_le_bytes)
    }

    /// Read the bytes of a null terminated string. The terminator is consumed
    /// but not returned.
    pub fn read_narrow_string(&mut self) -> Result<Vec<u8>, Error> {
        self.read_terminated(StringWidth::Narrow)
    }

    /// Read the little endian UTF-16 code units of a string terminated by two
    /// consecutive zero bytes. When the pair starts on an odd offset, the
    /// string ends at the next even offset and the two bytes after it are
    /// consumed as the terminator.
    ///
    /// ```rust
    /// use appvdf::binary::ByteReader;
    /// use std::io::Cursor;
    ///
    /// let mut reader = ByteReader::new(Cursor::new(b"A\x00B\x00\x00\x00")).unwrap();
    /// assert_eq!(reader.read_wide_string().unwrap(), vec![0x41, 0x42]);
    /// assert_eq!(reader.position(), 6);
    /// ```
    pub fn read_wide_string(&mut self) -> Result<Vec<u16>, Error> {
        let data = self.read_terminated(StringWidth::Wide)?;
        let units = data
            .chunks_exact(2)
            .map(|x| u16::from_le_bytes([x[0], x[1]]))
            .collect();
        Ok(units)
    }

    /// Reads ahead in fixed size chunks until the terminator is found, then
    /// rewinds the source so that it sits directly after the terminator.
    pub(crate) fn read_terminated(&mut self, width: StringWidth) -> Result<Vec<u8>, Error> {
        let start = self.position;
        let mut buf = Vec::new();
        let mut chunk = [0u8; CHUNK_LEN];
        let mut found = None;
        let end = loop {
            // A rounded wide terminator may extend past what has been read
            if let Some(end) = found {
                if end + width.terminator_len() <= buf.len() {
                    break end;
                }
            }

            let read = match self.reader.read(&mut chunk) {
                Ok(0) => return Err(ErrorKind::UnterminatedString { offset: start }.into()),
                Ok(read) => read,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };

            let searched = buf.len();
            buf.extend_from_slice(&chunk[..read]);
            if found.is_none() {
                found = find_terminator(&buf, searched, width);
            }
        };

        let consumed = end + width.terminator_len();
        let overread = buf.len() - consumed;
        if overread != 0 {
            self.reader.seek(SeekFrom::Current(-(overread as i64)))?;
        }

        self.position = start + consumed as u64;
        buf.truncate(end);
        Ok(buf)
    }
}

impl StringWidth {
    #[inline]
    fn terminator_len(self) -> usize {
        match self {
            StringWidth::Narrow => 1,
            StringWidth::Wide => 2,
        }
    }
}

/// Search for the terminator in the data, skipping what was already searched.
/// Returns where the string data ends: for wide strings this is the first
/// zero byte pair rounded up to an even offset.
#[inline]
fn find_terminator(data: &[u8], searched: usize, width: StringWidth) -> Option<usize> {
    match width {
        StringWidth::Narrow => data[searched..]
            .iter()
            .position(|&x| x == 0)
            .map(|x| x + searched),
        StringWidth::Wide => {
            let from = searched.saturating_sub(1);
            data[from..]
                .windows(2)
                .position(|x| x == [0, 0])
                .map(|x| {
                    let end = from + x;
                    end + (end & 1)
                })
        }
    }
}
