use crate::value::{Object, Value};

/// One application entry of an appinfo cache
#[derive(Debug, Clone, PartialEq)]
pub struct AppRecord {
    /// The application id. Never zero, as zero marks the end of the records.
    pub appid: u32,

    /// Byte length of the record after this field
    pub size: u32,

    pub info_state: u32,

    /// Unix timestamp of the last change
    pub last_updated: u32,

    pub access_token: u64,

    /// SHA-1 of the text representation of the document
    pub sha1: [u8; 20],

    pub change_number: u32,

    /// SHA-1 of the binary document. Absent in the earliest version.
    pub data_sha1: Option<[u8; 20]>,

    /// The embedded document
    pub data: Object,
}

impl AppRecord {
    /// Returns the embedded document as a value, ready for projection
    pub fn to_value(&self) -> Value {
        Value::Object(self.data.clone())
    }

    /// Consume the record and return the embedded document as a value
    pub fn into_value(self) -> Value {
        Value::Object(self.data)
    }

    /// Format the document hash as lowercase hexadecimal
    ///
    /// ```
    /// use appvdf::appinfo::AppRecord;
    /// use appvdf::Object;
    ///
    /// let mut sha1 = [0u8; 20];
    /// sha1[0] = 0xab;
    /// let record = AppRecord {
    ///     appid: 10, size: 0, info_state: 2, last_updated: 0, access_token: 0,
    ///     sha1, change_number: 0, data_sha1: None, data: Object::new(),
    /// };
    /// assert!(record.sha1_hex().starts_with("ab00"));
    /// assert_eq!(record.sha1_hex().len(), 40);
    /// ```
    pub fn sha1_hex(&self) -> String {
        hex(&self.sha1)
    }
}

pub(crate) fn hex(data: &[u8]) -> String {
    use std::fmt::Write;
    data.iter().fold(String::with_capacity(data.len() * 2), |mut acc, x| {
        let _ = write!(acc, "{:02x}", x);
        acc
    })
}
