//! Converting decoded documents and records to JSON
//!
//! ```
//! use appvdf::{Object, Value, json::JsonOptions};
//!
//! let mut object = Object::new();
//! object.insert("name", Value::String(String::from("Portal")));
//! object.insert("appid", Value::Int32(400));
//! let value = Value::Object(object);
//!
//! assert_eq!(value.json().to_string(), r#"{"name":"Portal","appid":400}"#);
//!
//! let pretty = value.json().with_options(JsonOptions::new().with_prettyprint(true));
//! assert!(pretty.to_string().contains('\n'));
//! ```
//!
//! Objects keep their insertion order. Narrow strings that are not UTF-8 are
//! written as Windows-1252 decoded text.

use crate::appinfo::AppRecord;
use crate::appinfo::hex;
use crate::encoding::Windows1252Encoding;
use crate::value::{Object, Value};
use serde::{
    ser::{SerializeMap, SerializeSeq, SerializeStruct},
    Serialize, Serializer,
};

/// Customizes the JSON output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JsonOptions {
    /// Controls if the JSON should be pretty printed
    pretty: bool,
}

impl JsonOptions {
    /// Creates the structure with default options
    pub fn new() -> Self {
        JsonOptions::default()
    }

    /// Sets if the JSON should be pretty printed or minified
    pub fn with_prettyprint(mut self, pretty: bool) -> JsonOptions {
        self.pretty = pretty;
        self
    }
}

fn writer_json<W, S>(writer: W, pretty: bool, ser: S) -> Result<(), std::io::Error>
where
    W: std::io::Write,
    S: Serialize,
{
    let result = if pretty {
        serde_json::to_writer_pretty(writer, &ser)
    } else {
        serde_json::to_writer(writer, &ser)
    };

    result.map_err(|e| e.into())
}

/// Creates JSON from anything that serializes (values, objects, and records)
#[derive(Debug)]
pub struct JsonBuilder<'a, T> {
    inner: &'a T,
    options: JsonOptions,
}

impl<'a, T> JsonBuilder<'a, T>
where
    T: Serialize,
{
    /// Output JSON with the set of options
    pub fn with_options(mut self, options: JsonOptions) -> Self {
        self.options = options;
        self
    }

    /// Output JSON to the given writer
    pub fn to_writer<W>(&self, writer: W) -> Result<(), std::io::Error>
    where
        W: std::io::Write,
    {
        writer_json(writer, self.options.pretty, self.inner)
    }

    /// Output JSON to vec that contains UTF-8 data
    pub fn to_vec(&self) -> Vec<u8> {
        // Every key is a string and writing to a vec can't fail, so there is
        // no error to surface
        let mut out = Vec::new();
        let _ = self.to_writer(&mut out);
        out
    }

    /// Output JSON to a string
    #[allow(clippy::inherent_to_string)]
    pub fn to_string(&self) -> String {
        String::from_utf8(self.to_vec()).unwrap_or_default()
    }
}

impl Value {
    /// Converts the value to its JSON representation
    pub fn json(&self) -> JsonBuilder<'_, Value> {
        JsonBuilder {
            inner: self,
            options: JsonOptions::default(),
        }
    }
}

impl Object {
    /// Converts the object to its JSON representation
    pub fn json(&self) -> JsonBuilder<'_, Object> {
        JsonBuilder {
            inner: self,
            options: JsonOptions::default(),
        }
    }
}

impl AppRecord {
    /// Converts the record, header fields included, to its JSON representation
    pub fn json(&self) -> JsonBuilder<'_, AppRecord> {
        JsonBuilder {
            inner: self,
            options: JsonOptions::default(),
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::String(x) | Value::WideString(x) => serializer.serialize_str(x),
            Value::Bytes(x) => serializer.serialize_str(&Windows1252Encoding::decode(x)),
            Value::Int32(x) | Value::Pointer(x) | Value::Color(x) => serializer.serialize_i32(*x),
            Value::Int64(x) => serializer.serialize_i64(*x),
            Value::UInt64(x) => serializer.serialize_u64(*x),
            Value::Float32(x) => serializer.serialize_f32(*x),
            Value::List(values) => {
                let mut seq = serializer.serialize_seq(Some(values.len()))?;
                for value in values {
                    seq.serialize_element(value)?;
                }
                seq.end()
            }
            Value::Object(object) => object.serialize(serializer),
        }
    }
}

impl Serialize for Object {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl Serialize for AppRecord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut record = serializer.serialize_struct("AppRecord", 9)?;
        record.serialize_field("appid", &self.appid)?;
        record.serialize_field("size", &self.size)?;
        record.serialize_field("info_state", &self.info_state)?;
        record.serialize_field("last_updated", &self.last_updated)?;
        record.serialize_field("access_token", &self.access_token)?;
        record.serialize_field("sha1", &hex(&self.sha1))?;
        record.serialize_field("change_number", &self.change_number)?;
        record.serialize_field("data_sha1", &self.data_sha1.as_ref().map(|x| hex(x)))?;
        record.serialize_field("data", &self.data)?;
        record.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalars() {
        let object: Object = vec![
            ("s", Value::String(String::from("a\"b"))),
            ("w", Value::WideString(String::from("ä"))),
            ("b", Value::Bytes(b"\xe9".to_vec())),
            ("i", Value::Int32(-1)),
            ("l", Value::Int64(1 << 40)),
            ("u", Value::UInt64(u64::MAX)),
            ("f", Value::Float32(0.5)),
            ("p", Value::Pointer(3)),
            ("c", Value::Color(255)),
            ("n", Value::Null),
        ]
        .into_iter()
        .collect();

        let expected = r#"{"s":"a\"b","w":"ä","b":"é","i":-1,"l":1099511627776,"u":18446744073709551615,"f":0.5,"p":3,"c":255,"n":null}"#;
        assert_eq!(object.json().to_string(), expected);
    }

    #[test]
    fn test_nested_order() {
        let inner: Object = vec![("z", Value::Int32(1)), ("a", Value::Int32(2))]
            .into_iter()
            .collect();
        let value = Value::Object(
            vec![
                ("list", Value::List(vec![Value::Int32(1), Value::Object(inner)])),
                ("empty", Value::Object(Object::new())),
            ]
            .into_iter()
            .collect(),
        );

        assert_eq!(
            value.json().to_string(),
            r#"{"list":[1,{"z":1,"a":2}],"empty":{}}"#
        );
    }

    #[test]
    fn test_record() {
        let record = AppRecord {
            appid: 10,
            size: 1,
            info_state: 2,
            last_updated: 3,
            access_token: 4,
            sha1: [0; 20],
            change_number: 5,
            data_sha1: None,
            data: Object::new(),
        };

        let expected = format!(
            r#"{{"appid":10,"size":1,"info_state":2,"last_updated":3,"access_token":4,"sha1":"{}","change_number":5,"data_sha1":null,"data":{{}}}}"#,
            "0".repeat(40)
        );
        assert_eq!(record.json().to_string(), expected);
    }
}
