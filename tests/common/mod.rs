#![allow(dead_code)]

use appvdf::{Object, Value};

/// Writes binary key value documents and appinfo caches for tests
#[derive(Debug, Default)]
pub struct Encoder {
    /// When present, keys are written as indices into this table
    pub keys: Option<Vec<String>>,
}

impl Encoder {
    pub fn inline() -> Self {
        Encoder { keys: None }
    }

    pub fn with_key_table() -> Self {
        Encoder {
            keys: Some(Vec::new()),
        }
    }

    pub fn document(&mut self, object: &Object) -> Vec<u8> {
        let mut out = Vec::new();
        self.write_entries(&mut out, object);
        out.push(0x08);
        out
    }

    fn write_entries(&mut self, out: &mut Vec<u8>, object: &Object) {
        for (key, value) in object.iter() {
            let tag = match value {
                Value::Object(_) => 0x00,
                Value::String(_) | Value::Bytes(_) => 0x01,
                Value::Int32(_) => 0x02,
                Value::Float32(_) => 0x03,
                Value::Pointer(_) => 0x04,
                Value::WideString(_) => 0x05,
                Value::Color(_) => 0x06,
                Value::UInt64(_) => 0x07,
                Value::Int64(_) => 0x0a,
                Value::Null | Value::List(_) => panic!("not representable in binary"),
            };

            out.push(tag);
            self.write_key(out, key);
            match value {
                Value::Object(x) => {
                    self.write_entries(out, x);
                    out.push(0x08);
                }
                Value::String(x) => cstring(out, x.as_bytes()),
                Value::Bytes(x) => cstring(out, x),
                Value::WideString(x) => {
                    for unit in x.encode_utf16() {
                        out.extend_from_slice(&unit.to_le_bytes());
                    }
                    out.extend_from_slice(&[0, 0]);
                }
                Value::Int32(x) | Value::Pointer(x) | Value::Color(x) => {
                    out.extend_from_slice(&x.to_le_bytes())
                }
                Value::Float32(x) => out.extend_from_slice(&x.to_le_bytes()),
                Value::UInt64(x) => out.extend_from_slice(&x.to_le_bytes()),
                Value::Int64(x) => out.extend_from_slice(&x.to_le_bytes()),
                Value::Null | Value::List(_) => unreachable!(),
            }
        }
    }

    fn write_key(&mut self, out: &mut Vec<u8>, key: &str) {
        match &mut self.keys {
            Some(keys) => {
                let index = match keys.iter().position(|x| x == key) {
                    Some(x) => x,
                    None => {
                        keys.push(String::from(key));
                        keys.len() - 1
                    }
                };
                out.extend_from_slice(&(index as i32).to_le_bytes());
            }
            None => cstring(out, key.as_bytes()),
        }
    }
}

fn cstring(out: &mut Vec<u8>, data: &[u8]) {
    out.extend_from_slice(data);
    out.push(0);
}

/// Write an appinfo cache of the given version (0x27, 0x28, or 0x29)
pub fn appinfo_file(version: u8, records: &[(u32, Object)]) -> Vec<u8> {
    let mut encoder = if version >= 0x29 {
        Encoder::with_key_table()
    } else {
        Encoder::inline()
    };

    let mut out = vec![version, 0x44, 0x56, 0x07];
    out.extend_from_slice(&1u32.to_le_bytes());

    let table_offset_at = out.len();
    if version >= 0x29 {
        out.extend_from_slice(&0u64.to_le_bytes());
    }

    for (appid, data) in records {
        let document = encoder.document(data);
        let mut rest = Vec::new();
        rest.extend_from_slice(&2u32.to_le_bytes()); // info state
        rest.extend_from_slice(&1_700_000_000u32.to_le_bytes()); // last updated
        rest.extend_from_slice(&0u64.to_le_bytes()); // access token
        rest.extend_from_slice(&[0xaa; 20]); // sha1
        rest.extend_from_slice(&(appid * 100).to_le_bytes()); // change number
        if version >= 0x28 {
            rest.extend_from_slice(&[0xbb; 20]);
        }
        rest.extend_from_slice(&document);

        out.extend_from_slice(&appid.to_le_bytes());
        out.extend_from_slice(&(rest.len() as u32).to_le_bytes());
        out.extend_from_slice(&rest);
    }

    out.extend_from_slice(&0u32.to_le_bytes());

    if let Some(keys) = encoder.keys {
        let offset = out.len() as u64;
        out[table_offset_at..table_offset_at + 8].copy_from_slice(&offset.to_le_bytes());
        out.extend_from_slice(&(keys.len() as u32).to_le_bytes());
        for key in keys {
            cstring(&mut out, key.as_bytes());
        }
    }

    out
}

pub fn text(x: &str) -> Value {
    Value::String(String::from(x))
}

pub fn object(entries: Vec<(&str, Value)>) -> Object {
    entries.into_iter().collect()
}
