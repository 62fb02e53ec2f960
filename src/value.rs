use crate::encoding::Windows1252Encoding;
use std::borrow::Cow;
use std::fmt;

/// An owned dynamic value decoded from either the binary or text key value
/// format.
///
/// Every payload kind the binary format can encode has its own variant, so
/// consumers exhaustively match instead of guessing at runtime types.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absence of a value
    Null,

    /// A narrow string that is valid UTF-8
    String(String),

    /// A narrow string whose bytes are not valid UTF-8, kept verbatim
    Bytes(Vec<u8>),

    /// A UTF-16 string
    WideString(String),

    /// A signed 32 bit integer
    Int32(i32),

    /// A signed 64 bit integer
    Int64(i64),

    /// An unsigned 64 bit integer
    UInt64(u64),

    /// A 32 bit float
    Float32(f32),

    /// A 32 bit pointer value
    Pointer(i32),

    /// A 32 bit packed color
    Color(i32),

    /// A sequence of values. Only produced by the text parser when repeated
    /// keys are collected.
    List(Vec<Value>),

    /// A nested mapping of keys to values
    Object(Object),
}

impl Value {
    /// A short, human readable name of the variant for diagnostics
    ///
    /// ```
    /// use appvdf::Value;
    /// assert_eq!(Value::Int32(1).kind_name(), "int32");
    /// ```
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::String(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::WideString(_) => "wide string",
            Value::Int32(_) => "int32",
            Value::Int64(_) => "int64",
            Value::UInt64(_) => "uint64",
            Value::Float32(_) => "float32",
            Value::Pointer(_) => "pointer",
            Value::Color(_) => "color",
            Value::List(_) => "list",
            Value::Object(_) => "object",
        }
    }

    /// Returns the object if this value is one
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(x) => Some(x),
            _ => None,
        }
    }

    /// Returns textual data for the string variants. Non UTF-8 bytes are
    /// interpreted as windows1252.
    ///
    /// ```
    /// use appvdf::Value;
    /// assert_eq!(Value::String(String::from("a")).as_text().as_deref(), Some("a"));
    /// assert_eq!(Value::Bytes(vec![0xe9]).as_text().as_deref(), Some("é"));
    /// assert_eq!(Value::Int32(1).as_text(), None);
    /// ```
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Value::String(x) | Value::WideString(x) => Some(Cow::Borrowed(x.as_str())),
            Value::Bytes(x) => Some(Windows1252Encoding::decode(x)),
            _ => None,
        }
    }

    /// Follow a path of keys (matched exactly) through nested objects
    ///
    /// ```
    /// use appvdf::{Object, Value};
    /// let mut inner = Object::new();
    /// inner.insert("name", Value::String(String::from("Half-Life")));
    /// let mut root = Object::new();
    /// root.insert("common", Value::Object(inner));
    /// let root = Value::Object(root);
    ///
    /// assert_eq!(
    ///     root.pointer(&["common", "name"]),
    ///     Some(&Value::String(String::from("Half-Life")))
    /// );
    /// assert_eq!(root.pointer(&["common", "type"]), None);
    /// ```
    pub fn pointer(&self, path: &[&str]) -> Option<&Value> {
        path.iter()
            .try_fold(self, |value, key| value.as_object()?.get(key))
    }
}

impl From<Object> for Value {
    fn from(object: Object) -> Self {
        Value::Object(object)
    }
}

/// An insertion ordered mapping of keys to values.
///
/// Keys are unique: inserting an existing key replaces its value while the key
/// keeps its original position.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Object {
    entries: Vec<(String, Value)>,
}

impl Object {
    /// Creates an empty object
    pub fn new() -> Self {
        Object::default()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the object has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the position of the key
    pub fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }

    /// Look up the value of the key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value)
    }

    /// Look up the value of the key, ignoring ascii case. When multiple keys
    /// match, the last one is returned.
    ///
    /// ```
    /// use appvdf::{Object, Value};
    /// let mut obj = Object::new();
    /// obj.insert("LaunchOptions", Value::String(String::from("-novid")));
    /// assert!(obj.get_ignore_case("launchoptions").is_some());
    /// ```
    pub fn get_ignore_case(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, value)| value)
    }

    pub(crate) fn value_at_mut(&mut self, index: usize) -> &mut Value {
        &mut self.entries[index].1
    }

    /// Binds the value to the key and returns the key's position. An existing
    /// key has its value replaced in place.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> usize {
        let key = key.into();
        match self.position(&key) {
            Some(index) => {
                self.entries[index].1 = value;
                index
            }
            None => {
                self.entries.push((key, value));
                self.entries.len() - 1
            }
        }
    }

    /// Iterate through the entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate through the keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl<'a> IntoIterator for &'a Object {
    type Item = (&'a str, &'a Value);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a Value)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

impl IntoIterator for Object {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Object {
    fn from_iter<T: IntoIterator<Item = (K, Value)>>(iter: T) -> Self {
        let mut object = Object::new();
        for (key, value) in iter {
            object.insert(key, value);
        }
        object
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::String(x) | Value::WideString(x) => write!(f, "{:?}", x),
            Value::Bytes(x) => write!(f, "{:?}", Windows1252Encoding::decode(x)),
            Value::Int32(x) => write!(f, "{}", x),
            Value::Int64(x) => write!(f, "{}", x),
            Value::UInt64(x) => write!(f, "{}", x),
            Value::Float32(x) => write!(f, "{}", x),
            Value::Pointer(x) => write!(f, "ptr:{}", x),
            Value::Color(x) => write!(f, "color:0x{:08x}", x),
            Value::List(values) => {
                write!(f, "[")?;
                for (i, value) in values.iter().enumerate() {
                    if i != 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                write!(f, "]")
            }
            Value::Object(object) => {
                write!(f, "{{")?;
                for (i, (key, value)) in object.iter().enumerate() {
                    if i != 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:?}: {}", key, value)?;
                }
                write!(f, "}}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_insert_replaces_in_place() {
        let mut obj = Object::new();
        assert_eq!(obj.insert("a", Value::Int32(1)), 0);
        assert_eq!(obj.insert("b", Value::Int32(2)), 1);
        assert_eq!(obj.insert("a", Value::Int32(3)), 0);
        assert_eq!(obj.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(obj.get("a"), Some(&Value::Int32(3)));
    }

    #[test]
    fn object_get_ignore_case_takes_last() {
        let obj: Object = vec![("Name", Value::Int32(1)), ("NAME", Value::Int32(2))]
            .into_iter()
            .collect();
        assert_eq!(obj.get_ignore_case("name"), Some(&Value::Int32(2)));
        assert_eq!(obj.get("name"), None);
    }

    #[test]
    fn value_display() {
        let obj: Object = vec![
            ("a", Value::Int32(1)),
            ("b", Value::String(String::from("x"))),
            ("c", Value::Color(0xff)),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            Value::Object(obj).to_string(),
            r#"{"a": 1, "b": "x", "c": color:0x000000ff}"#
        );
    }
}
