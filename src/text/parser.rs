use super::lexer::{Lexer, Token};
use crate::encoding::decode_text;
use crate::errors::{Error, ErrorKind};
use crate::value::{Object, Value};
use std::borrow::Cow;

/// How a key that repeats within the same object is bound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateKeyMode {
    /// The last value replaces earlier ones (the key keeps its first position)
    Overwrite,

    /// Repeated objects merge their entries together while repeated scalars
    /// overwrite
    #[default]
    Merge,

    /// Every value is kept: a repeated key is bound to a list of its values
    Collect,
}

/// Options for parsing KeyValues text
#[derive(Debug, Clone, Copy, Default)]
pub struct TextOptions {
    duplicate_keys: DuplicateKeyMode,
}

impl TextOptions {
    /// Options with the default duplicate key handling
    pub fn new() -> Self {
        TextOptions::default()
    }

    /// Set how repeated keys are handled
    pub fn duplicate_keys(mut self, mode: DuplicateKeyMode) -> Self {
        self.duplicate_keys = mode;
        self
    }

    /// Parse the data with these options
    pub fn parse(self, data: &[u8]) -> Result<Value, Error> {
        parse_with(data, self)
    }
}

/// Parse KeyValues text into an object with default options
///
/// ```
/// use appvdf::{text, Value};
/// let data = br#"
/// "AppState"
/// {
///     "appid"     "440"
///     "name"      "Team Fortress 2"
/// }
/// "#;
///
/// let value = text::parse(&data[..])?;
/// let name = value.pointer(&["AppState", "name"]);
/// assert_eq!(name, Some(&Value::String(String::from("Team Fortress 2"))));
/// # Ok::<(), appvdf::Error>(())
/// ```
pub fn parse(data: &[u8]) -> Result<Value, Error> {
    parse_with(data, TextOptions::default())
}

/// Parse KeyValues text into an object
pub fn parse_with(data: &[u8], options: TextOptions) -> Result<Value, Error> {
    let mut lexer = Lexer::new(data);

    // Objects whose closing brace has not been seen yet. The root object is
    // at the bottom and never has a key.
    let mut stack: Vec<(String, Object)> = Vec::new();
    let mut root = Object::new();

    while let Some((token, offset)) = lexer.next_token()? {
        let key = match token {
            Token::Close => {
                let Some((key, object)) = stack.pop() else {
                    return Err(text_error("unexpected close brace", offset));
                };
                let parent = stack.last_mut().map_or(&mut root, |(_, x)| x);
                bind(parent, key, Value::Object(object), options.duplicate_keys);
                continue;
            }
            Token::Open => return Err(text_error("expected key, found open brace", offset)),
            Token::Quoted(x) => decode_text(&x).into_owned(),
            Token::Unquoted(x) => decode_text(x).into_owned(),
        };

        match lexer.next_token()? {
            Some((Token::Open, _)) => stack.push((key, Object::new())),
            Some((Token::Close, offset)) => {
                return Err(text_error("expected value, found close brace", offset))
            }
            Some((token, _)) => {
                let value = token.into_scalar().map(scalar).unwrap_or(Value::Null);
                let parent = stack.last_mut().map_or(&mut root, |(_, x)| x);
                bind(parent, key, value, options.duplicate_keys);
            }
            None => return Err(text_error("expected value, found end of input", lexer.position())),
        }
    }

    if !stack.is_empty() {
        return Err(Error::eof(lexer.position() as u64));
    }

    Ok(Value::Object(root))
}

fn text_error(msg: &'static str, offset: usize) -> Error {
    Error::new(ErrorKind::Text { msg, offset })
}

fn scalar(data: Cow<[u8]>) -> Value {
    match String::from_utf8(data.into_owned()) {
        Ok(x) => Value::String(x),
        Err(e) => Value::Bytes(e.into_bytes()),
    }
}

fn bind(object: &mut Object, key: String, value: Value, mode: DuplicateKeyMode) {
    let Some(index) = object.position(&key) else {
        object.insert(key, value);
        return;
    };

    let existing = object.value_at_mut(index);
    match (mode, existing, value) {
        (DuplicateKeyMode::Merge, Value::Object(existing), Value::Object(value)) => {
            for (key, value) in value {
                bind(existing, key, value, mode);
            }
        }
        (DuplicateKeyMode::Collect, Value::List(values), value) => values.push(value),
        (DuplicateKeyMode::Collect, existing, value) => {
            let first = std::mem::replace(existing, Value::Null);
            *existing = Value::List(vec![first, value]);
        }
        (_, existing, value) => *existing = value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    fn text(x: &str) -> Value {
        Value::String(String::from(x))
    }

    fn object(entries: Vec<(&str, Value)>) -> Value {
        Value::Object(entries.into_iter().collect())
    }

    #[test]
    fn test_nested_objects() {
        let data = br#"
            "libraryfolders"
            {
                "0"
                {
                    "path"  "C:\\Program Files (x86)\\Steam"
                    "apps"
                    {
                        "228980"    "123"
                    }
                }
            }
        "#;

        let expected = object(vec![(
            "libraryfolders",
            object(vec![(
                "0",
                object(vec![
                    ("path", text("C:\\Program Files (x86)\\Steam")),
                    ("apps", object(vec![("228980", text("123"))])),
                ]),
            )]),
        )]);

        assert_eq!(parse(&data[..]).unwrap(), expected);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse(b"").unwrap(), Value::Object(Object::new()));
        assert_eq!(parse(b"  // nothing\n").unwrap(), Value::Object(Object::new()));
    }

    #[test]
    fn test_invalid_utf8_value() {
        let value = parse(b"\"name\" \"Pok\xe9mon\"").unwrap();
        assert_eq!(
            value.pointer(&["name"]),
            Some(&Value::Bytes(b"Pok\xe9mon".to_vec()))
        );
    }

    #[test]
    fn test_invalid_utf8_key() {
        let value = parse(b"\"Pok\xe9mon\" \"1\"").unwrap();
        assert_eq!(value.pointer(&["Pokémon"]), Some(&text("1")));
    }

    #[test]
    fn test_merge_duplicates() {
        let data = b"a { x 1 y 2 } a { y 3 z 4 } b 1 b 2";
        let expected = object(vec![
            (
                "a",
                object(vec![("x", text("1")), ("y", text("3")), ("z", text("4"))]),
            ),
            ("b", text("2")),
        ]);
        assert_eq!(parse(data).unwrap(), expected);
    }

    #[test]
    fn test_overwrite_duplicates() {
        let data = b"a { x 1 } b 1 a { y 2 }";
        let value = TextOptions::new()
            .duplicate_keys(DuplicateKeyMode::Overwrite)
            .parse(data)
            .unwrap();
        let expected = object(vec![
            ("a", object(vec![("y", text("2"))])),
            ("b", text("1")),
        ]);
        assert_eq!(value, expected);
    }

    #[test]
    fn test_collect_duplicates() {
        let data = b"k 1 k 2 k { a b } j 0";
        let value = TextOptions::new()
            .duplicate_keys(DuplicateKeyMode::Collect)
            .parse(data)
            .unwrap();
        let expected = object(vec![
            (
                "k",
                Value::List(vec![text("1"), text("2"), object(vec![("a", text("b"))])]),
            ),
            ("j", text("0")),
        ]);
        assert_eq!(value, expected);
    }

    #[rstest]
    #[case(b"a }", 2)]
    #[case(b"}", 0)]
    #[case(b"{", 0)]
    #[case(b"a", 1)]
    #[case(b"a { b }", 6)]
    fn test_text_errors(#[case] data: &[u8], #[case] offset: usize) {
        let err = parse(data).unwrap_err();
        match err.kind() {
            ErrorKind::Text { offset: actual, .. } => assert_eq!(*actual, offset),
            x => panic!("unexpected error: {:?}", x),
        }
    }

    #[test]
    fn test_unclosed_object() {
        let err = parse(b"a { b c").unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Eof { offset: 7 }));
    }

    #[test]
    fn test_unterminated_value() {
        let err = parse(b"a \"bc").unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::UnterminatedString { offset: 2 }
        ));
    }
}
