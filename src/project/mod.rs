//! Projecting dynamic [Value] trees onto statically declared structures
//!
//! A target structure derives [VdfShape](crate::VdfShape), which generates a
//! [Shape] implementation with one binding per field. Source keys match field
//! names ignoring ascii case and underscores, so `launch_options` matches a
//! `LaunchOptions` key.
//!
//! ```rust
//! # #[cfg(feature = "derive")] {
//! use appvdf::{project, Object, Value, VdfShape};
//!
//! #[derive(VdfShape, Debug, Default, PartialEq)]
//! struct Counter {
//!     name: String,
//!     count: i32,
//! }
//!
//! let source: Object = vec![
//!     ("Name", Value::String(String::from("x"))),
//!     ("COUNT", Value::String(String::from("5"))),
//! ]
//! .into_iter()
//! .collect();
//!
//! let projection = project::<Counter>(&Value::Object(source)).unwrap();
//! assert_eq!(projection.value, Counter { name: String::from("x"), count: 5 });
//! assert!(projection.diagnostics.is_empty());
//! # }
//! ```
//!
//! Projection is lenient: a value that can't be converted to its field's type
//! is skipped, the field keeps its default, and a [Diagnostic] is recorded.
//! The only fatal error is a top level value that isn't an object.

mod impls;

pub use self::impls::MapKey;

use crate::errors::{Error, ErrorKind};
use crate::value::{Object, Value};
use std::fmt;

/// Conversion from a dynamic value into a typed value
pub trait FromValue: Sized {
    /// Convert the value. When the value can't be converted, a diagnostic is
    /// reported to the projector and none is returned.
    fn from_value(value: &Value, projector: &mut Projector) -> Option<Self>;
}

/// A structure that is populated field by field from an object
///
/// Usually implemented with `#[derive(VdfShape)]`.
pub trait Shape: Sized {
    /// Build the structure from the entries of the object. Fields without a
    /// matching entry keep their default value.
    fn from_object(object: &Object, projector: &mut Projector) -> Self;
}

/// The result of a successful projection
#[derive(Debug, Clone, PartialEq)]
pub struct Projection<T> {
    /// The populated structure
    pub value: T,

    /// Everything that was skipped along the way
    pub diagnostics: Vec<Diagnostic>,
}

/// A value that was skipped during projection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Dotted path of source keys leading to the value
    pub path: String,

    /// Why the value was skipped
    pub kind: DiagnosticKind,
}

/// The reason a value was skipped during projection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// Text could not be parsed as the target integer type
    IntegerParse { text: String, target: &'static str },

    /// An integer does not fit in the target integer type
    IntegerOverflow { value: String, target: &'static str },

    /// Text could not be parsed as the target type
    InvalidText { text: String, target: &'static str },

    /// A map key could not be converted to the map's key type
    InvalidMapKey { key: String, target: &'static str },

    /// The source value's type can't be converted to the target type
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() {
            "(root)"
        } else {
            self.path.as_str()
        };

        match &self.kind {
            DiagnosticKind::IntegerParse { text, target } => write!(
                f,
                "{}: cannot convert string {:?} to {}",
                path, text, target
            ),
            DiagnosticKind::IntegerOverflow { value, target } => {
                write!(f, "{}: {} does not fit in {}", path, value, target)
            }
            DiagnosticKind::InvalidText { text, target } => {
                write!(f, "{}: cannot convert {:?} to {}", path, text, target)
            }
            DiagnosticKind::InvalidMapKey { key, target } => write!(
                f,
                "{}: cannot convert map key {:?} to {}",
                path, key, target
            ),
            DiagnosticKind::TypeMismatch { expected, found } => {
                write!(f, "{}: cannot convert {} to {}", path, found, expected)
            }
        }
    }
}

/// Tracks the current position and collects diagnostics while projecting
#[derive(Debug, Default)]
pub struct Projector {
    path: Vec<String>,
    diagnostics: Vec<Diagnostic>,
}

impl Projector {
    /// Create a projector at the root of a document
    pub fn new() -> Self {
        Projector::default()
    }

    /// Convert the value found under the key
    #[inline]
    pub fn field<T: FromValue>(&mut self, key: &str, value: &Value) -> Option<T> {
        self.path.push(String::from(key));
        let result = T::from_value(value, self);
        self.path.pop();
        result
    }

    /// Convert the value found under the key with a custom conversion
    pub fn field_with<T, F>(&mut self, key: &str, value: &Value, convert: F) -> Option<T>
    where
        F: FnOnce(&Value, &mut Projector) -> Option<T>,
    {
        self.path.push(String::from(key));
        let result = convert(value, self);
        self.path.pop();
        result
    }

    /// Convert the sequence element found at the index
    #[inline]
    pub fn element<T: FromValue>(&mut self, index: usize, value: &Value) -> Option<T> {
        self.path.push(format!("[{}]", index));
        let result = T::from_value(value, self);
        self.path.pop();
        result
    }

    /// Populate a shape from the value, reporting a mismatch if the value
    /// isn't an object
    pub fn shape<T: Shape>(&mut self, value: &Value) -> Option<T> {
        let object = self.expect_object(value)?;
        Some(T::from_object(object, self))
    }

    /// Returns the object or reports a type mismatch
    pub fn expect_object<'v>(&mut self, value: &'v Value) -> Option<&'v Object> {
        match value {
            Value::Object(x) => Some(x),
            other => {
                self.mismatch("object", other);
                None
            }
        }
    }

    /// Report a type mismatch between the expected type and found value
    pub fn mismatch(&mut self, expected: &'static str, found: &Value) {
        self.report(DiagnosticKind::TypeMismatch {
            expected,
            found: found.kind_name(),
        })
    }

    /// Record a diagnostic at the current path
    pub fn report(&mut self, kind: DiagnosticKind) {
        let diagnostic = Diagnostic {
            path: self.current_path(),
            kind,
        };

        tracing::warn!(path = %diagnostic.path, "{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }

    /// The diagnostics recorded so far
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Consume the projector and return the recorded diagnostics
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    fn current_path(&self) -> String {
        let mut result = String::new();
        for segment in &self.path {
            if !result.is_empty() && !segment.starts_with('[') {
                result.push('.');
            }
            result.push_str(segment);
        }
        result
    }
}

/// Project the value onto the shape
///
/// Fails only when the value is not an object.
pub fn project<T: Shape>(value: &Value) -> Result<Projection<T>, Error> {
    let object = value.as_object().ok_or_else(|| {
        Error::from(ErrorKind::NotAnObject {
            found: value.kind_name(),
        })
    })?;

    let mut projector = Projector::new();
    let value = T::from_object(object, &mut projector);
    Ok(Projection {
        value,
        diagnostics: projector.into_diagnostics(),
    })
}

/// Returns true if the source key names the field. Ascii case and
/// underscores are ignored, as is a raw identifier prefix on the field.
///
/// ```
/// use appvdf::project::field_matches;
/// assert!(field_matches("LaunchOptions", "launch_options"));
/// assert!(field_matches("type", "r#type"));
/// assert!(field_matches("OsList", "oslist"));
/// assert!(!field_matches("name", "names"));
/// ```
pub fn field_matches(key: &str, field: &str) -> bool {
    let field = field.strip_prefix("r#").unwrap_or(field);
    let mut key = key.bytes().filter(|&x| x != b'_');
    let mut field = field.bytes().filter(|&x| x != b'_');
    loop {
        match (key.next(), field.next()) {
            (None, None) => return true,
            (Some(a), Some(b)) if a.eq_ignore_ascii_case(&b) => {}
            _ => return false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_formatting() {
        let mut projector = Projector::new();
        projector.path = vec![
            String::from("apps"),
            String::from("[2]"),
            String::from("name"),
        ];
        assert_eq!(projector.current_path(), "apps[2].name");
    }

    #[test]
    fn test_project_requires_object() {
        #[derive(Debug)]
        struct Empty;
        impl Shape for Empty {
            fn from_object(_object: &Object, _projector: &mut Projector) -> Self {
                Empty
            }
        }

        let err = project::<Empty>(&Value::Int32(1)).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::NotAnObject { found: "int32" }));
        assert!(project::<Empty>(&Value::Object(Object::new())).is_ok());
    }

    #[test]
    fn test_diagnostic_display() {
        let diagnostic = Diagnostic {
            path: String::from("count"),
            kind: DiagnosticKind::IntegerParse {
                text: String::from("five"),
                target: "i32",
            },
        };
        assert_eq!(
            diagnostic.to_string(),
            r#"count: cannot convert string "five" to i32"#
        );
    }

    #[test]
    fn test_field_matches() {
        assert!(field_matches("BetaKey", "beta_key"));
        assert!(field_matches("beta_key", "betakey"));
        assert!(field_matches("", ""));
        assert!(!field_matches("beta", "beta_key"));
    }
}
