use super::{DiagnosticKind, FromValue, Projector};
use crate::encoding::Windows1252Encoding;
use crate::value::{Object, Value};
use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};
use std::str::FromStr;

fn parse_integer<T: FromStr>(
    text: &str,
    target: &'static str,
    projector: &mut Projector,
) -> Option<T> {
    match text.parse::<T>() {
        Ok(x) => Some(x),
        Err(_) => {
            projector.report(DiagnosticKind::IntegerParse {
                text: String::from(text),
                target,
            });
            None
        }
    }
}

macro_rules! integer_impl {
    ($($ty:ty),*) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: &Value, projector: &mut Projector) -> Option<Self> {
                    let target = stringify!($ty);
                    let wide = match value {
                        Value::Int32(x) | Value::Pointer(x) | Value::Color(x) => i128::from(*x),
                        Value::Int64(x) => i128::from(*x),
                        Value::UInt64(x) => i128::from(*x),

                        // Fractions truncate toward zero
                        Value::Float32(x) if x.is_finite() => x.trunc() as i128,
                        Value::Float32(x) => {
                            projector.report(DiagnosticKind::IntegerOverflow {
                                value: x.to_string(),
                                target,
                            });
                            return None;
                        }
                        Value::String(x) | Value::WideString(x) => {
                            return parse_integer(x, target, projector);
                        }
                        Value::Bytes(x) => {
                            return parse_integer(&Windows1252Encoding::decode(x), target, projector);
                        }
                        other => {
                            projector.mismatch(target, other);
                            return None;
                        }
                    };

                    match <$ty>::try_from(wide) {
                        Ok(x) => Some(x),
                        Err(_) => {
                            projector.report(DiagnosticKind::IntegerOverflow {
                                value: wide.to_string(),
                                target,
                            });
                            None
                        }
                    }
                }
            }

            impl MapKey for $ty {
                fn from_key(key: &str, projector: &mut Projector) -> Option<Self> {
                    let converted = key.parse::<u64>().ok().and_then(|x| <$ty>::try_from(x).ok());
                    if converted.is_none() {
                        projector.report(DiagnosticKind::InvalidMapKey {
                            key: String::from(key),
                            target: stringify!($ty),
                        });
                    }
                    converted
                }
            }
        )*
    };
}

integer_impl!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

macro_rules! float_impl {
    ($($ty:ty),*) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: &Value, projector: &mut Projector) -> Option<Self> {
                    let target = stringify!($ty);
                    match value {
                        Value::Float32(x) => Some(*x as $ty),
                        Value::Int32(x) => Some(*x as $ty),
                        Value::Int64(x) => Some(*x as $ty),
                        Value::UInt64(x) => Some(*x as $ty),
                        Value::String(_) | Value::WideString(_) | Value::Bytes(_) => {
                            let text = value.as_text().unwrap_or_default();
                            match text.parse::<$ty>() {
                                Ok(x) => Some(x),
                                Err(_) => {
                                    projector.report(DiagnosticKind::InvalidText {
                                        text: text.into_owned(),
                                        target,
                                    });
                                    None
                                }
                            }
                        }
                        other => {
                            projector.mismatch(target, other);
                            None
                        }
                    }
                }
            }
        )*
    };
}

float_impl!(f32, f64);

impl FromValue for bool {
    fn from_value(value: &Value, projector: &mut Projector) -> Option<Self> {
        match value {
            Value::Int32(x) => Some(*x != 0),
            Value::Int64(x) => Some(*x != 0),
            Value::UInt64(x) => Some(*x != 0),
            Value::String(_) | Value::WideString(_) | Value::Bytes(_) => {
                let text = value.as_text().unwrap_or_default();
                match text.as_ref() {
                    "1" => Some(true),
                    "0" => Some(false),
                    x if x.eq_ignore_ascii_case("true") => Some(true),
                    x if x.eq_ignore_ascii_case("false") => Some(false),
                    _ => {
                        projector.report(DiagnosticKind::InvalidText {
                            text: text.into_owned(),
                            target: "bool",
                        });
                        None
                    }
                }
            }
            other => {
                projector.mismatch("bool", other);
                None
            }
        }
    }
}

impl FromValue for String {
    fn from_value(value: &Value, projector: &mut Projector) -> Option<Self> {
        match value {
            Value::String(x) | Value::WideString(x) => Some(x.clone()),
            Value::Bytes(x) => Some(Windows1252Encoding::decode(x).into_owned()),
            other => {
                projector.mismatch("string", other);
                None
            }
        }
    }
}

impl FromValue for Value {
    fn from_value(value: &Value, _projector: &mut Projector) -> Option<Self> {
        Some(value.clone())
    }
}

impl FromValue for Object {
    fn from_value(value: &Value, projector: &mut Projector) -> Option<Self> {
        projector.expect_object(value).cloned()
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value, projector: &mut Projector) -> Option<Self> {
        T::from_value(value, projector).map(Some)
    }
}

impl<T: FromValue> FromValue for Box<T> {
    fn from_value(value: &Value, projector: &mut Projector) -> Option<Self> {
        T::from_value(value, projector).map(Box::new)
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: &Value, projector: &mut Projector) -> Option<Self> {
        match value {
            Value::List(values) => {
                let result = values
                    .iter()
                    .enumerate()
                    .filter_map(|(i, x)| projector.element(i, x))
                    .collect();
                Some(result)
            }
            other => {
                projector.mismatch("list", other);
                None
            }
        }
    }
}

/// Conversion from an object key into a map key
pub trait MapKey: Sized {
    /// Convert the key, reporting a diagnostic on failure
    fn from_key(key: &str, projector: &mut Projector) -> Option<Self>;
}

impl MapKey for String {
    fn from_key(key: &str, _projector: &mut Projector) -> Option<Self> {
        Some(String::from(key))
    }
}

fn map_entries<'v, K, V>(
    value: &'v Value,
    projector: &'v mut Projector,
) -> Option<impl Iterator<Item = (K, V)> + 'v>
where
    K: MapKey,
    V: FromValue,
{
    let object = projector.expect_object(value)?;
    let entries = object.iter().filter_map(move |(key, value)| {
        let converted = K::from_key(key, projector)?;
        let value = projector.field::<V>(key, value)?;
        Some((converted, value))
    });
    Some(entries)
}

impl<K, V, S> FromValue for HashMap<K, V, S>
where
    K: MapKey + Eq + Hash,
    V: FromValue,
    S: BuildHasher + Default,
{
    fn from_value(value: &Value, projector: &mut Projector) -> Option<Self> {
        map_entries(value, projector).map(|entries| entries.collect())
    }
}

impl<K, V> FromValue for BTreeMap<K, V>
where
    K: MapKey + Ord,
    V: FromValue,
{
    fn from_value(value: &Value, projector: &mut Projector) -> Option<Self> {
        map_entries(value, projector).map(|entries| entries.collect())
    }
}
