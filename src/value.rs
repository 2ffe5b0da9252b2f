//! Argument model for the print-style operations.
//!
//! Every argument handed to a logging call is converted to a [`Value`] first.
//! The formatting functions need to know two things the type system would
//! otherwise erase: whether an operand is a string (print-style spacing
//! depends on it) and which verbs it accepts (printf-style mismatch markers
//! name the operand's type).

use std::borrow::Cow;
use std::fmt;

/// A single logging argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    /// Absent value, rendered as `<nil>`
    Nil,
    /// Boolean
    Bool(bool),
    /// Any signed integer, widened
    Int(i64),
    /// Any unsigned integer, widened
    Uint(u64),
    /// Any float, widened
    Float(f64),
    /// A single character (formats as a code point for numeric verbs)
    Char(char),
    /// String operand
    Str(Cow<'a, str>),
    /// A value rendered through `Display` or `Debug` ahead of time
    Other {
        /// Rendered text
        text: String,
        /// Type name reported in mismatch markers
        type_name: &'static str,
    },
}

impl Value<'static> {
    /// Capture a `Display` value
    pub fn display<T: fmt::Display + ?Sized>(value: &T) -> Value<'static> {
        Value::Other {
            text: value.to_string(),
            type_name: short_type_name::<T>(),
        }
    }

    /// Capture a `Debug` value
    pub fn debug<T: fmt::Debug + ?Sized>(value: &T) -> Value<'static> {
        Value::Other {
            text: format!("{:?}", value),
            type_name: short_type_name::<T>(),
        }
    }
}

impl Value<'_> {
    /// Whether print-style formatting treats this operand as a string
    pub fn is_string(&self) -> bool {
        matches!(self, Value::Str(_))
    }

    /// Type name used by `%T` and the mismatch markers
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "<nil>",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Uint(_) => "uint",
            Value::Float(_) => "float64",
            Value::Char(_) => "char",
            Value::Str(_) => "string",
            Value::Other { type_name, .. } => *type_name,
        }
    }
}

fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    // Keep generic arguments intact, only strip the leading module path
    let head_end = full.find('<').unwrap_or(full.len());
    match full[..head_end].rfind("::") {
        Some(idx) => &full[idx + 2..],
        None => full,
    }
}

/// Conversion of a logging argument into a [`Value`].
///
/// The logging macros call this on a reference to every argument, so
/// arguments are borrowed rather than moved.
pub trait ToValue {
    /// Convert to a value borrowing from `self`
    fn to_value(&self) -> Value<'_>;
}

impl<T: ToValue + ?Sized> ToValue for &T {
    fn to_value(&self) -> Value<'_> {
        (**self).to_value()
    }
}

impl ToValue for str {
    fn to_value(&self) -> Value<'_> {
        Value::Str(Cow::Borrowed(self))
    }
}

impl ToValue for String {
    fn to_value(&self) -> Value<'_> {
        Value::Str(Cow::Borrowed(self.as_str()))
    }
}

impl ToValue for Cow<'_, str> {
    fn to_value(&self) -> Value<'_> {
        Value::Str(Cow::Borrowed(self.as_ref()))
    }
}

impl ToValue for bool {
    fn to_value(&self) -> Value<'_> {
        Value::Bool(*self)
    }
}

impl ToValue for char {
    fn to_value(&self) -> Value<'_> {
        Value::Char(*self)
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value<'_> {
        match self {
            Some(inner) => inner.to_value(),
            None => Value::Nil,
        }
    }
}

impl ToValue for Value<'_> {
    fn to_value(&self) -> Value<'_> {
        match self {
            Value::Str(s) => Value::Str(Cow::Borrowed(s.as_ref())),
            other => other.clone(),
        }
    }
}

impl ToValue for std::path::Path {
    fn to_value(&self) -> Value<'_> {
        Value::Str(self.to_string_lossy())
    }
}

impl ToValue for std::path::PathBuf {
    fn to_value(&self) -> Value<'_> {
        Value::Str(self.to_string_lossy())
    }
}

impl ToValue for std::io::Error {
    fn to_value(&self) -> Value<'_> {
        Value::display(self)
    }
}

macro_rules! impl_to_value {
    ($variant:ident as $wide:ty: $($t:ty),*) => {
        $(
            impl ToValue for $t {
                fn to_value(&self) -> Value<'_> {
                    Value::$variant(*self as $wide)
                }
            }
        )*
    };
}

impl_to_value!(Int as i64: i8, i16, i32, i64, isize);
impl_to_value!(Uint as u64: u8, u16, u32, u64, usize);
impl_to_value!(Float as f64: f64);

impl ToValue for f32 {
    fn to_value(&self) -> Value<'_> {
        // Widen through the shortest decimal form so 1.1f32 stays 1.1
        Value::Float(self.to_string().parse().unwrap_or(f64::from(*self)))
    }
}
