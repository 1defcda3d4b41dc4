//! Constructor argument kinds.
//!
//! Constructor arguments travel as JSON values. Instantiators pick a
//! constructor overload by comparing the kinds of the supplied arguments
//! against each overload's declared parameter kinds.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kind of a single constructor parameter or argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    Null,
    Bool,
    Integer,
    Float,
    String,
    Array,
    Object,
    /// Parameter accepting any argument.
    Any,
}

impl ParamKind {
    /// Kind of a concrete argument value. Never returns [`ParamKind::Any`].
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Bool,
            Value::Number(n) if n.is_f64() => Self::Float,
            Value::Number(_) => Self::Integer,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }

    /// Whether a parameter of this kind accepts an argument of kind `actual`.
    ///
    /// Float parameters also accept integers.
    pub fn accepts(self, actual: Self) -> bool {
        self == Self::Any || self == actual || (self == Self::Float && actual == Self::Integer)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
            Self::Any => "any",
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kinds of a full argument list.
pub fn signature_of(args: &[Value]) -> Vec<ParamKind> {
    args.iter().map(ParamKind::of).collect()
}

/// Render a signature as `(integer, string)`.
pub fn render_signature(kinds: &[ParamKind]) -> String {
    let inner: Vec<&str> = kinds.iter().map(|k| k.as_str()).collect();
    format!("({})", inner.join(", "))
}
