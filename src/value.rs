//! Owned dynamic cell values.
//!
//! `Value` is the currency passed between the core and the data access layer:
//! positional statement arguments going in, row cells coming out. It is owned
//! and cheap to clone for the small argument lists the sequencer and the copy
//! pipeline deal with.

use crate::error::{Error, Result};

/// A single cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// SQL NULL
    Null,
    /// Boolean
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit float
    Float(f64),
    /// UTF-8 text
    Text(String),
    /// Raw bytes
    Bytes(Vec<u8>),
    /// UUID
    #[cfg(feature = "with-uuid")]
    Uuid(uuid::Uuid),
    /// UTC timestamp
    #[cfg(feature = "with-chrono")]
    Timestamp(chrono::DateTime<chrono::Utc>),
}

impl Value {
    /// Returns true for `Value::Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Decode as `i64`.
    pub fn as_i64(&self) -> Result<i64> {
        match self {
            Value::Int(v) => Ok(*v),
            Value::Text(s) => s
                .parse()
                .map_err(|e| Error::Decode(format!("invalid i64: {}", e))),
            other => Err(Error::Decode(format!(
                "expected integer, got {}",
                other.type_name()
            ))),
        }
    }

    /// Decode as `f64`.
    pub fn as_f64(&self) -> Result<f64> {
        match self {
            Value::Float(v) => Ok(*v),
            Value::Int(v) => Ok(*v as f64),
            Value::Text(s) => s
                .parse()
                .map_err(|e| Error::Decode(format!("invalid f64: {}", e))),
            other => Err(Error::Decode(format!(
                "expected float, got {}",
                other.type_name()
            ))),
        }
    }

    /// Decode as `bool`.
    pub fn as_bool(&self) -> Result<bool> {
        match self {
            Value::Bool(v) => Ok(*v),
            Value::Int(v) => Ok(*v != 0),
            other => Err(Error::Decode(format!(
                "expected boolean, got {}",
                other.type_name()
            ))),
        }
    }

    /// Borrow as `&str`.
    pub fn as_str(&self) -> Result<&str> {
        match self {
            Value::Text(s) => Ok(s),
            other => Err(Error::Decode(format!(
                "expected text, got {}",
                other.type_name()
            ))),
        }
    }

    /// Name of the variant, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Bytes(_) => "bytes",
            #[cfg(feature = "with-uuid")]
            Value::Uuid(_) => "uuid",
            #[cfg(feature = "with-chrono")]
            Value::Timestamp(_) => "timestamp",
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Text(s) => write!(f, "{}", s),
            Value::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            #[cfg(feature = "with-uuid")]
            Value::Uuid(u) => write!(f, "{}", u),
            #[cfg(feature = "with-chrono")]
            Value::Timestamp(t) => write!(f, "{}", t.to_rfc3339()),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

#[cfg(feature = "with-uuid")]
impl From<uuid::Uuid> for Value {
    fn from(v: uuid::Uuid) -> Self {
        Value::Uuid(v)
    }
}

#[cfg(feature = "with-chrono")]
impl From<chrono::DateTime<chrono::Utc>> for Value {
    fn from(v: chrono::DateTime<chrono::Utc>) -> Self {
        Value::Timestamp(v)
    }
}
