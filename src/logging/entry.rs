//! Structured log entries.

use std::fmt;
use std::time::Duration;

/// Access-log field names.
pub mod field {
    pub const REQUEST: &str = "request";
    pub const METHOD: &str = "method";
    pub const REMOTE: &str = "remote";
    pub const REQUEST_ID: &str = "request_id";
    pub const STATUS: &str = "status";
    pub const TEXT_STATUS: &str = "text_status";
    pub const TOOK: &str = "took";
}

/// A field value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Str(String),
    Int(i64),
    Duration(Duration),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_duration(&self) -> Option<Duration> {
        match self {
            Self::Duration(d) => Some(*d),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self { Self::Str(s.to_owned()) }
}

impl From<String> for Value {
    fn from(s: String) -> Self { Self::Str(s) }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self { Self::Int(n) }
}

impl From<u16> for Value {
    fn from(n: u16) -> Self { Self::Int(n.into()) }
}

impl From<Duration> for Value {
    fn from(d: Duration) -> Self { Self::Duration(d) }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) if s.is_empty() || s.contains([' ', '=', '"']) => write!(f, "{s:?}"),
            Self::Str(s) => f.write_str(s),
            Self::Int(n) => write!(f, "{n}"),
            Self::Duration(d) => write!(f, "{d:?}"),
        }
    }
}

/// An ordered mapping from field name to value, built up one field at a time.
///
/// Setting a name that is already present replaces its value in place, so
/// field order is the order of first insertion.
///
/// ```rust
/// use reqlog::logging::Entry;
///
/// let entry = Entry::new()
///     .with("method", "GET")
///     .with("status", 200u16);
/// assert_eq!(entry.to_string(), "method=GET status=200");
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Entry {
    fields: Vec<(&'static str, Value)>,
}

impl Entry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &'static str, value: impl Into<Value>) -> Self {
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(k, _)| *k == name).map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.fields.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize { self.fields.len() }
    pub fn is_empty(&self) -> bool { self.fields.is_empty() }
}

/// logfmt: `key=value` pairs separated by single spaces.
impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{name}={value}")?;
        }
        Ok(())
    }
}
