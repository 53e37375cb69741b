use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::path::PathBuf;

// ================================
// ContextValue – context value type system
// ================================

/// A value stored in a task [`Context`](crate::core::Context).
///
/// The context is a closed union: specs and operations can only exchange
/// these shapes, and every operation's declared input binds against them.
/// `Path` never comes out of a parsed spec (paths arrive as strings); it is
/// produced by operations that hand real filesystem paths downstream.
#[derive(Debug, Clone)]
pub enum ContextValue {
    None,
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Path(PathBuf),
    List(Vec<ContextValue>),
    Object(IndexMap<String, ContextValue>),
}

impl ContextValue {
    /// Convert ContextValue → serde_json::Value
    pub fn to_value(&self) -> Value {
        match self {
            ContextValue::None => Value::Null,
            ContextValue::String(s) => Value::String(s.clone()),
            ContextValue::Integer(i) => serde_json::json!(*i),
            ContextValue::Float(f) => serde_json::json!(*f),
            ContextValue::Boolean(b) => Value::Bool(*b),
            ContextValue::Path(p) => Value::String(p.to_string_lossy().into_owned()),
            ContextValue::List(v) => Value::Array(v.iter().map(|s| s.to_value()).collect()),
            ContextValue::Object(map) => {
                let m: serde_json::Map<String, Value> =
                    map.iter().map(|(k, v)| (k.clone(), v.to_value())).collect();
                Value::Object(m)
            }
        }
    }

    /// Create ContextValue from serde_json::Value
    pub fn from_value(v: &Value) -> Self {
        match v {
            Value::Null => ContextValue::None,
            Value::Bool(b) => ContextValue::Boolean(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    ContextValue::Integer(i)
                } else {
                    ContextValue::Float(n.as_f64().unwrap_or(0.0))
                }
            }
            Value::String(s) => ContextValue::String(s.clone()),
            Value::Array(arr) => {
                ContextValue::List(arr.iter().map(ContextValue::from_value).collect())
            }
            Value::Object(map) => {
                let m: IndexMap<String, ContextValue> = map
                    .iter()
                    .map(|(k, v)| (k.clone(), ContextValue::from_value(v)))
                    .collect();
                ContextValue::Object(m)
            }
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, ContextValue::None)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ContextValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ContextValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Interpret the value as a filesystem path.
    pub fn as_path(&self) -> Option<PathBuf> {
        match self {
            ContextValue::Path(p) => Some(p.clone()),
            ContextValue::String(s) => Some(PathBuf::from(s)),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&IndexMap<String, ContextValue>> {
        match self {
            ContextValue::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn to_display_string(&self) -> String {
        match self {
            ContextValue::None => String::new(),
            ContextValue::String(s) => s.clone(),
            ContextValue::Integer(i) => i.to_string(),
            ContextValue::Float(f) => f.to_string(),
            ContextValue::Boolean(b) => b.to_string(),
            ContextValue::Path(p) => p.to_string_lossy().into_owned(),
            other => serde_json::to_string(&other.to_value()).unwrap_or_default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ContextValue::None => true,
            ContextValue::String(s) => s.is_empty(),
            ContextValue::List(v) => v.is_empty(),
            ContextValue::Object(map) => map.is_empty(),
            _ => false,
        }
    }
}

impl PartialEq for ContextValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ContextValue::None, ContextValue::None) => true,
            (ContextValue::String(a), ContextValue::String(b)) => a == b,
            (ContextValue::Integer(a), ContextValue::Integer(b)) => a == b,
            (ContextValue::Float(a), ContextValue::Float(b)) => (a - b).abs() < 1e-10,
            (ContextValue::Integer(a), ContextValue::Float(b))
            | (ContextValue::Float(b), ContextValue::Integer(a)) => (*a as f64 - b).abs() < 1e-10,
            (ContextValue::Boolean(a), ContextValue::Boolean(b)) => a == b,
            (ContextValue::Path(a), ContextValue::Path(b)) => a == b,
            _ => self.to_value() == other.to_value(),
        }
    }
}

impl std::fmt::Display for ContextValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_display_string())
    }
}

impl Serialize for ContextValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ContextValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let v = Value::deserialize(deserializer)?;
        Ok(ContextValue::from_value(&v))
    }
}

impl From<&str> for ContextValue {
    fn from(s: &str) -> Self {
        ContextValue::String(s.to_string())
    }
}

impl From<String> for ContextValue {
    fn from(s: String) -> Self {
        ContextValue::String(s)
    }
}

impl From<PathBuf> for ContextValue {
    fn from(p: PathBuf) -> Self {
        ContextValue::Path(p)
    }
}

impl From<bool> for ContextValue {
    fn from(b: bool) -> Self {
        ContextValue::Boolean(b)
    }
}

impl From<i64> for ContextValue {
    fn from(i: i64) -> Self {
        ContextValue::Integer(i)
    }
}
