use super::Value;

/// Hashable identity of a scalar value.
///
/// Primary and foreign keys are compared through `Key` when join results
/// are recombined. Integral floats collapse into `Int` so that a key read
/// back as `1.0` still matches `1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Bool(bool),
    Bytes(Vec<u8>),
    Float(u64),
    Int(i64),
    String(String),
}

impl Key {
    pub(super) fn from_value(value: &Value) -> Option<Key> {
        match value {
            Value::Bool(v) => Some(Key::Bool(*v)),
            Value::Bytes(v) => Some(Key::Bytes(v.clone())),
            Value::I64(v) => Some(Key::Int(*v)),
            Value::F64(v) if v.fract() == 0.0 && *v >= i64::MIN as f64 && *v <= i64::MAX as f64 => {
                Some(Key::Int(*v as i64))
            }
            Value::F64(v) => Some(Key::Float(v.to_bits())),
            Value::String(v) => Some(Key::String(v.clone())),
            Value::Json(json) => match json {
                serde_json::Value::Number(n) => n
                    .as_i64()
                    .map(Key::Int)
                    .or_else(|| n.as_f64().map(|f| Key::Float(f.to_bits()))),
                serde_json::Value::String(s) => Some(Key::String(s.clone())),
                _ => None,
            },
            Value::Null | Value::List(_) | Value::Record(_) => None,
        }
    }
}
