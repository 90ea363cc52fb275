use serde::{Deserialize, Serialize};

/// A materialized value pulled off one hop of a relationship path. Paths can
/// fan out over collections, so a field's materialized value is
/// conceptually a list of these, one per row the path visited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<FieldValue>),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Flatten a (possibly nested) fan-out into a flat list of leaf values.
    pub fn flatten(self) -> Vec<FieldValue> {
        match self {
            FieldValue::List(items) => items.into_iter().flat_map(FieldValue::flatten).collect(),
            other => vec![other],
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Int(n)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

/// One materialized path value tagged with the path (branch) that produced
/// it. A transform sees every branch of a fanned-out or unioned field, not
/// just a single scalar — this is what lets `annotation_type`/`url_type`
/// (Design Notes: "Multi-entity polymorphic fields") pick the one branch
/// that actually resolved and report its originating path.
#[derive(Debug, Clone, PartialEq)]
pub struct Branch<'a> {
    pub path: &'a str,
    pub value: FieldValue,
}
