use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A scalar value as it travels through the materialization and routing
/// pipeline: a primary key column, a field value, or a changed-column value
/// off a broker message. musicbrainz primary keys are integers or UUIDs
/// (`gid`), hence the two variants.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PkValue {
    Int(i64),
    Text(String),
}

impl fmt::Display for PkValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PkValue::Int(n) => write!(f, "{n}"),
            PkValue::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for PkValue {
    fn from(n: i64) -> Self {
        PkValue::Int(n)
    }
}

impl From<&str> for PkValue {
    fn from(s: &str) -> Self {
        PkValue::Text(s.to_string())
    }
}

impl From<String> for PkValue {
    fn from(s: String) -> Self {
        PkValue::Text(s)
    }
}

/// A (possibly composite) primary key, keyed by column name. Almost always
/// single-column (`id` or `gid`) in this schema, but kept a map so a core
/// whose root has a composite key is representable without a type change.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct PrimaryKey(BTreeMap<String, PkValue>);

impl PrimaryKey {
    pub fn single(column: impl Into<String>, value: impl Into<PkValue>) -> Self {
        let mut map = BTreeMap::new();
        map.insert(column.into(), value.into());
        PrimaryKey(map)
    }

    pub fn from_columns(columns: impl IntoIterator<Item = (String, PkValue)>) -> Self {
        PrimaryKey(columns.into_iter().collect())
    }

    pub fn get(&self, column: &str) -> Option<&PkValue> {
        self.0.get(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &PkValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PrimaryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|(k, v)| format!("{k}={v}")).collect();
        write!(f, "{}", parts.join(","))
    }
}
