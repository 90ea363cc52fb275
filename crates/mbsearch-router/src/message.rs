use std::collections::BTreeMap;

use mbsearch_model::{PkValue, TableName};
use mbsearch_schema::FieldValue;
use serde::{Deserialize, Serialize};

/// What happened to a row on its table of origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Insert,
    Update,
    Delete,
}

/// One committed row change, already decoded off the broker transport. A
/// change on a root table carries only its own primary key column(s); a
/// change on any other table carries every column of the row (the new row
/// for insert/update, the old row for delete) so a reverse path can be
/// resolved without re-reading the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeMessage {
    pub table: TableName,
    pub operation: Operation,
    pub columns: BTreeMap<String, FieldValue>,
}

impl ChangeMessage {
    pub fn new(
        table: impl Into<TableName>,
        operation: Operation,
        columns: BTreeMap<String, FieldValue>,
    ) -> Self {
        Self {
            table: table.into(),
            operation,
            columns,
        }
    }

    pub fn column(&self, name: &str) -> Option<&FieldValue> {
        self.columns.get(name)
    }
}

/// Converts a decoded wire value into a primary-key column value. Lists,
/// floats, booleans and nulls never appear as identity columns in this
/// schema, so a conversion miss means the message is malformed rather than
/// that a new variant needs handling.
pub fn as_pk_value(value: &FieldValue) -> Option<PkValue> {
    match value {
        FieldValue::Int(n) => Some(PkValue::Int(*n)),
        FieldValue::Text(s) => Some(PkValue::Text(s.clone())),
        _ => None,
    }
}
