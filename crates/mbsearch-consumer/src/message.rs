use std::collections::BTreeMap;

use mbsearch_schema::FieldValue;
use serde::{Deserialize, Serialize};

/// Which of the three logical queues a delivery arrived on (`spec.md` §4.F:
/// "Three logical queues: index, delete, and retry"). The retry queue
/// decodes identically to the index queue — only routing/ack plumbing
/// differs — so it carries the same operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueKind {
    Index,
    Delete,
    Retry,
}

impl QueueKind {
    /// The operation implied by which queue a message arrived on
    /// (`spec.md` §6: index/retry messages carry the new row, delete
    /// messages carry the old row). Index and retry messages don't
    /// distinguish insert from update on the wire — `mbsearch-router`
    /// treats both identically for upserts, so `Update` is the faithful
    /// choice for either.
    pub fn operation(self) -> mbsearch_router::Operation {
        match self {
            QueueKind::Index | QueueKind::Retry => mbsearch_router::Operation::Update,
            QueueKind::Delete => mbsearch_router::Operation::Delete,
        }
    }
}

/// The JSON message body `spec.md` §6 fixes: `{ "_table": <table name>,
/// <pk column>: <value>, ... }`. For non-root tables the body additionally
/// carries every column value needed to reconstruct the old/new row.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WireMessage {
    #[serde(rename = "_table")]
    pub table: String,
    #[serde(flatten)]
    pub columns: BTreeMap<String, FieldValue>,
}

impl WireMessage {
    /// Converts this wire body, plus the queue it arrived on, into the
    /// richer structured form `mbsearch-router` consumes (`spec.md` §6:
    /// "A richer structured form exposes (sequence_id, table, columns,
    /// operation) explicitly for change router input"). `sequence_id` has
    /// no analogue on the JSON wire format `spec.md` actually specifies, so
    /// it is not threaded through here.
    pub fn into_change_message(self, queue: QueueKind) -> mbsearch_router::ChangeMessage {
        mbsearch_router::ChangeMessage::new(self.table, queue.operation(), self.columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_root_table_body_with_flattened_pk_column() {
        let json = r#"{"_table":"artist","id":7}"#;
        let msg: WireMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.table, "artist");
        assert_eq!(msg.columns.get("id"), Some(&FieldValue::Int(7)));
    }

    #[test]
    fn decodes_non_root_table_body_with_full_row() {
        let json = r#"{"_table":"area_alias","id":1,"area":2,"type":3}"#;
        let msg: WireMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.columns.len(), 3);
    }

    #[test]
    fn index_queue_maps_to_update_operation() {
        let json = r#"{"_table":"artist","id":7}"#;
        let msg: WireMessage = serde_json::from_str(json).unwrap();
        let change = msg.into_change_message(QueueKind::Index);
        assert_eq!(change.operation, mbsearch_router::Operation::Update);
        assert_eq!(change.table, mbsearch_model::TableName::from("artist"));
    }

    #[test]
    fn delete_queue_maps_to_delete_operation() {
        let json = r#"{"_table":"artist","gid":"90d7709d-feba-47e6-a2d1-8770da3c3d9c"}"#;
        let msg: WireMessage = serde_json::from_str(json).unwrap();
        let change = msg.into_change_message(QueueKind::Delete);
        assert_eq!(change.operation, mbsearch_router::Operation::Delete);
    }
}
