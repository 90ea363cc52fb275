//! Default [`Serializer`](crate::Serializer) used by the musicbrainz fixture.
//!
//! `spec.md` §1 puts the real XML/document serializer out of scope for this
//! workspace; this one just turns a [`Document`](crate::Document) into a flat
//! JSON object so the fixture is usable end-to-end without an external
//! implementation plugged in.

use serde_json::{Map, Value};

use crate::entity::{Document, Serializer};

#[derive(Debug, Default)]
pub struct JsonDocumentSerializer;

impl Serializer for JsonDocumentSerializer {
    fn serialize(&self, doc: &Document) -> Value {
        let mut map = Map::new();
        map.insert("pk".to_string(), Value::String(doc.pk.to_string()));
        map.insert(
            "boost".to_string(),
            serde_json::Number::from_f64(doc.boost)
                .map(Value::Number)
                .unwrap_or(Value::Null),
        );
        let mut fields = Map::new();
        for (name, value) in &doc.fields {
            fields.insert(
                name.clone(),
                serde_json::to_value(value).unwrap_or(Value::Null),
            );
        }
        map.insert("fields".to_string(), Value::Object(fields));
        Value::Object(map)
    }
}
