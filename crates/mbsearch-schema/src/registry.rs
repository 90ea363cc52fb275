use std::collections::BTreeMap;

use mbsearch_model::Graph;
use mbsearch_paths::second_last_model;
use thiserror::Error;

use crate::entity::EntityDescriptor;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("core '{0}' is registered more than once")]
    DuplicateCore(String),
    #[error("core '{core}' has duplicate field name '{field}'")]
    DuplicateField { core: String, field: String },
    #[error("core '{core}' declares a path that does not resolve against its root: '{path}'")]
    UnresolvablePath { core: String, path: String },
}

/// The process-wide, read-only mapping from core name to entity declaration
/// (`spec.md` §4.B). Built once at startup; a structural error here is
/// fatal and aborts before any worker starts (`spec.md` §7).
#[derive(Debug)]
pub struct SchemaRegistry {
    entities: BTreeMap<String, EntityDescriptor>,
}

impl SchemaRegistry {
    /// Validates and freezes a set of entity declarations against the model
    /// graph. Iteration over the result is always in sorted core-name order
    /// (`spec.md` §4.B), which `spec.md` §8 property 1 ("registry
    /// determinism") depends on.
    pub fn build(
        graph: &Graph,
        entities: Vec<(String, EntityDescriptor)>,
    ) -> Result<Self, SchemaError> {
        let mut map = BTreeMap::new();
        for (core, descriptor) in entities {
            if map.contains_key(&core) {
                return Err(SchemaError::DuplicateCore(core));
            }
            validate_field_names(&core, &descriptor)?;
            validate_paths(graph, &core, &descriptor)?;
            map.insert(core, descriptor);
        }
        Ok(SchemaRegistry { entities: map })
    }

    pub fn get(&self, core: &str) -> Option<&EntityDescriptor> {
        self.entities.get(core)
    }

    /// Iterates cores in sorted order (`spec.md` §4.B).
    pub fn iter(&self) -> impl Iterator<Item = (&str, &EntityDescriptor)> {
        self.entities.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn core_names(&self) -> impl Iterator<Item = &str> {
        self.entities.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

fn validate_field_names(core: &str, descriptor: &EntityDescriptor) -> Result<(), SchemaError> {
    let mut seen = std::collections::BTreeSet::new();
    for field in descriptor.fields() {
        if !seen.insert(field.name()) {
            return Err(SchemaError::DuplicateField {
                core: core.to_string(),
                field: field.name().to_string(),
            });
        }
    }
    Ok(())
}

fn validate_paths(graph: &Graph, core: &str, descriptor: &EntityDescriptor) -> Result<(), SchemaError> {
    for path in descriptor.all_paths() {
        if second_last_model(graph, descriptor.root(), path).is_none() {
            return Err(SchemaError::UnresolvablePath {
                core: core.to_string(),
                path: path.as_str().to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use mbsearch_model::GraphBuilder;

    use super::*;
    use crate::entity::Serializer;
    use crate::field::FieldDescriptor;

    #[derive(Debug)]
    struct NullSerializer;
    impl Serializer for NullSerializer {
        fn serialize(&self, _doc: &crate::entity::Document) -> serde_json::Value {
            serde_json::Value::Null
        }
    }

    fn graph() -> Graph {
        GraphBuilder::new()
            .entity("artist", "artist")
            .column("artist", "gid")
            .column("artist", "name")
            .build()
    }

    #[test]
    fn rejects_duplicate_core_names() {
        let descriptor = EntityDescriptor::new("artist", 1.5, Arc::new(NullSerializer));
        let err = SchemaRegistry::build(
            &graph(),
            vec![
                ("artist".to_string(), descriptor_clone(&descriptor)),
                ("artist".to_string(), descriptor),
            ],
        )
        .unwrap_err();
        assert_eq!(err, SchemaError::DuplicateCore("artist".to_string()));
    }

    fn descriptor_clone(d: &EntityDescriptor) -> EntityDescriptor {
        EntityDescriptor::new(d.root().clone(), d.boost(), Arc::new(NullSerializer))
    }

    #[test]
    fn rejects_duplicate_field_names() {
        let descriptor = EntityDescriptor::new("artist", 1.5, Arc::new(NullSerializer)).with_fields(vec![
            FieldDescriptor::new("mbid", "gid"),
            FieldDescriptor::new("mbid", "name"),
        ]);
        let err = SchemaRegistry::build(&graph(), vec![("artist".to_string(), descriptor)]).unwrap_err();
        assert_eq!(
            err,
            SchemaError::DuplicateField {
                core: "artist".to_string(),
                field: "mbid".to_string()
            }
        );
    }

    #[test]
    fn rejects_unresolvable_paths() {
        let descriptor = EntityDescriptor::new("artist", 1.5, Arc::new(NullSerializer))
            .with_fields(vec![FieldDescriptor::new("area", "no_such_rel.name")]);
        let err = SchemaRegistry::build(&graph(), vec![("artist".to_string(), descriptor)]).unwrap_err();
        assert_eq!(
            err,
            SchemaError::UnresolvablePath {
                core: "artist".to_string(),
                path: "no_such_rel.name".to_string()
            }
        );
    }

    #[test]
    fn accepts_valid_declaration_and_iterates_sorted() {
        let artist = EntityDescriptor::new("artist", 1.5, Arc::new(NullSerializer))
            .with_fields(vec![FieldDescriptor::new("mbid", "gid")]);
        let area = EntityDescriptor::new("artist", 1.5, Arc::new(NullSerializer))
            .with_fields(vec![FieldDescriptor::new("name", "name")]);
        let registry = SchemaRegistry::build(
            &graph(),
            vec![
                ("zzz".to_string(), artist),
                ("aaa".to_string(), area),
            ],
        )
        .unwrap();
        let names: Vec<&str> = registry.core_names().collect();
        assert_eq!(names, vec!["aaa", "zzz"]);
    }
}
