use std::collections::BTreeSet;

use mbsearch_model::Graph;
use mbsearch_paths::{last_model, second_last_model, tail_kind, unique_split_paths, TailKind};
use mbsearch_schema::SchemaRegistry;
use thiserror::Error;

use crate::index::{DepIndex, InverseEntry, QueryPlan};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DepIndexError {
    /// A core's root model kind is not registered in the metadata graph.
    /// `mbsearch-schema` validates every *path*; this only fires if the
    /// root itself was never declared, which should already be impossible
    /// by the time a [`SchemaRegistry`] has been built — kept as a
    /// defensive structural error (`spec.md` §7).
    #[error("core '{core}' root model '{root}' is not registered in the metadata graph")]
    UnknownRoot { core: String, root: String },
}

/// Builds the dependency index from a validated schema registry and its
/// backing model graph (`spec.md` §4.C). Deterministic: run twice on the
/// same inputs and the result is field-for-field identical (`spec.md` §8
/// property 1), since both the registry and this builder iterate in sorted
/// order and every collection here is a `BTreeMap`/`BTreeSet`.
pub fn build(graph: &Graph, registry: &SchemaRegistry) -> Result<DepIndex, DepIndexError> {
    let mut index = DepIndex::default();

    for (core, descriptor) in registry.iter() {
        let root = descriptor.root();
        let root_table = graph.table(root).cloned().ok_or_else(|| DepIndexError::UnknownRoot {
            core: core.to_string(),
            root: root.as_str().to_string(),
        })?;

        // Step 1: the root table itself is always watched, with an empty
        // reverse-path (the change already names the root primary key).
        index.core_by_root_table.insert(root_table.clone(), core.to_string());
        index
            .inverse
            .entry(root_table.clone())
            .or_default()
            .insert(InverseEntry {
                core: core.to_string(),
                reverse_path: None,
            });

        // Forward map: the union of every field and extra path is the
        // eager-load plan `mbsearch-materialize` needs (`spec.md` §4.D).
        index.forward.insert(
            core.to_string(),
            QueryPlan {
                root: root.clone(),
                paths: descriptor.all_paths().cloned().collect(),
            },
        );

        // Step 2: every trigger-participating field path, plus every extra
        // path, split into its prefix closure.
        let tracked: Vec<_> = descriptor.tracked_paths().cloned().collect();
        let prefixes: BTreeSet<_> = unique_split_paths(tracked.iter());

        for prefix in &prefixes {
            if let Some(terminal) = last_model(graph, root, prefix) {
                if let Some(table) = graph.table(&terminal) {
                    index
                        .inverse
                        .entry(table.clone())
                        .or_default()
                        .insert(InverseEntry {
                            core: core.to_string(),
                            reverse_path: Some(prefix.clone()),
                        });
                }
            }

            let Some((penultimate, tail)) = second_last_model(graph, root, prefix) else {
                // A malformed intermediate segment; schema validation
                // already rejects this at `SchemaRegistry::build` time, so
                // this branch is unreachable in practice but kept
                // non-fatal per `spec.md` §4.C's catch-and-continue.
                tracing::warn!(core, path = %prefix, "prefix does not resolve to a penultimate model, skipping column tracking");
                continue;
            };
            let Some(table) = graph.table(&penultimate) else {
                continue;
            };

            match tail_kind(graph, &penultimate, &tail) {
                TailKind::Column => {
                    index.columns.entry(table.clone()).or_default().insert(tail);
                }
                TailKind::Composite => {
                    if let Some(cols) = graph.composite(&penultimate, &tail) {
                        let entry = index.columns.entry(table.clone()).or_default();
                        entry.extend(cols.iter().cloned());
                    }
                }
                TailKind::ManyToOne => {
                    if let Some(rel) = graph.relationship(&penultimate, &tail) {
                        if let Some(local) = &rel.local_column {
                            index.columns.entry(table.clone()).or_default().insert(local.clone());
                        }
                    }
                }
                TailKind::ToMany => {
                    // The relationship itself carries no local column to
                    // watch (`spec.md` §4.A `tail_kind`).
                }
                TailKind::Unknown => {
                    // `__tablename__` or a synthetic, transform-driven
                    // field: silently skipped for column tracking, but the
                    // prefix was already recorded into `inverse` above if
                    // `last_model` resolved it (`spec.md` §4.C step 3).
                    tracing::debug!(core, path = %prefix, tail, "tail does not resolve to a column, composite or relationship, skipping column tracking");
                }
            }
        }
    }

    Ok(index)
}

#[cfg(test)]
mod tests {
    use mbsearch_model::TableName;

    use super::*;

    fn musicbrainz() -> (Graph, SchemaRegistry, DepIndex) {
        let (graph, registry) = mbsearch_schema::musicbrainz::build().unwrap();
        let index = build(&graph, &registry).unwrap();
        (graph, registry, index)
    }

    /// `spec.md` §8 property 2: inverse closure. For every core and every
    /// path declared on it, every table along that path is reachable from
    /// `inverse[table]` via some prefix.
    #[test]
    fn inverse_closure_holds_for_every_declared_path() {
        let (graph, registry, index) = musicbrainz();
        for (core, descriptor) in registry.iter() {
            for path in descriptor.tracked_paths() {
                if let Some(terminal) = last_model(&graph, descriptor.root(), path) {
                    let table = graph.table(&terminal).unwrap();
                    let found = index
                        .inverse(table)
                        .any(|entry| entry.core == core);
                    assert!(
                        found,
                        "core '{core}' path '{path}' resolves to table '{table}' but no inverse entry names this core"
                    );
                }
            }
        }
    }

    /// `spec.md` §8 property 3: column closure. For every trigger-
    /// participating field whose tail is a plain column, that column is in
    /// `columns[table]`.
    #[test]
    fn column_closure_holds_for_trigger_participating_fields() {
        let (graph, registry, index) = musicbrainz();
        for (_core, descriptor) in registry.iter() {
            for field in descriptor.fields() {
                if !field.trigger() {
                    continue;
                }
                for path in field.paths() {
                    let Some((penultimate, tail)) = second_last_model(&graph, descriptor.root(), path) else {
                        continue;
                    };
                    if tail_kind(&graph, &penultimate, &tail) == TailKind::Column {
                        let table = graph.table(&penultimate).unwrap();
                        let cols = index.columns(table).unwrap_or_else(|| {
                            panic!("table '{table}' has no tracked columns at all")
                        });
                        assert!(cols.contains(&tail), "column '{tail}' on table '{table}' missing from columns map");
                    }
                }
            }
        }
    }

    /// `spec.md` §8 scenario S3: an `area_alias` change must fan out to
    /// exactly six `(core, reverse-path)` pairs — area itself, artist via
    /// `area`/`begin_area`/`end_area`, label via `area`, place via `area`.
    #[test]
    fn area_alias_fans_out_to_six_reverse_paths() {
        let (_graph, _registry, index) = musicbrainz();
        let table = TableName::from("area_alias");
        let entries: Vec<_> = index.inverse(&table).collect();
        assert_eq!(entries.len(), 6, "expected six reverse-path entries, got {entries:#?}");

        let cores: BTreeSet<&str> = entries.iter().map(|e| e.core.as_str()).collect();
        assert_eq!(cores, BTreeSet::from(["area", "artist", "label", "place"]));

        let artist_paths: BTreeSet<&str> = entries
            .iter()
            .filter(|e| e.core == "artist")
            .map(|e| e.reverse_path.as_ref().unwrap().as_str())
            .collect();
        assert_eq!(
            artist_paths,
            BTreeSet::from(["area.aliases", "begin_area.aliases", "end_area.aliases"])
        );
    }

    /// `spec.md` §8 property 1: registry determinism. Building the index
    /// twice from the same declarations is byte-identical.
    #[test]
    fn build_is_deterministic() {
        let (graph, registry) = mbsearch_schema::musicbrainz::build().unwrap();
        let a = build(&graph, &registry).unwrap();
        let b = build(&graph, &registry).unwrap();
        assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
    }

    /// A change to a table no core reaches at all is simply untracked: the
    /// router (`spec.md` §4.E step 1) drops it without error.
    #[test]
    fn untracked_table_has_no_inverse_entries() {
        use std::sync::Arc;

        use mbsearch_model::GraphBuilder;
        use mbsearch_paths::Path;
        use mbsearch_schema::{EntityDescriptor, FieldDescriptor, Serializer};

        #[derive(Debug)]
        struct NullSerializer;
        impl Serializer for NullSerializer {
            fn serialize(&self, _doc: &mbsearch_schema::Document) -> serde_json::Value {
                serde_json::Value::Null
            }
        }

        let graph = GraphBuilder::new()
            .entity("artist", "artist")
            .column("artist", "gid")
            .entity("unrelated", "unrelated_table")
            .column("unrelated", "whatever")
            .build();
        let descriptor = EntityDescriptor::new("artist", 1.5, Arc::new(NullSerializer))
            .with_fields(vec![FieldDescriptor::new("mbid", Path::new("gid"))]);
        let registry = SchemaRegistry::build(&graph, vec![("artist".to_string(), descriptor)]).unwrap();
        let index = build(&graph, &registry).unwrap();

        assert!(index.inverse(&TableName::from("unrelated_table")).next().is_none());
        assert!(index
            .inverse(&TableName::from("artist"))
            .any(|e| e.core == "artist" && e.reverse_path.is_none()));
    }

    /// Deletes resolve to a core via `core_by_root_table` using the root
    /// table name (`spec.md` §4.E step 3, delete-on-root branch).
    #[test]
    fn core_by_root_table_resolves_root_tables() {
        let (_graph, _registry, index) = musicbrainz();
        assert_eq!(index.core_by_root_table(&TableName::from("artist")), Some("artist"));
        assert_eq!(index.core_by_root_table(&TableName::from("release_group")), Some("release-group"));
    }
}
