use std::collections::BTreeSet;

use mbsearch_model::{Direction, Graph, ModelKind};

use crate::path::{Path, TABLENAME_SENTINEL};

/// What a path's tail segment resolves to on its penultimate model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TailKind {
    /// A plain column.
    Column,
    /// A composite (multi-column) property.
    Composite,
    /// A many-to-one relationship — the tail itself is a relationship, and
    /// tracking it means watching its local foreign-key column.
    ManyToOne,
    /// A one-to-many or many-to-many relationship — contributes no column
    /// to track (the relationship itself carries no local data).
    ToMany,
    /// Neither a column, a composite, nor a relationship on the penultimate
    /// model (e.g. `__tablename__`, or a transform-driven synthetic field).
    /// Callers must skip this tail for column tracking without aborting.
    Unknown,
}

/// Terminal entity kind of `path` walked from `root`, or `None` if the path
/// ends on a column/attribute (including the `__tablename__` sentinel)
/// rather than on a relationship.
pub fn last_model(graph: &Graph, root: &ModelKind, path: &Path) -> Option<ModelKind> {
    let mut current = root.clone();
    for seg in path.segments() {
        if seg == TABLENAME_SENTINEL {
            return None;
        }
        match graph.relationship(&current, seg) {
            Some(rel) => current = rel.target.clone(),
            None => return None,
        }
    }
    Some(current)
}

/// The model kind one hop before the end of `path` (the "penultimate"
/// model), together with the tail segment name. `None` if an intermediate
/// segment fails to resolve as a relationship — a malformed path.
pub fn second_last_model(
    graph: &Graph,
    root: &ModelKind,
    path: &Path,
) -> Option<(ModelKind, String)> {
    let segs: Vec<&str> = path.segments().collect();
    let (last, head) = segs.split_last()?;
    let mut current = root.clone();
    for seg in head {
        match graph.relationship(&current, seg) {
            Some(rel) => current = rel.target.clone(),
            None => return None,
        }
    }
    Some((current, (*last).to_string()))
}

/// Classify `name` as seen from `penultimate`: a column, a composite, a
/// relationship (many-to-one or to-many), or unknown.
pub fn tail_kind(graph: &Graph, penultimate: &ModelKind, name: &str) -> TailKind {
    if name == TABLENAME_SENTINEL {
        return TailKind::Unknown;
    }
    if graph.column(penultimate, name).is_some() {
        return TailKind::Column;
    }
    if graph.composite(penultimate, name).is_some() {
        return TailKind::Composite;
    }
    if let Some(rel) = graph.relationship(penultimate, name) {
        return match rel.direction {
            Direction::ManyToOne => TailKind::ManyToOne,
            Direction::ToMany => TailKind::ToMany,
        };
    }
    TailKind::Unknown
}

/// Every distinct prefix of every path in `paths`. For `{a.b.c, a.b.d}` the
/// result is `{a, a.b, a.b.c, a.b.d}`. This prefix set drives inverse-map
/// construction: every prefix names a table whose change may invalidate a
/// document.
pub fn unique_split_paths<'a>(paths: impl IntoIterator<Item = &'a Path>) -> BTreeSet<Path> {
    let mut out = BTreeSet::new();
    for path in paths {
        let segs: Vec<&str> = path.segments().collect();
        for n in 1..=segs.len() {
            out.insert(Path::new(segs[..n].join(".")));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use mbsearch_model::GraphBuilder;

    fn fixture() -> Graph {
        GraphBuilder::new()
            .entity("area", "area")
            .column("area", "name")
            .entity("area_alias", "area_alias")
            .column("area_alias", "id")
            .many_to_one("area_alias", "area", "area", "area")
            .entity("artist", "artist")
            .many_to_one("artist", "area", "area", "area")
            .many_to_one("artist", "begin_area", "area", "begin_area")
            .to_many("artist", "aliases", "artist_alias", "artist")
            .entity("artist_alias", "artist_alias")
            .column("artist_alias", "name")
            .build()
    }

    #[test]
    fn last_model_walks_relationships() {
        let graph = fixture();
        let root = ModelKind::new("artist");
        let kind = last_model(&graph, &root, &Path::new("area")).unwrap();
        assert_eq!(kind.as_str(), "area");
    }

    #[test]
    fn last_model_none_on_column_tail() {
        let graph = fixture();
        let root = ModelKind::new("artist");
        assert!(last_model(&graph, &root, &Path::new("aliases.name")).is_none());
    }

    #[test]
    fn last_model_none_on_tablename_sentinel() {
        let graph = fixture();
        let root = ModelKind::new("artist");
        assert!(last_model(&graph, &root, &Path::new("__tablename__")).is_none());
    }

    #[test]
    fn second_last_model_returns_penultimate_and_tail() {
        let graph = fixture();
        let root = ModelKind::new("artist");
        let (penultimate, tail) = second_last_model(&graph, &root, &Path::new("aliases.name")).unwrap();
        assert_eq!(penultimate.as_str(), "artist_alias");
        assert_eq!(tail, "name");
    }

    #[test]
    fn second_last_model_single_segment_is_root() {
        let graph = fixture();
        let root = ModelKind::new("artist");
        let (penultimate, tail) = second_last_model(&graph, &root, &Path::new("area")).unwrap();
        assert_eq!(penultimate.as_str(), "artist");
        assert_eq!(tail, "area");
    }

    #[test]
    fn tail_kind_classifies_column_composite_relationship() {
        let graph = fixture();
        let artist = ModelKind::new("artist");
        let area = ModelKind::new("area");
        assert_eq!(tail_kind(&graph, &area, "name"), TailKind::Column);
        assert_eq!(tail_kind(&graph, &artist, "area"), TailKind::ManyToOne);
        assert_eq!(tail_kind(&graph, &artist, "aliases"), TailKind::ToMany);
        assert_eq!(tail_kind(&graph, &artist, "nope"), TailKind::Unknown);
        assert_eq!(
            tail_kind(&graph, &artist, TABLENAME_SENTINEL),
            TailKind::Unknown
        );
    }

    #[test]
    fn unique_split_paths_is_prefix_closure() {
        let paths = vec![Path::new("a.b.c"), Path::new("a.b.d")];
        let split = unique_split_paths(&paths);
        let as_strs: Vec<&str> = split.iter().map(Path::as_str).collect();
        assert_eq!(as_strs, vec!["a", "a.b", "a.b.c", "a.b.d"]);
    }

    #[test]
    fn unique_split_paths_dedups_shared_prefixes() {
        let paths = vec![Path::new("area.name"), Path::new("area.iso")];
        let split = unique_split_paths(&paths);
        assert_eq!(split.len(), 3); // "area", "area.name", "area.iso"
    }
}
