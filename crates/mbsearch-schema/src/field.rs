use mbsearch_paths::Path;

use crate::transform::Transform;

/// One indexed attribute of a document (`spec.md` §3, "Field descriptor").
///
/// A field may be backed by more than one path — `spec.md` calls these
/// fan-out/union fields (e.g. `annotation`'s `name`, which reads from
/// whichever of eleven entity kinds the annotation actually points to).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    name: String,
    paths: Vec<Path>,
    transform: Option<Transform>,
    trigger: bool,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, path: impl Into<Path>) -> Self {
        Self {
            name: name.into(),
            paths: vec![path.into()],
            transform: None,
            trigger: true,
        }
    }

    pub fn fanned_out(name: impl Into<String>, paths: Vec<Path>) -> Self {
        assert!(!paths.is_empty(), "a field must have at least one path");
        Self {
            name: name.into(),
            paths,
            transform: None,
            trigger: true,
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Marks the field as not trigger-participating: its value is derived
    /// from data the trigger layer does not monitor directly, typically
    /// because some other trigger's side effect keeps it current (`spec.md`
    /// §3, e.g. denormalized counts like `ref_count`).
    pub fn no_trigger(mut self) -> Self {
        self.trigger = false;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    pub fn transform(&self) -> Option<Transform> {
        self.transform
    }

    pub fn trigger(&self) -> bool {
        self.trigger
    }
}
