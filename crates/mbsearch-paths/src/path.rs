use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Segment that stands for the terminal entity's table name as a value,
/// rather than a relationship or column. Used when a single logical field
/// unions several physical tables (annotations, url link types).
pub const TABLENAME_SENTINEL: &str = "__tablename__";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("path must not be empty")]
    Empty,
}

/// A non-empty dotted relationship path, e.g. `artist_credit.artists.artist.gid`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Path(String);

impl Path {
    /// Parse and validate a raw dotted path string.
    pub fn parse(raw: impl Into<String>) -> Result<Self, PathError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(PathError::Empty);
        }
        Ok(Path(raw))
    }

    /// Build a path from a string already known to be well-formed (e.g.
    /// segments re-joined by [`crate::unique_split_paths`]).
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        debug_assert!(!raw.is_empty(), "path must not be empty");
        Path(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }

    pub fn last_segment(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }
}

impl std::fmt::Display for Path {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Path {
    fn from(s: &str) -> Self {
        Path::new(s)
    }
}

impl From<String> for Path {
    fn from(s: String) -> Self {
        Path::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty() {
        assert_eq!(Path::parse("").unwrap_err(), PathError::Empty);
    }

    #[test]
    fn segments_split_on_dot() {
        let path = Path::new("artist_credit.artists.artist.gid");
        let segs: Vec<&str> = path.segments().collect();
        assert_eq!(segs, vec!["artist_credit", "artists", "artist", "gid"]);
        assert_eq!(path.last_segment(), "gid");
    }

    #[test]
    fn single_segment_path() {
        let path = Path::new("gid");
        assert_eq!(path.last_segment(), "gid");
        assert_eq!(path.segments().count(), 1);
    }
}
