use crate::value::{Branch, FieldValue};

/// A field transform: a pure function from the branch values a path (or set
/// of paths) materialized down to the single indexed value. `spec.md` §3
/// requires transforms to be pure and total on valid inputs; each variant
/// here is a closed, hand-picked set rather than an arbitrary closure so the
/// whole registry stays introspectable and `Eq`-comparable for the
/// idempotence tests in `spec.md` §8 property 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// Renders a partial begin/end date (year, optional month, optional day)
    /// as `"YYYY"`, `"YYYY-MM"` or `"YYYY-MM-DD"`, omitting unknown
    /// trailing components.
    IndexPartialDateToString,
    /// `ended` is a plain boolean column; rendered as `"true"`/`"false"`.
    EndedToString,
    /// Sums a fanned-out list of integer counts, treating non-numeric
    /// branches as zero.
    IntegerSum,
    /// Sums a fanned-out list of numeric branches, keeping the result a
    /// float if any input was.
    Sum,
    /// Quantizes a recording length in milliseconds into a coarse duration
    /// bucket so near-equal lengths are searchable as equal.
    Qdur,
    /// Canonicalizes a truthy column into `"true"`/`"false"`.
    Boolean,
    /// Replaces a null branch with an empty string (used for `barcode`,
    /// which should be indexed as present-but-empty rather than absent).
    FillNone,
    /// Extracts the latitude half of a `(lat, long)` coordinate pair.
    Lat,
    /// Extracts the longitude half of a `(lat, long)` coordinate pair.
    Long,
    /// Picks the one branch of a `__tablename__` fan-out that actually
    /// resolved (Design Notes: "Multi-entity polymorphic fields") and
    /// derives the entity type tag from its originating path.
    AnnotationType,
    /// Same idea as [`Transform::AnnotationType`], scoped to URL entity
    /// targets (`artist` / `release`).
    UrlType,
}

impl Transform {
    pub fn apply(self, branches: &[Branch<'_>]) -> FieldValue {
        match self {
            Transform::IndexPartialDateToString => partial_date_to_string(branches),
            Transform::EndedToString => boolean_to_string(branches),
            Transform::IntegerSum => integer_sum(branches),
            Transform::Sum => sum(branches),
            Transform::Qdur => qdur(branches),
            Transform::Boolean => boolean_to_string(branches),
            Transform::FillNone => fill_none(branches),
            Transform::Lat => coordinate(branches, 0),
            Transform::Long => coordinate(branches, 1),
            Transform::AnnotationType | Transform::UrlType => tablename_branch_type(branches),
        }
    }
}

fn partial_date_to_string(branches: &[Branch<'_>]) -> FieldValue {
    let Some(first) = branches.first() else {
        return FieldValue::Null;
    };
    let parts = match &first.value {
        FieldValue::List(parts) => parts.clone(),
        FieldValue::Null => return FieldValue::Null,
        other => vec![other.clone()],
    };
    let mut out = String::new();
    for (i, part) in parts.iter().enumerate() {
        let FieldValue::Int(n) = part else { break };
        if i == 0 {
            out.push_str(&format!("{n:04}"));
        } else {
            out.push_str(&format!("-{n:02}"));
        }
    }
    if out.is_empty() {
        FieldValue::Null
    } else {
        FieldValue::Text(out)
    }
}

fn boolean_to_string(branches: &[Branch<'_>]) -> FieldValue {
    let truthy = branches.first().is_some_and(|b| match &b.value {
        FieldValue::Bool(b) => *b,
        FieldValue::Int(n) => *n != 0,
        _ => false,
    });
    FieldValue::Text(truthy.to_string())
}

fn integer_sum(branches: &[Branch<'_>]) -> FieldValue {
    let total: i64 = branches
        .iter()
        .flat_map(|b| b.value.clone().flatten())
        .filter_map(|v| v.as_int())
        .sum();
    FieldValue::Int(total)
}

fn sum(branches: &[Branch<'_>]) -> FieldValue {
    let values: Vec<FieldValue> = branches
        .iter()
        .flat_map(|b| b.value.clone().flatten())
        .collect();
    if values.iter().any(|v| matches!(v, FieldValue::Float(_))) {
        let total: f64 = values
            .iter()
            .filter_map(|v| match v {
                FieldValue::Int(n) => Some(*n as f64),
                FieldValue::Float(f) => Some(*f),
                _ => None,
            })
            .sum();
        FieldValue::Float(total)
    } else {
        integer_sum(branches)
    }
}

/// Buckets a length in milliseconds into quarter-second-wide buckets, as a
/// cheap approximation for "close enough" duration search.
fn qdur(branches: &[Branch<'_>]) -> FieldValue {
    match branches.first().and_then(|b| b.value.as_int()) {
        Some(ms) => FieldValue::Int(ms / 250),
        None => FieldValue::Null,
    }
}

fn fill_none(branches: &[Branch<'_>]) -> FieldValue {
    match branches.first() {
        Some(b) if !b.value.is_null() => b.value.clone(),
        _ => FieldValue::Text(String::new()),
    }
}

fn coordinate(branches: &[Branch<'_>], index: usize) -> FieldValue {
    match branches.first().map(|b| &b.value) {
        Some(FieldValue::List(parts)) => parts.get(index).cloned().unwrap_or(FieldValue::Null),
        _ => FieldValue::Null,
    }
}

fn tablename_branch_type(branches: &[Branch<'_>]) -> FieldValue {
    for branch in branches {
        if branch.value.is_null() {
            continue;
        }
        let first_segment = branch.path.split('.').next().unwrap_or(branch.path);
        let singular = first_segment.strip_suffix('s').unwrap_or(first_segment);
        return FieldValue::Text(singular.to_string());
    }
    FieldValue::Null
}
