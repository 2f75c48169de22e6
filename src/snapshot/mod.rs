//! Flattening documents into snapshots
//!
//! A [`Snapshot`] is the list of every scalar in a document tagged with the
//! [`Path`] that reaches it. Snapshots are compared through their canonical
//! text form (see [`render`]), which sorts entries by path so traversal
//! order never leaks into a diff.

pub mod render;

use std::fmt;

use crate::document::Value;

pub use render::{render, render_scalar};

/// One step from a container into a child.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => write!(f, "'{}'", key.escape_debug()),
            Self::Index(index) => write!(f, "{}", index),
        }
    }
}

/// Location of a leaf inside a document.
///
/// Renders as the segments joined by `.`, with keys single-quoted and
/// indices bare, e.g. `'a'.'b'.0`. The root path renders as `.`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path {
    segments: Vec<PathSegment>,
}

impl Path {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn child(&self, segment: PathSegment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }

    pub fn key(&self, key: impl Into<String>) -> Self {
        self.child(PathSegment::Key(key.into()))
    }

    pub fn index(&self, index: usize) -> Self {
        self.child(PathSegment::Index(index))
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str(".");
        }
        for (idx, segment) in self.segments.iter().enumerate() {
            if idx > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

impl FromIterator<PathSegment> for Path {
    fn from_iter<I: IntoIterator<Item = PathSegment>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().collect(),
        }
    }
}

/// A single scalar with its location, kind and canonical rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafEntry {
    pub path: Path,
    pub type_tag: String,
    pub rendered_value: String,
}

impl fmt::Display for LeafEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : {} = {}", self.path, self.type_tag, self.rendered_value)
    }
}

/// A node that was skipped because its kind is not supported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub path: Path,
    pub kind: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognized value kind '{}' at {}", self.kind, self.path)
    }
}

/// Every leaf of one document at one point in time, in traversal order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    entries: Vec<LeafEntry>,
    diagnostics: Vec<Diagnostic>,
}

impl Snapshot {
    pub fn from_entries(entries: Vec<LeafEntry>) -> Self {
        Self {
            entries,
            diagnostics: Vec::new(),
        }
    }

    pub fn entries(&self) -> &[LeafEntry] {
        &self.entries
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Canonical sorted text form, see [`render`].
    pub fn render(&self) -> String {
        render(self)
    }
}

/// Walk `root` depth-first and collect one [`LeafEntry`] per scalar.
///
/// Containers only contribute path segments. Unrecognized nodes produce a
/// [`Diagnostic`] (also logged) instead of an entry, and traversal carries
/// on with their siblings.
pub fn flatten(root: &Value) -> Snapshot {
    let mut snapshot = Snapshot::default();
    let mut segments = Vec::new();
    walk(root, &mut segments, &mut snapshot);
    snapshot
}

fn walk(value: &Value, segments: &mut Vec<PathSegment>, snapshot: &mut Snapshot) {
    match value {
        Value::Dictionary(entries) => {
            for (key, child) in entries {
                segments.push(PathSegment::Key(key.clone()));
                walk(child, segments, snapshot);
                segments.pop();
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                segments.push(PathSegment::Index(index));
                walk(child, segments, snapshot);
                segments.pop();
            }
        }
        Value::Unrecognized { kind } => {
            let diagnostic = Diagnostic {
                path: segments.iter().cloned().collect(),
                kind: kind.clone(),
            };
            tracing::warn!("{}", diagnostic);
            snapshot.diagnostics.push(diagnostic);
        }
        scalar => {
            if let Some(rendered_value) = render_scalar(scalar) {
                snapshot.entries.push(LeafEntry {
                    path: segments.iter().cloned().collect(),
                    type_tag: scalar.kind().to_string(),
                    rendered_value,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn paths(snapshot: &Snapshot) -> Vec<String> {
        snapshot.entries().iter().map(|e| e.path.to_string()).collect()
    }

    #[test]
    fn test_path_display() {
        assert_eq!(Path::root().to_string(), ".");
        assert_eq!(Path::root().key("a").key("b").index(0).to_string(), "'a'.'b'.0");
        assert_eq!(Path::root().key("it's").to_string(), r"'it\'s'");
        assert_eq!(Path::root().key("a.b").to_string(), "'a.b'");
    }

    #[test]
    fn test_flatten_nested() {
        let doc = Value::dictionary([(
            "a",
            Value::dictionary([("b", Value::Array(vec![Value::Signed(1), Value::Signed(2)]))]),
        )]);

        let snapshot = flatten(&doc);

        assert_eq!(paths(&snapshot), vec!["'a'.'b'.0", "'a'.'b'.1"]);
        assert_eq!(snapshot.entries()[0].type_tag, "signed");
        assert_eq!(snapshot.entries()[1].rendered_value, "2");
        assert!(snapshot.diagnostics().is_empty());
    }

    #[test]
    fn test_containers_produce_no_entries() {
        let doc = Value::dictionary([
            ("empty_dict", Value::Dictionary(vec![])),
            ("empty_list", Value::Array(vec![])),
        ]);

        let snapshot = flatten(&doc);

        assert!(snapshot.is_empty());
        assert!(snapshot.diagnostics().is_empty());
    }

    #[test]
    fn test_scalar_root() {
        let snapshot = flatten(&Value::from("alone"));

        assert_eq!(snapshot.len(), 1);
        assert!(snapshot.entries()[0].path.is_root());
        assert_eq!(snapshot.entries()[0].to_string(), r#". : text = "alone""#);
    }

    #[test]
    fn test_unrecognized_kind_is_skipped() {
        let doc = Value::dictionary([
            ("keep", Value::from("yes")),
            ("odd", Value::unrecognized("uid")),
            (
                "list",
                Value::Array(vec![Value::Boolean(false), Value::Signed(4)]),
            ),
        ]);

        let snapshot = flatten(&doc);

        assert_eq!(paths(&snapshot), vec!["'keep'", "'list'.0", "'list'.1"]);
        assert_eq!(snapshot.diagnostics().len(), 1);
        assert_eq!(snapshot.diagnostics()[0].path.to_string(), "'odd'");
        assert_eq!(snapshot.diagnostics()[0].kind, "uid");
    }

    #[test]
    fn test_paths_are_unique() {
        let doc = Value::dictionary([
            ("a", Value::Array(vec![Value::from("x"), Value::from("y")])),
            ("a.0", Value::from("z")),
            ("a'.'0", Value::from("w")),
            ("b", Value::dictionary([("0", Value::from("v"))])),
        ]);

        let snapshot = flatten(&doc);
        let unique: HashSet<String> = paths(&snapshot).into_iter().collect();

        assert_eq!(unique.len(), snapshot.len());
        assert_eq!(snapshot.len(), 5);
    }

    #[test]
    fn test_flatten_is_stable() {
        let doc = Value::dictionary([
            ("z", Value::from(1i64)),
            ("m", Value::Array(vec![Value::from(true)])),
        ]);

        assert_eq!(flatten(&doc), flatten(&doc));
    }
}
