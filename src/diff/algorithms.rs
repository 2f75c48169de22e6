use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use similar::{Algorithm, ChangeTag, TextDiff};

/// Trait defining a line diff algorithm
pub trait DiffAlgorithm: Send + Sync {
    /// Diff `old` against `new` line by line, keeping `context` unchanged
    /// lines around every run of changes
    fn diff(&self, old: &str, new: &str, context: usize) -> DiffResult;

    /// Get the algorithm name
    fn name(&self) -> &'static str;
}

/// Result of a diff operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffResult {
    pub hunks: Vec<DiffHunk>,
    pub stats: DiffStats,
}

impl DiffResult {
    pub fn is_empty(&self) -> bool {
        self.hunks.is_empty()
    }
}

/// A contiguous block of changes with surrounding context.
///
/// Starts are 0-based line offsets into the old and new text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffHunk {
    pub old_start: usize,
    pub old_len: usize,
    pub new_start: usize,
    pub new_len: usize,
    pub operations: Vec<DiffOperation>,
}

/// Individual diff operation, one line each including its line break
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffOperation {
    Equal(String),
    Insert(String),
    Delete(String),
}

/// Statistics about the diff
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffStats {
    pub lines_added: usize,
    pub lines_removed: usize,
    pub hunks: usize,
}

impl DiffStats {
    pub fn total_changes(&self) -> usize {
        self.lines_added + self.lines_removed
    }

    pub fn net_change(&self) -> isize {
        self.lines_added as isize - self.lines_removed as isize
    }
}

/// Myers' shortest edit script
pub struct MyersAlgorithm;

impl DiffAlgorithm for MyersAlgorithm {
    fn diff(&self, old: &str, new: &str, context: usize) -> DiffResult {
        diff_with(Algorithm::Myers, old, new, context)
    }

    fn name(&self) -> &'static str {
        "Myers"
    }
}

/// Patience diff algorithm
pub struct PatienceAlgorithm;

impl DiffAlgorithm for PatienceAlgorithm {
    fn diff(&self, old: &str, new: &str, context: usize) -> DiffResult {
        diff_with(Algorithm::Patience, old, new, context)
    }

    fn name(&self) -> &'static str {
        "Patience"
    }
}

/// LCS (Longest Common Subsequence) diff algorithm
pub struct LcsAlgorithm;

impl DiffAlgorithm for LcsAlgorithm {
    fn diff(&self, old: &str, new: &str, context: usize) -> DiffResult {
        diff_with(Algorithm::Lcs, old, new, context)
    }

    fn name(&self) -> &'static str {
        "LCS"
    }
}

// Shared conversion from similar's grouped ops into our hunks
fn diff_with(algorithm: Algorithm, old: &str, new: &str, context: usize) -> DiffResult {
    if old == new {
        return DiffResult::default();
    }

    let diff = TextDiff::configure().algorithm(algorithm).diff_lines(old, new);

    let mut hunks = Vec::new();
    let mut stats = DiffStats::default();

    for group in diff.grouped_ops(context) {
        let (Some(first), Some(last)) = (group.first(), group.last()) else {
            continue;
        };

        let old_start = first.old_range().start;
        let new_start = first.new_range().start;
        let old_len = last.old_range().end - old_start;
        let new_len = last.new_range().end - new_start;

        let mut operations = Vec::new();
        for op in &group {
            for change in diff.iter_changes(op) {
                let content = change.value().to_string();

                match change.tag() {
                    ChangeTag::Equal => {
                        operations.push(DiffOperation::Equal(content));
                    }
                    ChangeTag::Insert => {
                        operations.push(DiffOperation::Insert(content));
                        stats.lines_added += 1;
                    }
                    ChangeTag::Delete => {
                        operations.push(DiffOperation::Delete(content));
                        stats.lines_removed += 1;
                    }
                }
            }
        }

        hunks.push(DiffHunk {
            old_start,
            old_len,
            new_start,
            new_len,
            operations,
        });
    }

    stats.hunks = hunks.len();

    DiffResult { hunks, stats }
}

/// Available diff algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffAlgorithmType {
    #[default]
    Myers,
    Patience,
    Lcs,
}

impl DiffAlgorithmType {
    pub fn all() -> &'static [DiffAlgorithmType] {
        &[Self::Myers, Self::Patience, Self::Lcs]
    }

    pub fn create(&self) -> Box<dyn DiffAlgorithm> {
        match self {
            Self::Myers => Box::new(MyersAlgorithm),
            Self::Patience => Box::new(PatienceAlgorithm),
            Self::Lcs => Box::new(LcsAlgorithm),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Myers => "Myers",
            Self::Patience => "Patience",
            Self::Lcs => "LCS",
        }
    }
}

impl std::fmt::Display for DiffAlgorithmType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for DiffAlgorithmType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "myers" => Ok(Self::Myers),
            "patience" => Ok(Self::Patience),
            "lcs" => Ok(Self::Lcs),
            other => Err(format!("unknown diff algorithm: {}", other)),
        }
    }
}
