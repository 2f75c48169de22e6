//! Diff generation and formatting module
//!
//! Line-level diffs between two canonical snapshot renderings. The edit
//! script comes from `similar`; grouping into hunks and unified formatting
//! happen here.

pub mod algorithms;
pub mod formatter;
pub mod generator;

// Re-export the main types for easier use
pub use algorithms::{
    DiffAlgorithm, DiffAlgorithmType, DiffHunk, DiffOperation, DiffResult, DiffStats, LcsAlgorithm,
    MyersAlgorithm, PatienceAlgorithm,
};

pub use formatter::DiffFormatter;
pub use generator::{DiffConfig, DiffGenerator, DEFAULT_CONTEXT_LINES};

/// Unified diff of `before` against `after` with default settings.
///
/// `label` names both sides in the `---`/`+++` headers. Identical inputs
/// give an empty string.
pub fn diff(before: &str, after: &str, label: &str) -> String {
    let generator = DiffGenerator::default();
    let result = generator.generate(before, after);
    DiffFormatter::format_unified(&result, label, label)
}

/// Convenience function to get diff statistics
pub fn get_diff_stats(old: &str, new: &str) -> DiffStats {
    let generator = DiffGenerator::default();
    let result = generator.generate(old, new);
    result.stats
}
