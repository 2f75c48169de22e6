use super::algorithms::{DiffOperation, DiffResult};

/// Formats diff results into text
pub struct DiffFormatter;

impl DiffFormatter {
    /// Format a diff result as a unified diff.
    ///
    /// An empty result formats to an empty string, headers included.
    pub fn format_unified(result: &DiffResult, old_label: &str, new_label: &str) -> String {
        if result.is_empty() {
            return String::new();
        }

        let mut output = Vec::new();
        output.push(format!("--- {}", old_label));
        output.push(format!("+++ {}", new_label));

        for hunk in &result.hunks {
            output.push(format!(
                "@@ -{} +{} @@",
                Self::hunk_range(hunk.old_start, hunk.old_len),
                Self::hunk_range(hunk.new_start, hunk.new_len)
            ));

            for op in &hunk.operations {
                let (sign, line) = match op {
                    DiffOperation::Equal(line) => (' ', line),
                    DiffOperation::Insert(line) => ('+', line),
                    DiffOperation::Delete(line) => ('-', line),
                };
                match line.strip_suffix('\n') {
                    Some(line) => output.push(format!("{}{}", sign, line)),
                    None => {
                        output.push(format!("{}{}", sign, line));
                        output.push("\\ No newline at end of file".to_string());
                    }
                }
            }
        }

        let mut text = output.join("\n");
        text.push('\n');
        text
    }

    // 1-based start, or the line before the hunk when the side is empty
    fn hunk_range(start: usize, len: usize) -> String {
        if len == 0 {
            format!("{},0", start)
        } else {
            format!("{},{}", start + 1, len)
        }
    }

    /// Format diff statistics as a summary
    pub fn format_stats(result: &DiffResult) -> String {
        let stats = &result.stats;

        if stats.total_changes() == 0 {
            return "No changes".to_string();
        }

        let mut parts = Vec::new();

        if stats.lines_added > 0 {
            parts.push(format!(
                "{} insertion{}",
                stats.lines_added,
                if stats.lines_added == 1 { "" } else { "s" }
            ));
        }

        if stats.lines_removed > 0 {
            parts.push(format!(
                "{} deletion{}",
                stats.lines_removed,
                if stats.lines_removed == 1 { "" } else { "s" }
            ));
        }

        if stats.hunks > 0 {
            parts.push(format!(
                "{} hunk{}",
                stats.hunks,
                if stats.hunks == 1 { "" } else { "s" }
            ));
        }

        parts.join(", ")
    }
}
