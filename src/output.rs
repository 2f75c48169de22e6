use crate::cli::OutputFormat;
use crate::events::DocumentChange;

/// Render a change for the terminal in the requested format
pub fn format_change(
    change: &DocumentChange,
    format: &OutputFormat,
    no_color: bool,
) -> serde_json::Result<String> {
    match format {
        OutputFormat::Json => change.to_json(),
        OutputFormat::Text => Ok(format_text(change, no_color)),
    }
}

/// Print a change to stdout. A change that fails to format is logged and
/// dropped; returns whether anything was printed.
pub fn emit_change(change: &DocumentChange, format: &OutputFormat, no_color: bool) -> bool {
    match format_change(change, format, no_color) {
        Ok(text) => {
            println!("{}", text);
            true
        }
        Err(err) => {
            tracing::error!("Failed to serialize change for {}: {}", change.path.display(), err);
            false
        }
    }
}

fn format_text(change: &DocumentChange, no_color: bool) -> String {
    let time_str = chrono::DateTime::<chrono::Local>::from(change.timestamp).format("%H:%M:%S");

    let mut lines = Vec::new();
    if no_color {
        lines.push(format!("[{}] CHANGED {}", time_str, change.path.display()));
    } else {
        lines.push(format!("[{}] \x1b[33mCHANGED\x1b[0m {}", time_str, change.path.display()));
    }

    for line in change.diff.lines() {
        if no_color || line.starts_with("---") || line.starts_with("+++") {
            lines.push(line.to_string());
        } else if line.starts_with('+') {
            lines.push(format!("\x1b[32m{}\x1b[0m", line));
        } else if line.starts_with('-') {
            lines.push(format!("\x1b[31m{}\x1b[0m", line));
        } else if line.starts_with("@@") {
            lines.push(format!("\x1b[36m{}\x1b[0m", line));
        } else {
            lines.push(line.to_string());
        }
    }

    // Blank line between changes
    lines.push(String::new());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::DiffStats;
    use std::path::PathBuf;

    fn sample(path: PathBuf) -> DocumentChange {
        DocumentChange::new(
            path,
            "--- a.plist\n+++ a.plist\n@@ -1,1 +1,1 @@\n-'x' : text = \"1\"\n+'x' : text = \"2\"\n"
                .to_string(),
            DiffStats {
                lines_added: 1,
                lines_removed: 1,
                hunks: 1,
            },
        )
    }

    #[test]
    fn test_format_json() {
        let change = sample(PathBuf::from("a.plist"));

        let json = format_change(&change, &OutputFormat::Json, true).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed["path"], "a.plist");
        assert_eq!(parsed["stats"]["hunks"], 1);
        assert!(parsed["diff"].as_str().unwrap().contains("+'x' : text = \"2\""));
    }

    #[test]
    fn test_format_text_plain() {
        let change = sample(PathBuf::from("a.plist"));

        let text = format_change(&change, &OutputFormat::Text, true).unwrap();

        assert!(text.contains("CHANGED a.plist"));
        assert!(text.contains("\n-'x' : text = \"1\"\n+'x' : text = \"2\"\n"));
        assert!(!text.contains('\x1b'));
    }

    #[test]
    fn test_format_text_colored() {
        let change = sample(PathBuf::from("a.plist"));

        let text = format_change(&change, &OutputFormat::Text, false).unwrap();

        assert!(text.contains("\x1b[32m+'x' : text = \"2\"\x1b[0m"));
        assert!(text.contains("\n--- a.plist\n"));
    }

    #[cfg(unix)]
    #[test]
    fn test_unserializable_change_is_dropped() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let change = sample(PathBuf::from(OsStr::from_bytes(b"/tmp/prefs/\xffbad.plist")));

        assert!(format_change(&change, &OutputFormat::Json, true).is_err());
        assert!(!emit_change(&change, &OutputFormat::Json, true));
        // Text output still works for the same change
        assert!(emit_change(&change, &OutputFormat::Text, true));
    }
}
