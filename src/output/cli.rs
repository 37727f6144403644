use crate::model::ScanResult;
use std::fmt::Write;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct RecordRow {
    #[tabled(rename = "Mod ID")]
    identifier: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Version")]
    version: String,
}

pub fn print_records_table(result: &ScanResult) {
    println!();
    if result.records.is_empty() {
        println!("No mods found.");
        return;
    }

    let rows: Vec<RecordRow> = result
        .records
        .iter()
        .map(|r| RecordRow {
            identifier: truncate(&r.identifier, 40),
            name: truncate(&r.display_name, 40),
            version: truncate(&r.version, 30),
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{}", table);
}

pub fn print_summary(result: &ScanResult, max_skipped_shown: usize) {
    print!("{}", render_summary(result, max_skipped_shown));
}

/// Builds the end-of-scan report.
///
/// At most `max_skipped_shown` skipped files are listed by name; the rest
/// are collapsed into a count.
pub fn render_summary(result: &ScanResult, max_skipped_shown: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Scan completed at {}: processed {} mods, skipped {} files",
        result.scan_time.format("%Y-%m-%d %H:%M:%S UTC"),
        result.records.len(),
        result.skipped.len()
    );

    if !result.skipped.is_empty() {
        let _ = writeln!(out, "Skipped files:");
        for name in result.skipped.iter().take(max_skipped_shown) {
            let _ = writeln!(out, " - {}", name);
        }
        if result.skipped.len() > max_skipped_shown {
            let _ = writeln!(
                out,
                " - and {} more files...",
                result.skipped.len() - max_skipped_shown
            );
        }
    }

    out
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModRecord;

    fn result_with_skipped(count: usize) -> ScanResult {
        (0..count).fold(
            ScanResult::new().absorb("ok.jar".into(), Some(vec![ModRecord::new("ok", "ok", "1")])),
            |result, i| result.absorb(format!("bad{}.jar", i), None),
        )
    }

    #[test]
    fn test_summary_counts() {
        let summary = render_summary(&result_with_skipped(2), 10);

        assert!(summary.contains("processed 1 mods, skipped 2 files"));
        assert!(summary.contains(" - bad0.jar\n"));
        assert!(summary.contains(" - bad1.jar\n"));
        assert!(!summary.contains("more files"));
    }

    #[test]
    fn test_summary_collapses_long_skip_list() {
        let summary = render_summary(&result_with_skipped(13), 10);

        assert!(summary.contains(" - bad9.jar\n"));
        assert!(!summary.contains(" - bad10.jar\n"));
        assert!(summary.contains(" - and 3 more files...\n"));
    }

    #[test]
    fn test_summary_without_skips() {
        let summary = render_summary(&result_with_skipped(0), 10);
        assert!(!summary.contains("Skipped files"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a-very-long-mod-identifier", 10), "a-very-...");
    }
}
