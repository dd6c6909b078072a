use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::diff::{unified_diff, DEFAULT_CONTEXT};
use crate::error::{PurseError, Result};
use crate::models::{LedgerFormat, Record};
use crate::parser::{parse, split};

/// The ledger file as read from disk: header plus data lines, line endings
/// stripped.
#[derive(Debug, Clone)]
pub struct Ledger {
    path: PathBuf,
    lines: Vec<String>,
}

impl Ledger {
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(PurseError::MissingProfile(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        let lines: Vec<String> = content.lines().map(str::to_string).collect();
        debug!(path = %path.display(), lines = lines.len(), "read ledger");
        Ok(Self::from_lines(path, lines))
    }

    pub fn from_lines(path: &Path, lines: Vec<String>) -> Self {
        Self {
            path: path.to_path_buf(),
            lines,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn header(&self) -> &str {
        self.lines.first().map(String::as_str).unwrap_or("")
    }

    pub fn format(&self) -> LedgerFormat {
        LedgerFormat::detect(self.header()).0
    }

    fn data_lines(&self) -> &[String] {
        self.lines.get(1..).unwrap_or(&[])
    }

    /// Records that parse. Lines that don't are left to `lint`.
    pub fn records(&self) -> Vec<Record> {
        let format = self.format();
        let mut records = Vec::with_capacity(self.lines.len());
        let mut skipped = 0;
        for (idx, raw) in self.lines.iter().enumerate().skip(1) {
            match parse(idx + 1, raw, format) {
                Ok(record) => records.push(record),
                Err(_) => skipped += 1,
            }
        }
        if skipped > 0 {
            warn!(skipped, "unparseable lines left out; run `purse lint` for details");
        }
        records
    }

    /// Data lines in stable date order. Lines are keyed on their first
    /// field, so lines that fail to parse still move with their date.
    pub fn sorted_by_date(&self) -> Vec<&str> {
        let mut keyed: Vec<(String, &str)> = self
            .data_lines()
            .iter()
            .map(|line| {
                let key = split(line)
                    .fields
                    .into_iter()
                    .next()
                    .map(|f| f.value)
                    .unwrap_or_default();
                (key, line.as_str())
            })
            .collect();
        keyed.sort_by(|a, b| a.0.cmp(&b.0));
        keyed.into_iter().map(|(_, line)| line).collect()
    }

    /// Re-sort the file by date. Returns the diff that was applied; the file
    /// is only rewritten when the order changed.
    pub fn sort_in_place(&self) -> Result<String> {
        let original: Vec<&str> = self.data_lines().iter().map(String::as_str).collect();
        let sorted = self.sorted_by_date();
        let label = self.path.display().to_string();
        let diff = unified_diff(
            &original,
            &sorted,
            &label,
            &format!("{label} (sorted by date)"),
            DEFAULT_CONTEXT,
        );
        if diff.is_empty() {
            debug!("ledger already sorted");
            return Ok(diff);
        }

        let mut out = String::with_capacity(self.lines.iter().map(|l| l.len() + 1).sum());
        out.push_str(self.header());
        out.push('\n');
        for line in &sorted {
            out.push_str(line);
            out.push('\n');
        }
        std::fs::write(&self.path, out)?;
        info!(path = %self.path.display(), "rewrote ledger in date order");
        Ok(diff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Date,Category,Amount,Method,Notes";

    fn write(dir: &tempfile::TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("ledger.csv");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Ledger::open(&dir.path().join("nope.csv")).unwrap_err();
        assert!(err.to_string().starts_with("MISSING_PROFILE"));
    }

    #[test]
    fn test_crlf_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "Date,Category,Amount,Method,Notes\r\n2024-01-01,\"A\",-1.00,\"B\",\r\n",
        );
        let ledger = Ledger::open(&path).unwrap();
        assert_eq!(ledger.lines().len(), 2);
        assert_eq!(ledger.header(), HEADER);
        assert_eq!(ledger.records().len(), 1);
        assert_eq!(ledger.records()[0].line(), 2);
    }

    #[test]
    fn test_records_skip_broken_lines() {
        let ledger = Ledger::from_lines(
            Path::new("x.csv"),
            vec![
                HEADER.into(),
                "a,b,c".into(),
                r#"2024-01-02,"A",-1.00,"B","#.into(),
            ],
        );
        let records = ledger.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].line(), 3);
    }

    #[test]
    fn test_extended_format_detected() {
        let ledger = Ledger::from_lines(
            Path::new("x.csv"),
            vec![
                "Date,Category,Amount,Method,Description,Notes".into(),
                r#"2024-01-02,"A",-1.00,"B","Hosting","#.into(),
            ],
        );
        assert_eq!(ledger.format(), LedgerFormat::Extended);
        assert_eq!(ledger.records()[0].description(), "Hosting");
    }

    #[test]
    fn test_sort_in_place_rewrites_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            &[
                HEADER,
                r#"2024-01-03,"A",-3.00,"B","#,
                r#"2024-01-01,"A",-1.00,"B","#,
                r#"2024-01-02,"A",-2.00,"B","#,
                "",
            ]
            .join("\n"),
        );
        let diff = Ledger::open(&path).unwrap().sort_in_place().unwrap();
        assert!(diff.contains("@@ -1,3 +1,3 @@"));

        let content = std::fs::read_to_string(&path).unwrap();
        let dates: Vec<&str> = content.lines().skip(1).map(|l| &l[..10]).collect();
        assert_eq!(dates, vec!["2024-01-01", "2024-01-02", "2024-01-03"]);

        let again = Ledger::open(&path).unwrap().sort_in_place().unwrap();
        assert!(again.is_empty());
    }

    #[test]
    fn test_sort_is_stable() {
        let ledger = Ledger::from_lines(
            Path::new("x.csv"),
            vec![
                HEADER.into(),
                r#"2024-01-02,"Second",-1.00,"B","#.into(),
                r#"2024-01-01,"A",-1.00,"B","#.into(),
                r#"2024-01-02,"First",-1.00,"B","#.into(),
            ],
        );
        let sorted = ledger.sorted_by_date();
        assert!(sorted[1].contains("Second"));
        assert!(sorted[2].contains("First"));
    }
}
