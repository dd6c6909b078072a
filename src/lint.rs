//! Ledger linting.
//!
//! Every line is parsed and checked against the field rule table, then the
//! whole file is checked for date order and duplicate items. Findings come
//! back in file order: header first, per-line findings next, whole-file
//! findings last. Nothing here touches the file on disk.

use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use crate::categorizer::{CategoryClassifier, CategoryKind};
use crate::diff::{unified_diff, DEFAULT_CONTEXT};
use crate::models::{Field, LedgerFormat, Record};
use crate::parser::{parse, ParseFailure};
use crate::select::{sort_records, SortSpec};
use crate::validators::{check_whitespace, FIELD_RULES, WHITESPACE_FIELDS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FindingKind {
    CsvHeadersMismatch,
    ParseFailure,
    FieldsCountMismatch,
    WhitespaceMismatch,
    DateMismatch,
    CategoryMismatch,
    AmountMismatch,
    MethodMismatch,
    DescriptionMismatch,
    NotesMismatch,
    SortByDateMismatch,
    UniquenessMismatch,
    IncomeIsNegative,
    ExpenseIsPositive,
}

pub const ALL_KINDS: &[FindingKind] = &[
    FindingKind::CsvHeadersMismatch,
    FindingKind::ParseFailure,
    FindingKind::FieldsCountMismatch,
    FindingKind::WhitespaceMismatch,
    FindingKind::DateMismatch,
    FindingKind::CategoryMismatch,
    FindingKind::AmountMismatch,
    FindingKind::MethodMismatch,
    FindingKind::DescriptionMismatch,
    FindingKind::NotesMismatch,
    FindingKind::SortByDateMismatch,
    FindingKind::UniquenessMismatch,
    FindingKind::IncomeIsNegative,
    FindingKind::ExpenseIsPositive,
];

impl FindingKind {
    pub fn code(&self) -> &'static str {
        match self {
            Self::CsvHeadersMismatch => "CSV_HEADERS_MISMATCH",
            Self::ParseFailure => "PARSE_FAILURE",
            Self::FieldsCountMismatch => "FIELDS_COUNT_MISMATCH",
            Self::WhitespaceMismatch => "WHITESPACE_MISMATCH",
            Self::DateMismatch => "DATE_MISMATCH",
            Self::CategoryMismatch => "CATEGORY_MISMATCH",
            Self::AmountMismatch => "AMOUNT_MISMATCH",
            Self::MethodMismatch => "METHOD_MISMATCH",
            Self::DescriptionMismatch => "DESCRIPTION_MISMATCH",
            Self::NotesMismatch => "NOTES_MISMATCH",
            Self::SortByDateMismatch => "SORT_BY_DATE_MISMATCH",
            Self::UniquenessMismatch => "UNIQUENESS_MISMATCH",
            Self::IncomeIsNegative => "INCOME_IS_NEGATIVE",
            Self::ExpenseIsPositive => "EXPENSE_IS_POSITIVE",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::CsvHeadersMismatch => "CSV headers match",
            Self::ParseFailure => "Items have the expected number of fields and a numeric amount",
            Self::FieldsCountMismatch => "Quotes do not shift field boundaries",
            Self::WhitespaceMismatch => "Date, category, amount and method are not blank or padded",
            Self::DateMismatch => "Dates are valid YYYY-MM-DD calendar dates",
            Self::CategoryMismatch => "Categories are quoted colon-separated paths without empty segments",
            Self::AmountMismatch => "Amounts have two decimals, no '+' sign and no separators",
            Self::MethodMismatch => "Methods are quoted and contain no ':' or \"'\"",
            Self::DescriptionMismatch => "Descriptions are blank or quoted text without ':'",
            Self::NotesMismatch => "Notes are blank or quoted text without ':'",
            Self::SortByDateMismatch => "Items are sorted by date",
            Self::UniquenessMismatch => "Items are unique",
            Self::IncomeIsNegative => "Income categories have non-negative amounts",
            Self::ExpenseIsPositive => "Expense categories have non-positive amounts",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::IncomeIsNegative | Self::ExpenseIsPositive => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for FindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A violated rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Finding {
    pub kind: FindingKind,
    /// 1-based line in the file; the header is line 1.
    pub line: usize,
    pub severity: Severity,
    pub message: String,
    /// Proposed correction for whole-file findings.
    pub diff: Option<String>,
}

impl Finding {
    pub fn new(kind: FindingKind, line: usize, message: impl Into<String>) -> Self {
        Self {
            kind,
            line,
            severity: kind.severity(),
            message: message.into(),
            diff: None,
        }
    }

    pub fn with_diff(mut self, diff: String) -> Self {
        self.diff = Some(diff);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LintOptions {
    /// Evaluate the amount-sign warnings.
    pub warnings: bool,
    /// Evaluate the uniqueness rule.
    pub unique_errors: bool,
}

impl Default for LintOptions {
    fn default() -> Self {
        Self {
            warnings: true,
            unique_errors: true,
        }
    }
}

pub fn error_count(findings: &[Finding]) -> usize {
    findings
        .iter()
        .filter(|f| f.severity == Severity::Error)
        .count()
}

pub fn lint<S: AsRef<str>>(
    lines: &[S],
    options: &LintOptions,
    classifier: &dyn CategoryClassifier,
) -> Vec<Finding> {
    let mut findings = Vec::new();

    let header = lines.first().map(|l| l.as_ref()).unwrap_or("");
    let (format, header_ok) = LedgerFormat::detect(header);
    if !header_ok {
        findings.push(Finding::new(
            FindingKind::CsvHeadersMismatch,
            1,
            format!("expected '{}' but found '{header}'", format.header()),
        ));
    }

    let mut records = Vec::new();
    for (idx, raw) in lines.iter().enumerate().skip(1) {
        match parse(idx + 1, raw.as_ref(), format) {
            Err(failure) => findings.push(failure_finding(&failure)),
            Ok(record) => {
                let before = findings.len();
                check_fields(&record, &mut findings);
                if options.warnings && findings.len() == before {
                    check_sign(&record, classifier, &mut findings);
                }
                records.push(record);
            }
        }
    }

    if let Some(finding) = check_sort_order(&records) {
        findings.push(finding);
    }
    if options.unique_errors {
        if let Some(finding) = check_uniqueness(&records) {
            findings.push(finding);
        }
    }

    debug!(
        lines = lines.len(),
        records = records.len(),
        findings = findings.len(),
        "lint finished"
    );
    findings
}

fn failure_finding(failure: &ParseFailure) -> Finding {
    let kind = match failure {
        ParseFailure::Quoting { .. } => FindingKind::FieldsCountMismatch,
        ParseFailure::FieldCount { .. } | ParseFailure::Amount { .. } => FindingKind::ParseFailure,
    };
    Finding::new(kind, failure.line(), failure.to_string())
}

fn check_fields(record: &Record, findings: &mut Vec<Finding>) {
    for &field in record.format().fields() {
        let Some(raw) = record.field(field) else {
            continue;
        };
        if WHITESPACE_FIELDS.contains(&field) {
            if let Err(msg) = check_whitespace(raw) {
                findings.push(Finding::new(
                    FindingKind::WhitespaceMismatch,
                    record.line(),
                    format!("{} {msg}", field.name()),
                ));
                continue;
            }
        }
        for rule in FIELD_RULES.iter().filter(|r| r.field == field) {
            if let Err(msg) = (rule.check)(raw) {
                findings.push(Finding::new(
                    rule.kind,
                    record.line(),
                    format!("{} {msg}", field.name()),
                ));
            }
        }
    }
}

fn check_sign(record: &Record, classifier: &dyn CategoryClassifier, findings: &mut Vec<Finding>) {
    let amount = record.value(Field::Amount);
    match classifier.classify(record.category()) {
        CategoryKind::Income if record.cents() < 0 => findings.push(Finding::new(
            FindingKind::IncomeIsNegative,
            record.line(),
            format!("'{}' is income but the amount is {amount}", record.category()),
        )),
        CategoryKind::Expense if record.cents() > 0 => findings.push(Finding::new(
            FindingKind::ExpenseIsPositive,
            record.line(),
            format!("'{}' is an expense but the amount is {amount}", record.category()),
        )),
        _ => {}
    }
}

fn raw_lines<'a>(records: impl IntoIterator<Item = &'a Record>) -> Vec<&'a str> {
    records.into_iter().map(|r| r.raw()).collect()
}

fn check_sort_order(records: &[Record]) -> Option<Finding> {
    let pos = records
        .windows(2)
        .position(|pair| pair[1].date() < pair[0].date())?;
    let (before, after) = (&records[pos], &records[pos + 1]);

    let mut sorted: Vec<&Record> = records.iter().collect();
    sort_records(&mut sorted, SortSpec::default());
    let diff = unified_diff(
        &raw_lines(records),
        &raw_lines(sorted),
        "items",
        "items (sorted by date)",
        DEFAULT_CONTEXT,
    );
    Some(
        Finding::new(
            FindingKind::SortByDateMismatch,
            after.line(),
            format!(
                "{} comes after {} on L{}",
                after.date(),
                before.date(),
                before.line()
            ),
        )
        .with_diff(diff),
    )
}

fn check_uniqueness(records: &[Record]) -> Option<Finding> {
    let mut first_seen: HashMap<[&str; 5], usize> = HashMap::new();
    let mut duplicates: Vec<(usize, usize)> = Vec::new();
    let mut kept: Vec<&Record> = Vec::with_capacity(records.len());

    for record in records {
        let key = [
            record.date(),
            record.category(),
            record.value(Field::Amount),
            record.method(),
            record.notes(),
        ];
        match first_seen.get(&key) {
            Some(&first) => duplicates.push((record.line(), first)),
            None => {
                first_seen.insert(key, record.line());
                kept.push(record);
            }
        }
    }

    let &(line, original) = duplicates.first()?;
    let mut message = format!("L{line} duplicates L{original}");
    if duplicates.len() > 1 {
        message.push_str(&format!(" ({} duplicate items in total)", duplicates.len()));
    }
    let diff = unified_diff(
        &raw_lines(records),
        &raw_lines(kept),
        "items",
        "items (without duplicates)",
        DEFAULT_CONTEXT,
    );
    Some(Finding::new(FindingKind::UniquenessMismatch, line, message).with_diff(diff))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categorizer::PrefixClassifier;

    const HEADER: &str = "Date,Category,Amount,Method,Notes";

    fn classifier() -> PrefixClassifier {
        PrefixClassifier::new(vec!["Income".into(), "Tax:Refunds".into()], vec![])
    }

    fn run(lines: &[&str]) -> Vec<Finding> {
        lint(lines, &LintOptions::default(), &classifier())
    }

    fn run_with(lines: &[&str], options: LintOptions) -> Vec<Finding> {
        lint(lines, &options, &classifier())
    }

    fn kinds(findings: &[Finding]) -> Vec<FindingKind> {
        findings.iter().map(|f| f.kind).collect()
    }

    /// A clean file of `n` items, one per day from 2024-01-01.
    fn clean(n: usize) -> Vec<String> {
        let mut lines = vec![HEADER.to_string()];
        for i in 0..n {
            let day = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                + chrono::Duration::days(i as i64);
            lines.push(format!(
                r#"{},"Personal Expenses:Food",-{}.00,"Visa","#,
                day.format("%Y-%m-%d"),
                i + 1
            ));
        }
        lines
    }

    fn with_line(mut lines: Vec<String>, idx: usize, line: &str) -> Vec<String> {
        lines[idx] = line.to_string();
        lines
    }

    fn refs(lines: &[String]) -> Vec<&str> {
        lines.iter().map(|s| s.as_str()).collect()
    }

    #[test]
    fn test_clean_file_has_no_findings() {
        assert!(run(&refs(&clean(8))).is_empty());
    }

    #[test]
    fn test_header_mismatch() {
        let lines = with_line(clean(3), 0, "Oops,Bad,Headers,Exist,,Here");
        let f = run(&refs(&lines));
        assert_eq!(kinds(&f), vec![FindingKind::CsvHeadersMismatch]);
        assert_eq!(f[0].line, 1);
        assert_eq!(error_count(&f), 1);
    }

    #[test]
    fn test_extended_header_selects_six_fields() {
        let lines = [
            "Date,Category,Amount,Method,Description,Notes",
            r#"2024-01-01,"Business Expenses:Software",-10.95,"Visa","Hosting","nickjanetakis.com""#,
            r#"2024-01-02,"Income:Consulting",100.00,"ACH",,"#,
        ];
        assert!(run(&lines).is_empty());
        let f = run(&[lines[0], r#"2024-01-01,"A",-1.00,"B","#]);
        assert_eq!(kinds(&f), vec![FindingKind::ParseFailure]);
    }

    #[test]
    fn test_parse_failure_skips_field_checks() {
        let lines = with_line(clean(3), 1, "a,b,c");
        let f = run(&refs(&lines));
        assert_eq!(kinds(&f), vec![FindingKind::ParseFailure]);
        assert_eq!(f[0].line, 2);
        assert!(f[0].message.contains("2 comma(s)"));
    }

    #[test]
    fn test_non_numeric_amount_is_parse_failure() {
        for amount in ["--1", "ZZZ"] {
            let line = format!(r#"2024-01-01,"A",{amount},"B","#);
            let lines = with_line(clean(3), 1, &line);
            assert_eq!(kinds(&run(&refs(&lines))), vec![FindingKind::ParseFailure]);
        }
    }

    #[test]
    fn test_field_kinds() {
        let cases = [
            (r#"2024-01-01,"A",-0.01,"",x"#, FindingKind::WhitespaceMismatch),
            (r#"a2024-01-01,"A",-0.01,"B","#, FindingKind::DateMismatch),
            (r#"2024-99-01,"A",-0.01,"B","#, FindingKind::DateMismatch),
            (r#"2024-01-01,":A",-0.01,"B","#, FindingKind::CategoryMismatch),
            (r#"2024-01-01,"A,B",-0.01,"B","#, FindingKind::CategoryMismatch),
            (r#"2024-01-01,""A",-0.01,"B","#, FindingKind::CategoryMismatch),
            (r#"2024-01-01,"A",+1.00,"B","#, FindingKind::AmountMismatch),
            (r#"2024-01-01,"A",-100,"B","#, FindingKind::AmountMismatch),
            (r#"2024-01-01,"A",-1.00,"B'","#, FindingKind::MethodMismatch),
            (r#"2024-01-01,"A",-1.00,B,"#, FindingKind::MethodMismatch),
            (r#"2024-01-01,"A",-1.00,"B"","#, FindingKind::FieldsCountMismatch),
            (r#"2024-01-01,"A",-1.00,"B","C:""#, FindingKind::NotesMismatch),
            (r#"2024-01-01,"A",-1.00,"B",C"#, FindingKind::NotesMismatch),
            (r#"2024-01-01,"A",-1.00,"B","C"""#, FindingKind::FieldsCountMismatch),
        ];
        for (line, kind) in cases {
            let lines = [HEADER, line];
            let f = run(&lines);
            assert!(kinds(&f).contains(&kind), "{line}: {:?}", kinds(&f));
            assert!(f.iter().all(|x| x.line == 2), "{line}");
        }
    }

    #[test]
    fn test_whitespace_replaces_field_rule() {
        let f = run(&[HEADER, r#"2024-01-01,"A",-0.01,"","#]);
        assert_eq!(kinds(&f), vec![FindingKind::WhitespaceMismatch]);
    }

    #[test]
    fn test_sign_warnings() {
        let cases = [
            (r#"2024-01-12,"Income",-1.00,"B","#, FindingKind::IncomeIsNegative),
            (r#"2024-01-12,"Tax:Refunds",-1.00,"B","#, FindingKind::IncomeIsNegative),
            (r#"2024-01-12,"Business Expense",1.00,"B","#, FindingKind::ExpenseIsPositive),
        ];
        for (line, kind) in cases {
            let f = run(&[HEADER, line]);
            assert_eq!(kinds(&f), vec![kind]);
            assert_eq!(f[0].severity, Severity::Warning);
            assert_eq!(error_count(&f), 0);

            let quiet = run_with(
                &[HEADER, line],
                LintOptions {
                    warnings: false,
                    ..LintOptions::default()
                },
            );
            assert!(quiet.is_empty());
        }
    }

    #[test]
    fn test_warnings_skip_invalid_records() {
        let f = run(&[HEADER, r#"2024-01-12,"Income",-1.00,B,"#]);
        assert_eq!(kinds(&f), vec![FindingKind::MethodMismatch]);
    }

    #[test]
    fn test_sort_order_swap_first_and_last() {
        let mut lines = clean(32);
        lines.swap(1, 32);
        let f = run(&refs(&lines));
        assert_eq!(kinds(&f), vec![FindingKind::SortByDateMismatch]);
        let diff = f[0].diff.as_deref().unwrap();
        assert!(diff.contains("@@ -1,4 +1,4 @@"));
        assert_eq!(error_count(&f), 1);
    }

    #[test]
    fn test_sorted_file_has_no_diff() {
        let lines = clean(5);
        assert!(check_sort_order(
            &lines[1..]
                .iter()
                .enumerate()
                .map(|(i, l)| parse(i + 2, l, LedgerFormat::Standard).unwrap())
                .collect::<Vec<_>>()
        )
        .is_none());
    }

    #[test]
    fn test_uniqueness_reports_once() {
        let mut lines = clean(32);
        let last = lines[32].clone();
        lines.push(last);
        let f = run(&refs(&lines));
        assert_eq!(kinds(&f), vec![FindingKind::UniquenessMismatch]);
        assert_eq!(f[0].line, 34);
        assert!(f[0].message.contains("L33"));
        assert!(f[0].diff.as_deref().unwrap().contains("@@ -30,4 +30,3 @@"));

        let off = run_with(
            &refs(&lines),
            LintOptions {
                unique_errors: false,
                ..LintOptions::default()
            },
        );
        assert!(off.is_empty());
    }

    #[test]
    fn test_uniqueness_ignores_description() {
        let lines = [
            "Date,Category,Amount,Method,Description,Notes",
            r#"2024-01-01,"A",-1.00,"B","first","#,
            r#"2024-01-01,"A",-1.00,"B","second","#,
        ];
        let f = run(&lines);
        assert_eq!(kinds(&f), vec![FindingKind::UniquenessMismatch]);
    }

    #[test]
    fn test_findings_ordered_header_lines_whole_file() {
        let mut lines = clean(4);
        lines[0] = "Bad".into();
        lines.swap(1, 4);
        lines.push("x".into());
        let f = run(&refs(&lines));
        assert_eq!(
            kinds(&f),
            vec![
                FindingKind::CsvHeadersMismatch,
                FindingKind::ParseFailure,
                FindingKind::SortByDateMismatch
            ]
        );
    }

    #[test]
    fn test_every_kind_has_code_and_description() {
        for kind in ALL_KINDS {
            assert!(!kind.code().is_empty());
            assert!(!kind.description().is_empty());
            assert_eq!(kind.to_string(), kind.code());
        }
    }
}
