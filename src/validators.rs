use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::lint::FindingKind;
use crate::models::{Field, RawField};
use crate::parser::quote;

pub type Check = fn(&RawField) -> Result<(), String>;

/// One field rule: which column it inspects, what it reports, how it checks.
pub struct FieldRule {
    pub field: Field,
    pub kind: FindingKind,
    pub check: Check,
}

pub const FIELD_RULES: &[FieldRule] = &[
    FieldRule {
        field: Field::Date,
        kind: FindingKind::DateMismatch,
        check: check_date,
    },
    FieldRule {
        field: Field::Category,
        kind: FindingKind::CategoryMismatch,
        check: check_category,
    },
    FieldRule {
        field: Field::Amount,
        kind: FindingKind::AmountMismatch,
        check: check_amount,
    },
    FieldRule {
        field: Field::Method,
        kind: FindingKind::MethodMismatch,
        check: check_method,
    },
    FieldRule {
        field: Field::Description,
        kind: FindingKind::DescriptionMismatch,
        check: check_free_text,
    },
    FieldRule {
        field: Field::Notes,
        kind: FindingKind::NotesMismatch,
        check: check_free_text,
    },
];

/// Fields that may never be blank or padded. Description and notes are
/// free text and exempt.
pub const WHITESPACE_FIELDS: &[Field] = &[Field::Date, Field::Category, Field::Amount, Field::Method];

fn date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date pattern compiles"))
}

fn amount_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^-?\d+\.\d{2}$").expect("amount pattern compiles"))
}

fn require_unquoted(f: &RawField) -> Result<(), String> {
    if f.quoted || f.raw != f.value {
        return Err(format!("'{}' must not be quoted", f.raw));
    }
    Ok(())
}

fn require_quoted(f: &RawField) -> Result<(), String> {
    if f.raw != quote(&f.value) {
        return Err(format!("'{}' must be wrapped in double quotes", f.raw));
    }
    Ok(())
}

pub fn check_whitespace(f: &RawField) -> Result<(), String> {
    if f.value.is_empty() {
        return Err(format!("'{}' is empty", f.raw));
    }
    if f.value.trim() != f.value {
        return Err(format!("'{}' has leading or trailing whitespace", f.raw));
    }
    Ok(())
}

pub fn check_date(f: &RawField) -> Result<(), String> {
    require_unquoted(f)?;
    if !date_re().is_match(&f.value) {
        return Err(format!("'{}' is not in YYYY-MM-DD form", f.value));
    }
    NaiveDate::parse_from_str(&f.value, "%Y-%m-%d")
        .map_err(|_| format!("'{}' is not a calendar date", f.value))?;
    Ok(())
}

pub fn check_category(f: &RawField) -> Result<(), String> {
    require_quoted(f)?;
    if f.value.contains(',') {
        return Err(format!("'{}' must not contain a comma", f.value));
    }
    if f.value.contains('"') {
        return Err(format!("'{}' must not contain a quote", f.value));
    }
    for segment in f.value.split(':') {
        if segment.is_empty() {
            return Err(format!("'{}' has an empty segment", f.value));
        }
        if segment.trim() != segment {
            return Err(format!("segment '{segment}' has surrounding whitespace"));
        }
        if segment.starts_with('\'') {
            return Err(format!("segment '{segment}' starts with an apostrophe"));
        }
    }
    Ok(())
}

pub fn check_amount(f: &RawField) -> Result<(), String> {
    require_unquoted(f)?;
    if !amount_re().is_match(&f.value) {
        return Err(format!("'{}' must look like 1234.56 or -1234.56", f.value));
    }
    Ok(())
}

pub fn check_method(f: &RawField) -> Result<(), String> {
    require_quoted(f)?;
    if f.value.contains(':') || f.value.contains('\'') {
        return Err(format!("'{}' must not contain ':' or \"'\"", f.value));
    }
    Ok(())
}

pub fn check_free_text(f: &RawField) -> Result<(), String> {
    if f.raw.is_empty() {
        return Ok(());
    }
    if f.raw == "\"\"" {
        return Err("empty quotes, leave the field blank instead".to_string());
    }
    require_quoted(f)?;
    if f.value.contains(':') {
        return Err(format!("'{}' must not contain ':'", f.value));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::split;

    /// Field at `idx` of a standard-format line.
    fn field(line: &str, idx: usize) -> RawField {
        split(line).fields.remove(idx)
    }

    #[test]
    fn test_rule_table_covers_every_field() {
        for f in crate::models::ALL_FIELDS {
            assert_eq!(FIELD_RULES.iter().filter(|r| r.field == *f).count(), 1);
        }
    }

    #[test]
    fn test_whitespace() {
        assert!(check_whitespace(&field(r#"2024-01-12,"A",0.01,"",x"#, 3)).is_err());
        assert!(check_whitespace(&field(r#"2024-01-12,"A",0.01," ",x"#, 3)).is_err());
        assert!(check_whitespace(&field(r#"2024-01-12,"A ",0.01,"B",x"#, 1)).is_err());
        assert!(check_whitespace(&field(r#"2024-01-12,"A",0.01,"B",x"#, 3)).is_ok());
    }

    #[test]
    fn test_date() {
        assert!(check_date(&field("2024-01-12,x", 0)).is_ok());
        assert!(check_date(&field("a2024-01-12,x", 0)).is_err());
        assert!(check_date(&field("2024-99-12,x", 0)).is_err());
        assert!(check_date(&field("2023-02-29,x", 0)).is_err());
        assert!(check_date(&field("2024-02-29,x", 0)).is_ok());
        assert!(check_date(&field("2024-1-12,x", 0)).is_err());
        assert!(check_date(&field("\"2024-01-12\",x", 0)).is_err());
    }

    #[test]
    fn test_category() {
        let ok = [r#""A""#, r#""Income:Affiliates:Amazon""#, r#""Business Expenses:Dining Out""#];
        for raw in ok {
            assert!(check_category(&field(raw, 0)).is_ok(), "{raw}");
        }
        let bad = [r#"":A""#, r#""A:""#, r#""A::B""#, "A", r#""'A""#, r#"""A""#, r#"" A""#];
        for raw in bad {
            assert!(check_category(&field(raw, 0)).is_err(), "{raw}");
        }
        assert!(check_category(&field(r#"x,"A,B",y"#, 1)).is_err());
    }

    #[test]
    fn test_amount() {
        for raw in ["0.01", "-20.01", "3200.00"] {
            assert!(check_amount(&field(raw, 0)).is_ok(), "{raw}");
        }
        for raw in ["+1.00", "100", "1.5", "1.000", "\"1.00\"", "1e2"] {
            assert!(check_amount(&field(raw, 0)).is_err(), "{raw}");
        }
    }

    #[test]
    fn test_method() {
        assert!(check_method(&field(r#""FreedomCard""#, 0)).is_ok());
        assert!(check_method(&field(r#""Visa, personal""#, 0)).is_ok());
        assert!(check_method(&field(r#""B'""#, 0)).is_err());
        assert!(check_method(&field(r#""B:""#, 0)).is_err());
        assert!(check_method(&field("B", 0)).is_err());
    }

    #[test]
    fn test_free_text() {
        assert!(check_free_text(&field("", 0)).is_ok());
        assert!(check_free_text(&field(r#""Gas""#, 0)).is_ok());
        assert!(check_free_text(&field(r#"" padded ""#, 0)).is_ok());
        assert!(check_free_text(&field(r#""C:""#, 0)).is_err());
        assert!(check_free_text(&field("C", 0)).is_err());
        assert!(check_free_text(&field(r#""""#, 0)).is_err());
    }
}
