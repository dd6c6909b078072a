use std::cmp::Ordering;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::{Captures, Regex, RegexBuilder};
use tracing::debug;

use crate::error::{PurseError, Result};
use crate::models::{Field, Record};

// ---------------------------------------------------------------------------
// Sort keys
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Field(Field),
    /// Item count; only meaningful for summary rows.
    Items,
}

/// A sort key plus direction, written `amount` or `amount-` on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub key: SortKey,
    pub descending: bool,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            key: SortKey::Field(Field::Date),
            descending: false,
        }
    }
}

impl FromStr for SortSpec {
    type Err = PurseError;

    fn from_str(s: &str) -> Result<Self> {
        let (name, descending) = match s.strip_suffix('-') {
            Some(name) => (name, true),
            None => (s, false),
        };
        let key = if name == "items" {
            SortKey::Items
        } else {
            SortKey::Field(
                Field::from_key(name).ok_or_else(|| PurseError::UnknownSortKey(s.to_string()))?,
            )
        };
        Ok(Self { key, descending })
    }
}

impl SortSpec {
    /// Apply the direction to an ascending comparison.
    pub fn directed(&self, ord: Ordering) -> Ordering {
        if self.descending {
            ord.reverse()
        } else {
            ord
        }
    }
}

pub fn compare_by(a: &Record, b: &Record, field: Field) -> Ordering {
    match field {
        Field::Amount => a.cents().cmp(&b.cents()),
        _ => a.value(field).cmp(b.value(field)),
    }
}

/// Stable sort: ties keep their file order in both directions. `items`
/// orders summary rows only and leaves `records` untouched.
pub fn sort_records(records: &mut [&Record], spec: SortSpec) {
    if let SortKey::Field(field) = spec.key {
        records.sort_by(|a, b| spec.directed(compare_by(a, b, field)));
    }
}

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

fn quarter_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        RegexBuilder::new(r"\b(\d{4})-q([1-4])\b")
            .case_insensitive(true)
            .build()
            .expect("quarter pattern compiles")
    })
}

/// Rewrite `2025-q3` style tokens into a pattern matching the quarter's dates.
pub fn expand_quarters(query: &str) -> String {
    quarter_re()
        .replace_all(query, |caps: &Captures| {
            let months = match &caps[2] {
                "1" => "01|02|03",
                "2" => "04|05|06",
                "3" => "07|08|09",
                _ => "10|11|12",
            };
            format!("{}-(?:{months})-", &caps[1])
        })
        .into_owned()
}

/// Free-text filter over date, category, method, description and notes,
/// optionally narrowed to one payment method.
#[derive(Debug, Clone, Default)]
pub struct Query {
    pattern: Option<Regex>,
    method: Option<String>,
}

impl Query {
    pub fn new(text: Option<&str>, method: Option<&str>) -> Result<Self> {
        let pattern = match text.filter(|t| !t.is_empty()) {
            Some(t) => Some(
                RegexBuilder::new(&expand_quarters(t))
                    .case_insensitive(true)
                    .build()?,
            ),
            None => None,
        };
        Ok(Self {
            pattern,
            method: method.map(|m| m.to_lowercase()),
        })
    }

    pub fn matches(&self, record: &Record) -> bool {
        if let Some(method) = &self.method {
            if record.method().to_lowercase() != *method {
                return false;
            }
        }
        match &self.pattern {
            Some(re) => {
                let haystack = format!(
                    "{} {} {} {} {}",
                    record.date(),
                    record.category(),
                    record.method(),
                    record.description(),
                    record.notes()
                );
                re.is_match(&haystack)
            }
            None => true,
        }
    }
}

/// Filter then order. `None` keeps file order.
pub fn select<'a>(records: &'a [Record], query: &Query, sort: Option<SortSpec>) -> Vec<&'a Record> {
    let mut selected: Vec<&Record> = records.iter().filter(|r| query.matches(r)).collect();
    if let Some(spec) = sort {
        sort_records(&mut selected, spec);
    }
    debug!(total = records.len(), selected = selected.len(), "selected items");
    selected
}
