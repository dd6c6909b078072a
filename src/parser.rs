use std::fmt;

use crate::models::{Field, LedgerFormat, RawField, Record};

// ---------------------------------------------------------------------------
// Splitting
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    FieldStart,
    Unquoted,
    InQuotes,
    QuoteSeen,
}

/// Result of splitting one line on top-level commas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub fields: Vec<RawField>,
    /// Commas that acted as separators (commas inside quotes excluded).
    pub separators: usize,
    /// False when the line ended inside an open quote.
    pub terminated: bool,
}

#[derive(Default)]
struct FieldBuf {
    raw: String,
    value: String,
    quoted: bool,
}

impl FieldBuf {
    fn finish(&mut self) -> RawField {
        let buf = std::mem::take(self);
        RawField {
            raw: buf.raw,
            value: buf.value,
            quoted: buf.quoted,
        }
    }
}

/// Split a line honoring double quotes. A doubled quote inside a quoted
/// field is a literal quote. Text following a closing quote is kept as-is so
/// that the validators can see the artifact.
pub fn split(line: &str) -> Split {
    let mut fields = Vec::new();
    let mut separators = 0;
    let mut state = State::FieldStart;
    let mut buf = FieldBuf::default();

    for c in line.chars() {
        state = match (state, c) {
            (State::InQuotes, '"') => {
                buf.raw.push(c);
                State::QuoteSeen
            }
            (State::InQuotes, _) => {
                buf.raw.push(c);
                buf.value.push(c);
                State::InQuotes
            }
            (State::QuoteSeen, '"') => {
                buf.raw.push(c);
                buf.value.push(c);
                State::InQuotes
            }
            (_, ',') => {
                fields.push(buf.finish());
                separators += 1;
                State::FieldStart
            }
            (State::FieldStart, '"') => {
                buf.raw.push(c);
                buf.quoted = true;
                State::InQuotes
            }
            (_, _) => {
                buf.raw.push(c);
                buf.value.push(c);
                State::Unquoted
            }
        };
    }
    fields.push(buf.finish());

    Split {
        fields,
        separators,
        terminated: state != State::InQuotes,
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseFailure {
    /// Wrong number of separators for the schema.
    FieldCount {
        line: usize,
        observed: usize,
        expected: usize,
    },
    /// The raw comma count fits the schema but quoting moved the field
    /// boundaries (or left a quote open).
    Quoting {
        line: usize,
        observed: usize,
        expected: usize,
    },
    /// The amount cannot be read as a number at all.
    Amount { line: usize, value: String },
}

impl ParseFailure {
    pub fn line(&self) -> usize {
        match self {
            Self::FieldCount { line, .. } | Self::Quoting { line, .. } | Self::Amount { line, .. } => {
                *line
            }
        }
    }
}

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FieldCount {
                observed, expected, ..
            } => write!(
                f,
                "found {observed} comma(s) but the header expects {expected} comma(s)"
            ),
            Self::Quoting {
                observed, expected, ..
            } => write!(
                f,
                "quoting splits this line into {observed} field(s) instead of {expected}"
            ),
            Self::Amount { value, .. } => {
                write!(f, "amount '{value}' is not a number or is out of range")
            }
        }
    }
}

/// Read an amount as cents, accepting a leading sign, a bare integer or any
/// number of fraction digits (rounded half away from zero). Canonical form
/// is enforced separately by the amount validator. `None` when the text is
/// not a decimal number or does not fit in an `i64`.
pub fn parse_cents(value: &str) -> Option<i64> {
    let value = value.trim();
    let (negative, digits) = match value.as_bytes().first()? {
        b'-' => (true, &value[1..]),
        b'+' => (false, &value[1..]),
        _ => (false, value),
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    if !int_part.bytes().chain(frac_part.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    let mut cents: i64 = 0;
    for b in int_part.bytes() {
        cents = cents.checked_mul(10)?.checked_add(i64::from(b - b'0'))?;
    }
    let mut frac = frac_part.bytes().map(|b| i64::from(b - b'0'));
    for _ in 0..2 {
        cents = cents.checked_mul(10)?.checked_add(frac.next().unwrap_or(0))?;
    }
    if frac.next().is_some_and(|d| d >= 5) {
        cents = cents.checked_add(1)?;
    }

    Some(if negative { -cents } else { cents })
}

/// Turn one raw line into a record. Field contents are not validated here.
pub fn parse(line: usize, raw: &str, format: LedgerFormat) -> Result<Record, ParseFailure> {
    let split = split(raw);
    let expected = format.comma_count();

    if !split.terminated || split.fields.len() != format.field_count() {
        let raw_commas = raw.matches(',').count();
        if raw_commas == expected {
            return Err(ParseFailure::Quoting {
                line,
                observed: split.fields.len(),
                expected: format.field_count(),
            });
        }
        let observed = if split.terminated {
            split.separators
        } else {
            raw_commas
        };
        return Err(ParseFailure::FieldCount {
            line,
            observed,
            expected,
        });
    }

    let amount_idx = format.index_of(Field::Amount).unwrap_or(2);
    let amount = &split.fields[amount_idx].value;
    let cents = parse_cents(amount).ok_or_else(|| ParseFailure::Amount {
        line,
        value: amount.clone(),
    })?;

    Ok(Record::new(line, raw.to_string(), format, split.fields, cents))
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

pub fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn render_field(field: Field, value: &str) -> String {
    match field {
        Field::Date | Field::Amount => value.to_string(),
        Field::Category | Field::Method => quote(value),
        Field::Description | Field::Notes => {
            if value.is_empty() {
                String::new()
            } else {
                quote(value)
            }
        }
    }
}

/// Canonical line for the given values, one per field of `format`.
pub fn render_values(format: LedgerFormat, values: &[&str]) -> String {
    format
        .fields()
        .iter()
        .zip(values)
        .map(|(field, value)| render_field(*field, value))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
pub fn render(record: &Record) -> String {
    let values: Vec<&str> = record
        .format()
        .fields()
        .iter()
        .map(|f| record.value(*f))
        .collect();
    render_values(record.format(), &values)
}
