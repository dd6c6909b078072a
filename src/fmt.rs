/// How monetary amounts are shown in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoneyStyle {
    /// Currency symbol and thousands separators; plain `-1234.56` otherwise.
    pub symbols: bool,
    /// `($5.00)` instead of `-$5.00`.
    pub parentheses: bool,
}

impl Default for MoneyStyle {
    fn default() -> Self {
        Self {
            symbols: true,
            parentheses: false,
        }
    }
}

/// Format cents as a plain two-decimal amount: -1234.56
pub fn plain(cents: impl Into<i128>) -> String {
    let cents: i128 = cents.into();
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

/// Format cents as a dollar amount with thousands separators: $1,234.56
pub fn money(cents: impl Into<i128>, style: MoneyStyle) -> String {
    let cents: i128 = cents.into();
    if !style.symbols {
        return plain(cents);
    }
    let abs = cents.unsigned_abs();
    let int_part = (abs / 100).to_string();

    let mut with_commas = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    let with_commas: String = with_commas.chars().rev().collect();
    let body = format!("${with_commas}.{:02}", abs % 100);

    match (cents < 0, style.parentheses) {
        (false, _) => body,
        (true, false) => format!("-{body}"),
        (true, true) => format!("({body})"),
    }
}
