use colored::Colorize;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, Table};

use crate::fmt::{money, MoneyStyle};
use crate::lint::{Finding, Severity, ALL_KINDS};
use crate::models::{Field, LedgerFormat, Record};
use crate::reports::GroupSummary;

pub const NO_ITEMS: &str = "No items found.";

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table
}

fn amount_cell(cents: impl Into<i128>, style: MoneyStyle) -> Cell {
    Cell::new(money(cents, style)).set_alignment(CellAlignment::Right)
}

fn count_cell(n: usize) -> Cell {
    Cell::new(n).set_alignment(CellAlignment::Right)
}

// ---------------------------------------------------------------------------
// Lint
// ---------------------------------------------------------------------------

fn kind_tag(finding: &Finding) -> String {
    let tag = format!("[{}]", finding.kind);
    match finding.severity {
        Severity::Error => tag.red().bold().to_string(),
        Severity::Warning => tag.yellow().to_string(),
    }
}

/// `L<line> [KIND] message` per finding, diffs indented underneath, then the
/// error count. Empty when there is nothing to report.
pub fn format_findings(findings: &[Finding], errors: usize) -> String {
    let mut out = String::new();
    for finding in findings {
        out.push_str(&format!(
            "L{} {} {}\n",
            finding.line,
            kind_tag(finding),
            finding.message
        ));
        if let Some(diff) = &finding.diff {
            for line in diff.lines() {
                out.push_str("    ");
                out.push_str(line);
                out.push('\n');
            }
        }
    }
    if errors > 0 {
        let noun = if errors == 1 { "error" } else { "errors" };
        out.push_str(&format!("{errors} linting {noun}\n"));
    }
    out
}

pub fn format_rules() -> String {
    let mut table = new_table();
    table.set_header(vec!["Rule", "Severity", "Checks"]);
    for kind in ALL_KINDS {
        table.add_row(vec![
            Cell::new(kind.code()),
            Cell::new(kind.severity()),
            Cell::new(kind.description()),
        ]);
    }
    table.to_string()
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

fn item_table(records: &[&Record], format: LedgerFormat, style: MoneyStyle) -> Table {
    let mut table = new_table();
    let mut header: Vec<&str> = format.fields().iter().map(|f| f.name()).collect();
    header.push("Running");
    table.set_header(header);

    let mut running: i128 = 0;
    for record in records {
        running += i128::from(record.cents());
        let mut row: Vec<Cell> = format
            .fields()
            .iter()
            .map(|&field| match field {
                Field::Amount => amount_cell(record.cents(), style),
                _ => Cell::new(record.value(field)),
            })
            .collect();
        row.push(amount_cell(running, style));
        table.add_row(row);
    }
    table
}

/// One row per item with a running balance in display order.
pub fn format_records(records: &[&Record], format: LedgerFormat, style: MoneyStyle) -> String {
    if records.is_empty() {
        return NO_ITEMS.to_string();
    }
    item_table(records, format, style).to_string()
}

/// Header plus the stored lines, untouched.
pub fn format_raw(header: &str, records: &[&Record]) -> String {
    let mut out = String::from(header);
    out.push('\n');
    for record in records {
        out.push_str(record.raw());
        out.push('\n');
    }
    out
}

// ---------------------------------------------------------------------------
// Summaries
// ---------------------------------------------------------------------------

pub fn format_summary(groups: &[GroupSummary<'_>], group: Field, style: MoneyStyle) -> String {
    if groups.is_empty() {
        return NO_ITEMS.to_string();
    }
    let mut table = new_table();
    table.set_header(vec![
        group.name(),
        "Income",
        "Expenses",
        "Net",
        "Items",
        "Total Items",
    ]);
    for g in groups {
        table.add_row(vec![
            Cell::new(&g.key),
            amount_cell(g.income_total, style),
            amount_cell(g.expense_total, style),
            amount_cell(g.net(), style),
            count_cell(g.item_count),
            count_cell(g.grand_total_item_count),
        ]);
    }
    table.to_string()
}

/// Summary table, then each group's items under its key.
pub fn format_summary_with_items(
    groups: &[GroupSummary<'_>],
    group: Field,
    format: LedgerFormat,
    style: MoneyStyle,
) -> String {
    let mut out = format_summary(groups, group, style);
    for g in groups {
        out.push_str(&format!("\n\n{}\n", g.key.bold()));
        out.push_str(&item_table(&g.items, format, style).to_string());
    }
    out
}
