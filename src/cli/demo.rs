use std::path::{Path, PathBuf};

use chrono::{Datelike, Duration, Local, NaiveDate};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::info;

use crate::categorizer::{CategoryClassifier, CategoryKind};
use crate::cli::DemoArgs;
use crate::error::{PurseError, Result};
use crate::fmt::plain;
use crate::models::LedgerFormat;
use crate::parser::render_values;
use crate::settings::Settings;

/// Categories offered by the demo, sorted.
pub const DEMO_CATEGORIES: &[&str] = &[
    "Business Expenses:Accountant",
    "Business Expenses:Affiliates",
    "Business Expenses:Dining Out",
    "Business Expenses:Equipment",
    "Business Expenses:Hosting",
    "Business Expenses:Software",
    "Income:Affiliates:Amazon",
    "Income:Consulting",
    "Income:Interest",
    "Personal Expenses:Dining",
    "Personal Expenses:Gifts",
    "Personal Expenses:Groceries",
    "Personal Expenses:Rent",
    "Personal Expenses:Transportation",
    "Personal Expenses:Utilities",
    "Tax:Federal",
    "Tax:Refunds",
];

const METHODS: &[&str] = &["ACH", "Amex", "Checking", "FreedomCard", "Visa", "Zelle"];

const NOTES: &[&str] = &["Gas", "Groceries", "Invoice", "Lunch", "Refund", "Subscription"];

struct DemoItem {
    /// 0 for last year, 1 for this year.
    year: usize,
    month_day: &'static str,
    category: &'static str,
    cents: i64,
    method: &'static str,
    notes: &'static str,
}

const fn item(
    year: usize,
    month_day: &'static str,
    category: &'static str,
    cents: i64,
    method: &'static str,
    notes: &'static str,
) -> DemoItem {
    DemoItem {
        year,
        month_day,
        category,
        cents,
        method,
        notes,
    }
}

/// Two years of activity, already in date order.
const ITEMS: &[DemoItem] = &[
    item(0, "01-12", "Personal Expenses:Transportation", -2001, "FreedomCard", "Gas"),
    item(0, "01-28", "Business Expenses:Software", -1095, "Visa", "nickjanetakis.com"),
    item(0, "02-09", "Income:Consulting", 150000, "ACH", "Invoice 101"),
    item(0, "02-15", "Personal Expenses:Groceries", -4260, "Zelle", "Farmers market"),
    item(0, "03-01", "Personal Expenses:Rent", -160000, "Zelle", "March rent"),
    item(0, "03-15", "Business Expenses:Affiliates", -2500, "Visa", "Referral payout"),
    item(0, "04-15", "Tax:Federal", -320000, "ACH", "Estimated payment"),
    item(0, "04-30", "Business Expenses:Hosting", -1200, "Visa", ""),
    item(0, "05-20", "Tax:Refunds", 85000, "ACH", "State refund"),
    item(0, "06-05", "Business Expenses:Dining Out", -6430, "Amex", "Client lunch"),
    item(0, "07-03", "Income:Affiliates:Amazon", 12045, "ACH", ""),
    item(0, "08-18", "Personal Expenses:Transportation", -3510, "FreedomCard", "Gas"),
    item(0, "09-10", "Income:Consulting", 150000, "ACH", "Invoice 102"),
    item(0, "10-01", "Personal Expenses:Rent", -160000, "Zelle", "October rent"),
    item(0, "11-11", "Business Expenses:Equipment", -89999, "Amex", "Monitor"),
    item(0, "12-20", "Personal Expenses:Gifts", -15000, "Visa", "Holidays"),
    item(1, "01-12", "Personal Expenses:Transportation", -2240, "FreedomCard", "Gas"),
    item(1, "01-28", "Business Expenses:Software", -1095, "Visa", "Domain renewal"),
    item(1, "02-14", "Personal Expenses:Dining", -8800, "Amex", "Dinner"),
    item(1, "03-01", "Income:Consulting", 175000, "ACH", "Invoice 103"),
    item(1, "03-31", "Personal Expenses:Utilities", -11823, "Checking", "Electric"),
    item(1, "04-15", "Tax:Federal", -280000, "ACH", "Estimated payment"),
    item(1, "05-02", "Tax:Refunds", 100000, "ACH", "Federal refund"),
    item(1, "06-05", "Personal Expenses:Groceries", -5612, "Zelle", ""),
    item(1, "07-15", "Business Expenses:Software", -2000, "Visa", "GitHub"),
    item(1, "08-18", "Income:Consulting", 150000, "ACH", "Invoice 104"),
    item(1, "09-01", "Personal Expenses:Rent", -165000, "Zelle", "September rent"),
    item(1, "09-30", "Personal Expenses:Utilities", -9877, "Checking", "Water"),
    item(1, "10-10", "Business Expenses:Hosting", -1200, "Visa", ""),
    item(1, "11-27", "Personal Expenses:Gifts", -4999, "Zelle", "Birthday"),
    item(1, "12-15", "Income:Interest", 1873, "Checking", "Savings"),
    item(1, "12-30", "Income:Affiliates:Amazon", 23456, "ACH", ""),
];

fn demo_years(dynamic: bool) -> [i32; 2] {
    if dynamic {
        let year = Local::now().date_naive().year();
        [year - 1, year]
    } else {
        [2024, 2025]
    }
}

/// The demo ledger, header included, one entry per line.
fn demo_lines(years: [i32; 2]) -> Vec<String> {
    let format = LedgerFormat::Standard;
    let mut lines = vec![format.header().to_string()];
    for it in ITEMS {
        let date = format!("{}-{}", years[it.year], it.month_day);
        let amount = plain(it.cents);
        lines.push(render_values(
            format,
            &[&date, it.category, &amount, it.method, it.notes],
        ));
    }
    lines
}

fn to_file_content(lines: &[String]) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// `n` random items spread over the demo years, in date order.
fn benchmark_lines<R: Rng>(
    rng: &mut R,
    n: usize,
    years: [i32; 2],
    classifier: &dyn CategoryClassifier,
) -> Result<Vec<String>> {
    let start = NaiveDate::from_ymd_opt(years[0], 1, 1)
        .ok_or_else(|| PurseError::Other(format!("invalid demo year {}", years[0])))?;
    let format = LedgerFormat::Standard;

    let mut items: Vec<(NaiveDate, String)> = (0..n)
        .map(|_| {
            let date = start + Duration::days(rng.gen_range(0..730));
            let category = DEMO_CATEGORIES.choose(rng).copied().unwrap_or("Income");
            let magnitude: i64 = rng.gen_range(1..=250_000);
            let cents = match classifier.classify(category) {
                CategoryKind::Income => magnitude,
                _ => -magnitude,
            };
            let method = METHODS.choose(rng).copied().unwrap_or("ACH");
            let notes = if rng.gen_bool(0.5) {
                NOTES.choose(rng).copied().unwrap_or("")
            } else {
                ""
            };
            let date_str = date.format("%Y-%m-%d").to_string();
            let amount = plain(cents);
            let line = render_values(format, &[&date_str, category, &amount, method, notes]);
            (date, line)
        })
        .collect();
    items.sort_by_key(|(date, _)| *date);

    let mut lines = vec![format.header().to_string()];
    lines.extend(items.into_iter().map(|(_, line)| line));
    Ok(lines)
}

fn write_new(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        return Err(PurseError::Other(format!("{} already exists", path.display())));
    }
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(path, content)?;
    Ok(())
}

fn benchmark_path(profile: &Path, n: usize) -> PathBuf {
    let mut name = profile.as_os_str().to_owned();
    name.push(format!("-{n}"));
    PathBuf::from(name)
}

pub fn run(settings: &Settings, profile: &Path, args: &DemoArgs) -> Result<i32> {
    let years = demo_years(!args.no_dynamic_years);

    if args.categories {
        for category in DEMO_CATEGORIES {
            println!("{category}");
        }
    }
    if args.items || !(args.categories || args.init || args.benchmark.is_some()) {
        print!("{}", to_file_content(&demo_lines(years)));
    }
    if args.init {
        write_new(profile, &to_file_content(&demo_lines(years)))?;
        info!(path = %profile.display(), items = ITEMS.len(), "wrote demo ledger");
        println!("Demo ledger written to {}", profile.display());
    }
    if let Some(n) = args.benchmark {
        let path = benchmark_path(profile, n);
        let lines = benchmark_lines(&mut rand::thread_rng(), n, years, &settings.classifier())?;
        std::fs::write(&path, to_file_content(&lines))?;
        println!("{n} items written to {}", path.display());
    }
    Ok(0)
}
