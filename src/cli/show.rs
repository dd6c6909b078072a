use std::path::Path;

use crate::cli::report::{format_raw, format_records, format_summary, format_summary_with_items};
use crate::cli::ShowArgs;
use crate::error::{PurseError, Result};
use crate::ledger::Ledger;
use crate::models::Field;
use crate::reports::{parse_group_key, sort_summaries, summarize};
use crate::select::{select, Query, SortKey, SortSpec};
use crate::settings::Settings;

enum Mode {
    Table,
    Raw,
    Summary(Field),
    SummaryWithItems(Field),
}

impl Mode {
    fn from_args(args: &ShowArgs) -> Result<Self> {
        if args.raw {
            return Ok(Mode::Raw);
        }
        if args.by_category {
            return Ok(Mode::Summary(Field::Category));
        }
        if let Some(key) = &args.summary {
            return Ok(Mode::Summary(parse_group_key(key)?));
        }
        if let Some(key) = &args.summary_with_items {
            return Ok(Mode::SummaryWithItems(parse_group_key(key)?));
        }
        Ok(Mode::Table)
    }
}

pub fn run(settings: &Settings, profile: &Path, args: &ShowArgs) -> Result<i32> {
    let mode = Mode::from_args(args)?;
    let sort: Option<SortSpec> = args.sort.as_deref().map(str::parse).transpose()?;
    if let (Mode::Table | Mode::Raw, Some(SortSpec { key: SortKey::Items, .. })) = (&mode, sort) {
        return Err(PurseError::SummaryOnlySortKey(args.sort.clone().unwrap_or_default()));
    }
    let query = Query::new(args.query.as_deref(), args.method.as_deref())?;

    let ledger = Ledger::open(profile)?;
    let records = ledger.records();
    let selected = select(&records, &query, sort);
    let style = settings.money_style();

    let out = match mode {
        Mode::Raw => format_raw(ledger.header(), &selected),
        Mode::Table => format_records(&selected, ledger.format(), style),
        Mode::Summary(group) => {
            let mut groups = summarize(&selected, group, false);
            sort_summaries(&mut groups, group, sort);
            format_summary(&groups, group, style)
        }
        Mode::SummaryWithItems(group) => {
            let mut groups = summarize(&selected, group, true);
            sort_summaries(&mut groups, group, sort);
            format_summary_with_items(&groups, group, ledger.format(), style)
        }
    };

    if out.ends_with('\n') {
        print!("{out}");
    } else {
        println!("{out}");
    }
    Ok(0)
}
