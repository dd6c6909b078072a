use std::cmp::Ordering;
use std::collections::HashMap;

use tracing::debug;

use crate::error::{PurseError, Result};
use crate::models::{Field, Record};
use crate::parser::parse_cents;
use crate::select::{SortKey, SortSpec};

// ---------------------------------------------------------------------------
// Group summaries
// ---------------------------------------------------------------------------

/// One aggregation bucket. Totals are in cents.
#[derive(Debug, Clone)]
pub struct GroupSummary<'a> {
    pub key: String,
    /// Sum of the non-negative amounts.
    pub income_total: i128,
    /// Sum of the negative amounts, kept negative.
    pub expense_total: i128,
    pub item_count: usize,
    /// Items across all groups, repeated on every row.
    pub grand_total_item_count: usize,
    /// Member items in the order they were given; empty unless requested.
    pub items: Vec<&'a Record>,
}

impl GroupSummary<'_> {
    pub fn net(&self) -> i128 {
        self.income_total + self.expense_total
    }
}

pub fn parse_group_key(s: &str) -> Result<Field> {
    Field::from_key(s).ok_or_else(|| PurseError::UnknownGroupKey(s.to_string()))
}

/// Group `records` by `group`, keeping member order, with rows ordered by
/// group key ascending.
pub fn summarize<'a>(records: &[&'a Record], group: Field, with_items: bool) -> Vec<GroupSummary<'a>> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<GroupSummary<'a>> = Vec::new();

    for &record in records {
        let key = record.value(group);
        let idx = *index.entry(key).or_insert_with(|| {
            groups.push(GroupSummary {
                key: key.to_string(),
                income_total: 0,
                expense_total: 0,
                item_count: 0,
                grand_total_item_count: records.len(),
                items: Vec::new(),
            });
            groups.len() - 1
        });
        let g = &mut groups[idx];
        if record.cents() >= 0 {
            g.income_total += i128::from(record.cents());
        } else {
            g.expense_total += i128::from(record.cents());
        }
        g.item_count += 1;
        if with_items {
            g.items.push(record);
        }
    }

    sort_summaries(&mut groups, group, None);
    debug!(groups = groups.len(), items = records.len(), "summarized");
    groups
}

fn compare_keys(group: Field, a: &str, b: &str) -> Ordering {
    if group == Field::Amount {
        if let (Some(x), Some(y)) = (parse_cents(a), parse_cents(b)) {
            return x.cmp(&y);
        }
    }
    a.cmp(b)
}

/// Order summary rows. Text keys order by group key, `amount` by net total
/// and `items` by item count; ties fall back to the group key.
pub fn sort_summaries(groups: &mut [GroupSummary<'_>], group: Field, spec: Option<SortSpec>) {
    let spec = spec.unwrap_or(SortSpec {
        key: SortKey::Field(group),
        descending: false,
    });
    groups.sort_by(|a, b| {
        let primary = match spec.key {
            SortKey::Items => a.item_count.cmp(&b.item_count),
            SortKey::Field(Field::Amount) => a.net().cmp(&b.net()),
            SortKey::Field(_) => compare_keys(group, &a.key, &b.key),
        };
        spec.directed(primary)
            .then_with(|| compare_keys(group, &a.key, &b.key))
    });
}
