//! Merge change entries per individual and lay out the report columns.

use std::collections::{BTreeMap, BTreeSet};

use regex::Regex;
use tracing::debug;

use crate::classify::SUMMARY_SEPARATOR;
use crate::error::ReconError;
use crate::model::{ChangeEntry, ChangeKind, ConsolidatedRecord, IdentityKey, CHANGE_COLUMN};
use crate::schema::{Schema, LAST_NAME};

struct Group {
    kinds: Vec<ChangeKind>,
    summaries: Vec<String>,
    fields: BTreeMap<String, String>,
}

/// Compile column patterns, anchored at the start of the column name.
pub fn compile_patterns(patterns: &[&str]) -> Result<Vec<Regex>, ReconError> {
    patterns
        .iter()
        .map(|p| {
            Regex::new(&format!("^(?:{p})")).map_err(|e| ReconError::ColumnPattern {
                pattern: p.to_string(),
                message: e.to_string(),
            })
        })
        .collect()
}

fn place(name: &str, columns: &BTreeSet<String>, order: &mut Vec<String>) {
    if columns.contains(name) && !order.iter().any(|placed| placed == name) {
        order.push(name.to_string());
    }
}

/// Final column order: fixed columns (with `change` right after `last name`),
/// then pattern groups, then everything else alphabetically.
pub fn order_columns(
    columns: &BTreeSet<String>,
    fixed: &[&str],
    patterns: &[Regex],
) -> Vec<String> {
    let mut order: Vec<String> = Vec::with_capacity(columns.len());

    let change_is_fixed = fixed.contains(&CHANGE_COLUMN);
    for &name in fixed {
        place(name, columns, &mut order);
        if name == LAST_NAME && !change_is_fixed {
            place(CHANGE_COLUMN, columns, &mut order);
        }
    }

    for pattern in patterns {
        // BTreeSet iteration is already alphabetical.
        for name in columns {
            if pattern.is_match(name) {
                place(name, columns, &mut order);
            }
        }
    }

    for name in columns {
        place(name, columns, &mut order);
    }
    order
}

/// Merge `entries` into one record per identity key, in key order.
///
/// Summaries are joined in encounter order; the union of fields is kept with
/// the first entry's value winning.
pub fn consolidate(
    entries: &[ChangeEntry],
    schema: &Schema,
) -> Result<Vec<ConsolidatedRecord>, ReconError> {
    let patterns = compile_patterns(schema.column_patterns)?;

    let mut groups: BTreeMap<&IdentityKey, Group> = BTreeMap::new();
    for entry in entries {
        let group = groups.entry(&entry.key).or_insert_with(|| Group {
            kinds: Vec::new(),
            summaries: Vec::new(),
            fields: BTreeMap::new(),
        });
        if !group.kinds.contains(&entry.kind) {
            group.kinds.push(entry.kind);
        }
        group.summaries.push(entry.summary.clone());
        for (name, value) in &entry.fields {
            group
                .fields
                .entry(name.clone())
                .or_insert_with(|| value.clone());
        }
    }

    let records: Vec<ConsolidatedRecord> = groups
        .into_iter()
        .map(|(key, mut group)| {
            for column in schema.drop_columns {
                group.fields.remove(*column);
            }
            group
                .fields
                .insert(CHANGE_COLUMN.to_string(), group.summaries.join(SUMMARY_SEPARATOR));

            let names: BTreeSet<String> = group.fields.keys().cloned().collect();
            let columns = order_columns(&names, schema.fixed_columns, &patterns)
                .into_iter()
                .map(|name| {
                    let value = group.fields.remove(&name).unwrap_or_default();
                    (name, value)
                })
                .collect();

            ConsolidatedRecord {
                key: key.clone(),
                kinds: group.kinds,
                columns,
            }
        })
        .collect();

    debug!(entries = entries.len(), records = records.len(), "changes consolidated");
    Ok(records)
}
