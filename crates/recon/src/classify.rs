use tracing::debug;

use crate::model::{ChangeEntry, ChangeKind, FieldChange, JoinResult, JoinedRow, SourceRole};
use crate::schema::Schema;

pub const REMOVED_SUMMARY: &str = "Primary only entry - remove";
pub const ADDED_SUMMARY: &str = "Partner only entry - add";

/// Separator between individual change descriptions.
pub const SUMMARY_SEPARATOR: &str = "; ";

impl FieldChange {
    pub fn describe(&self) -> String {
        format!("{} changed from {} to {}", self.field, self.old, self.new)
    }
}

fn unmatched_entry(row: &JoinedRow, kind: ChangeKind, summary: &str) -> ChangeEntry {
    ChangeEntry {
        key: row.key.clone(),
        kind,
        changes: Vec::new(),
        summary: summary.to_string(),
        fields: row.fields.clone(),
    }
}

/// One entry per unmatched row: removals first, then additions.
pub fn classify_unmatched(join: &JoinResult) -> Vec<ChangeEntry> {
    let removed = join
        .primary_only
        .iter()
        .map(|row| unmatched_entry(row, ChangeKind::Removed, REMOVED_SUMMARY));
    let added = join
        .partner_only
        .iter()
        .map(|row| unmatched_entry(row, ChangeKind::Added, ADDED_SUMMARY));
    removed.chain(added).collect()
}

/// Compare `attributes` on every matched row. Attributes not carried by both
/// sources are skipped. A row yields an entry only if something differs.
pub fn compare_attributes<S: AsRef<str>>(join: &JoinResult, attributes: &[S]) -> Vec<ChangeEntry> {
    let present: Vec<&str> = attributes
        .iter()
        .map(|attr| attr.as_ref())
        .filter(|attr| join.shared_columns.contains(*attr))
        .collect();
    if present.is_empty() {
        return Vec::new();
    }

    join.matched
        .iter()
        .filter_map(|row| {
            let changes: Vec<FieldChange> = present
                .iter()
                .filter_map(|attr| {
                    let old = row.side_value(attr, SourceRole::Primary)?;
                    let new = row.side_value(attr, SourceRole::Partner)?;
                    (old != new).then(|| FieldChange {
                        field: attr.to_string(),
                        old: old.to_string(),
                        new: new.to_string(),
                    })
                })
                .collect();
            if changes.is_empty() {
                return None;
            }
            let summary = changes
                .iter()
                .map(FieldChange::describe)
                .collect::<Vec<_>>()
                .join(SUMMARY_SEPARATOR);
            Some(ChangeEntry {
                key: row.key.clone(),
                kind: ChangeKind::FieldChanged,
                changes,
                summary,
                fields: row.fields.clone(),
            })
        })
        .collect()
}

/// All diff passes in encounter order: unmatched, base attributes, then one
/// pass per product.
pub fn classify(join: &JoinResult, schema: &Schema) -> Vec<ChangeEntry> {
    let mut entries = classify_unmatched(join);
    let unmatched = entries.len();

    let base = compare_attributes(join, schema.extended_attributes);
    let base_count = base.len();
    entries.extend(base);

    for product in schema.product_specs() {
        entries.extend(compare_attributes(join, &product.columns()));
    }

    debug!(
        unmatched,
        base = base_count,
        product = entries.len() - unmatched - base_count,
        "diff passes complete"
    );
    entries
}
