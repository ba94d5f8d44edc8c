use std::collections::BTreeSet;

use crate::model::{ChangeEntry, ChangeKind, ConsolidatedRecord, JoinResult, ReconSummary};

/// Counts for one comparison run.
///
/// `changed` counts individuals with at least one field-level difference,
/// not individual field changes.
pub fn compute_summary(
    primary_rows: usize,
    partner_rows: usize,
    join: &JoinResult,
    entries: &[ChangeEntry],
    records: &[ConsolidatedRecord],
) -> ReconSummary {
    let changed: BTreeSet<_> = entries
        .iter()
        .filter(|e| e.kind == ChangeKind::FieldChanged)
        .map(|e| &e.key)
        .collect();

    ReconSummary {
        primary_rows,
        partner_rows,
        matched: join.matched.len(),
        added: join.partner_only.len(),
        removed: join.primary_only.len(),
        changed: changed.len(),
        records: records.len(),
    }
}

impl std::fmt::Display for ReconSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} primary rows, {} partner rows: {} matched, {} added, {} removed, {} changed ({} records)",
            self.primary_rows,
            self.partner_rows,
            self.matched,
            self.added,
            self.removed,
            self.changed,
            self.records,
        )
    }
}
