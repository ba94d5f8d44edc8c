use tracing::{debug, info};

use crate::classify::classify;
use crate::cleanse::{cleanse, validate_and_normalize};
use crate::config::CompareOptions;
use crate::consolidate::consolidate;
use crate::error::ReconError;
use crate::mapper::canonicalize;
use crate::matcher::join_on_identity;
use crate::model::{
    CanonicalTable, CompareInput, CompareReport, RawTable, ReconResult, SourceRole,
};
use crate::schema::Schema;
use crate::summary::compute_summary;

/// Map, cleanse and (optionally) validate one source table.
pub fn prepare(
    role: SourceRole,
    raw: RawTable,
    options: &CompareOptions,
    schema: &Schema,
) -> Result<CanonicalTable, ReconError> {
    let mut table = canonicalize(role, raw, schema);
    cleanse(&mut table)?;
    if options.runs_validation() {
        validate_and_normalize(&mut table)?;
    }
    Ok(table)
}

/// Run one comparison. Either the whole report is produced or nothing is.
pub fn run(
    input: CompareInput,
    options: &CompareOptions,
    schema: &Schema,
) -> Result<ReconResult, ReconError> {
    let primary_rows = input.primary.len();
    let partner_rows = input.partner.len();
    debug!(primary_rows, partner_rows, validate = options.runs_validation(), "comparison started");

    let primary = prepare(SourceRole::Primary, input.primary, options, schema)?;
    let partner = prepare(SourceRole::Partner, input.partner, options, schema)?;

    let join = join_on_identity(&primary, &partner)?;
    let entries = classify(&join, schema);
    let general = consolidate(&entries, schema)?;
    let summary = compute_summary(primary_rows, partner_rows, &join, &entries, &general);

    info!(
        matched = summary.matched,
        added = summary.added,
        removed = summary.removed,
        changed = summary.changed,
        records = summary.records,
        "comparison finished"
    );

    Ok(ReconResult {
        report: CompareReport {
            general,
            customer: Vec::new(),
        },
        summary,
    })
}
