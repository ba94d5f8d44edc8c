//! Structural fixups and null handling applied before matching.

use tracing::debug;

use crate::error::ReconError;
use crate::model::{CanonicalTable, FieldSpec, FieldType, SourceRole, NULL_VALUE};
use crate::normalize::{normalize, normalize_date, normalize_gender};
use crate::schema::{DOB, FIRST_NAME, FULL_NAME, FULL_NAME_DELIMITER, GENDER, LAST_NAME};

/// Cell texts that tabular exports use for "no value".
pub const MISSING_SENTINELS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>",
    "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

const INFINITIES: &[&str] = &["inf", "+inf", "-inf", "infinity", "+infinity", "-infinity"];

pub fn is_missing(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty()
        || MISSING_SENTINELS.contains(&trimmed)
        || INFINITIES.iter().any(|inf| inf.eq_ignore_ascii_case(trimmed))
}

/// Rewrite every missing cell to [`NULL_VALUE`].
pub fn null_out_missing(table: &mut CanonicalTable) -> usize {
    let mut nulled = 0;
    for cell in table.rows.iter_mut().flatten() {
        if is_missing(cell) && cell != NULL_VALUE {
            *cell = NULL_VALUE.to_string();
            nulled += 1;
        }
    }
    nulled
}

/// Split `full name` ("Last, First") into `last name` / `first name`.
///
/// The primary source must carry either `full name` or both name columns.
pub fn split_full_name(table: &mut CanonicalTable) -> Result<(), ReconError> {
    let Some(idx) = table.column_index(FULL_NAME) else {
        if table.role == SourceRole::Primary
            && !(table.has_column(LAST_NAME) && table.has_column(FIRST_NAME))
        {
            return Err(ReconError::MissingColumn {
                role: table.role,
                column: FULL_NAME.to_string(),
            });
        }
        return Ok(());
    };

    let (last, first): (Vec<String>, Vec<String>) = table
        .rows
        .iter()
        .map(|row| {
            let full = &row[idx];
            if full == NULL_VALUE {
                return (NULL_VALUE.to_string(), NULL_VALUE.to_string());
            }
            match full.split_once(FULL_NAME_DELIMITER) {
                Some((last, first)) => (last.to_string(), first.to_string()),
                None => (full.clone(), NULL_VALUE.to_string()),
            }
        })
        .unzip();

    table.set_column(FieldSpec::new(LAST_NAME, FieldType::Name), last);
    table.set_column(FieldSpec::new(FIRST_NAME, FieldType::Name), first);
    Ok(())
}

/// Full cleansing pass. Applied identically to both sources.
pub fn cleanse(table: &mut CanonicalTable) -> Result<(), ReconError> {
    let nulled = null_out_missing(table);
    split_full_name(table)?;

    for column in [LAST_NAME, FIRST_NAME] {
        if let Some(idx) = table.column_index(column) {
            table.try_map_column(idx, |_, v| Ok::<_, ReconError>(v.to_lowercase()))?;
        }
    }

    if let Some(idx) = table.column_index(DOB) {
        let role = table.role;
        table.try_map_column(idx, |row, v| {
            normalize_date(v).map_err(|cause| ReconError::InvalidValue {
                role,
                row,
                column: DOB.to_string(),
                cause,
            })
        })?;
    }

    if let Some(idx) = table.column_index(GENDER) {
        table.try_map_column(idx, |_, v| Ok::<_, ReconError>(normalize_gender(v)))?;
    }

    debug!(role = %table.role, rows = table.len(), nulled, "table cleansed");
    Ok(())
}

/// Run every typed column through its normalizer. The first bad cell fails the pass.
pub fn validate_and_normalize(table: &mut CanonicalTable) -> Result<(), ReconError> {
    let role = table.role;
    let typed: Vec<(usize, FieldSpec)> = table
        .columns
        .iter()
        .enumerate()
        .filter(|(_, spec)| spec.field_type != FieldType::Untyped)
        .map(|(idx, spec)| (idx, spec.clone()))
        .collect();

    for (idx, spec) in &typed {
        table.try_map_column(*idx, |row, v| {
            normalize(v, spec.field_type).map_err(|cause| ReconError::InvalidValue {
                role,
                row,
                column: spec.name.clone(),
                cause,
            })
        })?;
    }

    debug!(%role, columns = typed.len(), "table validated");
    Ok(())
}
