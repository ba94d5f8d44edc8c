use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::error::ReconError;
use crate::model::{CanonicalTable, IdentityKey, JoinResult, JoinedRow, NULL_VALUE};
use crate::schema::{DOB, FIRST_NAME, IDENTITY_FIELDS, LAST_NAME};

/// Positions of the identity columns in `table`.
fn key_columns(table: &CanonicalTable) -> Result<[usize; 3], ReconError> {
    let find = |name: &str| {
        table.column_index(name).ok_or_else(|| ReconError::MissingColumn {
            role: table.role,
            column: name.to_string(),
        })
    };
    Ok([find(LAST_NAME)?, find(FIRST_NAME)?, find(DOB)?])
}

/// Identity key of every row, in row order. A row with an empty or null key
/// component is an error.
pub fn identity_keys(table: &CanonicalTable) -> Result<Vec<IdentityKey>, ReconError> {
    let cols = key_columns(table)?;
    table
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            for (field, &col) in IDENTITY_FIELDS.iter().zip(&cols) {
                let value = row[col].trim();
                if value.is_empty() || value == NULL_VALUE {
                    return Err(ReconError::MissingIdentity {
                        role: table.role,
                        row: i + 1,
                        field: field.to_string(),
                    });
                }
            }
            Ok(IdentityKey {
                last_name: row[cols[0]].clone(),
                first_name: row[cols[1]].clone(),
                dob: row[cols[2]].clone(),
            })
        })
        .collect()
}

/// Non-key columns carried by both tables.
pub fn shared_columns(primary: &CanonicalTable, partner: &CanonicalTable) -> BTreeSet<String> {
    primary
        .column_names()
        .filter(|name| !IDENTITY_FIELDS.contains(name) && partner.has_column(name))
        .map(str::to_string)
        .collect()
}

fn row_fields(
    table: &CanonicalTable,
    row: usize,
    shared: &BTreeSet<String>,
) -> BTreeMap<String, String> {
    table
        .columns
        .iter()
        .zip(&table.rows[row])
        .map(|(spec, value)| {
            let name = if shared.contains(&spec.name) {
                format!("{}{}", spec.name, table.role.suffix())
            } else {
                spec.name.clone()
            };
            (name, value.clone())
        })
        .collect()
}

fn group_by_key(keys: Vec<IdentityKey>) -> BTreeMap<IdentityKey, Vec<usize>> {
    let mut groups: BTreeMap<IdentityKey, Vec<usize>> = BTreeMap::new();
    for (row, key) in keys.into_iter().enumerate() {
        groups.entry(key).or_default().push(row);
    }
    groups
}

/// Outer join on the identity key.
///
/// Output is in key order. Duplicate keys pair as a cartesian product,
/// primary rows outermost.
pub fn join_on_identity(
    primary: &CanonicalTable,
    partner: &CanonicalTable,
) -> Result<JoinResult, ReconError> {
    let left = group_by_key(identity_keys(primary)?);
    let right = group_by_key(identity_keys(partner)?);
    let shared = shared_columns(primary, partner);

    let mut matched = Vec::new();
    let mut primary_only = Vec::new();
    let mut partner_only = Vec::new();

    for (key, left_rows) in &left {
        match right.get(key) {
            Some(right_rows) => {
                for &l in left_rows {
                    for &r in right_rows {
                        let mut fields = row_fields(primary, l, &shared);
                        fields.extend(row_fields(partner, r, &shared));
                        matched.push(JoinedRow {
                            key: key.clone(),
                            fields,
                        });
                    }
                }
            }
            None => {
                for &l in left_rows {
                    primary_only.push(JoinedRow {
                        key: key.clone(),
                        fields: row_fields(primary, l, &shared),
                    });
                }
            }
        }
    }

    for (key, right_rows) in &right {
        if !left.contains_key(key) {
            for &r in right_rows {
                partner_only.push(JoinedRow {
                    key: key.clone(),
                    fields: row_fields(partner, r, &shared),
                });
            }
        }
    }

    debug!(
        matched = matched.len(),
        primary_only = primary_only.len(),
        partner_only = partner_only.len(),
        shared = shared.len(),
        "identity join complete"
    );

    Ok(JoinResult {
        matched,
        primary_only,
        partner_only,
        shared_columns: shared,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldSpec, SourceRole};

    fn table(role: SourceRole, cols: &[&str], rows: &[&[&str]]) -> CanonicalTable {
        CanonicalTable {
            role,
            columns: cols.iter().map(|c| FieldSpec::untyped(*c)).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|v| v.to_string()).collect())
                .collect(),
        }
    }

    const COLS: &[&str] = &["last name", "first name", "dob", "gender"];

    #[test]
    fn partitions() {
        let primary = table(
            SourceRole::Primary,
            COLS,
            &[
                &["smith", "jo", "01/02/1990", "female"],
                &["doe", "jane", "03/04/1985", "female"],
            ],
        );
        let partner = table(
            SourceRole::Partner,
            COLS,
            &[
                &["smith", "jo", "01/02/1990", "male"],
                &["roe", "rick", "05/06/1970", "male"],
            ],
        );
        let out = join_on_identity(&primary, &partner).unwrap();
        assert_eq!(out.matched.len(), 1);
        assert_eq!(out.primary_only.len(), 1);
        assert_eq!(out.primary_only[0].key.last_name, "doe");
        assert_eq!(out.partner_only.len(), 1);
        assert_eq!(out.partner_only[0].key.last_name, "roe");

        let row = &out.matched[0];
        assert_eq!(row.side_value("gender", SourceRole::Primary), Some("female"));
        assert_eq!(row.side_value("gender", SourceRole::Partner), Some("male"));
        assert_eq!(row.fields.get("last name").map(String::as_str), Some("smith"));
        assert!(out.shared_columns.contains("gender"));
    }

    #[test]
    fn unmatched_rows_keep_suffixed_shared_columns() {
        let primary = table(SourceRole::Primary, COLS, &[&["a", "b", "01/01/2000", "male"]]);
        let partner = table(
            SourceRole::Partner,
            &["last name", "first name", "dob", "gender", "status"],
            &[&["c", "d", "01/01/2000", "female", "A"]],
        );
        let out = join_on_identity(&primary, &partner).unwrap();
        let removed = &out.primary_only[0].fields;
        assert!(removed.contains_key("gender_primary"));
        let added = &out.partner_only[0].fields;
        assert!(added.contains_key("gender_partner"));
        assert!(added.contains_key("status"));
    }

    #[test]
    fn duplicates_pair_as_product() {
        let primary = table(
            SourceRole::Primary,
            COLS,
            &[&["a", "b", "01/01/2000", "m1"], &["a", "b", "01/01/2000", "m2"]],
        );
        let partner = table(
            SourceRole::Partner,
            COLS,
            &[&["a", "b", "01/01/2000", "p1"], &["a", "b", "01/01/2000", "p2"]],
        );
        let out = join_on_identity(&primary, &partner).unwrap();
        let pairs: Vec<(&str, &str)> = out
            .matched
            .iter()
            .map(|r| {
                (
                    r.side_value("gender", SourceRole::Primary).unwrap(),
                    r.side_value("gender", SourceRole::Partner).unwrap(),
                )
            })
            .collect();
        assert_eq!(pairs, vec![("m1", "p1"), ("m1", "p2"), ("m2", "p1"), ("m2", "p2")]);
    }

    #[test]
    fn output_is_key_ordered() {
        let primary = table(
            SourceRole::Primary,
            COLS,
            &[&["zed", "a", "01/01/2000", ""], &["abe", "a", "01/01/2000", ""]],
        );
        let partner = table(SourceRole::Partner, COLS, &[]);
        let out = join_on_identity(&primary, &partner).unwrap();
        let names: Vec<&str> = out.primary_only.iter().map(|r| r.key.last_name.as_str()).collect();
        assert_eq!(names, vec!["abe", "zed"]);
    }

    #[test]
    fn null_key_component_is_an_error() {
        let primary = table(SourceRole::Primary, COLS, &[&["cher", "null", "01/01/1946", ""]]);
        let err = identity_keys(&primary).unwrap_err();
        assert!(matches!(
            err,
            ReconError::MissingIdentity { row: 1, ref field, .. } if field == "first name"
        ));
    }

    #[test]
    fn missing_key_column_is_structural() {
        let partner = table(SourceRole::Partner, &["last name", "first name"], &[]);
        let err = identity_keys(&partner).unwrap_err();
        assert!(matches!(err, ReconError::MissingColumn { ref column, .. } if column == "dob"));
    }
}
