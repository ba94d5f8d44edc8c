use std::collections::HashMap;

use tracing::debug;

use crate::model::{CanonicalTable, FieldSpec, RawTable, SourceRole};
use crate::schema::Schema;

/// Rewrite partner attribute headers that follow a product header.
///
/// `["Basic Life", "Class", "Coverage Amount", "Salary"]` becomes
/// `["Basic Life", "Basic Life class", "Basic Life coverage amount", "Salary"]`.
/// A block ends at the first header that is not an attribute header; the scan
/// resumes from that header.
pub fn expand_product_headers(headers: &[String], schema: &Schema) -> Vec<String> {
    let mut out = headers.to_vec();
    let mut i = 0;
    while i < out.len() {
        if !schema.is_partner_product(&out[i]) {
            i += 1;
            continue;
        }
        let product = out[i].clone();
        let mut j = i + 1;
        while j < out.len() {
            match schema.partner_attribute(&out[j]) {
                Some(suffix) => {
                    out[j] = format!("{product} {suffix}");
                    j += 1;
                }
                None => break,
            }
        }
        // j > i, so every pass moves forward
        i = j;
    }
    out
}

/// Translate a source's header row into canonical field specs.
///
/// Unknown headers pass through untyped. Repeated canonical names get a
/// `.1`, `.2`, ... suffix in order of appearance.
pub fn map_headers(role: SourceRole, headers: &[String], schema: &Schema) -> Vec<FieldSpec> {
    let trimmed: Vec<String> = headers.iter().map(|h| h.trim().to_string()).collect();
    let headers = match role {
        SourceRole::Primary => trimmed,
        SourceRole::Partner => expand_product_headers(&trimmed, schema),
    };

    let mut seen: HashMap<String, usize> = HashMap::new();
    headers
        .iter()
        .map(|header| {
            let mut spec = schema
                .lookup(role, header)
                .map(|e| e.spec())
                .unwrap_or_else(|| FieldSpec::untyped(header.as_str()));
            let count = seen.entry(spec.name.clone()).or_insert(0);
            if *count > 0 {
                spec.name = format!("{}.{}", spec.name, count);
            }
            *count += 1;
            spec
        })
        .collect()
}

/// Translate headers. Rows are fitted to the header width, since a
/// `RawTable` built by hand may skip the padding `RawTable::new` does.
pub fn canonicalize(role: SourceRole, raw: RawTable, schema: &Schema) -> CanonicalTable {
    let RawTable { headers, rows } = raw;
    let raw = RawTable::new(headers, rows);
    let columns = map_headers(role, &raw.headers, schema);
    let mapped = columns
        .iter()
        .zip(&raw.headers)
        .filter(|(spec, header)| spec.name != header.trim())
        .count();
    debug!(%role, columns = columns.len(), mapped, rows = raw.rows.len(), "headers canonicalized");
    CanonicalTable {
        role,
        columns,
        rows: raw.rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FieldType;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn names(specs: &[FieldSpec]) -> Vec<&str> {
        specs.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn expands_attribute_block() {
        let schema = Schema::standard();
        let out = expand_product_headers(
            &strings(&["Last Name", "Basic Life", "Class", "Coverage Amount", "Salary", "Class"]),
            &schema,
        );
        assert_eq!(
            out,
            strings(&[
                "Last Name",
                "Basic Life",
                "Basic Life class",
                "Basic Life coverage amount",
                "Salary",
                // Outside any product block
                "Class",
            ])
        );
    }

    #[test]
    fn product_as_last_header() {
        let schema = Schema::standard();
        let headers = strings(&["Last Name", "VSTD"]);
        assert_eq!(expand_product_headers(&headers, &schema), headers);
    }

    #[test]
    fn product_with_immediate_mismatch() {
        let schema = Schema::standard();
        let headers = strings(&["VSTD", "Salary", "Class"]);
        assert_eq!(expand_product_headers(&headers, &schema), headers);
    }

    #[test]
    fn consecutive_products() {
        let schema = Schema::standard();
        let out = expand_product_headers(
            &strings(&["Basic Life", "Basic ADD", "Class", "VSTD", "Termination Date"]),
            &schema,
        );
        assert_eq!(
            out,
            strings(&["Basic Life", "Basic ADD", "Basic ADD class", "VSTD", "VSTD termination date"])
        );
    }

    #[test]
    fn partner_headers_map_to_canonical_products() {
        let schema = Schema::standard();
        let specs = map_headers(
            SourceRole::Partner,
            &strings(&[
                "Last Name",
                "First Name",
                "Date of Birth",
                "Basic Life",
                "Class",
                "Class Change Effective Date",
                "Coverage Amount",
                "Coverage Effective Date",
            ]),
            &schema,
        );
        assert_eq!(
            names(&specs),
            vec![
                "last name",
                "first name",
                "dob",
                "basic employee life",
                "basic employee life class",
                "basic employee life effective date",
                "basic employee life benefit",
                "basic employee life coverage date",
            ]
        );
        assert_eq!(specs[6].field_type, FieldType::Currency);
        assert_eq!(specs[2].field_type, FieldType::Date);
    }

    #[test]
    fn primary_headers_and_passthrough() {
        let schema = Schema::standard();
        let specs = map_headers(
            SourceRole::Primary,
            &strings(&[" Name ", "Birth Date", "Annual Salary", "Employee ID"]),
            &schema,
        );
        assert_eq!(names(&specs), vec!["full name", "dob", "salary", "Employee ID"]);
        assert_eq!(specs[3].field_type, FieldType::Untyped);
    }

    #[test]
    fn primary_does_not_scan_products() {
        let schema = Schema::standard();
        let specs = map_headers(SourceRole::Primary, &strings(&["VSTD", "Class"]), &schema);
        assert_eq!(names(&specs), vec!["VSTD", "Class"]);
    }

    #[test]
    fn mapping_is_idempotent() {
        let schema = Schema::standard();
        let raw = strings(&["Last Name", "Gender", "Basic Life", "Coverage Amount", "Other"]);
        for role in [SourceRole::Primary, SourceRole::Partner] {
            let once: Vec<String> = map_headers(role, &raw, &schema)
                .into_iter()
                .map(|s| s.name)
                .collect();
            let twice: Vec<String> = map_headers(role, &once, &schema)
                .into_iter()
                .map(|s| s.name)
                .collect();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn duplicate_names_are_suffixed() {
        let schema = Schema::standard();
        let specs = map_headers(
            SourceRole::Partner,
            &strings(&["Notes", "Salary", "Notes", "Notes"]),
            &schema,
        );
        assert_eq!(names(&specs), vec!["Notes", "salary", "Notes.1", "Notes.2"]);
    }

    #[test]
    fn canonicalize_keeps_rows() {
        let schema = Schema::standard();
        let raw = RawTable::new(
            strings(&["Last Name", "Gender"]),
            vec![strings(&["Smith", "F"]), strings(&["Doe", "M"])],
        );
        let table = canonicalize(SourceRole::Partner, raw, &schema);
        assert_eq!(table.role, SourceRole::Partner);
        assert_eq!(table.column_index("gender"), Some(1));
        assert_eq!(table.rows[1], strings(&["Doe", "M"]));
    }

    #[test]
    fn canonicalize_fits_hand_built_rows() {
        let raw = RawTable {
            headers: strings(&["Last Name", "First Name", "Gender"]),
            rows: vec![strings(&["Smith"]), strings(&["Doe", "Jane", "F", "extra"])],
        };
        let table = canonicalize(SourceRole::Partner, raw, &Schema::standard());
        assert_eq!(table.rows[0], strings(&["Smith", "", ""]));
        assert_eq!(table.rows[1], strings(&["Doe", "Jane", "F"]));
    }
}
