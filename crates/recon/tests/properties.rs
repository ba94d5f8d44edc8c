// Property-based tests for header mapping, normalization, join and layout.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use std::collections::BTreeSet;

use proptest::prelude::*;

use benefits_recon::classify::classify;
use benefits_recon::consolidate::consolidate;
use benefits_recon::mapper::{expand_product_headers, map_headers};
use benefits_recon::matcher::join_on_identity;
use benefits_recon::model::{CanonicalTable, FieldSpec, FieldType, SourceRole, NULL_VALUE};
use benefits_recon::normalize::normalize;
use benefits_recon::schema::{PARTNER_PRODUCT_ATTRIBUTES, PARTNER_PRODUCT_NAMES};
use benefits_recon::Schema;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

/// Header drawn mostly from the partner vocabulary, sometimes free text.
fn arb_header() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => prop::sample::select(PARTNER_PRODUCT_NAMES).prop_map(str::to_string),
        4 => prop::sample::select(PARTNER_PRODUCT_ATTRIBUTES).prop_map(|(raw, _)| raw.to_string()),
        2 => prop::sample::select(vec!["Last Name", "First Name", "Gender", "Salary", "Date of Birth"])
            .prop_map(str::to_string),
        1 => r"[A-Za-z ]{1,12}",
    ]
}

fn arb_type() -> impl Strategy<Value = FieldType> {
    prop::sample::select(vec![
        FieldType::String,
        FieldType::Date,
        FieldType::Currency,
        FieldType::Name,
        FieldType::Gender,
        FieldType::Phone,
        FieldType::Email,
    ])
}

fn absent_value() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), r"[ \t]{1,4}", Just(NULL_VALUE.to_string())]
}

/// Distinct identity keys, each assigned to primary, partner or both.
/// Names never spell the null marker.
fn arb_population() -> impl Strategy<Value = Vec<((String, String), u8)>> {
    proptest::collection::btree_set(("k[a-z]{0,5}", "k[a-z]{0,5}"), 0..20).prop_flat_map(|keys| {
        let n = keys.len();
        (
            Just(keys.into_iter().collect::<Vec<_>>()),
            proptest::collection::vec(0u8..3, n),
        )
            .prop_map(|(keys, sides)| keys.into_iter().zip(sides).collect())
    })
}

fn table(role: SourceRole, rows: Vec<Vec<String>>) -> CanonicalTable {
    CanonicalTable {
        role,
        columns: ["last name", "first name", "dob", "gender"]
            .iter()
            .map(|c| FieldSpec::untyped(*c))
            .collect(),
        rows,
    }
}

fn split_population(
    population: &[((String, String), u8)],
) -> (CanonicalTable, CanonicalTable, usize) {
    let mut primary = Vec::new();
    let mut partner = Vec::new();
    let mut shared = 0;
    for ((last, first), side) in population {
        let row = |gender: &str| {
            vec![last.clone(), first.clone(), "01/01/2000".to_string(), gender.to_string()]
        };
        match side {
            0 => primary.push(row("male")),
            1 => partner.push(row("female")),
            _ => {
                primary.push(row("male"));
                partner.push(row("female"));
                shared += 1;
            }
        }
    }
    (
        table(SourceRole::Primary, primary),
        table(SourceRole::Partner, partner),
        shared,
    )
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn product_scan_terminates_and_preserves_length(
        headers in proptest::collection::vec(arb_header(), 0..16)
    ) {
        let schema = Schema::standard();
        let out = expand_product_headers(&headers, &schema);
        prop_assert_eq!(out.len(), headers.len());
        // Only attribute headers are ever rewritten.
        for (before, after) in headers.iter().zip(&out) {
            if before != after {
                prop_assert!(schema.partner_attribute(before).is_some());
            }
        }
    }

    #[test]
    fn header_mapping_is_idempotent(
        headers in proptest::collection::vec(arb_header(), 0..16)
    ) {
        let schema = Schema::standard();
        for role in [SourceRole::Primary, SourceRole::Partner] {
            let once: Vec<String> = map_headers(role, &headers, &schema)
                .into_iter()
                .map(|s| s.name)
                .collect();
            let twice: Vec<String> = map_headers(role, &once, &schema)
                .into_iter()
                .map(|s| s.name)
                .collect();
            prop_assert_eq!(once, twice);
        }
    }

    #[test]
    fn normalizers_map_absent_to_null(value in absent_value(), field_type in arb_type()) {
        prop_assert_eq!(normalize(&value, field_type).unwrap(), NULL_VALUE);
    }

    #[test]
    fn normalizers_never_return_empty(value in r"\PC{0,12}", field_type in arb_type()) {
        if let Ok(out) = normalize(&value, field_type) {
            prop_assert!(!out.is_empty());
        }
    }

    #[test]
    fn join_partitions_add_up(population in arb_population()) {
        let (primary, partner, shared) = split_population(&population);
        let out = join_on_identity(&primary, &partner).unwrap();
        prop_assert_eq!(out.matched.len(), shared);
        prop_assert_eq!(out.primary_only.len(), primary.len() - shared);
        prop_assert_eq!(out.partner_only.len(), partner.len() - shared);
    }

    #[test]
    fn report_is_deterministic(population in arb_population()) {
        let schema = Schema::standard();
        let (primary, partner, _) = split_population(&population);
        let render = || {
            let join = join_on_identity(&primary, &partner).unwrap();
            let records = consolidate(&classify(&join, &schema), &schema).unwrap();
            serde_json::to_string(&records).unwrap()
        };
        prop_assert_eq!(render(), render());
    }

    #[test]
    fn every_individual_appears_once(population in arb_population()) {
        let schema = Schema::standard();
        let (primary, partner, _) = split_population(&population);
        let join = join_on_identity(&primary, &partner).unwrap();
        let records = consolidate(&classify(&join, &schema), &schema).unwrap();
        // Shared keys always differ on gender, so every key yields a record.
        prop_assert_eq!(records.len(), population.len());
        let keys: BTreeSet<_> = records.iter().map(|r| &r.key).collect();
        prop_assert_eq!(keys.len(), records.len());
    }
}
