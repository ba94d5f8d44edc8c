//! Static vocabulary of the two exports.
//!
//! Everything the engine knows about column names lives here: the header
//! dictionaries of both sources, the product catalogue, the identity key and
//! the report layout. The tables are plain constants; `Schema` bundles them so
//! the pipeline can be driven by a different vocabulary in tests.

use crate::model::{FieldSpec, FieldType, SourceRole};

pub const FULL_NAME: &str = "full name";
pub const LAST_NAME: &str = "last name";
pub const FIRST_NAME: &str = "first name";
pub const DOB: &str = "dob";
pub const GENDER: &str = "gender";

/// Delimiter between last and first name inside `full name`.
pub const FULL_NAME_DELIMITER: &str = ", ";

// ---------------------------------------------------------------------------
// Header dictionaries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderEntry {
    pub raw: &'static str,
    pub canonical: &'static str,
    pub field_type: FieldType,
}

impl HeaderEntry {
    pub fn spec(&self) -> FieldSpec {
        FieldSpec::new(self.canonical, self.field_type)
    }
}

const fn entry(raw: &'static str, canonical: &'static str, field_type: FieldType) -> HeaderEntry {
    HeaderEntry {
        raw,
        canonical,
        field_type,
    }
}

/// Enrollment export header vocabulary.
pub static PRIMARY_FIELDS: &[HeaderEntry] = &[
    entry("Name", "full name", FieldType::Name),
    entry("Last Name", "last name", FieldType::Name),
    entry("First Name", "first name", FieldType::Name),
    entry("Birth Date", "dob", FieldType::Date),
    entry("Gender", "gender", FieldType::Gender),
    entry("Occupation", "occupation", FieldType::String),
    entry("Bill Location", "bill location", FieldType::String),
    entry("Annual Salary", "salary", FieldType::Currency),
    entry("Termination Date", "termination date", FieldType::Untyped),
    entry("Basic Employee AD&D Benefit", "basic employee add benefit", FieldType::Currency),
    entry("Basic Employee AD&D Class #", "basic employee add class", FieldType::String),
    entry("Basic Employee AD&D Effective Date", "basic employee add effective date", FieldType::Date),
    entry("Basic Employee Life Benefit", "basic employee life benefit", FieldType::Currency),
    entry("Basic Employee Life Class #", "basic employee life class", FieldType::String),
    entry("Basic Employee Life Effective Date", "basic employee life effective date", FieldType::Date),
    entry("Long Term Disability Benefit", "long term disability benefit", FieldType::Currency),
    entry("Long Term Disability Class #", "long term disability class", FieldType::String),
    entry("Long Term Disability Effective Date", "long term disability effective date", FieldType::Date),
    entry("Short Term Disability Benefit", "short term disability benefit", FieldType::Currency),
    entry("Short Term Disability Class #", "short term disability class", FieldType::String),
    entry("Short Term Disability Effective Date", "short term disability effective date", FieldType::Date),
    entry("Supplemental Child AD&D Benefit", "supplemental child add benefit", FieldType::Currency),
    entry("Supplemental Child AD&D Class #", "supplemental child add class", FieldType::String),
    entry("Supplemental Child AD&D Effective Date", "supplemental child add effective date", FieldType::Date),
    entry("Supplemental Child Life Benefit", "supplemental child life benefit", FieldType::Currency),
    entry("Supplemental Child Life Class #", "supplemental child life class", FieldType::String),
    entry("Supplemental Child Life Effective Date", "supplemental child life effective date", FieldType::Date),
    entry("Supplemental Employee AD&D Benefit", "supplemental employee add benefit", FieldType::Currency),
    entry("Supplemental Employee AD&D Class #", "supplemental employee add class", FieldType::String),
    entry("Supplemental Employee AD&D Effective Date", "supplemental employee add effective date", FieldType::Date),
    entry("Supplemental Employee Life Benefit", "supplemental employee life benefit", FieldType::Currency),
    entry("Supplemental Employee Life Class #", "supplemental employee life class", FieldType::String),
    entry("Supplemental Employee Life Effective Date", "supplemental employee life effective date", FieldType::Date),
    entry("Supplemental Spouse AD&D Benefit", "supplemental spouse add benefit", FieldType::Currency),
    entry("Supplemental Spouse AD&D Class #", "supplemental spouse add class", FieldType::String),
    entry("Supplemental Spouse AD&D Effective Date", "supplemental spouse add effective date", FieldType::Date),
    entry("Supplemental Spouse Life Benefit", "supplemental spouse life benefit", FieldType::Currency),
    entry("Supplemental Spouse Life Class #", "supplemental spouse life class", FieldType::String),
    entry("Supplemental Spouse Life Effective Date", "supplemental spouse life effective date", FieldType::Date),
];

/// Partner export header vocabulary, including the product-qualified
/// headers produced by the positional scan.
pub static PARTNER_FIELDS: &[HeaderEntry] = &[
    entry("Status", "status", FieldType::Untyped),
    entry("Action", "action", FieldType::Untyped),
    entry("Last Name", "last name", FieldType::Name),
    entry("First Name", "first name", FieldType::Name),
    entry("Middle Initial", "middle initial", FieldType::String),
    entry("Gender", "gender", FieldType::Gender),
    entry("Date of Birth", "dob", FieldType::Date),
    entry("Date of Hire", "date of hire", FieldType::Date),
    entry("Part time to Full Time Effective Date", "conversion effective date", FieldType::Date),
    entry("Salary", "salary", FieldType::Currency),
    entry("Salary Effective Date", "salary effective date", FieldType::Date),
    entry("Division", "division", FieldType::Untyped),
    entry("Change Date", "change date", FieldType::Date),
    entry("Basic Life", "basic employee life", FieldType::String),
    entry("Basic Life class", "basic employee life class", FieldType::String),
    entry("Basic Life change effective date", "basic employee life effective date", FieldType::Date),
    entry("Basic Life coverage amount", "basic employee life benefit", FieldType::Currency),
    entry("Basic Life coverage date", "basic employee life coverage date", FieldType::Date),
    entry("Basic Life termination date", "basic employee life termination date", FieldType::Date),
    entry("Basic ADD", "basic employee add", FieldType::String),
    entry("Basic ADD class", "basic employee add class", FieldType::String),
    entry("Basic ADD change effective date", "basic employee add effective date", FieldType::Date),
    entry("Basic ADD coverage amount", "basic employee add benefit", FieldType::Currency),
    entry("Basic ADD coverage date", "basic employee add coverage date", FieldType::Date),
    entry("Basic ADD termination date", "basic employee add termination date", FieldType::Date),
    entry("Supplemental Life", "supplemental employee life", FieldType::String),
    entry("Supplemental Life class", "supplemental employee life class", FieldType::String),
    entry("Supplemental Life change effective date", "supplemental employee life effective date", FieldType::Date),
    entry("Supplemental Life coverage amount", "supplemental employee life benefit", FieldType::Currency),
    entry("Supplemental Life coverage date", "supplemental employee life coverage date", FieldType::Date),
    entry("Supplemental Life termination date", "supplemental employee life termination date", FieldType::Date),
    entry("Spouse Date of Birth", "supplemental spouse life benefit dob", FieldType::String),
    entry("Supplemental Spouse Life", "supplemental spouse life", FieldType::String),
    entry("Supplemental Spouse Life class", "supplemental spouse life class", FieldType::String),
    entry("Supplemental Spouse Life change effective date", "supplemental spouse life effective date", FieldType::Date),
    entry("Supplemental Spouse Life coverage amount", "supplemental spouse life benefit", FieldType::Currency),
    entry("Supplemental Spouse Life coverage date", "supplemental spouse life coverage date", FieldType::Date),
    entry("Supplemental Spouse Life termination date", "supplemental spouse life termination date", FieldType::Date),
    entry("Supplemental Child Life", "supplemental child life", FieldType::String),
    entry("Supplemental Child Life class", "supplemental child life class", FieldType::String),
    entry("Supplemental Child Life change effective date", "supplemental child life effective date", FieldType::Date),
    entry("Supplemental Child Life coverage amount", "supplemental child life benefit", FieldType::Currency),
    entry("Supplemental Child Life coverage date", "supplemental child life coverage date", FieldType::Date),
    entry("Supplemental Child Life termination date", "supplemental child life termination date", FieldType::Date),
    entry("Supplemental ADD", "supplemental employee add", FieldType::String),
    entry("Supplemental ADD class", "supplemental employee add class", FieldType::String),
    entry("Supplemental ADD change effective date", "supplemental employee add effective date", FieldType::Date),
    entry("Supplemental ADD coverage amount", "supplemental employee add benefit", FieldType::Currency),
    entry("Supplemental ADD coverage date", "supplemental employee add coverage date", FieldType::Date),
    entry("Supplemental ADD termination date", "supplemental employee add termination date", FieldType::Date),
    entry("Supplemental Spouse ADD", "supplemental spouse add", FieldType::String),
    entry("Supplemental Spouse ADD class", "supplemental spouse add class", FieldType::String),
    entry("Supplemental Spouse ADD change effective date", "supplemental spouse add effective date", FieldType::Date),
    entry("Supplemental Spouse ADD coverage amount", "supplemental spouse add benefit", FieldType::Currency),
    entry("Supplemental Spouse ADD coverage date", "supplemental spouse add coverage date", FieldType::Date),
    entry("Supplemental Spouse ADD termination date", "supplemental spouse add termination date", FieldType::Date),
    entry("Supplemental Child ADD", "supplemental child add", FieldType::String),
    entry("Supplemental Child ADD class", "supplemental child add class", FieldType::String),
    entry("Supplemental Child ADD change effective date", "supplemental child add effective date", FieldType::Date),
    entry("Supplemental Child ADD coverage amount", "supplemental child add benefit", FieldType::Currency),
    entry("Supplemental Child ADD coverage date", "supplemental child add coverage date", FieldType::Date),
    entry("Supplemental Child ADD termination date", "supplemental child add termination date", FieldType::Date),
    entry("VSTD", "short term disability", FieldType::String),
    entry("VSTD class", "short term disability class", FieldType::String),
    entry("VSTD change effective date", "short term disability effective date", FieldType::Date),
    entry("VSTD coverage amount", "short term disability benefit", FieldType::Currency),
    entry("VSTD coverage date", "short term disability coverage date", FieldType::Date),
    entry("VSTD termination date", "short term disability termination date", FieldType::Date),
    entry("Long Term Disability", "long term disability", FieldType::Untyped),
    entry("Long Term Disability class", "long term disability class", FieldType::String),
    entry("Long Term Disability change effective date", "long term disability effective date", FieldType::Date),
    entry("Long Term Disability coverage amount", "long term disability benefit", FieldType::Currency),
    entry("Long Term Disability coverage date", "long term disability coverage date", FieldType::Date),
    entry("Long Term Disability termination date", "long term disability termination date", FieldType::Date),
];

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

/// Products tracked on both sides, by canonical name.
pub static PRODUCTS: &[&str] = &[
    "basic employee life",
    "basic employee add",
    "supplemental employee life",
    "supplemental spouse life",
    "supplemental child life",
    "supplemental employee add",
    "supplemental child add",
    "short term disability",
    "long term disability",
];

/// Canonical attribute suffixes compared per product.
pub static PRODUCT_ATTRIBUTES: &[&str] = &["benefit", "class", "effective date"];

/// Partner headers that open a block of product attribute columns.
pub static PARTNER_PRODUCT_NAMES: &[&str] = &[
    "Basic Life",
    "Basic ADD",
    "Supplemental Life",
    "Supplemental Spouse Life",
    "Supplemental Child Life",
    "Supplemental ADD",
    "Supplemental Spouse ADD",
    "Supplemental Child ADD",
    "VSTD",
    "Long Term Disability",
];

/// Partner attribute headers that follow a product header, with the suffix
/// each one is rewritten to.
pub static PARTNER_PRODUCT_ATTRIBUTES: &[(&str, &str)] = &[
    ("Class", "class"),
    ("Class Change Effective Date", "change effective date"),
    ("Coverage Amount", "coverage amount"),
    ("Coverage Effective Date", "coverage date"),
    ("Termination Date", "termination date"),
];

// ---------------------------------------------------------------------------
// Matching + report layout
// ---------------------------------------------------------------------------

pub static IDENTITY_FIELDS: &[&str] = &[LAST_NAME, FIRST_NAME, DOB];

/// Base attributes compared on every matched individual.
pub static EXTENDED_ATTRIBUTES: &[&str] = &[GENDER, "salary"];

pub static FIXED_COLUMNS: &[&str] = &[
    FIRST_NAME,
    LAST_NAME,
    "change",
    FULL_NAME,
    "status",
    "action",
    "change date",
    DOB,
    "date of hire",
    "salary effective date",
];

/// Grouped right after the fixed columns. Anchored at the column start.
pub static COLUMN_PATTERNS: &[&str] = &["salary.*", "gender.*"];

/// Removed from every report record.
pub static DROP_COLUMNS: &[&str] = &[
    "division",
    "occupation",
    "conversion effective date",
    "bill location",
    "_merge",
];

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// A product and the canonical columns holding its attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductSpec {
    pub name: &'static str,
    pub attributes: &'static [&'static str],
}

impl ProductSpec {
    /// `"<product> <attribute>"` for each tracked attribute.
    pub fn columns(&self) -> Vec<String> {
        self.attributes
            .iter()
            .map(|attr| format!("{} {attr}", self.name))
            .collect()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Schema {
    pub primary_fields: &'static [HeaderEntry],
    pub partner_fields: &'static [HeaderEntry],
    pub products: &'static [&'static str],
    pub product_attributes: &'static [&'static str],
    pub partner_product_names: &'static [&'static str],
    pub partner_product_attributes: &'static [(&'static str, &'static str)],
    pub extended_attributes: &'static [&'static str],
    pub fixed_columns: &'static [&'static str],
    pub column_patterns: &'static [&'static str],
    pub drop_columns: &'static [&'static str],
}

impl Default for Schema {
    fn default() -> Self {
        Self::standard()
    }
}

impl Schema {
    /// The built-in vocabulary.
    pub fn standard() -> Self {
        Self {
            primary_fields: PRIMARY_FIELDS,
            partner_fields: PARTNER_FIELDS,
            products: PRODUCTS,
            product_attributes: PRODUCT_ATTRIBUTES,
            partner_product_names: PARTNER_PRODUCT_NAMES,
            partner_product_attributes: PARTNER_PRODUCT_ATTRIBUTES,
            extended_attributes: EXTENDED_ATTRIBUTES,
            fixed_columns: FIXED_COLUMNS,
            column_patterns: COLUMN_PATTERNS,
            drop_columns: DROP_COLUMNS,
        }
    }

    pub fn dictionary(&self, role: SourceRole) -> &'static [HeaderEntry] {
        match role {
            SourceRole::Primary => self.primary_fields,
            SourceRole::Partner => self.partner_fields,
        }
    }

    /// Dictionary entry for a raw header, if the source knows it.
    pub fn lookup(&self, role: SourceRole, raw: &str) -> Option<&'static HeaderEntry> {
        self.dictionary(role).iter().find(|e| e.raw == raw)
    }

    /// Type of a canonical column as declared by the source's dictionary.
    pub fn declared_type(&self, role: SourceRole, canonical: &str) -> Option<FieldType> {
        self.dictionary(role)
            .iter()
            .find(|e| e.canonical == canonical)
            .map(|e| e.field_type)
    }

    pub fn is_partner_product(&self, header: &str) -> bool {
        self.partner_product_names.contains(&header)
    }

    /// Rewrite suffix for a partner attribute header.
    pub fn partner_attribute(&self, header: &str) -> Option<&'static str> {
        self.partner_product_attributes
            .iter()
            .find(|(raw, _)| *raw == header)
            .map(|(_, suffix)| *suffix)
    }

    pub fn product_specs(&self) -> impl Iterator<Item = ProductSpec> + '_ {
        self.products.iter().map(|&name| ProductSpec {
            name,
            attributes: self.product_attributes,
        })
    }
}
