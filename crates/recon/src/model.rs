use std::collections::{BTreeMap, BTreeSet};

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Canonical representation of a missing cell after cleansing.
pub const NULL_VALUE: &str = "null";

/// Name of the consolidated change-summary column.
pub const CHANGE_COLUMN: &str = "change";

// ---------------------------------------------------------------------------
// Sources + field types
// ---------------------------------------------------------------------------

/// Which of the two exports a table came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceRole {
    /// The authoritative enrollment export.
    Primary,
    /// The external counterpart export.
    Partner,
}

impl SourceRole {
    /// Column suffix used for this side's copy of a shared field after the join.
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Primary => "_primary",
            Self::Partner => "_partner",
        }
    }
}

impl std::fmt::Display for SourceRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Primary => write!(f, "primary"),
            Self::Partner => write!(f, "partner"),
        }
    }
}

/// Semantic type tag that selects a value normalizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    String,
    Date,
    Currency,
    Name,
    Gender,
    Phone,
    Email,
    Untyped,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Date => "date",
            Self::Currency => "currency",
            Self::Name => "name",
            Self::Gender => "gender",
            Self::Phone => "phone",
            Self::Email => "email",
            Self::Untyped => "untyped",
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A canonical column name and its type tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub name: String,
    pub field_type: FieldType,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }

    pub fn untyped(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Untyped)
    }
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

/// One source file as read: header row plus positional data rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Build a table, padding short rows with empty cells and dropping cells
    /// beyond the header width.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { headers, rows }
    }

    pub fn width(&self) -> usize {
        self.headers.len()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A table whose headers have been translated to canonical field names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalTable {
    pub role: SourceRole,
    pub columns: Vec<FieldSpec>,
    pub rows: Vec<Vec<String>>,
}

impl CanonicalTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Replace the values of `name`, appending the column if it does not exist yet.
    pub fn set_column(&mut self, spec: FieldSpec, values: Vec<String>) {
        let idx = match self.column_index(&spec.name) {
            Some(idx) => {
                self.columns[idx] = spec;
                idx
            }
            None => {
                self.columns.push(spec);
                for row in &mut self.rows {
                    row.push(String::new());
                }
                self.columns.len() - 1
            }
        };
        for (row, value) in self.rows.iter_mut().zip(values) {
            row[idx] = value;
        }
    }

    /// Apply `f` to every cell of column `idx`. `f` receives the 1-based row number.
    pub fn try_map_column<E>(
        &mut self,
        idx: usize,
        mut f: impl FnMut(usize, &str) -> Result<String, E>,
    ) -> Result<(), E> {
        for (i, row) in self.rows.iter_mut().enumerate() {
            row[idx] = f(i + 1, &row[idx])?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Identity + join
// ---------------------------------------------------------------------------

/// Exact-match identity of an insured individual.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct IdentityKey {
    pub last_name: String,
    pub first_name: String,
    pub dob: String,
}

/// One output row of the outer join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinedRow {
    pub key: IdentityKey,
    pub fields: BTreeMap<String, String>,
}

impl JoinedRow {
    /// Value of a shared field as reported by `role`.
    pub fn side_value(&self, field: &str, role: SourceRole) -> Option<&str> {
        self.fields
            .get(&format!("{field}{}", role.suffix()))
            .map(String::as_str)
    }
}

#[derive(Debug, Default)]
pub struct JoinResult {
    pub matched: Vec<JoinedRow>,
    pub primary_only: Vec<JoinedRow>,
    pub partner_only: Vec<JoinedRow>,
    /// Non-key columns present in both tables.
    pub shared_columns: BTreeSet<String>,
}

// ---------------------------------------------------------------------------
// Changes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// Present only in the partner export.
    Added,
    /// Present only in the primary export.
    Removed,
    /// Present in both with at least one differing attribute.
    FieldChanged,
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Added => write!(f, "added"),
            Self::Removed => write!(f, "removed"),
            Self::FieldChanged => write!(f, "field_changed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldChange {
    pub field: String,
    pub old: String,
    pub new: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEntry {
    pub key: IdentityKey,
    pub kind: ChangeKind,
    pub changes: Vec<FieldChange>,
    pub summary: String,
    pub fields: BTreeMap<String, String>,
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// All changes for one individual, columns in final report order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsolidatedRecord {
    pub key: IdentityKey,
    pub kinds: Vec<ChangeKind>,
    pub columns: Vec<(String, String)>,
}

impl ConsolidatedRecord {
    pub fn get(&self, column: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    pub fn change(&self) -> &str {
        self.get(CHANGE_COLUMN).unwrap_or_default()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(name, _)| name.as_str()).collect()
    }
}

impl Serialize for ConsolidatedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, value) in &self.columns {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// The JSON contract returned to the caller.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CompareReport {
    pub general: Vec<ConsolidatedRecord>,
    /// Reserved; always empty.
    pub customer: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconSummary {
    pub primary_rows: usize,
    pub partner_rows: usize,
    pub matched: usize,
    pub added: usize,
    pub removed: usize,
    pub changed: usize,
    pub records: usize,
}

// ---------------------------------------------------------------------------
// Input + Output
// ---------------------------------------------------------------------------

/// The two raw tables of one comparison request.
pub struct CompareInput {
    pub primary: RawTable,
    pub partner: RawTable,
}

#[derive(Debug, Clone)]
pub struct ReconResult {
    pub report: CompareReport,
    pub summary: ReconSummary,
}
