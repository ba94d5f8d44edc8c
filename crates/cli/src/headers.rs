//! `bcompare headers`: header mapping dry run.

use std::path::PathBuf;

use serde::Serialize;

use benefits_io::UploadedFile;
use benefits_recon::mapper::map_headers;
use benefits_recon::model::FieldType;
use benefits_recon::{Schema, SourceRole};

use crate::{to_json, CliError};

#[derive(Debug, Serialize)]
struct HeaderMapping {
    raw: String,
    name: String,
    #[serde(rename = "type")]
    field_type: FieldType,
}

fn mappings(role: SourceRole, headers: &[String], schema: &Schema) -> Vec<HeaderMapping> {
    headers
        .iter()
        .zip(map_headers(role, headers, schema))
        .map(|(raw, spec)| HeaderMapping {
            raw: raw.clone(),
            name: spec.name,
            field_type: spec.field_type,
        })
        .collect()
}

fn render(rows: &[HeaderMapping]) -> String {
    let width = rows.iter().map(|m| m.raw.chars().count()).max().unwrap_or(0);
    rows.iter()
        .map(|m| format!("{:<width$}  ->  {} ({})\n", m.raw, m.name, m.field_type))
        .collect()
}

pub fn cmd_headers(file: PathBuf, role: SourceRole, json: bool) -> Result<(), CliError> {
    let upload = UploadedFile::from_path(&file).map_err(CliError::from_io)?;
    let table = upload.read_table().map_err(CliError::from_io)?;
    let rows = mappings(role, &table.headers, &Schema::standard());

    if json {
        println!("{}", to_json(&rows)?);
    } else {
        print!("{}", render(&rows));
    }
    Ok(())
}
