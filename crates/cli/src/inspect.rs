//! `bcompare inspect`: file details for one export.

use std::path::PathBuf;

use benefits_io::{describe, FileDetails, UploadedFile};

use crate::{to_json, CliError};

fn render(details: &FileDetails) -> String {
    let mut out = format!(
        "file:     {}\nsize:     {} bytes\nrows:     {}\ncolumns:  {}\n",
        details.file_name, details.file_size, details.num_rows, details.num_columns
    );
    for (i, column) in details.columns.iter().enumerate() {
        out.push_str(&format!("  {:>3}  {}\n", i + 1, column));
    }
    out
}

pub fn cmd_inspect(file: PathBuf, json: bool) -> Result<(), CliError> {
    let upload = UploadedFile::from_path(&file).map_err(CliError::from_io)?;
    let details = describe(&upload).map_err(CliError::from_io)?;

    if json {
        println!("{}", to_json(&details)?);
    } else {
        print!("{}", render(&details));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn human_layout() {
        let details = FileDetails {
            file_name: "Enrollment.csv".into(),
            file_size: 42,
            num_rows: 2,
            num_columns: 2,
            columns: vec!["Name".into(), "Gender".into()],
        };
        assert_eq!(
            render(&details),
            "file:     Enrollment.csv\nsize:     42 bytes\nrows:     2\ncolumns:  2\n    1  Name\n    2  Gender\n"
        );
    }
}
