use std::path::Path;

use serde::Serialize;
use tracing::debug;

use benefits_recon::RawTable;

use crate::error::IoError;

/// One uploaded payload: the client's file name plus raw bytes.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Csv,
    Xlsx,
}

impl FileKind {
    pub fn from_name(name: &str) -> Result<Self, IoError> {
        let lower = name.to_ascii_lowercase();
        if lower.ends_with(".csv") {
            Ok(Self::Csv)
        } else if lower.ends_with(".xlsx") {
            Ok(Self::Xlsx)
        } else {
            Err(IoError::UnsupportedFileType(name.to_string()))
        }
    }
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Load from disk. The upload name is the path's file name.
    pub fn from_path(path: &Path) -> Result<Self, IoError> {
        let bytes = std::fs::read(path).map_err(|source| IoError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, bytes))
    }

    pub fn kind(&self) -> Result<FileKind, IoError> {
        FileKind::from_name(&self.name)
    }

    pub fn read_table(&self) -> Result<RawTable, IoError> {
        let table = match self.kind()? {
            FileKind::Csv => crate::csv::read(&self.name, &self.bytes)?,
            FileKind::Xlsx => crate::xlsx::read(&self.name, &self.bytes)?,
        };
        debug!(
            bytes = self.bytes.len(),
            rows = table.len(),
            columns = table.width(),
            "file parsed"
        );
        Ok(table)
    }
}

/// Split two uploads into `(primary, partner)` by file-name prefix.
/// When both names carry the prefix, the first file is primary.
pub fn assign_roles(
    files: Vec<UploadedFile>,
    prefix: &str,
) -> Result<(UploadedFile, UploadedFile), IoError> {
    let count = files.len();
    let [first, second]: [UploadedFile; 2] =
        files.try_into().map_err(|_| IoError::FileCount(count))?;

    if first.name.starts_with(prefix) {
        Ok((first, second))
    } else if second.name.starts_with(prefix) {
        Ok((second, first))
    } else {
        Err(IoError::NoPrimarySource {
            prefix: prefix.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileDetails {
    pub file_name: String,
    /// Payload size in bytes.
    pub file_size: usize,
    pub num_rows: usize,
    pub num_columns: usize,
    pub columns: Vec<String>,
}

pub fn describe(file: &UploadedFile) -> Result<FileDetails, IoError> {
    let table = file.read_table()?;
    Ok(FileDetails {
        file_name: file.name.clone(),
        file_size: file.bytes.len(),
        num_rows: table.len(),
        num_columns: table.width(),
        columns: table.headers,
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn csv(name: &str, text: &str) -> UploadedFile {
        UploadedFile::new(name, text.as_bytes().to_vec())
    }

    #[test]
    fn file_kinds() {
        assert_eq!(FileKind::from_name("a.csv").unwrap(), FileKind::Csv);
        assert_eq!(FileKind::from_name("A.CSV").unwrap(), FileKind::Csv);
        assert_eq!(FileKind::from_name("Enrollment.xlsx").unwrap(), FileKind::Xlsx);
        assert!(matches!(
            FileKind::from_name("report.xls"),
            Err(IoError::UnsupportedFileType(_))
        ));
        assert!(FileKind::from_name("csv").is_err());
    }

    #[test]
    fn roles_by_prefix() {
        let (primary, partner) = assign_roles(
            vec![csv("partner.csv", ""), csv("Enrollment_jan.csv", "")],
            "Enrollment",
        )
        .unwrap();
        assert_eq!(primary.name, "Enrollment_jan.csv");
        assert_eq!(partner.name, "partner.csv");
    }

    #[test]
    fn first_file_wins_when_both_match() {
        let (primary, _) = assign_roles(
            vec![csv("Enrollment_a.csv", ""), csv("Enrollment_b.csv", "")],
            "Enrollment",
        )
        .unwrap();
        assert_eq!(primary.name, "Enrollment_a.csv");
    }

    #[test]
    fn prefix_is_case_sensitive() {
        let err = assign_roles(
            vec![csv("enrollment.csv", ""), csv("partner.csv", "")],
            "Enrollment",
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "no file name starts with 'Enrollment'");
    }

    #[test]
    fn wrong_file_count() {
        let err = assign_roles(vec![csv("Enrollment.csv", "")], "Enrollment").unwrap_err();
        assert!(matches!(err, IoError::FileCount(1)));
    }

    #[test]
    fn describe_csv_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Enrollment_census.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        write!(f, "Name,Birth Date,Gender\n\"Smith, Jo\",01/02/1990,F\n\"Doe, Jane\",03/04/1985,F\n").unwrap();
        drop(f);

        let file = UploadedFile::from_path(&path).unwrap();
        let details = describe(&file).unwrap();
        assert_eq!(details.file_name, "Enrollment_census.csv");
        assert_eq!(details.file_size, std::fs::metadata(&path).unwrap().len() as usize);
        assert_eq!(details.num_rows, 2);
        assert_eq!(details.num_columns, 3);
        assert_eq!(details.columns, vec!["Name", "Birth Date", "Gender"]);

        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["num_rows"], 2);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = UploadedFile::from_path(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, IoError::Read { .. }));
    }

    #[test]
    fn unsupported_upload_fails_before_parsing() {
        let err = csv("notes.txt", "a,b").read_table().unwrap_err();
        assert!(matches!(err, IoError::UnsupportedFileType(_)));
    }
}
