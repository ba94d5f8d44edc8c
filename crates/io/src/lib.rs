// File ingestion: uploaded CSV / Excel payloads into raw tables

pub mod csv;
pub mod error;
pub mod upload;
pub mod xlsx;

pub use error::IoError;
pub use upload::{assign_roles, describe, FileDetails, FileKind, UploadedFile};
