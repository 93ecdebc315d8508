//! Community portfolio: student project uploads
//!
//! Projects are files (images or PDF) with a title and description,
//! stored server-side. The upload type check happens client-side so a
//! bad file never leaves the machine.

use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A project in the community portfolio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub title: String,
    pub description: String,
    /// Server-side path or URL of the uploaded file
    pub file_path: String,
    /// Upload timestamp as the server sent it
    pub created_at: String,
}

impl Project {
    /// PDF uploads are listed differently from image uploads
    pub fn is_pdf(&self) -> bool {
        self.file_path.ends_with(".pdf")
    }

    /// Upload date, if `created_at` is in a recognized format
    ///
    /// The backend emits MySQL-style datetimes; RFC 3339 and bare dates
    /// are accepted too.
    pub fn created_on(&self) -> Option<NaiveDate> {
        if let Ok(dt) = NaiveDateTime::parse_from_str(&self.created_at, "%Y-%m-%d %H:%M:%S") {
            return Some(dt.date());
        }
        if let Ok(d) = NaiveDate::parse_from_str(&self.created_at, "%Y-%m-%d") {
            return Some(d);
        }
        DateTime::parse_from_rfc3339(&self.created_at).ok().map(|dt| dt.date_naive())
    }
}

/// File types accepted for portfolio upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Jpg,
    Png,
    Pdf,
}

impl UploadKind {
    /// Classify a file by its extension, case-insensitively.
    ///
    /// Only `.jpg`, `.png` and `.pdf` are accepted; everything else is
    /// rejected before any bytes are read.
    pub fn from_path(path: &Path) -> Result<Self, UploadError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or(UploadError::MissingExtension)?
            .to_ascii_lowercase();

        match extension.as_str() {
            "jpg" => Ok(UploadKind::Jpg),
            "png" => Ok(UploadKind::Png),
            "pdf" => Ok(UploadKind::Pdf),
            _ => Err(UploadError::UnsupportedType { extension }),
        }
    }

    /// MIME type sent with the multipart upload
    pub fn mime(&self) -> &'static str {
        match self {
            UploadKind::Jpg => "image/jpeg",
            UploadKind::Png => "image/png",
            UploadKind::Pdf => "application/pdf",
        }
    }
}

/// Rejections from the local upload type check
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UploadError {
    /// The chosen file has no extension to classify by
    #[error("File has no extension. Allowed types: .jpg, .png, .pdf")]
    MissingExtension,

    /// The extension is not in the accepted set
    #[error("Unsupported file type .{extension}. Allowed types: .jpg, .png, .pdf")]
    UnsupportedType {
        /// Lowercased extension of the rejected file
        extension: String,
    },
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;

    use super::*;

    fn project(file_path: &str, created_at: &str) -> Project {
        Project {
            id: 1,
            title: "Wiring diagram".into(),
            description: String::new(),
            file_path: file_path.into(),
            created_at: created_at.into(),
        }
    }

    #[test]
    fn accepts_the_three_allowed_types() {
        assert_eq!(UploadKind::from_path(Path::new("design.jpg")), Ok(UploadKind::Jpg));
        assert_eq!(UploadKind::from_path(Path::new("diagram.png")), Ok(UploadKind::Png));
        assert_eq!(UploadKind::from_path(Path::new("report.pdf")), Ok(UploadKind::Pdf));
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        assert_eq!(UploadKind::from_path(Path::new("SCAN.PDF")), Ok(UploadKind::Pdf));
        assert_eq!(UploadKind::from_path(Path::new("photo.JPG")), Ok(UploadKind::Jpg));
    }

    #[test]
    fn rejects_everything_else() {
        // .jpeg is not in the accept list even though .jpg is.
        assert_eq!(
            UploadKind::from_path(Path::new("photo.jpeg")),
            Err(UploadError::UnsupportedType { extension: "jpeg".into() })
        );
        assert_eq!(
            UploadKind::from_path(Path::new("notes.docx")),
            Err(UploadError::UnsupportedType { extension: "docx".into() })
        );
        assert_eq!(
            UploadKind::from_path(&PathBuf::from("Makefile")),
            Err(UploadError::MissingExtension)
        );
    }

    #[test]
    fn mime_types_match_extensions() {
        assert_eq!(UploadKind::Jpg.mime(), "image/jpeg");
        assert_eq!(UploadKind::Png.mime(), "image/png");
        assert_eq!(UploadKind::Pdf.mime(), "application/pdf");
    }

    #[test]
    fn pdf_detection_uses_the_stored_path() {
        assert!(project("/uploads/report.pdf", "").is_pdf());
        assert!(!project("/uploads/photo.jpg", "").is_pdf());
    }

    #[test]
    fn created_on_parses_server_datetimes() {
        let expected = NaiveDate::from_ymd_opt(2024, 5, 12).unwrap();
        assert_eq!(project("a.png", "2024-05-12 14:30:00").created_on(), Some(expected));
        assert_eq!(project("a.png", "2024-05-12").created_on(), Some(expected));
        assert_eq!(project("a.png", "2024-05-12T14:30:00Z").created_on(), Some(expected));
        assert_eq!(project("a.png", "yesterday").created_on(), None);
    }
}
