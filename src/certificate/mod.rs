//! Course completion certificates
//!
//! A certificate is issued only when every lesson of the course is
//! complete, judged from the lesson flags rather than the server's
//! progress hint. Rendering produces a Markdown document the student
//! can keep or convert.

use std::path::Path;

use chrono::NaiveDate;
use thiserror::Error;

use crate::course::model::Course;
use crate::course::progression;

/// Recipient printed when no student name is supplied
pub const DEFAULT_STUDENT_NAME: &str = "Valued Student";

/// Errors from certificate issuance
#[derive(Debug, Error)]
pub enum CertificateError {
    /// The course still has incomplete lessons (or none at all)
    #[error("Course is {progress}% complete. Certificates are issued at 100%")]
    CourseNotComplete {
        /// Completion percentage at the time of the attempt
        progress: u8,
    },

    /// Failed to write the certificate file
    #[error("Failed to write certificate: {0}")]
    Io(#[from] std::io::Error),
}

/// A completion certificate ready to render
#[derive(Debug, Clone, PartialEq)]
pub struct Certificate {
    pub student_name: String,
    pub course_title: String,
    pub issued_on: NaiveDate,
}

impl Certificate {
    /// Issue a certificate for a fully completed course.
    ///
    /// An empty course never reaches 100%, so it can never be certified.
    pub fn for_course(
        course: &Course,
        student_name: &str,
        issued_on: NaiveDate,
    ) -> Result<Self, CertificateError> {
        let progress = progression::course_progress(course);
        if course.lesson_count() == 0 || progress != 100 {
            return Err(CertificateError::CourseNotComplete { progress });
        }

        Ok(Self {
            student_name: student_name.to_string(),
            course_title: course.title.clone(),
            issued_on,
        })
    }

    /// Render the certificate as a Markdown document
    pub fn render(&self) -> String {
        format!(
            "# CERTIFICATE OF COMPLETION\n\n\
             This certifies that the student\n\n\
             ## {}\n\n\
             Has successfully completed the course: **{}**\n\n\
             ---\n\n\
             Issued on {} by IAEV Online\n",
            self.student_name,
            self.course_title,
            self.issued_on.format("%B %-d, %Y"),
        )
    }

    /// Write the rendered certificate to disk
    pub fn save(&self, path: &Path) -> Result<(), CertificateError> {
        std::fs::write(path, self.render())?;
        Ok(())
    }
}
