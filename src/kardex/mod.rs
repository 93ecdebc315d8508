//! Academic kardex: the student's grade history

use serde::{Deserialize, Serialize};

/// Outcome recorded for a graded course
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GradeStatus {
    Pass,
    Fail,
}

/// One row of the kardex
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeRecord {
    /// Academic period, e.g. "2024-Q1"
    pub quarter: String,
    pub course_name: String,
    pub grade: f32,
    pub status: GradeStatus,
}

/// Aggregate view over a kardex
#[derive(Debug, Clone, PartialEq)]
pub struct KardexSummary {
    pub courses: usize,
    pub passed: usize,
    pub failed: usize,
    /// Mean grade across all records, `None` for an empty kardex
    pub average: Option<f32>,
}

/// Summarize a grade history for display
pub fn summarize(records: &[GradeRecord]) -> KardexSummary {
    let passed = records.iter().filter(|r| r.status == GradeStatus::Pass).count();
    let average = if records.is_empty() {
        None
    } else {
        Some(records.iter().map(|r| r.grade).sum::<f32>() / records.len() as f32)
    };

    KardexSummary { courses: records.len(), passed, failed: records.len() - passed, average }
}
