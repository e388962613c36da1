//! Detection of overlapping edits.

use diffy::Line;
use tracing::debug;

use super::ConflictDetector;
use crate::errors::ConflictError;
use crate::models::{CodeChange, Conflict, ConflictSeverity, ConflictType};

/// Detects two changes whose line ranges overlap within the same file.
///
/// Severity reflects how much the two modified texts actually differ:
/// byte-identical replacements are reported LOW (the overlap is real but
/// trivially mergeable), mostly-different replacements HIGH.
#[derive(Debug, Default)]
pub struct OverlappingConflictDetector;

impl OverlappingConflictDetector {
    pub fn new() -> Self {
        Self
    }
}

impl ConflictDetector for OverlappingConflictDetector {
    fn name(&self) -> &str {
        "overlapping"
    }

    fn conflict_type(&self) -> ConflictType {
        ConflictType::Overlapping
    }

    fn detect_conflict(
        &self,
        first: &CodeChange,
        second: &CodeChange,
    ) -> Result<Option<Conflict>, ConflictError> {
        if !first.location.overlaps(&second.location) {
            return Ok(None);
        }

        let severity = overlap_severity(first, second);
        let description = format!(
            "changes at lines {}-{} and {}-{} overlap",
            first.location.start_line,
            first.location.end_line,
            second.location.start_line,
            second.location.end_line,
        );

        debug!(
            severity = %severity,
            start = first.location.start_line.min(second.location.start_line),
            "overlapping edits detected"
        );

        Ok(Some(Conflict::new(
            ConflictType::Overlapping,
            severity,
            first.clone(),
            second.clone(),
            description,
        )))
    }
}

/// Grade an overlap by the fraction of lines the two modified texts
/// disagree on.
fn overlap_severity(first: &CodeChange, second: &CodeChange) -> ConflictSeverity {
    if first.modified_code == second.modified_code {
        return ConflictSeverity::Low;
    }

    let patch = diffy::create_patch(&first.modified_code, &second.modified_code);
    let mut deleted = 0usize;
    let mut inserted = 0usize;
    for line in patch.hunks().iter().flat_map(|hunk| hunk.lines()) {
        match line {
            Line::Delete(_) => deleted += 1,
            Line::Insert(_) => inserted += 1,
            Line::Context(_) => {}
        }
    }
    let changed = deleted.max(inserted);
    let total = first
        .modified_line_count()
        .max(second.modified_line_count())
        .max(1);

    if changed as f64 / total as f64 >= 0.8 {
        ConflictSeverity::High
    } else {
        ConflictSeverity::Medium
    }
}
