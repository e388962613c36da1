//! Detection of separate edits to the same code unit.

use tracing::debug;

use super::ConflictDetector;
use crate::errors::ConflictError;
use crate::models::{CodeChange, Conflict, ConflictSeverity, ConflictType};

/// Detects two non-overlapping same-file changes that target the same
/// named code unit (component, function, hook).
///
/// The ranges don't collide, but edits inside one unit tend to assume each
/// other's absence, so they are surfaced for a smarter merge than plain
/// line stitching.
#[derive(Debug, Default)]
pub struct RelatedConflictDetector;

impl RelatedConflictDetector {
    pub fn new() -> Self {
        Self
    }
}

impl ConflictDetector for RelatedConflictDetector {
    fn name(&self) -> &str {
        "related"
    }

    fn conflict_type(&self) -> ConflictType {
        ConflictType::Related
    }

    fn detect_conflict(
        &self,
        first: &CodeChange,
        second: &CodeChange,
    ) -> Result<Option<Conflict>, ConflictError> {
        if !first.location.same_file(&second.location) || first.location.overlaps(&second.location)
        {
            return Ok(None);
        }

        let unit = match (&first.location.code_unit, &second.location.code_unit) {
            (Some(a), Some(b)) if a == b => a.clone(),
            _ => return Ok(None),
        };

        debug!(code_unit = %unit, "related edits detected");

        Ok(Some(
            Conflict::new(
                ConflictType::Related,
                ConflictSeverity::Medium,
                first.clone(),
                second.clone(),
                format!("both changes edit '{unit}' in different places"),
            )
            .with_details(format!("code unit: {unit}")),
        ))
    }
}
