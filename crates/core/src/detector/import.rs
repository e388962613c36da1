//! Detection of competing import-section edits.

use regex_lite::Regex;
use tracing::debug;

use super::ConflictDetector;
use crate::errors::ConflictError;
use crate::models::{CodeChange, Conflict, ConflictSeverity, ConflictType};

/// Lines that declare a module dependency: ES imports, re-exports, and
/// CommonJS requires.
const IMPORT_PATTERN: &str = r"^\s*(import\s|export\s+.*\bfrom\s|const\s+.+=\s*require\s*\()";

/// Detects two same-file changes that both touch import statements.
///
/// Import edits collide constantly in a component editor (every generated
/// snippet adds its own imports), and they merge mechanically by line
/// union, so they get their own conflict type instead of riding on the
/// overlap detector.
#[derive(Debug)]
pub struct ImportConflictDetector {
    pattern: Regex,
}

impl ImportConflictDetector {
    pub fn new() -> Self {
        Self {
            // The pattern is a compile-time literal.
            pattern: Regex::new(IMPORT_PATTERN).expect("import pattern is valid"),
        }
    }

    fn touches_imports(&self, change: &CodeChange) -> bool {
        change
            .original_code
            .lines()
            .chain(change.modified_code.lines())
            .any(|line| self.pattern.is_match(line))
    }
}

impl Default for ImportConflictDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl ConflictDetector for ImportConflictDetector {
    fn name(&self) -> &str {
        "import"
    }

    fn conflict_type(&self) -> ConflictType {
        ConflictType::Import
    }

    fn detect_conflict(
        &self,
        first: &CodeChange,
        second: &CodeChange,
    ) -> Result<Option<Conflict>, ConflictError> {
        if !first.location.same_file(&second.location) {
            return Ok(None);
        }
        if !self.touches_imports(first) || !self.touches_imports(second) {
            return Ok(None);
        }

        debug!("competing import edits detected");

        Ok(Some(Conflict::new(
            ConflictType::Import,
            ConflictSeverity::Low,
            first.clone(),
            second.clone(),
            "both changes edit the file's import statements",
        )))
    }
}
