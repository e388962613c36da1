//! Value types for the conflict engine.
//!
//! A [`CodeChange`] describes one proposed edit to a region of one file,
//! a [`Conflict`] is a detected relationship between two changes, and a
//! [`ResolutionResult`] is the tagged outcome of trying to reconcile one
//! conflict. All types are plain data: immutable once constructed, owned
//! by the caller, serializable for the editor front-end.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Locations
// ---------------------------------------------------------------------------

/// A contiguous region of source text.
///
/// Line numbers are 1-based, column numbers 0-based. `start_line` never
/// exceeds `end_line`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConflictLocation {
    /// First line of the region (1-based).
    pub start_line: u32,
    /// Last line of the region (1-based, inclusive).
    pub end_line: u32,
    /// Column where the region starts (0-based).
    pub start_column: Option<u32>,
    /// Column where the region ends (0-based).
    pub end_column: Option<u32>,
    /// File the region belongs to, when known.
    pub file_path: Option<String>,
    /// Name of the enclosing code unit (component, function, hook).
    pub code_unit: Option<String>,
    /// Kind of the enclosing code unit.
    pub code_unit_type: Option<String>,
}

impl ConflictLocation {
    /// Create a location spanning `start_line..=end_line`.
    pub fn new(start_line: u32, end_line: u32) -> Self {
        Self {
            start_line,
            end_line: end_line.max(start_line),
            ..Self::default()
        }
    }

    /// Create a location spanning `start_line..=end_line` within a file.
    pub fn in_file(file_path: impl Into<String>, start_line: u32, end_line: u32) -> Self {
        Self {
            file_path: Some(file_path.into()),
            ..Self::new(start_line, end_line)
        }
    }

    /// Whether this location shares a file with `other`.
    ///
    /// Locations with no `file_path` are treated as belonging to the file
    /// under edit, so a missing path on either side counts as the same file.
    pub fn same_file(&self, other: &Self) -> bool {
        match (&self.file_path, &other.file_path) {
            (Some(a), Some(b)) => a == b,
            _ => true,
        }
    }

    /// Whether the two line ranges overlap.
    ///
    /// Always false for locations in different files.
    pub fn overlaps(&self, other: &Self) -> bool {
        if !self.same_file(other) {
            return false;
        }
        !(self.end_line < other.start_line || self.start_line > other.end_line)
    }

    /// Whether one location ends within `threshold` lines before the other
    /// starts, in either order. Overlapping locations are not adjacent.
    pub fn is_adjacent(&self, other: &Self, threshold: u32) -> bool {
        if !self.same_file(other) || self.overlaps(other) {
            return false;
        }
        let gap = if self.end_line < other.start_line {
            other.start_line - self.end_line
        } else {
            self.start_line - other.end_line
        };
        gap <= threshold
    }

    /// Line distance between the nearer edges of the two locations.
    ///
    /// `None` for locations in different files (infinitely far apart),
    /// zero when they overlap.
    pub fn distance(&self, other: &Self) -> Option<u32> {
        if !self.same_file(other) {
            return None;
        }
        if self.overlaps(other) {
            return Some(0);
        }
        if self.end_line < other.start_line {
            Some(other.start_line - self.end_line)
        } else {
            Some(self.start_line - other.end_line)
        }
    }

    /// The smallest location covering both inputs: minimum start line,
    /// maximum end line, first available file path.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            start_line: self.start_line.min(other.start_line),
            end_line: self.end_line.max(other.end_line),
            file_path: self.file_path.clone().or_else(|| other.file_path.clone()),
            ..Self::default()
        }
    }

    /// Number of lines the location spans.
    pub fn line_count(&self) -> u32 {
        self.end_line - self.start_line + 1
    }
}

// ---------------------------------------------------------------------------
// Changes
// ---------------------------------------------------------------------------

/// One proposed edit to one region of one file.
///
/// Produced by the editor / diff layer, consumed by detectors and resolvers.
/// The optional AST handles are opaque payloads from the external parser.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeChange {
    /// Text of the region before the edit.
    pub original_code: String,
    /// Text of the region after the edit.
    pub modified_code: String,
    /// Where the edit applies.
    pub location: ConflictLocation,
    /// Free-form metadata attached by the producer.
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
    /// Parsed form of `original_code`, when the caller supplies one.
    pub original_ast: Option<serde_json::Value>,
    /// Parsed form of `modified_code`, when the caller supplies one.
    pub modified_ast: Option<serde_json::Value>,
}

impl CodeChange {
    /// Create a change with no metadata or AST payloads.
    pub fn new(
        original_code: impl Into<String>,
        modified_code: impl Into<String>,
        location: ConflictLocation,
    ) -> Self {
        Self {
            original_code: original_code.into(),
            modified_code: modified_code.into(),
            location,
            metadata: HashMap::new(),
            original_ast: None,
            modified_ast: None,
        }
    }

    /// Number of lines in the modified text.
    pub fn modified_line_count(&self) -> usize {
        self.modified_code.lines().count()
    }
}

// ---------------------------------------------------------------------------
// Classification enums
// ---------------------------------------------------------------------------

/// Categorisation of a conflict.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ConflictType {
    /// The two changes edit overlapping line ranges.
    Overlapping,
    /// The two changes edit nearby but non-overlapping ranges.
    Adjacent,
    /// The two changes touch the same code unit.
    Related,
    /// The changes interact at the semantic level.
    Semantic,
    /// Both changes modify import statements.
    Import,
    /// One change alters something the other depends on.
    Dependency,
}

impl std::fmt::Display for ConflictType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Overlapping => write!(f, "overlapping"),
            Self::Adjacent => write!(f, "adjacent"),
            Self::Related => write!(f, "related"),
            Self::Semantic => write!(f, "semantic"),
            Self::Import => write!(f, "import"),
            Self::Dependency => write!(f, "dependency"),
        }
    }
}

/// How serious a conflict is. Ordered: `None < Low < Medium < High <
/// Critical`. The ordering governs auto-resolution eligibility.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum ConflictSeverity {
    #[default]
    None,
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for ConflictSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

/// Policy for reconciling a conflict into a single output.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStrategy {
    /// Keep the first change's modified text.
    TakeFirst,
    /// Keep the second change's modified text.
    TakeSecond,
    /// Merge the two changes into one text.
    Merge,
    /// Apply the two changes one after the other.
    Sequential,
    /// Caller-supplied resolution logic.
    Custom,
    /// Escalate to a human.
    Manual,
}

impl std::fmt::Display for ResolutionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TakeFirst => write!(f, "take_first"),
            Self::TakeSecond => write!(f, "take_second"),
            Self::Merge => write!(f, "merge"),
            Self::Sequential => write!(f, "sequential"),
            Self::Custom => write!(f, "custom"),
            Self::Manual => write!(f, "manual"),
        }
    }
}

// ---------------------------------------------------------------------------
// Conflicts
// ---------------------------------------------------------------------------

/// A detected relationship between two changes that may require
/// reconciliation before both can be applied.
///
/// Created by a detector, consumed once by a resolver, then discarded --
/// the engine keeps no conflict history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conflict {
    /// Unique conflict ID.
    pub id: String,
    /// The kind of conflict.
    pub conflict_type: ConflictType,
    /// How serious the conflict is.
    pub severity: ConflictSeverity,
    /// The first of the two conflicting changes.
    pub first_change: CodeChange,
    /// The second of the two conflicting changes.
    pub second_change: CodeChange,
    /// Human-readable summary of what conflicts.
    pub description: String,
    /// Region the conflict covers. Defaults to the union of the two
    /// changes' locations when the detector does not supply one.
    pub location: ConflictLocation,
    /// Strategy the detector recommends, if any.
    pub suggested_strategy: Option<ResolutionStrategy>,
    /// Additional detail for human review.
    pub details: Option<String>,
    /// When the conflict was detected.
    pub detected_at: DateTime<Utc>,
}

impl Conflict {
    /// Create a conflict between two changes with a fresh UUID.
    ///
    /// The location defaults to the union of the two changes' locations.
    pub fn new(
        conflict_type: ConflictType,
        severity: ConflictSeverity,
        first_change: CodeChange,
        second_change: CodeChange,
        description: impl Into<String>,
    ) -> Self {
        let location = first_change.location.union(&second_change.location);
        Self {
            id: Uuid::new_v4().to_string(),
            conflict_type,
            severity,
            first_change,
            second_change,
            description: description.into(),
            location,
            suggested_strategy: None,
            details: None,
            detected_at: Utc::now(),
        }
    }

    /// Override the default (union) location.
    pub fn with_location(mut self, location: ConflictLocation) -> Self {
        self.location = location;
        self
    }

    /// Recommend a resolution strategy.
    pub fn with_suggested_strategy(mut self, strategy: ResolutionStrategy) -> Self {
        self.suggested_strategy = Some(strategy);
        self
    }

    /// Attach additional detail for human review.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Resolution results
// ---------------------------------------------------------------------------

/// The tagged outcome of one resolution attempt.
///
/// `success == true` always comes with `resolved_code`; `success == false`
/// always comes with `error`. Synthesized failures (no resolver, resolver
/// declined, resolver error) are tagged [`ResolutionStrategy::Manual`] to
/// signal "escalate to a human".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionResult {
    /// Whether resolution produced usable output.
    pub success: bool,
    /// The reconciled text, on success.
    pub resolved_code: Option<String>,
    /// Why resolution failed, on failure.
    pub error: Option<String>,
    /// How the resolution was produced.
    pub description: Option<String>,
    /// The strategy that produced (or declined) this result.
    pub strategy: ResolutionStrategy,
    /// The conflict this result answers.
    pub conflict: Conflict,
    /// Non-fatal caveats about the resolved output.
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl ResolutionResult {
    /// A successful resolution carrying merged output.
    pub fn resolved(
        conflict: Conflict,
        strategy: ResolutionStrategy,
        resolved_code: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            success: true,
            resolved_code: Some(resolved_code.into()),
            error: None,
            description: Some(description.into()),
            strategy,
            conflict,
            warnings: Vec::new(),
        }
    }

    /// A failed resolution carrying the reason.
    pub fn failed(
        conflict: Conflict,
        strategy: ResolutionStrategy,
        error: impl Into<String>,
    ) -> Self {
        Self {
            success: false,
            resolved_code: None,
            error: Some(error.into()),
            description: None,
            strategy,
            conflict,
            warnings: Vec::new(),
        }
    }

    /// Attach warnings to the result.
    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }
}
