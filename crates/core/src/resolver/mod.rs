//! Conflict resolution.
//!
//! A resolver is a pluggable strategy: given a detected conflict, attempt
//! to produce a single reconciled text. Resolvers never panic across the
//! API -- algorithm failures come back as `Err` and are converted to failed
//! [`ResolutionResult`](crate::models::ResolutionResult)s at the manager
//! boundary, while deliberate declines (complexity, severity) are failed
//! results from the resolver itself.

pub mod merge;
pub mod sequential;
pub mod take;

pub use merge::MergeResolver;
pub use sequential::SequentialResolver;
pub use take::{TakeFirstResolver, TakeSecondResolver};

use crate::errors::ConflictError;
use crate::models::{Conflict, ConflictSeverity, ConflictType, ResolutionResult, ResolutionStrategy};
use crate::options::ResolutionOptions;

/// A pluggable resolution strategy.
pub trait ConflictResolver: Send {
    /// Unique identifier for diagnostics.
    fn name(&self) -> &str;

    /// The single strategy this resolver implements; also its registry key.
    fn strategy(&self) -> ResolutionStrategy;

    /// Attempt to reconcile the conflict.
    fn resolve_conflict(&self, conflict: &Conflict) -> Result<ResolutionResult, ConflictError>;

    /// Whether this resolver claims the conflict.
    ///
    /// The default follows the engine's severity/type heuristic; see
    /// [`default_can_resolve`].
    fn can_resolve(&self, conflict: &Conflict) -> bool {
        default_can_resolve(self.strategy(), conflict)
    }

    /// Receive the manager's merged resolution options. Resolvers without
    /// knobs ignore this.
    fn configure(&mut self, _options: &ResolutionOptions) {}
}

/// The engine's default claim heuristic.
///
/// A conflict carrying a suggested strategy goes only to the resolver with
/// that exact strategy. Otherwise: `TakeFirst`/`TakeSecond` handle LOW
/// severity, `Merge` handles LOW or MEDIUM, `Sequential` handles ADJACENT
/// or RELATED conflicts at any severity, and `Manual` alone claims
/// CRITICAL. Everything else is unclaimed, which forces critical conflicts
/// to human review unless a detector opts in via the suggestion.
pub fn default_can_resolve(strategy: ResolutionStrategy, conflict: &Conflict) -> bool {
    if let Some(suggested) = conflict.suggested_strategy {
        return suggested == strategy;
    }

    match strategy {
        ResolutionStrategy::TakeFirst | ResolutionStrategy::TakeSecond => {
            conflict.severity == ConflictSeverity::Low
        }
        ResolutionStrategy::Merge => matches!(
            conflict.severity,
            ConflictSeverity::Low | ConflictSeverity::Medium
        ),
        ResolutionStrategy::Sequential => matches!(
            conflict.conflict_type,
            ConflictType::Adjacent | ConflictType::Related
        ),
        ResolutionStrategy::Manual => conflict.severity == ConflictSeverity::Critical,
        ResolutionStrategy::Custom => false,
    }
}
