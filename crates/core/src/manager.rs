//! The conflict engine orchestrator.
//!
//! [`ConflictManager`] owns the detector and resolver registries and runs
//! the two phases of the engine:
//!
//! 1. **Detection** -- every registered detector over every change pair,
//!    best-effort: a failing detector is logged and skipped, never aborts
//!    the scan.
//! 2. **Resolution** -- strategy lookup and dispatch, strict: every failure
//!    becomes a structured [`ResolutionResult`] tagged
//!    [`ResolutionStrategy::Manual`], the signal to escalate to a human.
//!
//! The manager is synchronous and single-threaded; all mutable state lives
//! in its registries and option structs, mutated only through `register_*`
//! and `configure_*`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::detector::{ConflictDetector, OverlappingConflictDetector};
use crate::models::{CodeChange, Conflict, ConflictType, ResolutionResult, ResolutionStrategy};
use crate::options::{DetectionOptions, DetectionUpdate, ResolutionOptions, ResolutionUpdate};
use crate::resolver::{ConflictResolver, MergeResolver};

// ---------------------------------------------------------------------------
// Process outcome
// ---------------------------------------------------------------------------

/// Everything one `process_changes` call produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessOutcome {
    /// All conflicts the scan found.
    pub conflicts: Vec<Conflict>,
    /// One resolution attempt per conflict, in the same order.
    pub resolutions: Vec<ResolutionResult>,
}

impl ProcessOutcome {
    /// Number of conflicts that resolved successfully.
    pub fn resolved_count(&self) -> usize {
        self.resolutions.iter().filter(|r| r.success).count()
    }

    /// Number of conflicts that need manual attention.
    pub fn failed_count(&self) -> usize {
        self.resolutions.iter().filter(|r| !r.success).count()
    }
}

// ---------------------------------------------------------------------------
// Manager
// ---------------------------------------------------------------------------

/// Registry and dispatch for conflict detection and resolution.
///
/// Detectors are keyed by name and run in registration order; resolvers
/// are keyed by strategy, exactly one per strategy value. Construct an
/// isolated instance with [`ConflictManager::new`] or a pre-wired one with
/// [`default_manager`].
pub struct ConflictManager {
    detectors: Vec<Box<dyn ConflictDetector>>,
    resolvers: HashMap<ResolutionStrategy, Box<dyn ConflictResolver>>,
    detection_options: DetectionOptions,
    resolution_options: ResolutionOptions,
}

impl ConflictManager {
    /// An empty manager with default options and no detectors or resolvers.
    pub fn new() -> Self {
        Self {
            detectors: Vec::new(),
            resolvers: HashMap::new(),
            detection_options: DetectionOptions::default(),
            resolution_options: ResolutionOptions::default(),
        }
    }

    // -----------------------------------------------------------------------
    // Registries
    // -----------------------------------------------------------------------

    /// Register a detector. A detector with the same name is replaced in
    /// place, keeping its position in the scan order.
    pub fn register_detector(&mut self, mut detector: Box<dyn ConflictDetector>) {
        detector.configure(&self.detection_options);
        if let Some(existing) = self
            .detectors
            .iter_mut()
            .find(|d| d.name() == detector.name())
        {
            debug!(name = detector.name(), "replacing detector");
            *existing = detector;
        } else {
            debug!(name = detector.name(), "registering detector");
            self.detectors.push(detector);
        }
    }

    /// Remove a detector by name. Returns whether one was registered.
    pub fn unregister_detector(&mut self, name: &str) -> bool {
        let before = self.detectors.len();
        self.detectors.retain(|d| d.name() != name);
        before != self.detectors.len()
    }

    /// Register a resolver for its strategy, replacing any previous one.
    pub fn register_resolver(&mut self, mut resolver: Box<dyn ConflictResolver>) {
        resolver.configure(&self.resolution_options);
        debug!(
            name = resolver.name(),
            strategy = %resolver.strategy(),
            "registering resolver"
        );
        self.resolvers.insert(resolver.strategy(), resolver);
    }

    /// Remove the resolver for a strategy. Returns whether one was
    /// registered.
    pub fn unregister_resolver(&mut self, strategy: ResolutionStrategy) -> bool {
        self.resolvers.remove(&strategy).is_some()
    }

    // -----------------------------------------------------------------------
    // Configuration
    // -----------------------------------------------------------------------

    /// Merge a partial detection update and push the merged options to
    /// every registered detector.
    pub fn configure_detection(&mut self, update: &DetectionUpdate) {
        self.detection_options.merge(update);
        for detector in &mut self.detectors {
            detector.configure(&self.detection_options);
        }
    }

    /// Merge a partial resolution update and push the merged options to
    /// every registered resolver.
    pub fn configure_resolution(&mut self, update: &ResolutionUpdate) {
        self.resolution_options.merge(update);
        for resolver in self.resolvers.values_mut() {
            resolver.configure(&self.resolution_options);
        }
    }

    /// The effective detection options.
    pub fn detection_options(&self) -> &DetectionOptions {
        &self.detection_options
    }

    /// The effective resolution options.
    pub fn resolution_options(&self) -> &ResolutionOptions {
        &self.resolution_options
    }

    // -----------------------------------------------------------------------
    // Detection
    // -----------------------------------------------------------------------

    /// Run every registered detector over the full cross-product of the
    /// two change sets.
    ///
    /// Pairs are iterated `first`-major, detectors in registration order
    /// within each pair. A detector error is logged and skipped -- partial
    /// results are acceptable detection semantics.
    pub fn detect_conflicts(
        &self,
        first_changes: &[CodeChange],
        second_changes: &[CodeChange],
    ) -> Vec<Conflict> {
        info!(
            first_count = first_changes.len(),
            second_count = second_changes.len(),
            detectors = self.detectors.len(),
            "detecting conflicts"
        );

        let mut conflicts = Vec::new();
        for first in first_changes {
            for second in second_changes {
                for detector in &self.detectors {
                    if !self.detector_enabled(detector.conflict_type()) {
                        continue;
                    }
                    match detector.detect_conflict(first, second) {
                        Ok(Some(conflict)) => {
                            debug!(
                                detector = detector.name(),
                                conflict_type = %conflict.conflict_type,
                                severity = %conflict.severity,
                                "conflict detected"
                            );
                            conflicts.push(conflict);
                        }
                        Ok(None) => {}
                        Err(err) => {
                            warn!(
                                detector = detector.name(),
                                error = %err,
                                "detector failed, continuing scan"
                            );
                        }
                    }
                }
            }
        }

        info!(count = conflicts.len(), "conflict detection complete");
        conflicts
    }

    /// Whether detection options enable detectors of this conflict type.
    fn detector_enabled(&self, conflict_type: ConflictType) -> bool {
        let options = &self.detection_options;
        match conflict_type {
            ConflictType::Overlapping => options.detect_overlapping,
            ConflictType::Adjacent => options.detect_adjacent,
            ConflictType::Related => options.detect_related,
            ConflictType::Semantic => options.detect_semantic,
            ConflictType::Import => options.detect_import,
            ConflictType::Dependency => options.detect_dependency,
        }
    }

    // -----------------------------------------------------------------------
    // Resolution
    // -----------------------------------------------------------------------

    /// Resolve one conflict with the suggested strategy, falling back to
    /// the configured default.
    ///
    /// Every failure shape -- no resolver registered, resolver declines,
    /// resolver error -- comes back as a failed result tagged
    /// [`ResolutionStrategy::Manual`].
    pub fn resolve_conflict(&self, conflict: &Conflict) -> ResolutionResult {
        let strategy = conflict
            .suggested_strategy
            .unwrap_or(self.resolution_options.default_strategy);

        let Some(resolver) = self.resolvers.get(&strategy) else {
            return ResolutionResult::failed(
                conflict.clone(),
                ResolutionStrategy::Manual,
                format!("no resolver available for strategy: {strategy}"),
            );
        };

        if !resolver.can_resolve(conflict) {
            return ResolutionResult::failed(
                conflict.clone(),
                ResolutionStrategy::Manual,
                format!("resolver '{}' cannot resolve this conflict", resolver.name()),
            );
        }

        match resolver.resolve_conflict(conflict) {
            Ok(result) => result,
            Err(err) => {
                warn!(resolver = resolver.name(), error = %err, "resolver failed");
                ResolutionResult::failed(conflict.clone(), ResolutionStrategy::Manual, err.to_string())
            }
        }
    }

    /// Resolve a batch of conflicts, honoring the auto-resolve gates.
    pub fn resolve_conflicts(&self, conflicts: &[Conflict]) -> Vec<ResolutionResult> {
        conflicts
            .iter()
            .map(|conflict| {
                if !self.resolution_options.auto_resolve {
                    return ResolutionResult::failed(
                        conflict.clone(),
                        ResolutionStrategy::Manual,
                        "automatic conflict resolution is disabled",
                    );
                }
                if let Some(threshold) = self.resolution_options.auto_resolve_threshold {
                    if conflict.severity > threshold {
                        return ResolutionResult::failed(
                            conflict.clone(),
                            ResolutionStrategy::Manual,
                            format!(
                                "severity {} exceeds the auto-resolve threshold {}",
                                conflict.severity, threshold
                            ),
                        );
                    }
                }
                self.resolve_conflict(conflict)
            })
            .collect()
    }

    /// Detect and resolve in one pass.
    pub fn process_changes(
        &self,
        first_changes: &[CodeChange],
        second_changes: &[CodeChange],
    ) -> ProcessOutcome {
        let conflicts = self.detect_conflicts(first_changes, second_changes);
        let resolutions = self.resolve_conflicts(&conflicts);
        info!(
            conflicts = conflicts.len(),
            resolved = resolutions.iter().filter(|r| r.success).count(),
            "change processing complete"
        );
        ProcessOutcome {
            conflicts,
            resolutions,
        }
    }
}

impl Default for ConflictManager {
    fn default() -> Self {
        Self::new()
    }
}

/// A manager pre-wired with the overlap detector and the merge resolver --
/// the engine's stock configuration.
///
/// Each call constructs a fresh instance; there is no hidden shared state,
/// so tests and embedders can hold as many as they like.
pub fn default_manager() -> ConflictManager {
    let mut manager = ConflictManager::new();
    manager.register_detector(Box::new(OverlappingConflictDetector::new()));
    manager.register_resolver(Box::new(MergeResolver::new()));
    manager
}
