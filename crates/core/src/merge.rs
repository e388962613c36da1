//! Line-based merge algorithms.
//!
//! [`three_way_merge`] reconciles two edited versions of a text against
//! their common ancestor by walking all three line sequences in lock step.
//! One-sided edits win silently; genuinely conflicting regions are either
//! wrapped in `<<<<<<< CHANGE 1` / `=======` / `>>>>>>> CHANGE 2` markers
//! or emitted back-to-back, with a warning either way.
//!
//! [`naive_merge`] is the crude fallback used when no ancestor is
//! trustworthy: keep the common line prefix and suffix, retain both middles
//! between comment markers. It never fails.
//!
//! Both algorithms compare whole lines, so purely cosmetic reformatting
//! shows up as a conflict. That is a known limitation of the engine, not
//! something callers should rely on being fixed.

use tracing::debug;

/// Marker opening the first change's side of a conflict region.
pub const CONFLICT_MARKER_FIRST: &str = "<<<<<<< CHANGE 1";
/// Marker separating the two sides of a conflict region.
pub const CONFLICT_MARKER_SEPARATOR: &str = "=======";
/// Marker closing the second change's side of a conflict region.
pub const CONFLICT_MARKER_SECOND: &str = ">>>>>>> CHANGE 2";

/// Marker opening the retained middles in a naive merge.
pub const NAIVE_MARKER_BEGIN: &str = "/* BEGIN MERGE */";
/// Marker between the two retained middles in a naive merge.
pub const NAIVE_MARKER_SEPARATOR: &str = "/* MERGE SEPARATOR */";
/// Marker closing the retained middles in a naive merge.
pub const NAIVE_MARKER_END: &str = "/* END MERGE */";

/// The outcome of a three-way merge attempt.
///
/// `merged` is always populated; `has_conflicts` reports whether any region
/// could not be reconciled (in which case `warnings` says how it was
/// handled).
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    /// The merged text.
    pub merged: String,
    /// Whether any region needed conflict handling.
    pub has_conflicts: bool,
    /// One warning per unreconciled region.
    pub warnings: Vec<String>,
}

/// Merge `first` and `second` against their common ancestor `base`.
///
/// The three line sequences are walked simultaneously. At each step, in
/// priority order: a line both sides agree on is emitted; a line one side
/// left unchanged from `base` yields to the other side's edit; anything
/// else is a genuine conflict -- the contiguous differing run from each side
/// is collected and emitted as a conflict region, and the base cursor steps
/// past one line of the conflicting ancestor region.
pub fn three_way_merge(
    base: &str,
    first: &str,
    second: &str,
    add_markers: bool,
) -> MergeOutcome {
    let base_lines: Vec<&str> = base.lines().collect();
    let first_lines: Vec<&str> = first.lines().collect();
    let second_lines: Vec<&str> = second.lines().collect();

    let mut out: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();
    let mut has_conflicts = false;

    let mut i = 0; // base cursor
    let mut j = 0; // first cursor
    let mut k = 0; // second cursor

    loop {
        let first_line = first_lines.get(j).copied();
        let second_line = second_lines.get(k).copied();
        let base_line = base_lines.get(i).copied();

        match (first_line, second_line) {
            // Both outputs exhausted; any remaining base lines were deleted
            // by both sides.
            (None, None) => break,

            // Both sides agree on this line.
            (Some(a), Some(b)) if a == b => {
                out.push(a.to_string());
                i += 1;
                j += 1;
                k += 1;
            }

            // First side unchanged from base: the second side's edit wins.
            (Some(a), Some(b)) if Some(a) == base_line => {
                out.push(b.to_string());
                i += 1;
                j += 1;
                k += 1;
            }

            // Second side unchanged from base: the first side's edit wins.
            (Some(a), Some(b)) if Some(b) == base_line => {
                out.push(a.to_string());
                i += 1;
                j += 1;
                k += 1;
            }

            // One side ran out while the other still tracks base: the
            // shorter side deleted the tail, and the deletion wins.
            (Some(a), None) if Some(a) == base_line => {
                i += 1;
                j += 1;
            }
            (None, Some(b)) if Some(b) == base_line => {
                i += 1;
                k += 1;
            }

            // One side appended lines past everything else.
            (Some(a), None) if base_line.is_none() => {
                out.push(a.to_string());
                j += 1;
            }
            (None, Some(b)) if base_line.is_none() => {
                out.push(b.to_string());
                k += 1;
            }

            // Genuinely conflicting edits.
            _ => {
                has_conflicts = true;
                let first_block = conflicting_run(&first_lines, j, &base_lines, i);
                let second_block = conflicting_run(&second_lines, k, &base_lines, i);
                j += first_block.len();
                k += second_block.len();

                if add_markers {
                    out.push(CONFLICT_MARKER_FIRST.to_string());
                    out.extend(first_block.iter().map(|l| l.to_string()));
                    out.push(CONFLICT_MARKER_SEPARATOR.to_string());
                    out.extend(second_block.iter().map(|l| l.to_string()));
                    out.push(CONFLICT_MARKER_SECOND.to_string());
                    warnings.push(
                        "conflicting edits could not be reconciled; inline conflict markers added"
                            .to_string(),
                    );
                } else {
                    out.extend(first_block.iter().map(|l| l.to_string()));
                    out.extend(second_block.iter().map(|l| l.to_string()));
                    warnings.push(
                        "conflicting edits included from both changes without markers".to_string(),
                    );
                }

                // Step past the conflicting base region.
                i += 1;
            }
        }
    }

    debug!(
        conflicts = has_conflicts,
        lines = out.len(),
        "three-way merge complete"
    );

    MergeOutcome {
        merged: out.join("\n"),
        has_conflicts,
        warnings,
    }
}

/// Contiguous run of lines starting at `from` that differ from the base
/// sequence at the corresponding positions. Positions past the end of the
/// base always differ.
fn conflicting_run<'a>(
    lines: &[&'a str],
    from: usize,
    base_lines: &[&'a str],
    base_from: usize,
) -> Vec<&'a str> {
    let mut run = Vec::new();
    let mut idx = from;
    while let Some(line) = lines.get(idx) {
        if base_lines.get(base_from + (idx - from)) == Some(line) {
            break;
        }
        run.push(*line);
        idx += 1;
    }
    run
}

/// Best-effort merge of two texts with no usable ancestor.
///
/// Keeps the longest common line prefix and suffix; everything in between
/// from each side is retained, delimited by `/* BEGIN MERGE */`,
/// `/* MERGE SEPARATOR */`, and `/* END MERGE */`. Always succeeds.
pub fn naive_merge(first: &str, second: &str) -> String {
    let first_lines: Vec<&str> = first.lines().collect();
    let second_lines: Vec<&str> = second.lines().collect();

    let max_common = first_lines.len().min(second_lines.len());

    let mut prefix = 0;
    while prefix < max_common && first_lines[prefix] == second_lines[prefix] {
        prefix += 1;
    }

    let mut suffix = 0;
    while suffix < max_common - prefix
        && first_lines[first_lines.len() - 1 - suffix]
            == second_lines[second_lines.len() - 1 - suffix]
    {
        suffix += 1;
    }

    let first_middle = &first_lines[prefix..first_lines.len() - suffix];
    let second_middle = &second_lines[prefix..second_lines.len() - suffix];

    // Identical texts have no middles to retain.
    if first_middle.is_empty() && second_middle.is_empty() {
        return first_lines.join("\n");
    }

    let mut out: Vec<&str> = Vec::new();
    out.extend_from_slice(&first_lines[..prefix]);
    out.push(NAIVE_MARKER_BEGIN);
    out.extend_from_slice(first_middle);
    out.push(NAIVE_MARKER_SEPARATOR);
    out.extend_from_slice(second_middle);
    out.push(NAIVE_MARKER_END);
    out.extend_from_slice(&first_lines[first_lines.len() - suffix..]);
    out.join("\n")
}
