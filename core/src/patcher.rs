//! # Text Patching
//!
//! The patch engine: an ordered sequence of literal string substitutions
//! applied to an in-memory buffer.
//!
//! - **InsertBeforeAnchor**: splices a block in front of a known anchor,
//!   guarded by a presence check so repeated runs are no-ops.
//! - **ReplaceBlock**: byte-exact, first-occurrence-only block swap; an
//!   absent needle degrades to a reported skip, never a failure.
//!
//! Rules are pure string transformations. Reading, writing and progress
//! reporting belong to the caller.

/// Outcome of applying one rule to the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    /// The substitution was performed.
    Applied,
    /// The guard text was already present; nothing to do.
    AlreadyPresent,
    /// The needle was absent; the buffer passed through unchanged.
    NeedleMissing,
}

/// The substitution a rule performs.
#[derive(Debug, Clone)]
enum RuleKind {
    /// Replace the first occurrence of `anchor` with `block` followed by
    /// `anchor`, unless `guard` is already present anywhere in the buffer.
    /// The anchor itself survives, so it still appears exactly once downstream.
    InsertBeforeAnchor {
        guard: String,
        anchor: String,
        block: String,
    },
    /// Replace the first occurrence of `old` with `new`, verbatim.
    ReplaceBlock { old: String, new: String },
}

/// A single ordered text substitution with an idempotence guard.
///
/// Rules are independent of one another except for operating on the same
/// evolving buffer in sequence, so a later rule's needle may rely on an
/// earlier rule having run.
#[derive(Debug, Clone)]
pub struct PatchRule {
    name: String,
    kind: RuleKind,
}

/// The per-rule outcome record produced by [`apply_rules`].
#[derive(Debug, Clone)]
pub struct RuleReport {
    /// Name of the rule the outcome belongs to.
    pub rule: String,
    /// What the rule did to the buffer.
    pub outcome: PatchOutcome,
}

impl PatchRule {
    /// Builds an insert-before-anchor rule.
    ///
    /// `guard` must be a substring of `block`: once the block is in the
    /// file, the guard check keeps every later run from inserting it again.
    pub fn insert_before(
        name: impl Into<String>,
        guard: impl Into<String>,
        anchor: impl Into<String>,
        block: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: RuleKind::InsertBeforeAnchor {
                guard: guard.into(),
                anchor: anchor.into(),
                block: block.into(),
            },
        }
    }

    /// Builds a whole-block replacement rule.
    ///
    /// `new` must not contain `old`, otherwise the rule re-fires on every
    /// run instead of becoming a natural no-op.
    pub fn replace_block(
        name: impl Into<String>,
        old: impl Into<String>,
        new: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: RuleKind::ReplaceBlock {
                old: old.into(),
                new: new.into(),
            },
        }
    }

    /// The rule's display name, used in progress reporting.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Applies the rule to `source`, returning the (possibly unchanged)
    /// buffer and what happened.
    pub fn apply(&self, source: &str) -> (String, PatchOutcome) {
        match &self.kind {
            RuleKind::InsertBeforeAnchor {
                guard,
                anchor,
                block,
            } => {
                if source.contains(guard.as_str()) {
                    return (source.to_string(), PatchOutcome::AlreadyPresent);
                }
                if !source.contains(anchor.as_str()) {
                    return (source.to_string(), PatchOutcome::NeedleMissing);
                }

                let replacement = format!("{}{}", block, anchor);
                (
                    source.replacen(anchor.as_str(), &replacement, 1),
                    PatchOutcome::Applied,
                )
            }
            RuleKind::ReplaceBlock { old, new } => {
                if !source.contains(old.as_str()) {
                    return (source.to_string(), PatchOutcome::NeedleMissing);
                }

                (
                    source.replacen(old.as_str(), new.as_str(), 1),
                    PatchOutcome::Applied,
                )
            }
        }
    }
}

/// Applies `rules` strictly in order over the evolving buffer.
///
/// Never fails: every mismatch is recorded in the returned reports and the
/// buffer flows through the remaining rules untouched.
pub fn apply_rules(source: &str, rules: &[PatchRule]) -> (String, Vec<RuleReport>) {
    let mut buffer = source.to_string();
    let mut reports = Vec::with_capacity(rules.len());

    for rule in rules {
        let (next, outcome) = rule.apply(&buffer);
        buffer = next;
        reports.push(RuleReport {
            rule: rule.name().to_string(),
            outcome,
        });
    }

    (buffer, reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn insert_rule() -> PatchRule {
        PatchRule::insert_before(
            "helper method",
            "fn helper",
            "fn anchor() {",
            "fn helper() {}\n\n",
        )
    }

    // --- Tests for InsertBeforeAnchor ---

    #[test]
    fn test_insert_before_anchor_preserves_anchor_once() {
        let code = "fn other() {}\n\nfn anchor() {\n    body();\n}\n";
        let (res, outcome) = insert_rule().apply(code);

        assert_eq!(outcome, PatchOutcome::Applied);
        assert!(res.contains("fn helper() {}\n\nfn anchor() {"));
        assert_eq!(res.matches("fn anchor() {").count(), 1);
    }

    #[test]
    fn test_insert_guard_blocks_second_application() {
        let code = "fn anchor() {\n    body();\n}\n";
        let (patched, first) = insert_rule().apply(code);
        let (again, second) = insert_rule().apply(&patched);

        assert_eq!(first, PatchOutcome::Applied);
        assert_eq!(second, PatchOutcome::AlreadyPresent);
        assert_eq!(again, patched);
    }

    #[test]
    fn test_insert_missing_anchor_is_a_skip() {
        let code = "fn unrelated() {}\n";
        let (res, outcome) = insert_rule().apply(code);

        assert_eq!(outcome, PatchOutcome::NeedleMissing);
        assert_eq!(res, code);
    }

    // --- Tests for ReplaceBlock ---

    #[test]
    fn test_replace_block_swaps_old_for_new() {
        let rule = PatchRule::replace_block("body swap", "old body", "new body");
        let prefix = "keep this ";
        let suffix = " and this";
        let code = format!("{}old body{}", prefix, suffix);

        let (res, outcome) = rule.apply(&code);

        assert_eq!(outcome, PatchOutcome::Applied);
        assert!(!res.contains("old body"));
        // Context outside the replaced span is untouched.
        assert_eq!(res, format!("{}new body{}", prefix, suffix));
    }

    #[test]
    fn test_replace_block_first_occurrence_only() {
        let rule = PatchRule::replace_block("body swap", "old", "new");
        let (res, outcome) = rule.apply("old ... old");

        assert_eq!(outcome, PatchOutcome::Applied);
        assert_eq!(res, "new ... old");
    }

    #[test]
    fn test_replace_block_missing_needle_is_byte_identical() {
        let rule = PatchRule::replace_block("body swap", "absent", "new");
        let code = "nothing to see here";
        let (res, outcome) = rule.apply(code);

        assert_eq!(outcome, PatchOutcome::NeedleMissing);
        assert_eq!(res, code);
    }

    // --- Tests for apply_rules ---

    #[test]
    fn test_apply_rules_runs_in_order_over_evolving_buffer() {
        // The second rule's needle only exists after the first rule ran.
        let rules = vec![
            PatchRule::replace_block("first", "aaa", "bbb"),
            PatchRule::replace_block("second", "bbb ccc", "done"),
        ];

        let (res, reports) = apply_rules("aaa ccc", &rules);

        assert_eq!(res, "done");
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].rule, "first");
        assert!(reports.iter().all(|r| r.outcome == PatchOutcome::Applied));
    }

    #[test]
    fn test_apply_rules_all_needles_absent_is_identity() {
        let rules = vec![
            insert_rule(),
            PatchRule::replace_block("body swap", "absent", "new"),
        ];
        let code = "completely unrelated content\n";

        let (res, reports) = apply_rules(code, &rules);

        assert_eq!(res, code);
        assert!(reports
            .iter()
            .all(|r| r.outcome == PatchOutcome::NeedleMissing));
    }
}
