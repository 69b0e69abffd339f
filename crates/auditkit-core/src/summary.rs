//! Status rollups
//!
//! Walks an audit's section tree and buckets every checkpoint by status.
//! Historical writers also cached the rollup on the document in several
//! encodings (object, JSON-encoded string, capitalized keys); the cache can
//! be read back explicitly, but no service path in this workspace trusts it
//! over a recomputation.

use auditkit_model::{AuditDocument, CheckpointStatus};
use serde::{Deserialize, Serialize};

/// Pass/fail/warning/pending counts over an audit's checkpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSummary {
    /// Checkpoints that passed
    #[serde(default)]
    pub pass: u32,
    /// Checkpoints that failed
    #[serde(default)]
    pub fail: u32,
    /// Checkpoints with a caveat
    #[serde(default)]
    pub warning: u32,
    /// Checkpoints not yet inspected
    #[serde(default)]
    pub pending: u32,
    /// Sum of all buckets
    #[serde(default)]
    pub total: u32,
}

impl StatusSummary {
    /// Percentage of checkpoints that passed, rounded to the nearest whole
    /// percent. Zero when there are no checkpoints.
    #[must_use]
    pub fn pass_rate(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        // Integer round-half-up; counts are far below overflow range.
        (200 * self.pass + self.total) / (2 * self.total)
    }

    fn bump(&mut self, status: CheckpointStatus) {
        match status {
            CheckpointStatus::Pass => self.pass += 1,
            CheckpointStatus::Fail => self.fail += 1,
            CheckpointStatus::Warning => self.warning += 1,
            CheckpointStatus::Pending => self.pending += 1,
        }
        self.total += 1;
    }
}

/// How [`summarize`] treats a cached summary on the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SummaryPolicy {
    /// Walk the sections; ignore any cached value. The uniform policy used
    /// by the services.
    #[default]
    Recompute,
    /// Return a present, parsable cached value verbatim (no cross-check
    /// against the sections); recompute only when the cache is absent or
    /// unparsable.
    TrustCache,
}

/// Roll up an audit's checkpoint statuses.
pub fn summarize(audit: &AuditDocument, policy: SummaryPolicy) -> StatusSummary {
    if policy == SummaryPolicy::TrustCache {
        if let Some(cached) = audit.summary.as_ref().and_then(parse_cached) {
            return cached;
        }
    }
    recompute(audit)
}

/// Recompute the rollup from the section tree.
///
/// Handles both section shapes: staged sections iterate stage →
/// checkpoints, legacy sections their flat list. A checkpoint with an
/// absent or empty status counts as pending.
#[must_use]
pub fn recompute(audit: &AuditDocument) -> StatusSummary {
    let mut summary = StatusSummary::default();
    for section in &audit.sections {
        for checkpoint in section.checkpoints() {
            summary.bump(checkpoint.status);
        }
    }
    summary
}

/// Decode a cached summary in any of its historical encodings.
///
/// Accepts a JSON object or a JSON-encoded string of one, with lowercase or
/// capitalized keys. Missing counts default to 0; a missing total is the
/// bucket sum. Returns `None` when the value is unusable — callers fall
/// back to recomputation rather than erroring.
pub(crate) fn parse_cached(value: &serde_json::Value) -> Option<StatusSummary> {
    let object = match value {
        serde_json::Value::String(raw) => serde_json::from_str(raw).ok()?,
        other => other.clone(),
    };
    let map = object.as_object()?;

    let count = |lower: &str, upper: &str| -> u32 {
        map.get(lower)
            .or_else(|| map.get(upper))
            .and_then(serde_json::Value::as_u64)
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(0)
    };

    let mut summary = StatusSummary {
        pass: count("pass", "Pass"),
        fail: count("fail", "Fail"),
        warning: count("warning", "Warning"),
        pending: count("pending", "Pending"),
        total: count("total", "Total"),
    };
    if summary.total == 0 {
        summary.total = summary.pass + summary.fail + summary.warning + summary.pending;
    }
    Some(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use auditkit_model::{
        CheckpointRecord, CheckpointStatus, SectionGroup, StageGroup, TemplateDocument,
    };
    use serde_json::json;

    fn checkpoint(id: &str, status: CheckpointStatus) -> CheckpointRecord {
        CheckpointRecord::new(id, format!("check {id}")).with_status(status)
    }

    fn audit_with_sections(sections: Vec<SectionGroup>) -> AuditDocument {
        let mut audit = AuditDocument::from_template(&TemplateDocument::new("T"));
        audit.sections = sections;
        audit
    }

    #[test]
    fn buckets_sum_to_total() {
        let audit = audit_with_sections(vec![SectionGroup::new(
            "s",
            "S",
            vec![StageGroup::new(
                "st",
                "St",
                vec![
                    checkpoint("a", CheckpointStatus::Pass),
                    checkpoint("b", CheckpointStatus::Pass),
                    checkpoint("c", CheckpointStatus::Fail),
                    checkpoint("d", CheckpointStatus::Warning),
                    checkpoint("e", CheckpointStatus::Pending),
                ],
            )],
        )]);

        let s = summarize(&audit, SummaryPolicy::Recompute);
        assert_eq!((s.pass, s.fail, s.warning, s.pending), (2, 1, 1, 1));
        assert_eq!(s.total, 5);
        assert_eq!(s.pass + s.fail + s.warning + s.pending, s.total);
    }

    #[test]
    fn summarize_is_idempotent() {
        let audit = audit_with_sections(vec![SectionGroup::new(
            "s",
            "S",
            vec![StageGroup::new(
                "st",
                "St",
                vec![checkpoint("a", CheckpointStatus::Pass)],
            )],
        )]);
        assert_eq!(
            summarize(&audit, SummaryPolicy::Recompute),
            summarize(&audit, SummaryPolicy::Recompute)
        );
    }

    #[test]
    fn missing_status_counts_as_pending() {
        let audit = audit_with_sections(vec![SectionGroup::new(
            "s",
            "S",
            vec![StageGroup::new(
                "st",
                "St",
                vec![CheckpointRecord::new("a", "untouched")],
            )],
        )]);
        let s = recompute(&audit);
        assert_eq!(s.pending, 1);
        assert_eq!(s.pass + s.fail + s.warning, 0);
    }

    #[test]
    fn legacy_and_staged_shapes_summarize_identically() {
        let cps = vec![
            checkpoint("a", CheckpointStatus::Pass),
            checkpoint("b", CheckpointStatus::Fail),
        ];
        let legacy = audit_with_sections(vec![SectionGroup::legacy("s", "S", cps.clone())]);
        let staged = audit_with_sections(vec![SectionGroup::new(
            "s",
            "S",
            vec![StageGroup::new("st", "S", cps)],
        )]);
        assert_eq!(recompute(&legacy), recompute(&staged));
    }

    #[test]
    fn trust_cache_returns_cache_verbatim_even_when_sections_contradict() {
        let mut audit = audit_with_sections(vec![SectionGroup::legacy(
            "s",
            "S",
            vec![checkpoint("a", CheckpointStatus::Pending)],
        )]);
        audit.summary = Some(json!({
            "pass": 2, "fail": 1, "warning": 0, "pending": 0, "total": 3
        }));

        let s = summarize(&audit, SummaryPolicy::TrustCache);
        assert_eq!((s.pass, s.fail, s.warning, s.pending, s.total), (2, 1, 0, 0, 3));

        // Recompute policy ignores the cache entirely.
        let r = summarize(&audit, SummaryPolicy::Recompute);
        assert_eq!((r.pending, r.total), (1, 1));
    }

    #[test]
    fn cached_json_string_form_parses() {
        let mut audit = audit_with_sections(Vec::new());
        audit.summary = Some(json!("{\"pass\":4,\"fail\":1}"));
        let s = summarize(&audit, SummaryPolicy::TrustCache);
        assert_eq!(s.pass, 4);
        assert_eq!(s.fail, 1);
        assert_eq!(s.total, 5);
    }

    #[test]
    fn cached_capitalized_keys_parse() {
        let mut audit = audit_with_sections(Vec::new());
        audit.summary = Some(json!({"Pass": 3, "Fail": 0, "Warning": 1}));
        let s = summarize(&audit, SummaryPolicy::TrustCache);
        assert_eq!(s.pass, 3);
        assert_eq!(s.warning, 1);
        assert_eq!(s.total, 4);
    }

    #[test]
    fn unparsable_cache_falls_back_to_recompute() {
        let mut audit = audit_with_sections(vec![SectionGroup::legacy(
            "s",
            "S",
            vec![checkpoint("a", CheckpointStatus::Pass)],
        )]);
        audit.summary = Some(json!("{definitely not json"));
        let s = summarize(&audit, SummaryPolicy::TrustCache);
        assert_eq!(s.pass, 1);
        assert_eq!(s.total, 1);
    }

    #[test]
    fn pass_rate_rounds_and_never_divides_by_zero() {
        assert_eq!(StatusSummary::default().pass_rate(), 0);

        let s = StatusSummary {
            pass: 2,
            fail: 1,
            warning: 0,
            pending: 0,
            total: 3,
        };
        assert_eq!(s.pass_rate(), 67);

        let s = StatusSummary {
            pass: 1,
            fail: 3,
            warning: 0,
            pending: 0,
            total: 4,
        };
        assert_eq!(s.pass_rate(), 25);
    }
}
