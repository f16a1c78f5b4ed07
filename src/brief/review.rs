//! Review scheduling for briefs.
//!
//! Rules are evaluated in a fixed order. The first immediate rule that
//! matches wins; only when none match are the scheduled rules consulted.
//! Immediate review always implies scheduled review.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::brief::record::{ConfidenceLevel, ContentRecord};
use crate::config::ReviewThresholds;
use crate::severity::Severity;
use crate::time::{days_since, within_last_days};

/// Review urgency for a single brief.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewStatus {
    /// Review must happen now.
    pub immediate: bool,
    /// Review belongs in the next editorial cycle. Always set when `immediate` is.
    pub scheduled: bool,
    /// Human-readable reason from the rule that matched.
    pub reason: String,
}

impl ReviewStatus {
    fn immediate(reason: impl Into<String>) -> Self {
        Self {
            immediate: true,
            scheduled: true,
            reason: reason.into(),
        }
    }

    fn scheduled(reason: impl Into<String>) -> Self {
        Self {
            immediate: false,
            scheduled: true,
            reason: reason.into(),
        }
    }

    fn clear() -> Self {
        Self {
            immediate: false,
            scheduled: false,
            reason: "No review needed".to_string(),
        }
    }

    /// True if any kind of review is due.
    #[must_use]
    pub const fn needs_review(&self) -> bool {
        self.immediate || self.scheduled
    }
}

/// Computes review status from a record and an explicit clock.
#[derive(Debug, Clone, Default)]
pub struct ReviewPolicy {
    thresholds: ReviewThresholds,
}

impl ReviewPolicy {
    /// Creates a policy with custom thresholds.
    #[must_use]
    pub fn new(thresholds: ReviewThresholds) -> Self {
        Self { thresholds }
    }

    /// Thresholds this policy evaluates against.
    #[must_use]
    pub fn thresholds(&self) -> &ReviewThresholds {
        &self.thresholds
    }

    /// Evaluates the review rules for `record` at `now`.
    #[must_use]
    pub fn review_status(&self, record: &ContentRecord, now: DateTime<Utc>) -> ReviewStatus {
        let t = &self.thresholds;

        if record.confidence_level == ConfidenceLevel::Low {
            return ReviewStatus::immediate("Confidence level is low");
        }

        let Some(last_reviewed) = record.last_reviewed_at else {
            return ReviewStatus::immediate("Last reviewed date is missing");
        };
        let age = days_since(last_reviewed, now);

        if age > t.immediate_stale_days {
            return ReviewStatus::immediate(format!(
                "Last reviewed {age} days ago (>{} days)",
                t.immediate_stale_days
            ));
        }

        if has_recent_change(record, Severity::P0, now, t.p0_window_days) {
            return ReviewStatus::immediate(change_reason(Severity::P0, t.p0_window_days));
        }

        if age > t.scheduled_stale_days {
            return ReviewStatus::scheduled(format!(
                "Last reviewed {age} days ago (>{} days)",
                t.scheduled_stale_days
            ));
        }

        if has_recent_change(record, Severity::P1, now, t.p1_window_days) {
            return ReviewStatus::scheduled(change_reason(Severity::P1, t.p1_window_days));
        }

        ReviewStatus::clear()
    }

    /// Records that need any review, immediate ones first.
    ///
    /// Input order is preserved within each group.
    #[must_use]
    pub fn records_needing_review<'a>(
        &self,
        records: &'a [ContentRecord],
        now: DateTime<Utc>,
    ) -> Vec<(&'a str, ReviewStatus)> {
        let (mut immediate, scheduled): (Vec<_>, Vec<_>) = records
            .iter()
            .map(|r| (r.id.as_str(), self.review_status(r, now)))
            .filter(|(_, status)| status.needs_review())
            .partition(|(_, status)| status.immediate);
        immediate.extend(scheduled);
        immediate
    }
}

fn change_reason(severity: Severity, window_days: i64) -> String {
    format!(
        "{severity} ({}) change detected within last {window_days} days",
        severity.description()
    )
}

fn has_recent_change(
    record: &ContentRecord,
    severity: Severity,
    now: DateTime<Utc>,
    window_days: i64,
) -> bool {
    record
        .changes_of(severity)
        .any(|entry| within_last_days(entry.date, now, window_days))
}

/// Evaluates the review rules with the default thresholds.
#[must_use]
pub fn review_status(record: &ContentRecord, now: DateTime<Utc>) -> ReviewStatus {
    ReviewPolicy::default().review_status(record, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brief::record::ChangeLogEntry;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap()
    }

    fn fresh(now: DateTime<Utc>) -> ContentRecord {
        ContentRecord::new("es-nomad", "spain")
            .with_confidence(ConfidenceLevel::High)
            .reviewed_at(now - Duration::days(5))
    }

    #[test]
    fn low_confidence_is_immediate() {
        let record = fresh(now()).with_confidence(ConfidenceLevel::Low);
        let status = review_status(&record, now());
        assert!(status.immediate);
        assert!(status.scheduled);
        assert_eq!(status.reason, "Confidence level is low");
    }

    #[test]
    fn low_confidence_beats_staleness() {
        let record = fresh(now())
            .with_confidence(ConfidenceLevel::Low)
            .reviewed_at(now() - Duration::days(400));
        assert_eq!(review_status(&record, now()).reason, "Confidence level is low");
    }

    #[test]
    fn stale_over_180_days_is_immediate() {
        let record = fresh(now()).reviewed_at(now() - Duration::days(200));
        let status = review_status(&record, now());
        assert!(status.immediate);
        assert!(status.reason.contains("200 days ago (>180 days)"));
    }

    #[test]
    fn exactly_180_days_is_only_scheduled() {
        let record = fresh(now()).reviewed_at(now() - Duration::days(180));
        let status = review_status(&record, now());
        assert!(!status.immediate);
        assert!(status.scheduled);
        assert_eq!(status.reason, "Last reviewed 180 days ago (>90 days)");
    }

    #[test]
    fn partial_days_are_floored() {
        let record = fresh(now()).reviewed_at(now() - Duration::days(180) - Duration::hours(23));
        let status = review_status(&record, now());
        assert!(!status.immediate);
        assert!(status.reason.starts_with("Last reviewed 180 days ago"));
    }

    #[test]
    fn recent_p0_is_immediate_even_when_freshly_reviewed() {
        let record = fresh(now()).with_change(ChangeLogEntry::new(now() - Duration::days(10), Severity::P0));
        let status = review_status(&record, now());
        assert!(status.immediate);
        assert_eq!(status.reason, "P0 (critical) change detected within last 90 days");
    }

    #[test]
    fn old_p0_is_ignored() {
        let record = fresh(now()).with_change(ChangeLogEntry::new(now() - Duration::days(91), Severity::P0));
        let status = review_status(&record, now());
        assert!(!status.immediate);
        assert!(!status.scheduled);
    }

    #[test]
    fn future_dated_change_is_ignored() {
        let record = fresh(now()).with_change(ChangeLogEntry::new(now() + Duration::days(2), Severity::P0));
        assert!(!review_status(&record, now()).immediate);
    }

    #[test]
    fn stale_over_90_days_is_scheduled() {
        let record = fresh(now()).reviewed_at(now() - Duration::days(120));
        let status = review_status(&record, now());
        assert!(!status.immediate);
        assert!(status.scheduled);
        assert_eq!(status.reason, "Last reviewed 120 days ago (>90 days)");
    }

    #[test]
    fn recent_p1_is_scheduled() {
        let record = fresh(now()).with_change(ChangeLogEntry::new(now() - Duration::days(150), Severity::P1));
        let status = review_status(&record, now());
        assert!(!status.immediate);
        assert!(status.scheduled);
        assert_eq!(status.reason, "P1 (important) change detected within last 180 days");
    }

    #[test]
    fn p2_changes_never_trigger_review() {
        let record = fresh(now()).with_change(ChangeLogEntry::new(now() - Duration::days(1), Severity::P2));
        let status = review_status(&record, now());
        assert!(!status.needs_review());
        assert_eq!(status.reason, "No review needed");
    }

    #[test]
    fn missing_review_date_is_maximally_stale() {
        let mut record = fresh(now());
        record.last_reviewed_at = None;
        let status = review_status(&record, now());
        assert!(status.immediate);
        assert_eq!(status.reason, "Last reviewed date is missing");
    }

    #[test]
    fn custom_thresholds() {
        let policy = ReviewPolicy::new(ReviewThresholds {
            immediate_stale_days: 30,
            scheduled_stale_days: 10,
            p0_window_days: 7,
            p1_window_days: 14,
        });
        assert_eq!(policy.thresholds().p0_window_days, 7);

        let record = fresh(now()).reviewed_at(now() - Duration::days(31));
        assert_eq!(
            policy.review_status(&record, now()).reason,
            "Last reviewed 31 days ago (>30 days)"
        );

        let record = fresh(now()).with_change(ChangeLogEntry::new(now() - Duration::days(6), Severity::P0));
        assert_eq!(
            policy.review_status(&record, now()).reason,
            "P0 (critical) change detected within last 7 days"
        );
    }

    #[test]
    fn records_needing_review_orders_immediate_first() {
        let n = now();
        let records = vec![
            fresh(n).reviewed_at(n - Duration::days(100)),
            ContentRecord { id: "ok".to_string(), ..fresh(n) },
            ContentRecord { id: "urgent".to_string(), ..fresh(n).with_confidence(ConfidenceLevel::Low) },
        ];
        let due = ReviewPolicy::default().records_needing_review(&records, n);
        let ids: Vec<&str> = due.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec!["urgent", "es-nomad"]);
    }
}
