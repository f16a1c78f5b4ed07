//! Advisory completeness checks for briefs.
//!
//! Every check runs on every call and contributes at most one warning. A
//! brief with warnings is still publishable; `valid` only reports whether
//! the list came back empty.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::brief::record::{ConfidenceLevel, ContentRecord};
use crate::config::ValidationConfig;
use crate::time::days_since;

/// Outcome of validating one brief.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// True iff `warnings` is empty.
    pub valid: bool,
    /// Warnings in check order.
    pub warnings: Vec<String>,
}

impl ValidationResult {
    fn from_warnings(warnings: Vec<String>) -> Self {
        Self {
            valid: warnings.is_empty(),
            warnings,
        }
    }
}

/// Counts across a batch of validation results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationSummary {
    /// Records validated.
    pub total: usize,
    /// Records without warnings.
    pub valid: usize,
    /// Records with at least one warning.
    pub invalid: usize,
}

impl ValidationSummary {
    /// Tallies a batch of results.
    #[must_use]
    pub fn from_results<'a, I>(results: I) -> Self
    where
        I: IntoIterator<Item = &'a ValidationResult>,
    {
        results.into_iter().fold(Self::default(), |mut acc, r| {
            acc.total += 1;
            if r.valid {
                acc.valid += 1;
            } else {
                acc.invalid += 1;
            }
            acc
        })
    }
}

/// Checks briefs for missing or weak content.
#[derive(Debug, Clone, Default)]
pub struct BriefValidator {
    config: ValidationConfig,
}

impl BriefValidator {
    /// Creates a validator with custom staleness thresholds.
    #[must_use]
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Validates one record at `now`.
    #[must_use]
    pub fn validate(&self, record: &ContentRecord, now: DateTime<Utc>) -> ValidationResult {
        let mut warnings = Vec::new();

        if record.source_links.is_empty() {
            warnings.push("No source links provided".to_string());
        } else if !record.has_official_source() {
            warnings.push("No official government sources linked".to_string());
        }

        if record.confidence_level == ConfidenceLevel::Low {
            warnings.push("Confidence level is low".to_string());
        }

        match record.last_reviewed_at {
            Some(at) => {
                let age = days_since(at, now);
                let limit = if age > self.config.hard_stale_days {
                    Some(self.config.hard_stale_days)
                } else if age > self.config.soft_stale_days {
                    Some(self.config.soft_stale_days)
                } else {
                    None
                };
                if let Some(limit) = limit {
                    warnings.push(format!("Last reviewed {age} days ago (over {})", span(limit)));
                }
            }
            None => warnings.push(missing("lastReviewedAt")),
        }

        if record.headline.trim().is_empty() {
            warnings.push(missing("headline"));
        }
        if record.decision_summary.trim().is_empty() {
            warnings.push(missing("decisionSummary"));
        }
        if record.key_requirements.is_empty() {
            warnings.push(missing("keyRequirements"));
        }
        if record.risk_flags.is_empty() {
            warnings.push(missing("riskFlags"));
        }

        ValidationResult::from_warnings(warnings)
    }

    /// Validates each record independently, keyed by record id.
    ///
    /// A later record with a duplicate id replaces the earlier result.
    #[must_use]
    pub fn validate_all(
        &self,
        records: &[ContentRecord],
        now: DateTime<Utc>,
    ) -> BTreeMap<String, ValidationResult> {
        records
            .iter()
            .map(|r| (r.id.clone(), self.validate(r, now)))
            .collect()
    }
}

fn missing(field: &str) -> String {
    format!("Missing required field: {field}")
}

/// Renders a day threshold, in 30-day months when it divides evenly.
fn span(days: i64) -> String {
    match (days / 30, days % 30) {
        (1, 0) => "1 month".to_string(),
        (months, 0) if months > 1 => format!("{months} months"),
        _ if days == 1 => "1 day".to_string(),
        _ => format!("{days} days"),
    }
}

/// Validates one record with the default configuration.
#[must_use]
pub fn validate(record: &ContentRecord, now: DateTime<Utc>) -> ValidationResult {
    BriefValidator::default().validate(record, now)
}

/// Validates many records with the default configuration.
#[must_use]
pub fn validate_all(records: &[ContentRecord], now: DateTime<Utc>) -> BTreeMap<String, ValidationResult> {
    BriefValidator::default().validate_all(records, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brief::source::SourceLink;
    use chrono::Duration;

    fn complete(now: DateTime<Utc>) -> ContentRecord {
        ContentRecord::new("pt-d7", "portugal")
            .reviewed_at(now - Duration::days(10))
            .with_confidence(ConfidenceLevel::High)
            .with_source(SourceLink::from_url("https://aima.gov.pt/d7"))
            .with_headline("D7 passive income visa")
            .with_decision_summary("Strong option for remote retirees")
            .with_requirement("Passive income above minimum wage")
            .with_risk_flag("Appointment backlog")
    }

    #[test]
    fn complete_record_is_valid() {
        let now = Utc::now();
        let result = validate(&complete(now), now);
        assert!(result.valid, "unexpected warnings: {:?}", result.warnings);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn empty_record_collects_every_warning() {
        let now = Utc::now();
        let result = validate(&ContentRecord::new("x", "spain"), now);
        assert!(!result.valid);
        assert_eq!(
            result.warnings,
            vec![
                "No source links provided",
                "Confidence level is low",
                "Missing required field: lastReviewedAt",
                "Missing required field: headline",
                "Missing required field: decisionSummary",
                "Missing required field: keyRequirements",
                "Missing required field: riskFlags",
            ]
        );
    }

    #[test]
    fn unofficial_sources_warn() {
        let now = Utc::now();
        let mut record = complete(now);
        record.source_links = vec![SourceLink::from_url("https://nomadlist.example.com/lisbon")];
        let result = validate(&record, now);
        assert_eq!(result.warnings, vec!["No official government sources linked"]);
    }

    #[test]
    fn staleness_wording_differs_by_age() {
        let now = Utc::now();
        let hard = validate(&complete(now).reviewed_at(now - Duration::days(200)), now);
        assert_eq!(hard.warnings, vec!["Last reviewed 200 days ago (over 6 months)"]);

        let soft = validate(&complete(now).reviewed_at(now - Duration::days(100)), now);
        assert_eq!(soft.warnings, vec!["Last reviewed 100 days ago (over 3 months)"]);

        let edge = validate(&complete(now).reviewed_at(now - Duration::days(90)), now);
        assert!(edge.valid);
    }

    #[test]
    fn staleness_wording_follows_configured_thresholds() {
        let now = Utc::now();
        let validator = BriefValidator::new(ValidationConfig {
            hard_stale_days: 30,
            soft_stale_days: 10,
        });

        let hard = validator.validate(&complete(now).reviewed_at(now - Duration::days(40)), now);
        assert_eq!(hard.warnings, vec!["Last reviewed 40 days ago (over 1 month)"]);

        let soft = validator.validate(&complete(now).reviewed_at(now - Duration::days(20)), now);
        assert_eq!(soft.warnings, vec!["Last reviewed 20 days ago (over 10 days)"]);
    }

    #[test]
    fn span_renders_months_when_even() {
        assert_eq!(span(180), "6 months");
        assert_eq!(span(90), "3 months");
        assert_eq!(span(45), "45 days");
        assert_eq!(span(1), "1 day");
        assert_eq!(span(0), "0 days");
    }

    #[test]
    fn bare_dot_gov_host_is_not_official() {
        let now = Utc::now();
        let mut record = complete(now);
        record.source_links = vec![SourceLink::from_url("https://www.uscis.gov/green-card")];
        let result = validate(&record, now);
        assert_eq!(result.warnings, vec!["No official government sources linked"]);
    }

    #[test]
    fn whitespace_headline_counts_as_missing() {
        let now = Utc::now();
        let record = complete(now).with_headline("   ");
        assert_eq!(validate(&record, now).warnings, vec!["Missing required field: headline"]);
    }

    #[test]
    fn validate_all_is_per_record() {
        let now = Utc::now();
        let records = vec![complete(now), ContentRecord::new("empty", "spain")];
        let results = validate_all(&records, now);
        assert_eq!(results.len(), 2);
        assert!(results["pt-d7"].valid);
        assert!(!results["empty"].valid);

        let summary = ValidationSummary::from_results(results.values());
        assert_eq!(summary, ValidationSummary { total: 2, valid: 1, invalid: 1 });
    }
}
