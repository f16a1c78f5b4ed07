//! The brief: one piece of gated relocation content.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::brief::source::SourceLink;
use crate::severity::Severity;
use crate::time::flexible;

/// How sure the editors are that a brief is accurate.
///
/// A missing level deserializes as `Low` so unrated briefs are reviewed first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    /// Verified against official sources.
    High,
    /// Partly verified.
    Medium,
    /// Unverified or known to be shaky.
    #[default]
    Low,
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => write!(f, "high"),
            Self::Medium => write!(f, "medium"),
            Self::Low => write!(f, "low"),
        }
    }
}

/// A change detected against a brief's upstream sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeLogEntry {
    /// When the change was detected.
    #[serde(with = "flexible")]
    pub date: DateTime<Utc>,

    /// Editorial urgency of the change.
    pub severity: Severity,

    /// Optional free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl ChangeLogEntry {
    /// Creates an entry without a summary.
    #[must_use]
    pub fn new(date: DateTime<Utc>, severity: Severity) -> Self {
        Self {
            date,
            severity,
            summary: None,
        }
    }
}

/// A content record ("brief") for a country or a specific visa pathway.
///
/// Records are authored elsewhere; this crate only reads them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRecord {
    /// Unique record identifier.
    pub id: String,

    /// Country the brief belongs to.
    pub country_slug: String,

    /// Visa pathway within the country, if the brief is pathway-specific.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pathway_key: Option<String>,

    /// Last editorial review. Accepts an RFC 3339 timestamp or a bare date.
    #[serde(default, with = "flexible::option")]
    pub last_reviewed_at: Option<DateTime<Utc>>,

    /// Editorial confidence in the content.
    #[serde(default)]
    pub confidence_level: ConfidenceLevel,

    /// Detected upstream changes, oldest first.
    #[serde(default)]
    pub change_log: Vec<ChangeLogEntry>,

    /// Cited sources, classified at ingestion.
    #[serde(default)]
    pub source_links: Vec<SourceLink>,

    /// One-line title shown on the country page.
    #[serde(default)]
    pub headline: String,

    /// Short verdict on whether the pathway suits the reader.
    #[serde(default)]
    pub decision_summary: String,

    /// Documents and conditions the applicant must meet.
    #[serde(default)]
    pub key_requirements: Vec<String>,

    /// Known pitfalls.
    #[serde(default)]
    pub risk_flags: Vec<String>,
}

impl ContentRecord {
    /// Creates an empty record. Validation will flag every narrative field.
    #[must_use]
    pub fn new(id: impl Into<String>, country_slug: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            country_slug: country_slug.into(),
            pathway_key: None,
            last_reviewed_at: None,
            confidence_level: ConfidenceLevel::default(),
            change_log: Vec::new(),
            source_links: Vec::new(),
            headline: String::new(),
            decision_summary: String::new(),
            key_requirements: Vec::new(),
            risk_flags: Vec::new(),
        }
    }

    /// Sets the pathway key.
    #[must_use]
    pub fn with_pathway(mut self, pathway_key: impl Into<String>) -> Self {
        self.pathway_key = Some(pathway_key.into());
        self
    }

    /// Sets the last review time.
    #[must_use]
    pub fn reviewed_at(mut self, at: DateTime<Utc>) -> Self {
        self.last_reviewed_at = Some(at);
        self
    }

    /// Sets the confidence level.
    #[must_use]
    pub fn with_confidence(mut self, level: ConfidenceLevel) -> Self {
        self.confidence_level = level;
        self
    }

    /// Appends a change log entry.
    #[must_use]
    pub fn with_change(mut self, entry: ChangeLogEntry) -> Self {
        self.change_log.push(entry);
        self
    }

    /// Appends a source link.
    #[must_use]
    pub fn with_source(mut self, link: SourceLink) -> Self {
        self.source_links.push(link);
        self
    }

    /// Sets the headline.
    #[must_use]
    pub fn with_headline(mut self, headline: impl Into<String>) -> Self {
        self.headline = headline.into();
        self
    }

    /// Sets the decision summary.
    #[must_use]
    pub fn with_decision_summary(mut self, summary: impl Into<String>) -> Self {
        self.decision_summary = summary.into();
        self
    }

    /// Appends a key requirement.
    #[must_use]
    pub fn with_requirement(mut self, requirement: impl Into<String>) -> Self {
        self.key_requirements.push(requirement.into());
        self
    }

    /// Appends a risk flag.
    #[must_use]
    pub fn with_risk_flag(mut self, flag: impl Into<String>) -> Self {
        self.risk_flags.push(flag.into());
        self
    }

    /// Changes of the given severity, in log order.
    pub fn changes_of(&self, severity: Severity) -> impl Iterator<Item = &ChangeLogEntry> {
        self.change_log.iter().filter(move |e| e.severity == severity)
    }

    /// True if at least one source link is official.
    #[must_use]
    pub fn has_official_source(&self) -> bool {
        self.source_links.iter().any(SourceLink::is_official)
    }
}
