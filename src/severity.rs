//! Change severity and review SLAs.
//!
//! Every change detected on a brief is classified P0, P1 or P2. Each class
//! carries a fixed review SLA measured from the moment the change was detected.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::PolicyError;
use crate::time::hours;

/// Editorial urgency of a detected content change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    /// Critical: the brief may now be wrong.
    P0,
    /// Important: material change that needs a scheduled look.
    P1,
    /// Minor: cosmetic or low-impact change.
    P2,
}

/// SLA attached to a severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlaDefinition {
    /// Severity the SLA applies to.
    pub severity: Severity,
    /// Hours allowed between detection and review.
    pub hours: i64,
    /// Human-readable form of the SLA.
    pub label: &'static str,
}

const SLA_TABLE: [SlaDefinition; 3] = [
    SlaDefinition {
        severity: Severity::P0,
        hours: 48,
        label: "review within 48 hours",
    },
    SlaDefinition {
        severity: Severity::P1,
        hours: 168,
        label: "review within 7 days",
    },
    SlaDefinition {
        severity: Severity::P2,
        hours: 720,
        label: "review within 30 days",
    },
];

impl Severity {
    /// All severities, most urgent first.
    pub const ALL: [Severity; 3] = [Severity::P0, Severity::P1, Severity::P2];

    /// Short human description used in review reasons.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::P0 => "critical",
            Self::P1 => "important",
            Self::P2 => "minor",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::P0 => write!(f, "P0"),
            Self::P1 => write!(f, "P1"),
            Self::P2 => write!(f, "P2"),
        }
    }
}

impl FromStr for Severity {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "P0" => Ok(Self::P0),
            "P1" => Ok(Self::P1),
            "P2" => Ok(Self::P2),
            other => Err(PolicyError::UnknownSeverity {
                value: other.to_string(),
            }),
        }
    }
}

/// Returns the SLA for a severity.
#[must_use]
pub fn sla_for(severity: Severity) -> SlaDefinition {
    SLA_TABLE[severity as usize]
}

/// Moment at which the SLA for a change detected at `detected_at` runs out.
#[must_use]
pub fn sla_deadline(severity: Severity, detected_at: DateTime<Utc>) -> DateTime<Utc> {
    detected_at + hours(sla_for(severity).hours)
}

/// True iff more than the SLA's hours have elapsed since `detected_at`.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, Utc};
/// use expathub::severity::{is_breached, Severity};
///
/// let now = Utc::now();
/// assert!(is_breached(Severity::P1, now - Duration::hours(200), now));
/// assert!(!is_breached(Severity::P1, now - Duration::hours(100), now));
/// ```
#[must_use]
pub fn is_breached(severity: Severity, detected_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now - detected_at > hours(sla_for(severity).hours)
}

/// Whole hours left before the SLA is breached; negative once it has been.
#[must_use]
pub fn hours_remaining(severity: Severity, detected_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (sla_deadline(severity, detected_at) - now).num_hours()
}
