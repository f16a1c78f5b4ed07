//! The resolved access snapshot handed to UI gating.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entitlement::grant::GrantKind;

/// The highest-precedence reason a user has access.
///
/// Variants are declared in ascending precedence so `Ord` matches
/// `sandbox > subscription > decision_pass > country_lifetime > none`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessType {
    /// No active grant.
    #[default]
    None,
    /// Only single-country unlocks.
    CountryLifetime,
    /// An active decision pass.
    DecisionPass,
    /// An active subscription.
    Subscription,
    /// Sandbox grant or manual override.
    Sandbox,
}

impl AccessType {
    /// Maps a grant kind to the access type it reports. `Unknown` maps to nothing.
    #[must_use]
    pub const fn from_kind(kind: GrantKind) -> Option<Self> {
        match kind {
            GrantKind::Subscription => Some(Self::Subscription),
            GrantKind::DecisionPass => Some(Self::DecisionPass),
            GrantKind::CountryLifetime => Some(Self::CountryLifetime),
            GrantKind::Sandbox => Some(Self::Sandbox),
            GrantKind::Unknown => None,
        }
    }
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::CountryLifetime => write!(f, "country_lifetime"),
            Self::DecisionPass => write!(f, "decision_pass"),
            Self::Subscription => write!(f, "subscription"),
            Self::Sandbox => write!(f, "sandbox"),
        }
    }
}

/// Normalized entitlement snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessState {
    /// Every country is open.
    pub has_full_access: bool,
    /// Highest-precedence active access.
    pub access_type: AccessType,
    /// Countries opened by lifetime unlocks, whatever `access_type` says.
    pub unlocked_countries: BTreeSet<String>,
    /// Expiry of the longest-running dated decision pass.
    pub decision_pass_expires_at: Option<DateTime<Utc>>,
    /// Whole days left on that pass, rounded up.
    pub decision_pass_days_left: Option<i64>,
}

impl AccessState {
    /// No access at all.
    #[must_use]
    pub fn locked() -> Self {
        Self::default()
    }

    /// Full access granted by the sandbox override.
    ///
    /// Country unlocks from real grants are carried over so they reappear
    /// unchanged when the override is switched off.
    #[must_use]
    pub fn sandboxed(underlying: &Self) -> Self {
        Self {
            has_full_access: true,
            access_type: AccessType::Sandbox,
            ..underlying.clone()
        }
    }

    /// Whether content for `slug` may be shown.
    ///
    /// Every gate must go through this predicate.
    #[must_use]
    pub fn has_country_access(&self, slug: &str) -> bool {
        self.has_full_access || self.unlocked_countries.contains(slug)
    }
}
