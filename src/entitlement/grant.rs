//! Access grants: the raw inputs to entitlement resolution.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a grant, used to correlate log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GrantId(uuid::Uuid);

impl GrantId {
    /// Creates a new random grant ID.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for GrantId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GrantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a grant was issued for.
///
/// Kinds this build does not recognise deserialize to `Unknown` and are
/// never allowed to open content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantKind {
    /// Recurring paid access to every country.
    Subscription,
    /// Time-boxed access to every country.
    DecisionPass,
    /// Permanent unlock of a single country.
    CountryLifetime,
    /// Test access granted by the backend.
    Sandbox,
    /// Any kind this build does not know.
    #[serde(other)]
    Unknown,
}

impl GrantKind {
    /// True for kinds that open every country.
    #[must_use]
    pub const fn grants_full_access(self) -> bool {
        matches!(self, Self::Subscription | Self::Sandbox | Self::DecisionPass)
    }

    /// Wire name of the kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Subscription => "subscription",
            Self::DecisionPass => "decision_pass",
            Self::CountryLifetime => "country_lifetime",
            Self::Sandbox => "sandbox",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for GrantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a grant applies. Serialized as `"global"` or the country slug.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GrantScope {
    /// Every country.
    Global,
    /// One country, by slug.
    Country(String),
}

impl GrantScope {
    /// Scope for a single country.
    #[must_use]
    pub fn country(slug: impl Into<String>) -> Self {
        Self::Country(slug.into())
    }

    /// The country slug, if this scope is a single country.
    #[must_use]
    pub fn country_slug(&self) -> Option<&str> {
        match self {
            Self::Global => None,
            Self::Country(slug) => Some(slug),
        }
    }
}

impl From<String> for GrantScope {
    fn from(raw: String) -> Self {
        if raw == "global" {
            Self::Global
        } else {
            Self::Country(raw)
        }
    }
}

impl From<GrantScope> for String {
    fn from(scope: GrantScope) -> Self {
        match scope {
            GrantScope::Global => "global".to_string(),
            GrantScope::Country(slug) => slug,
        }
    }
}

impl fmt::Display for GrantScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => f.write_str("global"),
            Self::Country(slug) => f.write_str(slug),
        }
    }
}

/// One source of entitlement, as reported by the purchase backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessGrant {
    /// Identifier; generated when the backend omits it.
    #[serde(default)]
    pub id: GrantId,

    /// What the grant was issued for.
    pub kind: GrantKind,

    /// Where the grant applies.
    pub scope: GrantScope,

    /// `None` means the grant never expires.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,

    /// When the grant was issued.
    pub granted_at: DateTime<Utc>,
}

impl AccessGrant {
    /// Creates a grant with a fresh id.
    #[must_use]
    pub fn new(
        kind: GrantKind,
        scope: GrantScope,
        granted_at: DateTime<Utc>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id: GrantId::new(),
            kind,
            scope,
            expires_at,
            granted_at,
        }
    }

    /// A global subscription; `expires_at` is the end of the paid period.
    #[must_use]
    pub fn subscription(granted_at: DateTime<Utc>, expires_at: Option<DateTime<Utc>>) -> Self {
        Self::new(GrantKind::Subscription, GrantScope::Global, granted_at, expires_at)
    }

    /// A time-boxed global decision pass.
    #[must_use]
    pub fn decision_pass(granted_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> Self {
        Self::new(GrantKind::DecisionPass, GrantScope::Global, granted_at, Some(expires_at))
    }

    /// A perpetual unlock for a single country.
    #[must_use]
    pub fn country_lifetime(slug: impl Into<String>, granted_at: DateTime<Utc>) -> Self {
        Self::new(GrantKind::CountryLifetime, GrantScope::country(slug), granted_at, None)
    }

    /// A non-production sandbox grant.
    #[must_use]
    pub fn sandbox(granted_at: DateTime<Utc>) -> Self {
        Self::new(GrantKind::Sandbox, GrantScope::Global, granted_at, None)
    }

    /// True unless the grant has an expiry at or before `now`.
    #[must_use]
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map_or(true, |exp| exp > now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_expiry_boundary() {
        let now = Utc::now();
        let pass = AccessGrant::decision_pass(now - Duration::days(1), now);
        assert!(!pass.is_active(now));
        assert!(pass.is_active(now - Duration::seconds(1)));
        assert!(AccessGrant::country_lifetime("portugal", now).is_active(now + Duration::days(3650)));
    }

    #[test]
    fn test_deserialize_grant() {
        let json = r#"{"kind":"country_lifetime","scope":"portugal","expiresAt":null,"grantedAt":"2025-01-01T00:00:00Z"}"#;
        let grant: AccessGrant = serde_json::from_str(json).unwrap();
        assert_eq!(grant.kind, GrantKind::CountryLifetime);
        assert_eq!(grant.scope.country_slug(), Some("portugal"));
        assert!(grant.expires_at.is_none());
    }

    #[test]
    fn test_unknown_kind_deserializes() {
        let json = r#"{"kind":"family_plan","scope":"global","grantedAt":"2025-01-01T00:00:00Z"}"#;
        let grant: AccessGrant = serde_json::from_str(json).unwrap();
        assert_eq!(grant.kind, GrantKind::Unknown);
        assert!(!grant.kind.grants_full_access());
    }

    #[test]
    fn test_scope_round_trip() {
        assert_eq!(serde_json::to_string(&GrantScope::Global).unwrap(), "\"global\"");
        assert_eq!(serde_json::to_string(&GrantScope::country("spain")).unwrap(), "\"spain\"");
        let scope: GrantScope = serde_json::from_str("\"global\"").unwrap();
        assert_eq!(scope, GrantScope::Global);
    }

    #[test]
    fn test_full_access_kinds() {
        assert!(GrantKind::Subscription.grants_full_access());
        assert!(GrantKind::DecisionPass.grants_full_access());
        assert!(GrantKind::Sandbox.grants_full_access());
        assert!(!GrantKind::CountryLifetime.grants_full_access());
    }
}
