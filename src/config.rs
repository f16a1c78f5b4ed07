//! Policy thresholds.
//!
//! Defaults match the editorial rules the app ships with. A deployment can
//! override them from a JSON document; unspecified fields keep their default.

use serde::{Deserialize, Serialize};

use crate::error::{PolicyError, PolicyResult};

/// Government hostname fragments that mark a source link as official.
pub const DEFAULT_OFFICIAL_DOMAIN_PATTERNS: [&str; 6] =
    [".gov.", ".gob.", ".gc.ca", ".gov.uk", ".europa.eu", ".gouv."];

/// Day thresholds for the review policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReviewThresholds {
    /// Days since last review after which review is immediate.
    pub immediate_stale_days: i64,
    /// Days since last review after which review is scheduled.
    pub scheduled_stale_days: i64,
    /// Window in which a P0 change forces immediate review.
    pub p0_window_days: i64,
    /// Window in which a P1 change schedules review.
    pub p1_window_days: i64,
}

impl Default for ReviewThresholds {
    fn default() -> Self {
        Self {
            immediate_stale_days: 180,
            scheduled_stale_days: 90,
            p0_window_days: 90,
            p1_window_days: 180,
        }
    }
}

/// Settings for brief validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ValidationConfig {
    /// Age in days past which a brief gets the hard staleness warning.
    pub hard_stale_days: i64,
    /// Age in days past which a brief gets the soft staleness warning.
    pub soft_stale_days: i64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            hard_stale_days: 180,
            soft_stale_days: 90,
        }
    }
}

/// Subscription facade settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FacadeConfig {
    /// Whether the manual sandbox override may be switched on.
    ///
    /// Production builds must leave this off.
    pub allow_sandbox_override: bool,
}

impl Default for FacadeConfig {
    fn default() -> Self {
        Self {
            allow_sandbox_override: cfg!(debug_assertions),
        }
    }
}

/// Aggregate configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HubConfig {
    /// Review policy thresholds.
    pub review: ReviewThresholds,
    /// Brief validation thresholds.
    pub validation: ValidationConfig,
    /// Subscription facade settings.
    pub facade: FacadeConfig,
}

impl HubConfig {
    /// Parses and validates a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns `PolicyError::InvalidConfig` if the document does not parse or
    /// the thresholds are inconsistent.
    pub fn from_json(raw: &str) -> PolicyResult<Self> {
        let config: Self = serde_json::from_str(raw)
            .map_err(|e| PolicyError::invalid_config(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks threshold consistency.
    ///
    /// # Errors
    ///
    /// Returns `PolicyError::InvalidConfig` describing the first problem found.
    pub fn validate(&self) -> PolicyResult<()> {
        let r = &self.review;
        for (name, value) in [
            ("review.immediateStaleDays", r.immediate_stale_days),
            ("review.scheduledStaleDays", r.scheduled_stale_days),
            ("review.p0WindowDays", r.p0_window_days),
            ("review.p1WindowDays", r.p1_window_days),
            ("validation.hardStaleDays", self.validation.hard_stale_days),
            ("validation.softStaleDays", self.validation.soft_stale_days),
        ] {
            if value < 0 {
                return Err(PolicyError::invalid_config(format!("{name} must not be negative")));
            }
        }
        if r.scheduled_stale_days > r.immediate_stale_days {
            return Err(PolicyError::invalid_config(
                "review.scheduledStaleDays must not exceed review.immediateStaleDays",
            ));
        }
        if self.validation.soft_stale_days > self.validation.hard_stale_days {
            return Err(PolicyError::invalid_config(
                "validation.softStaleDays must not exceed validation.hardStaleDays",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HubConfig::default();
        assert_eq!(config.review.immediate_stale_days, 180);
        assert_eq!(config.review.scheduled_stale_days, 90);
        assert_eq!(config.review.p0_window_days, 90);
        assert_eq!(config.review.p1_window_days, 180);
        assert_eq!(config.validation.hard_stale_days, 180);
        assert_eq!(config.validation.soft_stale_days, 90);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = HubConfig::from_json(r#"{"review":{"p0WindowDays":30}}"#).unwrap();
        assert_eq!(config.review.p0_window_days, 30);
        assert_eq!(config.review.immediate_stale_days, 180);
        assert_eq!(config.validation, ValidationConfig::default());
    }

    #[test]
    fn test_rejects_inverted_thresholds() {
        let err = HubConfig::from_json(
            r#"{"review":{"immediateStaleDays":30,"scheduledStaleDays":60}}"#,
        )
        .unwrap_err();
        assert!(format!("{err}").contains("scheduledStaleDays"));
    }

    #[test]
    fn test_rejects_negative_window() {
        let err = HubConfig::from_json(r#"{"validation":{"softStaleDays":-1}}"#).unwrap_err();
        assert!(matches!(err, PolicyError::InvalidConfig { .. }));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(HubConfig::from_json("not json").is_err());
    }

    #[test]
    fn test_sandbox_flag_from_json() {
        let config = HubConfig::from_json(r#"{"facade":{"allowSandboxOverride":false}}"#).unwrap();
        assert!(!config.facade.allow_sandbox_override);
    }
}
