//! Subscription facade consumed by UI gating.
//!
//! The facade owns the only mutable entitlement state in the crate: the last
//! resolved `AccessState` and the sandbox override bit. It is constructed with
//! an injected [`GrantSource`] and handed to whatever needs to gate content.
//!
//! Refresh policy:
//! - A successful fetch replaces the cached state (last write wins).
//! - A failed fetch leaves the cached state untouched.
//! - Overlapping refreshes are not queued or cancelled.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::config::FacadeConfig;
use crate::entitlement::grant::AccessGrant;
use crate::entitlement::resolver::resolve;
use crate::entitlement::state::{AccessState, AccessType};
use crate::error::{PolicyError, PolicyResult, SourceError};

/// Supplies the current grant snapshot (purchase backend, receipt cache, ...).
///
/// Timeouts and retries belong to the implementation, not to the facade.
#[async_trait]
pub trait GrantSource: Send + Sync {
    /// Name of the source (for logging).
    fn name(&self) -> &str;

    /// Fetches every grant currently on record for the user.
    async fn fetch_grants(&self) -> Result<Vec<AccessGrant>, SourceError>;
}

/// In-memory grant source.
///
/// Useful for tests and for wiring the facade before a real backend exists.
#[derive(Debug, Default)]
pub struct StaticGrantSource {
    grants: RwLock<Vec<AccessGrant>>,
    failure: RwLock<Option<SourceError>>,
}

impl StaticGrantSource {
    /// Creates a source that answers with `grants`.
    #[must_use]
    pub fn new(grants: Vec<AccessGrant>) -> Self {
        Self {
            grants: RwLock::new(grants),
            failure: RwLock::new(None),
        }
    }

    /// Replaces the stored grants.
    pub fn set_grants(&self, grants: Vec<AccessGrant>) {
        *write(&self.grants) = grants;
    }

    /// Adds one grant.
    pub fn push(&self, grant: AccessGrant) {
        write(&self.grants).push(grant);
    }

    /// Makes every subsequent fetch fail with `error`.
    pub fn fail_with(&self, error: SourceError) {
        *write(&self.failure) = Some(error);
    }

    /// Clears a failure set by `fail_with`.
    pub fn recover(&self) {
        *write(&self.failure) = None;
    }
}

#[async_trait]
impl GrantSource for StaticGrantSource {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch_grants(&self) -> Result<Vec<AccessGrant>, SourceError> {
        if let Some(err) = read(&self.failure).clone() {
            return Err(err);
        }
        Ok(read(&self.grants).clone())
    }
}

#[derive(Debug, Default)]
struct Cached {
    computed: AccessState,
    refreshed_at: Option<DateTime<Utc>>,
}

/// Cached, refreshable entitlement view with a sandbox escape hatch.
pub struct SubscriptionFacade {
    source: Arc<dyn GrantSource>,
    config: FacadeConfig,
    cache: RwLock<Cached>,
    sandbox_override: AtomicBool,
}

impl std::fmt::Debug for SubscriptionFacade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionFacade")
            .field("source", &self.source.name())
            .field("config", &self.config)
            .field("sandbox_override", &self.sandbox_override())
            .finish_non_exhaustive()
    }
}

impl SubscriptionFacade {
    /// Creates a facade in the locked state. Call [`Self::refresh`] to load grants.
    #[must_use]
    pub fn new(source: Arc<dyn GrantSource>, config: FacadeConfig) -> Self {
        Self {
            source,
            config,
            cache: RwLock::new(Cached::default()),
            sandbox_override: AtomicBool::new(false),
        }
    }

    /// Re-fetches grants and resolves them against the current clock.
    ///
    /// # Errors
    ///
    /// Returns `PolicyError::Source` if the grant source failed. The
    /// previously cached state is kept in that case.
    pub async fn refresh(&self) -> PolicyResult<AccessState> {
        self.refresh_at(Utc::now()).await
    }

    /// Like [`Self::refresh`] but resolves against an explicit `now`.
    ///
    /// # Errors
    ///
    /// Returns `PolicyError::Source` if the grant source failed.
    pub async fn refresh_at(&self, now: DateTime<Utc>) -> PolicyResult<AccessState> {
        let grants = match self.source.fetch_grants().await {
            Ok(grants) => grants,
            Err(e) => {
                warn!(
                    source = self.source.name(),
                    error = %e,
                    transient = e.is_transient(),
                    "grant refresh failed; keeping last known access state"
                );
                return Err(PolicyError::Source(e));
            }
        };

        let computed = resolve(&grants, now);
        info!(
            source = self.source.name(),
            grants = grants.len(),
            access_type = %computed.access_type,
            full_access = computed.has_full_access,
            unlocked = computed.unlocked_countries.len(),
            "access state refreshed"
        );

        {
            let mut cache = write(&self.cache);
            cache.computed = computed;
            cache.refreshed_at = Some(now);
        }
        Ok(self.access_state())
    }

    /// Switches the sandbox override.
    ///
    /// # Errors
    ///
    /// Returns `PolicyError::SandboxDisabled` when enabling it on a build
    /// that does not allow the override. Disabling always succeeds.
    pub fn set_sandbox_override(&self, enabled: bool) -> PolicyResult<()> {
        if enabled && !self.config.allow_sandbox_override {
            warn!("rejected attempt to enable sandbox override");
            return Err(PolicyError::SandboxDisabled);
        }
        let previous = self.sandbox_override.swap(enabled, Ordering::SeqCst);
        if previous != enabled {
            info!(enabled, "sandbox override toggled");
        }
        Ok(())
    }

    /// Whether the sandbox override is on.
    #[must_use]
    pub fn sandbox_override(&self) -> bool {
        self.sandbox_override.load(Ordering::SeqCst)
    }

    /// The effective access state, with the sandbox override applied.
    #[must_use]
    pub fn access_state(&self) -> AccessState {
        let cache = read(&self.cache);
        if self.sandbox_override() {
            AccessState::sandboxed(&cache.computed)
        } else {
            cache.computed.clone()
        }
    }

    /// Whether every country is open.
    #[must_use]
    pub fn has_full_access(&self) -> bool {
        self.sandbox_override() || read(&self.cache).computed.has_full_access
    }

    /// Effective access type.
    #[must_use]
    pub fn access_type(&self) -> AccessType {
        if self.sandbox_override() {
            AccessType::Sandbox
        } else {
            read(&self.cache).computed.access_type
        }
    }

    /// Countries opened by lifetime unlocks, in slug order.
    #[must_use]
    pub fn unlocked_countries(&self) -> Vec<String> {
        read(&self.cache)
            .computed
            .unlocked_countries
            .iter()
            .cloned()
            .collect()
    }

    /// Expiry of the active decision pass.
    #[must_use]
    pub fn decision_pass_expires_at(&self) -> Option<DateTime<Utc>> {
        read(&self.cache).computed.decision_pass_expires_at
    }

    /// Days left on the active decision pass.
    #[must_use]
    pub fn decision_pass_days_left(&self) -> Option<i64> {
        read(&self.cache).computed.decision_pass_days_left
    }

    /// Gate predicate for a country's content.
    #[must_use]
    pub fn has_country_access(&self, slug: &str) -> bool {
        self.sandbox_override() || read(&self.cache).computed.has_country_access(slug)
    }

    /// When the cache last took a successful refresh.
    #[must_use]
    pub fn last_refreshed_at(&self) -> Option<DateTime<Utc>> {
        read(&self.cache).refreshed_at
    }
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
