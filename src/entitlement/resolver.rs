//! Grant resolution.
//!
//! `resolve` is a pure function of the grant snapshot and `now`. The result
//! does not depend on input order.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::entitlement::grant::{AccessGrant, GrantKind};
use crate::entitlement::state::{AccessState, AccessType};
use crate::time::days_until_ceil;

/// Expiry of the strongest active decision pass.
enum PassExpiry {
    NoPass,
    Perpetual,
    At(DateTime<Utc>),
}

/// Merges every active grant into a single `AccessState`.
///
/// Expired grants and grants of unknown kind contribute nothing.
#[must_use]
pub fn resolve(grants: &[AccessGrant], now: DateTime<Utc>) -> AccessState {
    let mut state = AccessState::locked();
    let mut pass = PassExpiry::NoPass;

    for grant in grants {
        if !grant.is_active(now) {
            continue;
        }
        let Some(access_type) = AccessType::from_kind(grant.kind) else {
            debug!(grant_id = %grant.id, scope = %grant.scope, "ignoring grant of unknown kind");
            continue;
        };

        if grant.kind == GrantKind::CountryLifetime {
            let Some(slug) = grant.scope.country_slug() else {
                debug!(grant_id = %grant.id, "ignoring country_lifetime grant without a country scope");
                continue;
            };
            state.unlocked_countries.insert(slug.to_string());
        }

        state.access_type = state.access_type.max(access_type);
        if grant.kind.grants_full_access() {
            state.has_full_access = true;
        }

        if grant.kind == GrantKind::DecisionPass {
            pass = match (pass, grant.expires_at) {
                (PassExpiry::Perpetual, _) | (_, None) => PassExpiry::Perpetual,
                (PassExpiry::At(cur), Some(exp)) => PassExpiry::At(cur.max(exp)),
                (PassExpiry::NoPass, Some(exp)) => PassExpiry::At(exp),
            };
        }
    }

    if let PassExpiry::At(exp) = pass {
        state.decision_pass_expires_at = Some(exp);
        state.decision_pass_days_left = Some(days_until_ceil(exp, now));
    }

    state
}
