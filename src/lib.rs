//! # ExpatHub policy core
//!
//! Decision rules behind the ExpatHub relocation app: who may read which
//! country's briefs, and which briefs are due for editorial review.
//!
//! ## Core Concepts
//!
//! - **Grant**: one source of access (subscription, decision pass, country unlock, sandbox)
//! - **AccessState**: the normalized permission snapshot resolved from all active grants
//! - **Brief**: a gated content record with a change log and source links
//! - **Severity**: P0/P1/P2 classification of a detected change, each with a review SLA
//!
//! ## Usage
//!
//! ```rust
//! use chrono::Utc;
//! use expathub::entitlement::{resolve, AccessGrant, AccessType};
//!
//! let now = Utc::now();
//! let state = resolve(&[AccessGrant::country_lifetime("portugal", now)], now);
//!
//! assert!(state.has_country_access("portugal"));
//! assert!(!state.has_country_access("spain"));
//! assert_eq!(state.access_type, AccessType::CountryLifetime);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod brief;
pub mod config;
pub mod entitlement;
pub mod error;
pub mod severity;
pub mod time;

// Re-export primary types at crate root for convenience
pub use brief::{
    BriefValidator, ChangeLogEntry, ConfidenceLevel, ContentRecord, LinkKind, ReviewPolicy,
    ReviewStatus, SourceLink, ValidationResult, ValidationSummary,
};
pub use config::{FacadeConfig, HubConfig, ReviewThresholds, ValidationConfig};
pub use entitlement::{
    AccessGrant, AccessState, AccessType, GrantKind, GrantScope, GrantSource, StaticGrantSource,
    SubscriptionFacade,
};
pub use error::{PolicyError, PolicyResult, SourceError};
pub use severity::{is_breached, sla_for, Severity, SlaDefinition};
