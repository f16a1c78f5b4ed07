//! Briefs and the editorial policies that read them.
//!
//! - [`record`]: the content record and its change log
//! - [`source`]: source links, classified at ingestion
//! - [`review`]: immediate / scheduled review rules
//! - [`validation`]: advisory completeness warnings

pub mod record;
pub mod review;
pub mod source;
pub mod validation;

pub use record::{ChangeLogEntry, ConfidenceLevel, ContentRecord};
pub use review::{review_status, ReviewPolicy, ReviewStatus};
pub use source::{LinkKind, SourceLink};
pub use validation::{validate, validate_all, BriefValidator, ValidationResult, ValidationSummary};
