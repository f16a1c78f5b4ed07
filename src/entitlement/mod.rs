//! Entitlements: who may see which country's content.
//!
//! Grants from independent purchase paths are merged by [`resolve`] into a
//! single [`AccessState`]. The [`SubscriptionFacade`] caches that state for
//! the UI and layers the sandbox override on top.

mod facade;
mod grant;
mod resolver;
mod state;

pub use facade::{GrantSource, StaticGrantSource, SubscriptionFacade};
pub use grant::{AccessGrant, GrantId, GrantKind, GrantScope};
pub use resolver::resolve;
pub use state::{AccessState, AccessType};
