//! Source links cited by a brief.
//!
//! Links reach us in two shapes: bare URL strings and `{url, type}` objects.
//! Both are normalized into [`SourceLink`] when deserialized, so the rest of
//! the crate only ever sees a classified link.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_OFFICIAL_DOMAIN_PATTERNS;

/// Classification of a source link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkKind {
    /// Published by a government body.
    Official,
    /// Anything else: press, forums, vendor pages.
    Other,
}

/// A classified source link.
///
/// # Examples
///
/// ```
/// use expathub::brief::{LinkKind, SourceLink};
///
/// let link = SourceLink::from_url("https://www.sef.gov.pt/en/visas");
/// assert_eq!(link.kind, LinkKind::Official);
///
/// let blog = SourceLink::from_url("https://movingabroad.example.com/portugal");
/// assert_eq!(blog.kind, LinkKind::Other);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawSourceLink")]
pub struct SourceLink {
    /// The cited URL, as authored.
    pub url: String,

    /// Classification decided at ingestion.
    #[serde(rename = "type")]
    pub kind: LinkKind,
}

impl SourceLink {
    /// Creates a link with an explicit kind.
    #[must_use]
    pub fn new(url: impl Into<String>, kind: LinkKind) -> Self {
        Self {
            url: url.into(),
            kind,
        }
    }

    /// Creates an official link.
    #[must_use]
    pub fn official(url: impl Into<String>) -> Self {
        Self::new(url, LinkKind::Official)
    }

    /// Classifies a bare URL against the default government domain patterns.
    #[must_use]
    pub fn from_url(url: impl Into<String>) -> Self {
        let url = url.into();
        let kind = classify_url(&url, &DEFAULT_OFFICIAL_DOMAIN_PATTERNS);
        Self { url, kind }
    }

    /// Classifies a bare URL against custom patterns.
    #[must_use]
    pub fn from_url_with<S: AsRef<str>>(url: impl Into<String>, patterns: &[S]) -> Self {
        let url = url.into();
        let kind = classify_url(&url, patterns);
        Self { url, kind }
    }

    /// True for links published by a government body.
    #[must_use]
    pub fn is_official(&self) -> bool {
        self.kind == LinkKind::Official
    }
}

/// Wire shapes accepted for a source link.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawSourceLink {
    Url(String),
    Tagged {
        url: String,
        #[serde(rename = "type", default)]
        kind: Option<String>,
    },
}

impl From<RawSourceLink> for SourceLink {
    fn from(raw: RawSourceLink) -> Self {
        match raw {
            RawSourceLink::Url(url) => Self::from_url(url),
            RawSourceLink::Tagged { url, kind: None } => Self::from_url(url),
            RawSourceLink::Tagged {
                url,
                kind: Some(kind),
            } => {
                let kind = if kind == "official" {
                    LinkKind::Official
                } else {
                    LinkKind::Other
                };
                Self { url, kind }
            }
        }
    }
}

fn host_regex() -> Option<&'static Regex> {
    static HOST: OnceLock<Option<Regex>> = OnceLock::new();
    HOST.get_or_init(|| {
        Regex::new(r"^(?i)(?:[a-z][a-z0-9+.\-]*://)?(?:[^@/?#]*@)?([^:/?#\s]+)").ok()
    })
    .as_ref()
}

/// Extracts the lowercase hostname from a URL, if it has one.
#[must_use]
pub fn hostname(url: &str) -> Option<String> {
    let caps = host_regex()?.captures(url.trim())?;
    let host = caps.get(1)?.as_str().trim_end_matches('.');
    if host.is_empty() {
        return None;
    }
    Some(host.to_ascii_lowercase())
}

/// Classifies a URL as official if its lowercase hostname contains any pattern.
#[must_use]
pub fn classify_url<S: AsRef<str>>(url: &str, patterns: &[S]) -> LinkKind {
    let Some(host) = hostname(url) else {
        return LinkKind::Other;
    };
    let official = patterns
        .iter()
        .map(|p| p.as_ref().to_ascii_lowercase())
        .any(|p| !p.is_empty() && host.contains(&p));
    if official {
        LinkKind::Official
    } else {
        LinkKind::Other
    }
}
