//! Time arithmetic shared by the review, validation and entitlement policies.
//!
//! Every function takes `now` explicitly. Nothing in this crate reads the
//! ambient clock except [`crate::entitlement::SubscriptionFacade::refresh`].

use chrono::{DateTime, Duration, NaiveDate, Utc};

const SECONDS_PER_DAY: i64 = 86_400;
const MILLIS_PER_DAY: i64 = SECONDS_PER_DAY * 1_000;

/// Whole days elapsed from `from` to `now`, floored.
///
/// Negative when `from` lies in the future.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, Utc};
/// use expathub::time::days_since;
///
/// let now = Utc::now();
/// assert_eq!(days_since(now - Duration::hours(47), now), 1);
/// assert_eq!(days_since(now + Duration::hours(1), now), -1);
/// ```
#[must_use]
pub fn days_since(from: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - from).num_seconds().div_euclid(SECONDS_PER_DAY)
}

/// Whole days remaining until `until`, rounded up and clamped at zero.
#[must_use]
pub fn days_until_ceil(until: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let millis = (until - now).num_milliseconds();
    if millis <= 0 {
        return 0;
    }
    (millis + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY
}

/// True if `at` is no later than `now` and at most `window_days` whole days ago.
#[must_use]
pub fn within_last_days(at: DateTime<Utc>, now: DateTime<Utc>, window_days: i64) -> bool {
    if at > now {
        return false;
    }
    days_since(at, now) <= window_days
}

/// Converts a whole number of hours into a duration.
#[must_use]
pub fn hours(h: i64) -> Duration {
    Duration::hours(h)
}

/// Parses an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC).
///
/// Returns `None` for empty or unparseable input.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Serde adapters for timestamps authored as either full timestamps or dates.
pub mod flexible {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    use super::parse_timestamp;

    /// Serializes as RFC 3339.
    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339())
    }

    /// Deserializes a required timestamp; rejects empty or unparseable input.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_timestamp(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{raw}'")))
    }

    /// Adapters for optional timestamps. Empty strings and `null` map to `None`.
    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{Deserialize, Deserializer, Serializer};

        use super::parse_timestamp;

        /// Serializes `Some` as RFC 3339 and `None` as `null`.
        pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match value {
                Some(ts) => serializer.serialize_some(&ts.to_rfc3339()),
                None => serializer.serialize_none(),
            }
        }

        /// Deserializes an optional timestamp.
        ///
        /// An unparseable value is an error; an empty one is `None`.
        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
        where
            D: Deserializer<'de>,
        {
            let raw = Option::<String>::deserialize(deserializer)?;
            match raw {
                None => Ok(None),
                Some(s) if s.trim().is_empty() => Ok(None),
                Some(s) => parse_timestamp(&s)
                    .map(Some)
                    .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{s}'"))),
            }
        }
    }
}
