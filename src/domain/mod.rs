//! Domain types for photo search with strong typing.
//!
//! The wire format carries the literal `"NULL"` term and free-form sort
//! labels; everything past the HTTP boundary works with [`SearchMode`] and
//! [`SortOrder`] instead.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Term value the browser client sends when the search box is empty.
pub const RECENT_SENTINEL: &str = "NULL";

/// Unique identifier for a stored search-history entry.
///
/// # Examples
///
/// ```rust
/// use photoscroll::domain::SearchQueryId;
///
/// let id = SearchQueryId::new(7);
/// assert_eq!(id.value(), 7);
/// assert_eq!(id.to_string(), "7");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SearchQueryId(i64);

impl SearchQueryId {
    #[must_use]
    pub const fn new(id: i64) -> Self {
        debug_assert!(id >= 0, "SearchQueryId should be non-negative");
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for SearchQueryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for SearchQueryId {
    fn from(id: i64) -> Self {
        Self::new(id)
    }
}

impl From<SearchQueryId> for i64 {
    fn from(id: SearchQueryId) -> Self {
        id.0
    }
}

impl Serialize for SearchQueryId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i64(self.0)
    }
}

impl<'de> Deserialize<'de> for SearchQueryId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let id = i64::deserialize(deserializer)?;
        Ok(Self::new(id))
    }
}

/// Ordering requested from the photo provider.
///
/// Serializes as the enum name (`"DateUploaded"`), which is also the token the
/// HTTP endpoint accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    Relevant,
    DateUploaded,
    DateTaken,
    Interesting,
}

impl SortOrder {
    pub const ALL: [Self; 4] = [
        Self::Relevant,
        Self::DateUploaded,
        Self::DateTaken,
        Self::Interesting,
    ];

    /// Token used on our own HTTP surface.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Relevant => "Relevant",
            Self::DateUploaded => "DateUploaded",
            Self::DateTaken => "DateTaken",
            Self::Interesting => "Interesting",
        }
    }

    /// Token the Flickr REST API expects in its `sort` parameter.
    #[must_use]
    pub const fn provider_token(&self) -> &'static str {
        match self {
            Self::Relevant => "relevance",
            Self::DateUploaded => "date-posted-desc",
            Self::DateTaken => "date-taken-desc",
            Self::Interesting => "interestingness-desc",
        }
    }

    /// Parses a sort value, falling back to [`SortOrder::Relevant`] for
    /// anything unrecognized.
    #[must_use]
    pub fn parse_or_default(raw: Option<&str>) -> Self {
        raw.and_then(|s| s.parse().ok()).unwrap_or_default()
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown sort order: {0}")]
pub struct UnknownSortOrder(pub String);

impl FromStr for SortOrder {
    type Err = UnknownSortOrder;

    /// Accepts the enum names and the UI labels ("Date uploaded",
    /// "Interestingness", ...) ignoring case, spaces, hyphens and underscores.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();

        match folded.as_str() {
            "relevant" | "relevance" => Ok(Self::Relevant),
            "dateuploaded" | "dateposted" => Ok(Self::DateUploaded),
            "datetaken" => Ok(Self::DateTaken),
            "interesting" | "interestingness" => Ok(Self::Interesting),
            _ => Err(UnknownSortOrder(s.to_string())),
        }
    }
}

/// Which provider operation a request resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchMode {
    /// No usable term: fetch the provider's most recent uploads.
    Recent,
    /// Keyword search with the term exactly as the user typed it.
    Keyword(String),
}

impl SearchMode {
    /// Classifies a raw term. Blank, whitespace-only and the `"NULL"`
    /// sentinel (after trimming) select recent mode; everything else is a
    /// keyword search carrying the untrimmed original.
    #[must_use]
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            Some(term) if Self::is_usable_term(term) => Self::Keyword(term.to_string()),
            _ => Self::Recent,
        }
    }

    #[must_use]
    pub fn is_usable_term(term: &str) -> bool {
        let normalized = term.trim();
        !normalized.is_empty() && normalized != RECENT_SENTINEL
    }

    #[must_use]
    pub fn term(&self) -> Option<&str> {
        match self {
            Self::Recent => None,
            Self::Keyword(term) => Some(term),
        }
    }

    /// Label used for logs and metrics.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Recent => "recent",
            Self::Keyword(_) => "search",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_query_id_conversions() {
        let id = SearchQueryId::new(42);
        assert_eq!(id.value(), 42);
        assert_eq!(i64::from(id), 42);
        assert_eq!(SearchQueryId::from(42), id);
        assert_eq!(serde_json::to_string(&id).unwrap(), "42");
    }

    #[test]
    fn sort_order_parses_tokens_and_labels() {
        assert_eq!("Relevant".parse::<SortOrder>(), Ok(SortOrder::Relevant));
        assert_eq!("DateUploaded".parse::<SortOrder>(), Ok(SortOrder::DateUploaded));
        assert_eq!("Date uploaded".parse::<SortOrder>(), Ok(SortOrder::DateUploaded));
        assert_eq!("date-taken".parse::<SortOrder>(), Ok(SortOrder::DateTaken));
        assert_eq!("interestingness".parse::<SortOrder>(), Ok(SortOrder::Interesting));
        assert!("newest".parse::<SortOrder>().is_err());
    }

    #[test]
    fn sort_order_unknown_defaults_to_relevant() {
        assert_eq!(SortOrder::parse_or_default(Some("bogus")), SortOrder::Relevant);
        assert_eq!(SortOrder::parse_or_default(None), SortOrder::Relevant);
        assert_eq!(
            SortOrder::parse_or_default(Some("Interesting")),
            SortOrder::Interesting
        );
    }

    #[test]
    fn sort_order_round_trips_own_token() {
        for sort in SortOrder::ALL {
            assert_eq!(sort.as_str().parse::<SortOrder>(), Ok(sort));
        }
    }

    #[test]
    fn provider_tokens_are_distinct() {
        let tokens: std::collections::HashSet<_> =
            SortOrder::ALL.iter().map(SortOrder::provider_token).collect();
        assert_eq!(tokens.len(), SortOrder::ALL.len());
    }

    #[test]
    fn search_mode_partitions_terms() {
        assert_eq!(SearchMode::from_raw(None), SearchMode::Recent);
        assert_eq!(SearchMode::from_raw(Some("")), SearchMode::Recent);
        assert_eq!(SearchMode::from_raw(Some("   \t")), SearchMode::Recent);
        assert_eq!(SearchMode::from_raw(Some("NULL")), SearchMode::Recent);
        assert_eq!(SearchMode::from_raw(Some("  NULL ")), SearchMode::Recent);

        assert_eq!(
            SearchMode::from_raw(Some("null")),
            SearchMode::Keyword("null".to_string())
        );
        assert_eq!(
            SearchMode::from_raw(Some(" Cat ")),
            SearchMode::Keyword(" Cat ".to_string())
        );
    }

    #[test]
    fn search_mode_labels() {
        assert_eq!(SearchMode::Recent.label(), "recent");
        assert_eq!(SearchMode::Keyword("x".into()).label(), "search");
        assert_eq!(SearchMode::Keyword("x".into()).term(), Some("x"));
        assert_eq!(SearchMode::Recent.term(), None);
    }
}
