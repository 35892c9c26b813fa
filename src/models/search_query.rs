use crate::domain::SearchQueryId;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A distinct search term recorded the first time anyone searched for it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub id: SearchQueryId,

    pub query_text: String,

    pub search_time: DateTime<Utc>,
}

/// Case-insensitive dedup key for a term.
///
/// Uses Unicode lowercasing rather than SQLite's ASCII-only `lower()`.
#[must_use]
pub fn query_key(term: &str) -> String {
    term.trim().to_lowercase()
}

/// Timestamp encoding used in storage. Fixed width, so lexical order matches
/// chronological order.
#[must_use]
pub fn encode_search_time(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn query_key_folds_case_and_whitespace() {
        assert_eq!(query_key("Cat"), "cat");
        assert_eq!(query_key("  CAT "), "cat");
        assert_eq!(query_key("Straße"), "straße");
        assert_eq!(query_key("ÉCLAIR"), "éclair");
    }

    #[test]
    fn encoded_times_sort_lexically() {
        let earlier = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        let later = earlier + chrono::Duration::microseconds(1);
        assert!(encode_search_time(earlier) < encode_search_time(later));
        assert_eq!(encode_search_time(earlier), "2026-03-01T09:00:00.000000Z");
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let query = SearchQuery {
            id: SearchQueryId::new(3),
            query_text: "Cat".to_string(),
            search_time: Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap(),
        };
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["queryText"], "Cat");
        assert!(json["searchTime"].is_string());
    }
}
