//! Trending-topic domain records.

use serde::{Deserialize, Serialize};

/// One category attached to a trending topic, in provider order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendCategory {
    /// Provider-assigned category id
    pub id: i64,
    /// Human-readable category name
    pub name: String,
}

/// A trending-search record as fetched from the provider, before it has a
/// store identity or a batch date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TrendingTopic {
    /// The trending query text
    pub query: String,
    /// Unix timestamp at which the trend was first observed
    pub start_timestamp: Option<i64>,
    /// Whether the trend was still active at fetch time
    pub active: bool,
    /// Approximate search volume
    pub search_volume: Option<i64>,
    /// Percentage increase over baseline volume
    pub increase_percentage: Option<i64>,
    /// Ordered categories the provider filed this trend under
    pub categories: Vec<TrendCategory>,
    /// Related query terms
    pub trend_breakdown: Vec<String>,
    /// Provider link for the trend detail page
    pub trends_link: Option<String>,
    /// Provider pagination token for related news
    pub news_token: Option<String>,
    /// Provider link for related news
    pub news_link: Option<String>,
}

/// A stored topic: a [`TrendingTopic`] with its store id and batch date.
///
/// Topics are created only by ingestion and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Topic {
    /// Store-assigned id
    pub id: i32,
    /// The ingested trend record
    pub record: TrendingTopic,
    /// Date string (`YYYY-MM-DD`) shared by every topic in the same
    /// ingestion run
    pub batch_date: String,
}

impl Topic {
    /// Whether this topic's category set is exactly the single named
    /// category, which excludes it from candidate selection.
    pub fn is_only_category(&self, name: &str) -> bool {
        self.record.categories.len() == 1 && self.record.categories[0].name == name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topic_with_categories(names: &[&str]) -> Topic {
        Topic {
            id: 1,
            record: TrendingTopic {
                query: "q".into(),
                categories: names
                    .iter()
                    .enumerate()
                    .map(|(i, n)| TrendCategory {
                        id: i as i64,
                        name: (*n).into(),
                    })
                    .collect(),
                ..Default::default()
            },
            batch_date: "2026-08-07".into(),
        }
    }

    #[test]
    fn test_only_category_match() {
        let topic = topic_with_categories(&["Sports"]);
        assert!(topic.is_only_category("Sports"));
    }

    #[test]
    fn test_mixed_categories_not_excluded() {
        let topic = topic_with_categories(&["Sports", "Entertainment"]);
        assert!(!topic.is_only_category("Sports"));
    }

    #[test]
    fn test_empty_categories_not_excluded() {
        let topic = topic_with_categories(&[]);
        assert!(!topic.is_only_category("Sports"));
    }
}
