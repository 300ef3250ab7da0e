//! Provider response model.

use serde::Deserialize;
use storyloom_core::{TrendCategory, TrendingTopic};

/// Top-level provider response. Fields the pipeline does not use are ignored.
#[derive(Debug, Deserialize)]
pub(crate) struct TrendingResponse {
    #[serde(default)]
    pub trending_searches: Vec<TrendEntry>,
}

/// One trend object as the provider serializes it.
#[derive(Debug, Deserialize)]
pub(crate) struct TrendEntry {
    pub query: String,
    #[serde(default)]
    pub start_timestamp: Option<i64>,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub search_volume: Option<i64>,
    #[serde(default)]
    pub increase_percentage: Option<i64>,
    #[serde(default)]
    pub categories: Vec<CategoryEntry>,
    #[serde(default)]
    pub trend_breakdown: Vec<String>,
    #[serde(default)]
    pub serpapi_google_trends_link: Option<String>,
    #[serde(default)]
    pub news_page_token: Option<String>,
    #[serde(default)]
    pub serpapi_news_link: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CategoryEntry {
    #[serde(default)]
    pub id: i64,
    pub name: String,
}

impl From<TrendEntry> for TrendingTopic {
    fn from(entry: TrendEntry) -> Self {
        TrendingTopic {
            query: entry.query,
            start_timestamp: entry.start_timestamp,
            active: entry.active,
            search_volume: entry.search_volume,
            increase_percentage: entry.increase_percentage,
            categories: entry
                .categories
                .into_iter()
                .map(|c| TrendCategory {
                    id: c.id,
                    name: c.name,
                })
                .collect(),
            trend_breakdown: entry.trend_breakdown,
            trends_link: entry.serpapi_google_trends_link,
            news_token: entry.news_page_token,
            news_link: entry.serpapi_news_link,
        }
    }
}
