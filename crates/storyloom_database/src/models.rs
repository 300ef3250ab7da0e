//! Row types and conversions between rows and domain records.
//!
//! The `categories` and `trend_breakdown` columns hold JSON so the store
//! preserves provider ordering without extra tables.

use crate::schema::{images, narratives, topics};
use diesel::prelude::*;
use storyloom_core::{Topic, TrendCategory, TrendingTopic};
use storyloom_error::{DatabaseError, DatabaseErrorKind, StoryloomResult};

/// A topic row as loaded from the store.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = topics)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TopicRow {
    /// Store-assigned id
    pub id: i32,
    /// Trending query text
    pub query: String,
    /// Unix timestamp of first observation
    pub start_timestamp: Option<i64>,
    /// Whether the trend was active at fetch time
    pub active: bool,
    /// Approximate search volume
    pub search_volume: Option<i64>,
    /// Percentage increase over baseline
    pub increase_percentage: Option<i64>,
    /// JSON-encoded ordered category pairs
    pub categories: String,
    /// JSON-encoded related terms
    pub trend_breakdown: String,
    /// Provider trend link
    pub trends_link: Option<String>,
    /// Provider news pagination token
    pub news_token: Option<String>,
    /// Provider news link
    pub news_link: Option<String>,
    /// Ingestion batch date (`YYYY-MM-DD`)
    pub batch_date: String,
}

impl TopicRow {
    /// Decode the JSON columns and produce the domain record.
    pub fn into_topic(self) -> StoryloomResult<Topic> {
        let categories: Vec<TrendCategory> = serde_json::from_str(&self.categories)
            .map_err(|e| DatabaseError::new(DatabaseErrorKind::Decode(e.to_string())))?;
        let trend_breakdown: Vec<String> = serde_json::from_str(&self.trend_breakdown)
            .map_err(|e| DatabaseError::new(DatabaseErrorKind::Decode(e.to_string())))?;

        Ok(Topic {
            id: self.id,
            record: TrendingTopic {
                query: self.query,
                start_timestamp: self.start_timestamp,
                active: self.active,
                search_volume: self.search_volume,
                increase_percentage: self.increase_percentage,
                categories,
                trend_breakdown,
                trends_link: self.trends_link,
                news_token: self.news_token,
                news_link: self.news_link,
            },
            batch_date: self.batch_date,
        })
    }
}

/// An insertable topic row.
#[derive(Debug, Insertable)]
#[diesel(table_name = topics)]
pub struct NewTopicRow {
    /// Trending query text
    pub query: String,
    /// Unix timestamp of first observation
    pub start_timestamp: Option<i64>,
    /// Whether the trend was active at fetch time
    pub active: bool,
    /// Approximate search volume
    pub search_volume: Option<i64>,
    /// Percentage increase over baseline
    pub increase_percentage: Option<i64>,
    /// JSON-encoded ordered category pairs
    pub categories: String,
    /// JSON-encoded related terms
    pub trend_breakdown: String,
    /// Provider trend link
    pub trends_link: Option<String>,
    /// Provider news pagination token
    pub news_token: Option<String>,
    /// Provider news link
    pub news_link: Option<String>,
    /// Ingestion batch date (`YYYY-MM-DD`)
    pub batch_date: String,
}

impl NewTopicRow {
    /// Build an insertable row from a fetched record, stamped with the
    /// run's batch date.
    pub fn from_record(record: &TrendingTopic, batch_date: &str) -> StoryloomResult<Self> {
        let categories = serde_json::to_string(&record.categories)
            .map_err(|e| DatabaseError::new(DatabaseErrorKind::Decode(e.to_string())))?;
        let trend_breakdown = serde_json::to_string(&record.trend_breakdown)
            .map_err(|e| DatabaseError::new(DatabaseErrorKind::Decode(e.to_string())))?;

        Ok(Self {
            query: record.query.clone(),
            start_timestamp: record.start_timestamp,
            active: record.active,
            search_volume: record.search_volume,
            increase_percentage: record.increase_percentage,
            categories,
            trend_breakdown,
            trends_link: record.trends_link.clone(),
            news_token: record.news_token.clone(),
            news_link: record.news_link.clone(),
            batch_date: batch_date.to_string(),
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = images)]
pub(crate) struct NewImageRow {
    pub file_name: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = narratives)]
pub(crate) struct NewNarrativeRow {
    pub body: String,
    pub created_date: String,
    pub topic_id: i32,
    pub image_id: Option<i32>,
}
