//! Record store operations.

use crate::connection::{establish_connection, run_migrations};
use crate::models::{NewImageRow, NewNarrativeRow, NewTopicRow, TopicRow};
use crate::schema::{images, narratives, topics};
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use storyloom_core::{Topic, TrendingTopic};
use storyloom_error::{DatabaseError, DatabaseErrorKind, StoryloomResult};
use tracing::{debug, info, instrument};

/// Handle on the SQLite record store.
///
/// Holds only the database path; each operation opens a fresh connection and
/// commits as a single statement, so no lock is held across slow remote I/O.
#[derive(Debug, Clone)]
pub struct Store {
    database_path: PathBuf,
}

impl Store {
    /// Open the store, creating the file and applying pending migrations.
    pub fn open(path: impl AsRef<Path>) -> StoryloomResult<Self> {
        let database_path = path.as_ref().to_path_buf();
        let mut conn = establish_connection(&database_path)?;
        run_migrations(&mut conn)?;
        debug!(path = %database_path.display(), "Opened record store");
        Ok(Self { database_path })
    }

    fn connect(&self) -> StoryloomResult<SqliteConnection> {
        establish_connection(&self.database_path)
    }

    /// Insert a fetched batch, stamping every row with `batch_date`.
    ///
    /// Returns the number of rows written.
    #[instrument(skip(self, batch))]
    pub fn insert_topics(
        &self,
        batch: &[TrendingTopic],
        batch_date: &str,
    ) -> StoryloomResult<usize> {
        let rows = batch
            .iter()
            .map(|record| NewTopicRow::from_record(record, batch_date))
            .collect::<StoryloomResult<Vec<_>>>()?;

        let mut conn = self.connect()?;
        let count = diesel::insert_into(topics::table)
            .values(&rows)
            .execute(&mut conn)
            .map_err(|e| DatabaseError::new(DatabaseErrorKind::Query(e.to_string())))?;

        info!(count, batch_date, "Inserted topic batch");
        Ok(count)
    }

    /// Batch date of the most recently inserted topic, if any.
    pub fn latest_batch_date(&self) -> StoryloomResult<Option<String>> {
        let mut conn = self.connect()?;
        topics::table
            .order(topics::id.desc())
            .select(topics::batch_date)
            .first::<String>(&mut conn)
            .optional()
            .map_err(|e| DatabaseError::new(DatabaseErrorKind::Query(e.to_string())).into())
    }

    /// Topics of one batch date, shaped for candidate selection: the
    /// lowest-id representative per query, topics filed solely under
    /// `excluded_category` dropped, ascending id order, at most `limit` rows.
    #[instrument(skip(self))]
    pub fn topics_for_date(
        &self,
        date: &str,
        excluded_category: &str,
        limit: i64,
    ) -> StoryloomResult<Vec<Topic>> {
        let mut conn = self.connect()?;
        let rows: Vec<TopicRow> = topics::table
            .filter(topics::batch_date.eq(date))
            .order(topics::id.asc())
            .select(TopicRow::as_select())
            .load(&mut conn)
            .map_err(|e| DatabaseError::new(DatabaseErrorKind::Query(e.to_string())))?;

        let mut seen: HashSet<String> = HashSet::new();
        let mut selected = Vec::new();
        for row in rows {
            let topic = row.into_topic()?;
            if topic.is_only_category(excluded_category) {
                continue;
            }
            // Ascending id order makes first-seen the minimum-id representative.
            if !seen.insert(topic.record.query.clone()) {
                continue;
            }
            selected.push(topic);
            if selected.len() as i64 >= limit {
                break;
            }
        }

        debug!(date, count = selected.len(), "Selected topics for date");
        Ok(selected)
    }

    /// Whether a narrative row exists for the given topic id.
    pub fn narrative_exists_for_topic(&self, topic_id: i32) -> StoryloomResult<bool> {
        let mut conn = self.connect()?;
        diesel::select(exists(
            narratives::table.filter(narratives::topic_id.eq(topic_id)),
        ))
        .get_result::<bool>(&mut conn)
        .map_err(|e| DatabaseError::new(DatabaseErrorKind::Query(e.to_string())).into())
    }

    /// Whether any narrative created on `date` belongs to a topic with the
    /// given query text, regardless of topic id.
    pub fn narrative_exists_for_query_on_date(
        &self,
        query_text: &str,
        date: &str,
    ) -> StoryloomResult<bool> {
        let mut conn = self.connect()?;
        diesel::select(exists(
            narratives::table
                .inner_join(topics::table)
                .filter(topics::query.eq(query_text))
                .filter(narratives::created_date.eq(date)),
        ))
        .get_result::<bool>(&mut conn)
        .map_err(|e| DatabaseError::new(DatabaseErrorKind::Query(e.to_string())).into())
    }

    /// Insert an image reference, returning its id.
    #[instrument(skip(self))]
    pub fn insert_image(&self, file_name: &str) -> StoryloomResult<i32> {
        let mut conn = self.connect()?;
        let row = NewImageRow {
            file_name: file_name.to_string(),
        };
        diesel::insert_into(images::table)
            .values(&row)
            .returning(images::id)
            .get_result::<i32>(&mut conn)
            .map_err(|e| DatabaseError::new(DatabaseErrorKind::Query(e.to_string())).into())
    }

    /// Insert a narrative for a topic, optionally referencing an image that
    /// must already exist.
    #[instrument(skip(self, body))]
    pub fn insert_narrative(
        &self,
        body: &str,
        date: &str,
        topic_id: i32,
        image_id: Option<i32>,
    ) -> StoryloomResult<i32> {
        let mut conn = self.connect()?;
        let row = NewNarrativeRow {
            body: body.to_string(),
            created_date: date.to_string(),
            topic_id,
            image_id,
        };
        diesel::insert_into(narratives::table)
            .values(&row)
            .returning(narratives::id)
            .get_result::<i32>(&mut conn)
            .map_err(|e| DatabaseError::new(DatabaseErrorKind::Query(e.to_string())).into())
    }

    /// Every distinct narrative date, ascending.
    pub fn distinct_narrative_dates(&self) -> StoryloomResult<Vec<String>> {
        let mut conn = self.connect()?;
        narratives::table
            .select(narratives::created_date)
            .distinct()
            .order(narratives::created_date.asc())
            .load::<String>(&mut conn)
            .map_err(|e| DatabaseError::new(DatabaseErrorKind::Query(e.to_string())).into())
    }
}
