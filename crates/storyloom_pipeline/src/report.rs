//! Per-topic and per-run outcome reporting.

/// Terminal state of one topic's trip through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicOutcome {
    /// Story (and possibly image) persisted
    Persisted {
        /// Narrative row id
        narrative_id: i32,
        /// Image row id, if one was rendered
        image_id: Option<i32>,
    },
    /// A narrative already existed for this topic or its query today
    SkippedExisting,
    /// No prompt could be built from the topic's fields
    SkippedNoPrompt,
    /// Story generation failed after retries
    StoryFailed,
}

/// One topic's report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicReport {
    /// Store id of the topic
    pub topic_id: i32,
    /// Query text, for log-side correlation
    pub query: String,
    /// Terminal outcome
    pub outcome: TopicOutcome,
}

/// Summary of one pipeline run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Batch date the run operated on, if any batch existed
    pub batch_date: Option<String>,
    /// Per-topic reports, in processing order
    pub reports: Vec<TopicReport>,
}

impl RunSummary {
    /// Number of topics that ended persisted.
    pub fn persisted(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| matches!(r.outcome, TopicOutcome::Persisted { .. }))
            .count()
    }

    /// Number of topics that failed story generation.
    pub fn failed(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| matches!(r.outcome, TopicOutcome::StoryFailed))
            .count()
    }

    /// Number of topics skipped before any generation.
    pub fn skipped(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| {
                matches!(
                    r.outcome,
                    TopicOutcome::SkippedExisting | TopicOutcome::SkippedNoPrompt
                )
            })
            .count()
    }
}
