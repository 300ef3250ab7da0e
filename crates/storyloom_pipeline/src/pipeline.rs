//! Pipeline orchestration.

use crate::prompt::{image_prompt_input, story_prompt};
use crate::report::{RunSummary, TopicOutcome, TopicReport};
use std::time::Duration;
use storyloom_comfy::ImageRenderer;
use storyloom_core::{
    Clock, GenerationConfig, ImageFailurePolicy, PipelineConfig, StoreConfig, StoryRequest,
    Topic, TrendingTopic,
};
use storyloom_database::Store;
use storyloom_error::{PipelineError, PipelineErrorKind, StoryloomResult};
use storyloom_gateway::StoryGenerator;
use tracing::{debug, info, instrument, warn};

/// Orchestrates one run: ingest the fetched batch, select candidates, and
/// walk each one through story generation, image generation, and persistence
/// in ascending id order.
pub struct Pipeline<G, R> {
    store: Store,
    generator: G,
    renderer: R,
    generation: GenerationConfig,
    settings: PipelineConfig,
    excluded_category: String,
    batch_limit: i64,
    clock: Clock,
}

impl<G: StoryGenerator, R: ImageRenderer> Pipeline<G, R> {
    /// Assemble a pipeline over its collaborators.
    pub fn new(
        store: Store,
        generator: G,
        renderer: R,
        generation: GenerationConfig,
        settings: PipelineConfig,
        store_config: &StoreConfig,
        clock: Clock,
    ) -> Self {
        Self {
            store,
            generator,
            renderer,
            generation,
            settings,
            excluded_category: store_config.excluded_category.clone(),
            batch_limit: store_config.batch_limit,
            clock,
        }
    }

    /// Run the pipeline over a freshly fetched batch.
    ///
    /// An empty `batch` re-processes the latest stored batch, which makes a
    /// crashed run resumable without refetching.
    #[instrument(skip(self, batch), fields(batch_size = batch.len()))]
    pub async fn run(&self, batch: &[TrendingTopic]) -> StoryloomResult<RunSummary> {
        let today = self.clock.today();

        if !batch.is_empty() {
            self.store.insert_topics(batch, &today)?;
        }

        let Some(active_date) = self.store.latest_batch_date()? else {
            info!("Store is empty; nothing to process");
            return Ok(RunSummary::default());
        };

        let candidates =
            self.store
                .topics_for_date(&active_date, &self.excluded_category, self.batch_limit)?;
        info!(
            batch_date = %active_date,
            candidates = candidates.len(),
            "Selected candidate topics"
        );

        let mut summary = RunSummary {
            batch_date: Some(active_date),
            ..Default::default()
        };

        for topic in &candidates {
            let outcome = self.process_topic(topic, &today).await?;
            debug!(topic_id = topic.id, outcome = ?outcome, "Topic finished");
            summary.reports.push(TopicReport {
                topic_id: topic.id,
                query: topic.record.query.clone(),
                outcome,
            });
        }

        info!(
            persisted = summary.persisted(),
            skipped = summary.skipped(),
            failed = summary.failed(),
            "Pipeline run finished"
        );
        Ok(summary)
    }

    /// One topic's state machine. Generation failures resolve to an outcome;
    /// only store faults and the abort image policy escalate.
    #[instrument(skip(self, topic), fields(topic_id = topic.id, query = %topic.record.query))]
    async fn process_topic(&self, topic: &Topic, today: &str) -> StoryloomResult<TopicOutcome> {
        if self.store.narrative_exists_for_topic(topic.id)? {
            debug!("Narrative already exists for topic");
            return Ok(TopicOutcome::SkippedExisting);
        }
        if self
            .store
            .narrative_exists_for_query_on_date(&topic.record.query, today)?
        {
            debug!("Query already narrated today under another topic");
            return Ok(TopicOutcome::SkippedExisting);
        }

        let Some(prompt) = story_prompt(topic) else {
            info!("Topic has no usable fields; skipping");
            return Ok(TopicOutcome::SkippedNoPrompt);
        };

        let story_request = StoryRequest {
            prompt,
            system_prompt: self.generation.story_system_prompt.clone(),
            model: self.generation.model.clone(),
            search: self.generation.search,
        };

        let narrative = match self.generator.generate(&story_request).await {
            Ok(response) => response.content,
            Err(e) => {
                warn!(phase = "story", error = %e, "Story generation failed; topic skipped");
                return Ok(TopicOutcome::StoryFailed);
            }
        };

        let image_id = match self.render_illustration(topic, &narrative).await? {
            Some(file_name) => Some(self.store.insert_image(&file_name)?),
            None => None,
        };

        let narrative_id = self
            .store
            .insert_narrative(&narrative, today, topic.id, image_id)?;

        info!(narrative_id, image_id = ?image_id, "Persisted topic");
        Ok(TopicOutcome::Persisted {
            narrative_id,
            image_id,
        })
    }

    /// Derive an image prompt and render the illustration, applying the
    /// image-failure policy. `Ok(None)` means publish without an image.
    async fn render_illustration(
        &self,
        topic: &Topic,
        narrative: &str,
    ) -> StoryloomResult<Option<String>> {
        // Give the service breathing room between the two generation calls.
        if self.settings.pacing_secs > 0 {
            tokio::time::sleep(Duration::from_secs(self.settings.pacing_secs)).await;
        }

        let prompt_request = StoryRequest {
            prompt: image_prompt_input(narrative, &topic.record.query),
            system_prompt: self.generation.image_prompt_system_prompt.clone(),
            model: self.generation.model.clone(),
            search: false,
        };

        let image_prompt = match self.generator.generate(&prompt_request).await {
            Ok(response) => response.content,
            Err(e) => {
                warn!(phase = "image_prompt", error = %e, "Image prompt derivation failed");
                return self.image_failure(topic);
            }
        };

        match self
            .renderer
            .render(&image_prompt, &topic.record.query)
            .await
        {
            Ok(rendered) => Ok(Some(rendered.file_name)),
            Err(e) => {
                warn!(phase = "render", error = %e, "Image render failed");
                self.image_failure(topic)
            }
        }
    }

    fn image_failure(&self, topic: &Topic) -> StoryloomResult<Option<String>> {
        match self.settings.image_failure {
            ImageFailurePolicy::Degrade => {
                info!("Publishing narrative without an image");
                Ok(None)
            }
            ImageFailurePolicy::Abort => Err(PipelineError::new(
                PipelineErrorKind::ImageAborted(topic.record.query.clone()),
            )
            .into()),
        }
    }
}
