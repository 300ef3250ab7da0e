//! End-to-end pipeline tests over an on-disk store with scripted
//! generation and render seams.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU32, Ordering};
use storyloom_comfy::{ImageRenderer, RenderedImage};
use storyloom_core::{
    GenerationConfig, ImageFailurePolicy, PipelineConfig, StoreConfig, StoryRequest,
    StoryResponse, TrendCategory, TrendingTopic, Clock,
};
use storyloom_database::Store;
use storyloom_error::{GatewayError, GatewayErrorKind, ImageError, ImageErrorKind, StoryloomResult};
use storyloom_gateway::StoryGenerator;
use storyloom_pipeline::{Pipeline, TopicOutcome};

const STORY_SYSTEM: &str = "You write short news stories.";
const IMAGE_SYSTEM: &str = "You turn stories into image keywords.";

struct ScriptedGenerator {
    fail_story_queries: HashSet<String>,
    fail_image_prompts: bool,
    calls: AtomicU32,
}

impl ScriptedGenerator {
    fn happy() -> Self {
        Self {
            fail_story_queries: HashSet::new(),
            fail_image_prompts: false,
            calls: AtomicU32::new(0),
        }
    }

    fn failing_story_for(query: &str) -> Self {
        Self {
            fail_story_queries: [query.to_string()].into_iter().collect(),
            fail_image_prompts: false,
            calls: AtomicU32::new(0),
        }
    }

    fn failing_image_prompts() -> Self {
        Self {
            fail_story_queries: HashSet::new(),
            fail_image_prompts: true,
            calls: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl StoryGenerator for ScriptedGenerator {
    async fn generate(&self, request: &StoryRequest) -> StoryloomResult<StoryResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let is_image_prompt = request.system_prompt == IMAGE_SYSTEM;
        if is_image_prompt {
            if self.fail_image_prompts {
                return Err(
                    GatewayError::new(GatewayErrorKind::Exhausted { attempts: 4 }).into(),
                );
            }
            return Ok(StoryResponse {
                content: "keywords, photo, detailed".to_string(),
            });
        }

        if self
            .fail_story_queries
            .iter()
            .any(|q| request.prompt.contains(q))
        {
            return Err(GatewayError::new(GatewayErrorKind::Exhausted { attempts: 4 }).into());
        }

        Ok(StoryResponse {
            content: format!("A story about {}", request.prompt),
        })
    }
}

struct ScriptedRenderer {
    fail: bool,
}

#[async_trait]
impl ImageRenderer for ScriptedRenderer {
    async fn render(&self, _prompt: &str, query: &str) -> StoryloomResult<RenderedImage> {
        if self.fail {
            return Err(ImageError::new(ImageErrorKind::Timeout(600)).into());
        }
        Ok(RenderedImage {
            file_name: format!("20260807/{}_test.png", query),
        })
    }
}

fn topic(query: &str) -> TrendingTopic {
    TrendingTopic {
        query: query.to_string(),
        active: true,
        categories: vec![TrendCategory {
            id: 1,
            name: "Science".to_string(),
        }],
        trend_breakdown: vec![format!("{} news", query)],
        ..Default::default()
    }
}

struct Fixture {
    store: Store,
    path: std::path::PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let path =
            std::env::temp_dir().join(format!("storyloom_pipeline_{}.db", uuid::Uuid::new_v4()));
        let store = Store::open(&path).unwrap();
        Self { store, path }
    }

    fn pipeline<G: StoryGenerator, R: ImageRenderer>(
        &self,
        generator: G,
        renderer: R,
        image_failure: ImageFailurePolicy,
    ) -> Pipeline<G, R> {
        Pipeline::new(
            self.store.clone(),
            generator,
            renderer,
            GenerationConfig {
                endpoint: "ws://127.0.0.1:9001/generate".to_string(),
                model: "test-model".to_string(),
                search: true,
                story_system_prompt: STORY_SYSTEM.to_string(),
                image_prompt_system_prompt: IMAGE_SYSTEM.to_string(),
            },
            PipelineConfig {
                pacing_secs: 0,
                image_failure,
            },
            &StoreConfig {
                database_path: self.path.clone(),
                excluded_category: "Sports".to_string(),
                batch_limit: 10,
            },
            Clock::from_offset_hours(0),
        )
    }

    fn narrative_count(&self) -> i64 {
        use diesel::prelude::*;
        let mut conn = storyloom_database::establish_connection(&self.path).unwrap();
        storyloom_database::schema::narratives::table
            .count()
            .get_result(&mut conn)
            .unwrap()
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        std::fs::remove_file(&self.path).ok();
    }
}

#[tokio::test]
async fn test_duplicate_queries_collapse_to_one_story_each() {
    let fixture = Fixture::new();
    let pipeline = fixture.pipeline(
        ScriptedGenerator::happy(),
        ScriptedRenderer { fail: false },
        ImageFailurePolicy::Degrade,
    );

    // Two sightings of "A", one "B": exactly two candidates survive.
    let batch = vec![topic("A"), topic("A"), topic("B")];
    let summary = pipeline.run(&batch).await.unwrap();

    assert_eq!(summary.reports.len(), 2);
    assert_eq!(summary.persisted(), 2);
    assert_eq!(fixture.narrative_count(), 2);

    for report in &summary.reports {
        match &report.outcome {
            TopicOutcome::Persisted { image_id, .. } => assert!(image_id.is_some()),
            other => panic!("expected persisted, got {:?}", other),
        }
    }
}

#[tokio::test]
async fn test_rerun_on_same_batch_adds_nothing() {
    let fixture = Fixture::new();
    let pipeline = fixture.pipeline(
        ScriptedGenerator::happy(),
        ScriptedRenderer { fail: false },
        ImageFailurePolicy::Degrade,
    );

    let batch = vec![topic("A"), topic("B")];
    pipeline.run(&batch).await.unwrap();
    assert_eq!(fixture.narrative_count(), 2);

    // Second pass over the stored batch: everything is already narrated.
    let summary = pipeline.run(&[]).await.unwrap();
    assert_eq!(summary.persisted(), 0);
    assert_eq!(summary.skipped(), 2);
    assert_eq!(fixture.narrative_count(), 2);
}

#[tokio::test]
async fn test_story_failure_is_isolated_to_its_topic() {
    let fixture = Fixture::new();
    let pipeline = fixture.pipeline(
        ScriptedGenerator::failing_story_for("A"),
        ScriptedRenderer { fail: false },
        ImageFailurePolicy::Degrade,
    );

    let summary = pipeline.run(&[topic("A"), topic("B")]).await.unwrap();

    assert_eq!(summary.failed(), 1);
    assert_eq!(summary.persisted(), 1);
    // The failed topic wrote no rows.
    assert_eq!(fixture.narrative_count(), 1);

    let failed = summary.reports.iter().find(|r| r.query == "A").unwrap();
    assert_eq!(failed.outcome, TopicOutcome::StoryFailed);
}

#[tokio::test]
async fn test_topic_without_fields_is_skipped_not_failed() {
    let fixture = Fixture::new();
    let pipeline = fixture.pipeline(
        ScriptedGenerator::happy(),
        ScriptedRenderer { fail: false },
        ImageFailurePolicy::Degrade,
    );

    let empty = TrendingTopic {
        query: String::new(),
        ..Default::default()
    };
    let summary = pipeline.run(&[empty]).await.unwrap();

    assert_eq!(summary.reports.len(), 1);
    assert_eq!(summary.reports[0].outcome, TopicOutcome::SkippedNoPrompt);
    assert_eq!(fixture.narrative_count(), 0);
}

#[tokio::test]
async fn test_render_failure_degrades_to_imageless_story() {
    let fixture = Fixture::new();
    let pipeline = fixture.pipeline(
        ScriptedGenerator::happy(),
        ScriptedRenderer { fail: true },
        ImageFailurePolicy::Degrade,
    );

    let summary = pipeline.run(&[topic("A")]).await.unwrap();

    assert_eq!(summary.persisted(), 1);
    match &summary.reports[0].outcome {
        TopicOutcome::Persisted { image_id, .. } => assert!(image_id.is_none()),
        other => panic!("expected persisted, got {:?}", other),
    }
}

#[tokio::test]
async fn test_image_prompt_failure_degrades_too() {
    let fixture = Fixture::new();
    let pipeline = fixture.pipeline(
        ScriptedGenerator::failing_image_prompts(),
        ScriptedRenderer { fail: false },
        ImageFailurePolicy::Degrade,
    );

    let summary = pipeline.run(&[topic("A")]).await.unwrap();

    assert_eq!(summary.persisted(), 1);
    match &summary.reports[0].outcome {
        TopicOutcome::Persisted { image_id, .. } => assert!(image_id.is_none()),
        other => panic!("expected persisted, got {:?}", other),
    }
}

#[tokio::test]
async fn test_render_failure_aborts_under_abort_policy() {
    let fixture = Fixture::new();
    let pipeline = fixture.pipeline(
        ScriptedGenerator::happy(),
        ScriptedRenderer { fail: true },
        ImageFailurePolicy::Abort,
    );

    let result = pipeline.run(&[topic("A")]).await;
    assert!(result.is_err());
    assert_eq!(fixture.narrative_count(), 0);
}
