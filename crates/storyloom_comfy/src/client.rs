//! Client for the render server.

use crate::filename::sanitize_filename;
use crate::renderer::{ImageRenderer, RenderedImage};
use crate::workflow;
use async_trait::async_trait;
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use storyloom_core::{Clock, ImageConfig};
use storyloom_error::{ImageError, ImageErrorKind, StoryloomResult};
use tracing::{debug, info, instrument};
use uuid::Uuid;

#[derive(Debug, Serialize)]
struct QueueRequest<'a> {
    prompt: &'a Value,
    client_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct QueueResponse {
    prompt_id: String,
}

#[derive(Debug, Deserialize)]
struct StreamEvent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Option<EventData>,
}

#[derive(Debug, Default, Deserialize)]
struct EventData {
    #[serde(default)]
    node: Option<Value>,
    #[serde(default)]
    prompt_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct HistoryEntry {
    #[serde(default)]
    outputs: HashMap<String, NodeOutput>,
}

#[derive(Debug, Default, Deserialize)]
struct NodeOutput {
    #[serde(default)]
    images: Vec<ImageRef>,
}

#[derive(Debug, Deserialize)]
struct ImageRef {
    filename: String,
    #[serde(default)]
    subfolder: String,
    #[serde(rename = "type", default)]
    folder_type: String,
}

/// Client for the render server.
///
/// One session id per process; jobs are submitted over HTTP against that id
/// and their completion observed on the companion event stream.
pub struct ImageClient {
    http: reqwest::Client,
    server_address: String,
    client_id: String,
    workflow_path: PathBuf,
    output_dir: PathBuf,
    render_timeout: Duration,
    prompt_node: String,
    seed_node: String,
    filename_node: String,
    clock: Clock,
}

impl ImageClient {
    /// Create a client from image configuration.
    pub fn new(config: &ImageConfig, clock: Clock) -> Self {
        Self {
            http: reqwest::Client::new(),
            server_address: config.server_address.clone(),
            client_id: Uuid::new_v4().to_string(),
            workflow_path: config.workflow_path.clone(),
            output_dir: config.output_dir.clone(),
            render_timeout: Duration::from_secs(config.render_timeout_secs),
            prompt_node: config.prompt_node.clone(),
            seed_node: config.seed_node.clone(),
            filename_node: config.filename_node.clone(),
            clock,
        }
    }

    async fn queue_job(&self, prepared: &Value) -> Result<String, ImageError> {
        let url = format!("http://{}/prompt", self.server_address);
        let response = self
            .http
            .post(&url)
            .json(&QueueRequest {
                prompt: prepared,
                client_id: &self.client_id,
            })
            .send()
            .await
            .map_err(|e| ImageError::new(ImageErrorKind::Submit(e.to_string())))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImageError::new(ImageErrorKind::Submit(format!(
                "status {}",
                status.as_u16()
            ))));
        }

        let queued: QueueResponse = response
            .json()
            .await
            .map_err(|e| ImageError::new(ImageErrorKind::Submit(e.to_string())))?;

        Ok(queued.prompt_id)
    }

    /// Drain the event stream until the job's terminal `executing` event,
    /// the one whose `node` is absent.
    async fn wait_for_completion(
        &self,
        ws_stream: &mut (impl futures_util::Stream<
            Item = Result<Message, tokio_tungstenite::tungstenite::Error>,
        > + Unpin),
        prompt_id: &str,
    ) -> Result<(), ImageError> {
        while let Some(frame) = ws_stream.next().await {
            let frame = frame
                .map_err(|e| ImageError::new(ImageErrorKind::EventStream(e.to_string())))?;

            let text = match frame {
                Message::Text(text) => text,
                // The server interleaves binary preview frames; skip them.
                _ => continue,
            };

            let Ok(event) = serde_json::from_str::<StreamEvent>(&text) else {
                continue;
            };

            if event.kind != "executing" {
                continue;
            }
            let Some(data) = event.data else { continue };
            if data.node.as_ref().is_none_or(Value::is_null)
                && data.prompt_id.as_deref() == Some(prompt_id)
            {
                debug!(prompt_id, "Render completed");
                return Ok(());
            }
        }

        Err(ImageError::new(ImageErrorKind::EventStream(
            "stream closed before completion".to_string(),
        )))
    }

    async fn first_output(&self, prompt_id: &str) -> Result<ImageRef, ImageError> {
        let url = format!("http://{}/history/{}", self.server_address, prompt_id);
        let mut history: HashMap<String, HistoryEntry> = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ImageError::new(ImageErrorKind::Fetch(e.to_string())))?
            .json()
            .await
            .map_err(|e| ImageError::new(ImageErrorKind::Fetch(e.to_string())))?;

        history
            .remove(prompt_id)
            .and_then(|entry| {
                entry
                    .outputs
                    .into_values()
                    .flat_map(|output| output.images)
                    .next()
            })
            .ok_or_else(|| ImageError::new(ImageErrorKind::NoOutput))
    }

    async fn fetch_bytes(&self, image: &ImageRef) -> Result<Vec<u8>, ImageError> {
        let url = format!("http://{}/view", self.server_address);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("filename", image.filename.as_str()),
                ("subfolder", image.subfolder.as_str()),
                ("type", image.folder_type.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ImageError::new(ImageErrorKind::Fetch(e.to_string())))?;

        response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| ImageError::new(ImageErrorKind::Fetch(e.to_string())))
    }

    async fn save_bytes(&self, file_name: &str, bytes: &[u8]) -> Result<String, ImageError> {
        let date_dir = self.clock.today_compact();
        let dir = self.output_dir.join(&date_dir);
        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            ImageError::new(ImageErrorKind::Save(format!("{}: {}", dir.display(), e)))
        })?;

        let path = dir.join(file_name);
        tokio::fs::write(&path, bytes).await.map_err(|e| {
            ImageError::new(ImageErrorKind::Save(format!("{}: {}", path.display(), e)))
        })?;

        info!(path = %path.display(), size = bytes.len(), "Saved rendered image");
        Ok(format!("{}/{}", date_dir, file_name))
    }
}

#[async_trait]
impl ImageRenderer for ImageClient {
    #[instrument(skip(self, prompt))]
    async fn render(&self, prompt: &str, query: &str) -> StoryloomResult<RenderedImage> {
        let template = workflow::load_template(&self.workflow_path)?;

        let sanitized = sanitize_filename(query);
        let base = if sanitized.is_empty() {
            "topic"
        } else {
            sanitized.as_str()
        };
        let filename_prefix = format!("{}_{}", base, self.clock.timestamp_compact());
        let seed = (Uuid::new_v4().as_u128() % 999_999_999_999_999) as u64;

        let prepared = workflow::prepare(
            template,
            &self.prompt_node,
            &self.seed_node,
            &self.filename_node,
            prompt,
            seed,
            &filename_prefix,
        )?;

        // Connect the event stream before queueing so the completion event
        // cannot slip past between submit and subscribe.
        let ws_url = format!("ws://{}/ws?clientId={}", self.server_address, self.client_id);
        let (mut ws_stream, _) = connect_async(&ws_url)
            .await
            .map_err(|e| ImageError::new(ImageErrorKind::EventStream(e.to_string())))?;

        let prompt_id = self.queue_job(&prepared).await?;
        debug!(prompt_id = %prompt_id, filename_prefix = %filename_prefix, "Queued render job");

        tokio::time::timeout(
            self.render_timeout,
            self.wait_for_completion(&mut ws_stream, &prompt_id),
        )
        .await
        .map_err(|_| {
            ImageError::new(ImageErrorKind::Timeout(self.render_timeout.as_secs()))
        })??;

        let image = self.first_output(&prompt_id).await?;
        let bytes = self.fetch_bytes(&image).await?;
        let file_name = self.save_bytes(&image.filename, &bytes).await?;

        Ok(RenderedImage { file_name })
    }
}
