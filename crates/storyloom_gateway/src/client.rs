//! WebSocket client for the generation service.

use crate::protocol::{RequestEnvelope, ServerMessage};
use crate::retry::RetrySchedule;
use futures_util::{SinkExt, StreamExt};
use std::sync::atomic::{AtomicU32, Ordering};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tokio_retry2::{Retry, RetryError};
use storyloom_core::{GenerationConfig, RetryConfig, StoryRequest, StoryResponse};
use storyloom_error::{GatewayError, GatewayErrorKind, StoryloomResult};
use tracing::{debug, info, instrument, trace, warn};

/// Client for the generation service.
///
/// Stateless between calls; every attempt opens its own connection so that a
/// half-dead socket from a failed attempt can never poison the next one.
pub struct GatewayClient {
    endpoint: String,
    schedule: RetrySchedule,
}

impl GatewayClient {
    /// Create a client from generation and retry configuration.
    pub fn new(config: &GenerationConfig, retry: &RetryConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            schedule: RetrySchedule::from_config(retry),
        }
    }

    /// One attempt: connect, send the request, drain the stream until a
    /// result frame or close.
    #[instrument(skip(self, request))]
    async fn call_once(&self, request: &StoryRequest) -> Result<StoryResponse, GatewayError> {
        let (mut ws_stream, _) = connect_async(&self.endpoint)
            .await
            .map_err(|e| GatewayError::new(GatewayErrorKind::Connect(e.to_string())))?;

        debug!(endpoint = %self.endpoint, "Connected to generation service");

        let json = serde_json::to_string(&RequestEnvelope::new(request))
            .map_err(|e| GatewayError::new(GatewayErrorKind::Send(e.to_string())))?;

        ws_stream
            .send(Message::Text(json.into()))
            .await
            .map_err(|e| GatewayError::new(GatewayErrorKind::Send(e.to_string())))?;

        while let Some(frame) = ws_stream.next().await {
            let frame =
                frame.map_err(|e| GatewayError::new(GatewayErrorKind::Receive(e.to_string())))?;

            let text = match frame {
                Message::Text(text) => text,
                Message::Close(_) => break,
                _ => continue,
            };

            let message: ServerMessage = serde_json::from_str(&text)
                .map_err(|e| GatewayError::new(GatewayErrorKind::Protocol(e.to_string())))?;

            match message {
                ServerMessage::Progress { message } => {
                    trace!(message = ?message, "Progress frame");
                }
                ServerMessage::Result { data } => {
                    if let Some(ok) = data.ok {
                        return Ok(StoryResponse {
                            content: ok.content,
                        });
                    }
                    let detail = data
                        .err
                        .map(|v| v.to_string())
                        .unwrap_or_else(|| "unspecified".to_string());
                    return Err(GatewayError::new(GatewayErrorKind::Refused(detail)));
                }
                ServerMessage::Unknown => {
                    trace!("Ignoring unrecognized frame");
                }
            }
        }

        // The stream ended without a result frame. The service answered
        // with silence, which is terminal, not worth retrying.
        Err(GatewayError::new(GatewayErrorKind::NoContent))
    }

    /// Call the service, retrying transient failures on the tiered schedule.
    ///
    /// # Errors
    ///
    /// `Exhausted` once every attempt failed with a transient error;
    /// `NoContent` or `Refused` immediately when the service answers
    /// without content.
    #[instrument(skip(self, request), fields(model = %request.model))]
    pub async fn call_with_retry(&self, request: &StoryRequest) -> StoryloomResult<StoryResponse> {
        let counter = AtomicU32::new(0);

        let outcome = Retry::spawn(self.schedule.delays(), || {
            let attempt = counter.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                match self.call_once(request).await {
                    Ok(response) => {
                        info!(attempt, "Generation call succeeded");
                        Ok(response)
                    }
                    Err(e) if e.kind.is_retryable() => {
                        warn!(attempt, error = %e, "Transient generation failure");
                        Err(RetryError::Transient {
                            err: e,
                            retry_after: None,
                        })
                    }
                    Err(e) => {
                        warn!(attempt, error = %e, "Terminal generation failure");
                        Err(RetryError::Permanent(e))
                    }
                }
            }
        })
        .await;

        match outcome {
            Ok(response) => Ok(response),
            // A retryable error surfacing here means the schedule ran dry.
            Err(e) if e.kind.is_retryable() => {
                let attempts = counter.load(Ordering::SeqCst);
                warn!(attempts, last_error = %e, "Generation retries exhausted");
                Err(GatewayError::new(GatewayErrorKind::Exhausted { attempts }).into())
            }
            Err(e) => Err(e.into()),
        }
    }
}
