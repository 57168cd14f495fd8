//! Streaming quest sessions.
//!
//! One session is one spawned task that runs the pipeline stage by stage and
//! pushes `QuestEvent`s into a bounded channel as results become available.
//!
//! ## Event order
//!
//! status, title, status, description, status, characters, status,
//! locations, status, items, status, one scene per scene, complete.
//!
//! ## Failure and cancellation
//!
//! Stage failures never reach this layer; the pipeline falls back. Anything
//! else that goes wrong inside the task (a panic in an adapter, for example)
//! replaces the rest of the stream with a single `error` event.
//!
//! When the receiver is dropped the session stops at the next await point:
//! an in-flight generation call is abandoned and no further stage starts.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures_util::FutureExt;
use tokio::sync::mpsc;
use tracing::Instrument;

use screate_domain::{QuestBrief, SessionId};
use screate_shared::QuestEvent;

use super::pipeline::QuestPipeline;

/// Events buffered between the session task and the HTTP response.
pub const EVENT_BUFFER: usize = 16;

pub const STATUS_STARTING: &str = "Starting quest generation...";
pub const STATUS_DESCRIPTION: &str = "Writing the story description...";
pub const STATUS_CHARACTERS: &str = "Creating characters...";
pub const STATUS_LOCATIONS: &str = "Creating locations...";
pub const STATUS_ITEMS: &str = "Creating items...";
pub const STATUS_SCENES: &str = "Creating scenes...";
pub const COMPLETE_MESSAGE: &str = "Quest created successfully!";

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("client disconnected")]
    Cancelled,
    #[error("{0}")]
    Panicked(String),
}

/// Starts streaming sessions over a shared pipeline.
pub struct QuestStreamer {
    pipeline: Arc<QuestPipeline>,
    pacing: Duration,
}

impl QuestStreamer {
    pub fn new(pipeline: Arc<QuestPipeline>, pacing: Duration) -> Self {
        Self { pipeline, pacing }
    }

    /// Spawn a session for `brief` and hand back its event stream.
    pub fn start(&self, brief: QuestBrief) -> mpsc::Receiver<QuestEvent> {
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        let session = Session {
            id: SessionId::new(),
            pipeline: Arc::clone(&self.pipeline),
            pacing: self.pacing,
            tx,
        };
        tokio::spawn(session.run(brief));
        rx
    }
}

struct Session {
    id: SessionId,
    pipeline: Arc<QuestPipeline>,
    pacing: Duration,
    tx: mpsc::Sender<QuestEvent>,
}

impl Session {
    async fn run(self, brief: QuestBrief) {
        let span = tracing::info_span!("quest_session", session_id = %self.id);

        async move {
            tracing::info!(
                setting = brief.setting(),
                scene_count = brief.scene_count(),
                "Quest session started"
            );

            let failure = match AssertUnwindSafe(self.produce(&brief)).catch_unwind().await {
                Ok(Ok(())) => {
                    tracing::info!("Quest session completed");
                    return;
                }
                Ok(Err(SessionError::Cancelled)) => {
                    tracing::info!("Client went away, quest session stopped");
                    return;
                }
                Ok(Err(other)) => other,
                Err(payload) => SessionError::Panicked(panic_message(payload.as_ref())),
            };

            tracing::error!(error = %failure, "Quest session failed");
            // The consumer may already be gone
            let _ = self
                .tx
                .send(QuestEvent::error(format!("Error: {failure}")))
                .await;
        }
        .instrument(span)
        .await
    }

    async fn produce(&self, brief: &QuestBrief) -> Result<(), SessionError> {
        let pipeline = &self.pipeline;

        self.emit(QuestEvent::status(STATUS_STARTING)).await?;
        self.emit(QuestEvent::Title {
            content: brief.title(),
        })
        .await?;

        self.emit(QuestEvent::status(STATUS_DESCRIPTION)).await?;
        let description = self.until_cancelled(pipeline.description(brief)).await?;
        self.emit(QuestEvent::Description {
            content: description,
        })
        .await?;

        self.emit(QuestEvent::status(STATUS_CHARACTERS)).await?;
        let characters = self.until_cancelled(pipeline.characters(brief)).await?;
        self.emit(QuestEvent::Characters {
            content: characters.clone(),
        })
        .await?;

        self.emit(QuestEvent::status(STATUS_LOCATIONS)).await?;
        let locations = self.until_cancelled(pipeline.locations(brief)).await?;
        self.emit(QuestEvent::Locations {
            content: locations.clone(),
        })
        .await?;

        self.emit(QuestEvent::status(STATUS_ITEMS)).await?;
        let items = self.until_cancelled(pipeline.items(brief)).await?;
        self.emit(QuestEvent::Items {
            content: items.clone(),
        })
        .await?;

        self.emit(QuestEvent::status(STATUS_SCENES)).await?;
        let scenes = self
            .until_cancelled(pipeline.scenes(brief, &characters, &locations, &items))
            .await?;

        let total_scenes = scenes.len();
        for (index, scene) in scenes.into_iter().enumerate() {
            self.emit(QuestEvent::Scene {
                content: scene,
                scene_number: index + 1,
                total_scenes,
            })
            .await?;
        }

        self.send(QuestEvent::Complete {
            content: COMPLETE_MESSAGE.to_string(),
        })
        .await
    }

    /// Drive `work` unless the consumer disconnects first.
    async fn until_cancelled<T>(&self, work: impl Future<Output = T>) -> Result<T, SessionError> {
        tokio::select! {
            biased;
            _ = self.tx.closed() => Err(SessionError::Cancelled),
            value = work => Ok(value),
        }
    }

    /// Send, then wait out the pacing delay.
    async fn emit(&self, event: QuestEvent) -> Result<(), SessionError> {
        self.send(event).await?;
        if !self.pacing.is_zero() {
            self.until_cancelled(tokio::time::sleep(self.pacing)).await?;
        }
        Ok(())
    }

    async fn send(&self, event: QuestEvent) -> Result<(), SessionError> {
        tracing::debug!(kind = event.kind(), "Emitting quest event");
        self.tx
            .send(event)
            .await
            .map_err(|_| SessionError::Cancelled)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unexpected failure".to_string()
    }
}
