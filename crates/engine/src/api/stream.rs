//! Server-Sent Events delivery of quest sessions.
//!
//! Each `QuestEvent` becomes one `data: {json}` frame. The request is
//! validated before the session starts, so a bad body gets a JSON 400 and
//! never a half-open stream.

use axum::{
    extract::{rejection::JsonRejection, State},
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures_util::Stream;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::mpsc;

use screate_shared::{QuestEvent, QuestRequest};

use super::http::ApiError;
use crate::app::App;

pub async fn generate_quest_stream(
    State(app): State<Arc<App>>,
    payload: Result<Json<QuestRequest>, JsonRejection>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let Json(request) = payload?;
    let brief = request.into_brief()?;

    let rx = app.quests.streamer.start(brief);
    Ok(Sse::new(event_stream(rx)).keep_alive(KeepAlive::default()))
}

/// Dropping the returned stream drops `rx`, which stops the session.
fn event_stream(
    mut rx: mpsc::Receiver<QuestEvent>,
) -> impl Stream<Item = Result<Event, Infallible>> {
    async_stream::stream! {
        while let Some(event) = rx.recv().await {
            match Event::default().json_data(&event) {
                Ok(frame) => yield Ok(frame),
                Err(e) => {
                    tracing::error!(error = %e, kind = event.kind(), "Failed to serialize quest event");
                    let error = QuestEvent::error(format!("Error: {e}"));
                    let data = serde_json::to_string(&error).unwrap_or_default();
                    yield Ok(Event::default().data(data));
                    break;
                }
            }
        }
    }
}
