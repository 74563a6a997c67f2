//! Live notification stream (SSE ticker).

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::Extension,
    response::sse::{Event as SseEvent, KeepAlive, Sse},
    routing::get,
    Router,
};
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_stream::StreamExt;

use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().route("/api/notifications/stream", get(stream))
}

/// GET /api/notifications/stream
///
/// Persistent SSE connection: an initial comment line, a replay of the most
/// recent history (oldest first), then live `tick` events as they are
/// published. Keepalive comments go out every 15 seconds so intermediaries
/// don't cut the connection.
pub async fn stream(
    Extension(services): Extension<Arc<AppServices>>,
) -> Sse<impl tokio_stream::Stream<Item = Result<SseEvent, Infallible>>> {
    let subscription = services.bus.subscribe().await;
    let (rx, guard) = subscription.into_parts();

    let ticks = UnboundedReceiverStream::new(rx).map(|message| {
        SseEvent::default()
            .event("tick")
            .data(serde_json::json!({ "message": message }).to_string())
    });

    // The guard rides inside the map closure: when the client goes away and
    // the stream is dropped, the subscriber leaves the registry with it.
    let stream = tokio_stream::once(SseEvent::default().comment("ok"))
        .chain(ticks)
        .map(move |event| {
            let _keep_registered = &guard;
            Ok(event)
        });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("hb"),
    )
}
