//! Copies stored content into an outbound response body, framed by the
//! item-display preface and trailer.

use crate::render;
use crate::store::ByteStream;
use bytes::Bytes;
use futures::StreamExt;
use tokio::sync::mpsc;

/// Channel endpoint the relay writes response chunks into. The receiving half
/// backs the HTTP response body, so a dropped receiver means the client is
/// gone.
pub type RelaySink = mpsc::Sender<std::io::Result<Bytes>>;

/// Stream `source` into `sink` as a complete item-display document.
///
/// Writes the preface fragment, then every source chunk in order, then the
/// trailer; the sink closes when the sender drops. Chunks are forwarded as
/// they arrive, so the first response bytes go out before the source has
/// been fully read and memory use stays bounded regardless of item size.
///
/// A failed sink write is terminal: the source is released immediately
/// instead of being drained into a closed channel. Source read errors are
/// forwarded to the sink and end the stream. Neither is retried; the
/// response has already started, so failures are only logged.
///
/// Runs as a spawned task, deliberately not awaited by the request path.
pub async fn relay(mut source: ByteStream, sink: RelaySink) {
    if sink
        .send(Ok(Bytes::from_static(render::ITEM_PREFACE.as_bytes())))
        .await
        .is_err()
    {
        tracing::debug!("client disconnected before the preface was written");
        return;
    }

    while let Some(chunk) = source.next().await {
        match chunk {
            Ok(chunk) => {
                if sink.send(Ok(chunk)).await.is_err() {
                    tracing::debug!("client disconnected mid-stream; releasing source");
                    return;
                }
            }
            Err(err) => {
                tracing::warn!("store read failed mid-stream: {}", err);
                let _ = sink.send(Err(err)).await;
                return;
            }
        }
    }

    if sink
        .send(Ok(Bytes::from_static(render::ITEM_TRAILER.as_bytes())))
        .await
        .is_err()
    {
        tracing::debug!("client disconnected before the trailer was written");
    }
}
