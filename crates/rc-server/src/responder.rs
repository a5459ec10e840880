//! Response emission for planned byte spans.
//!
//! The body is a producer that reads the asset in fixed increments and hands
//! each chunk to hyper. The producer owns the storage handle, so when hyper
//! drops the body (client gone, connection error) the file is closed and no
//! further reads happen.

use std::io;

use axum::body::Body;
use axum::http::{header, StatusCode};
use axum::response::Response;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use tokio_util::io::ReaderStream;

use rc_core::{ChunkPlan, MediaReader, VideoAsset, VideoId};

/// Builds 200/206 responses whose bodies stream from storage.
#[derive(Debug, Clone, Copy)]
pub struct StreamResponder {
    read_buffer: usize,
}

impl StreamResponder {
    /// `read_buffer` is the size of each read from storage.
    pub fn new(read_buffer: usize) -> Self {
        Self {
            read_buffer: read_buffer.max(1),
        }
    }

    /// Emit headers for `plan` and a body streaming `reader`, which must be
    /// positioned at `plan.start()` and limited to `plan.length()` bytes.
    pub fn respond(
        &self,
        asset: &VideoAsset,
        plan: &ChunkPlan,
        reader: MediaReader,
    ) -> rc_core::Result<Response> {
        let body = Body::from_stream(exact_length_body(
            asset.id().clone(),
            plan.length(),
            reader,
            self.read_buffer,
        ));

        let builder = Response::builder()
            .header(header::CONTENT_TYPE, asset.content_type())
            .header(header::CONTENT_LENGTH, plan.length())
            .header(header::ACCEPT_RANGES, "bytes");

        let builder = if plan.is_partial() {
            builder
                .status(StatusCode::PARTIAL_CONTENT)
                .header(header::CONTENT_RANGE, plan.content_range())
        } else {
            builder.status(StatusCode::OK)
        };

        builder
            .body(body)
            .map_err(|e| rc_core::Error::Internal(format!("failed to build response: {e}")))
    }
}

impl Default for StreamResponder {
    fn default() -> Self {
        Self::new(64 * 1024)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Streaming,
    Completed,
    Failed,
}

/// Tracks one body transfer and logs how it ended.
///
/// Dropped while still `Streaming` means the consumer went away mid-body.
struct TransferGuard {
    video: VideoId,
    expected: u64,
    sent: u64,
    outcome: Outcome,
}

impl TransferGuard {
    fn new(video: VideoId, expected: u64) -> Self {
        Self {
            video,
            expected,
            sent: 0,
            outcome: Outcome::Streaming,
        }
    }

    fn complete(&mut self) {
        self.outcome = Outcome::Completed;
        tracing::debug!(video = %self.video, bytes = self.sent, "Transfer completed");
    }

    /// Record a failed read and return the error that ends the body.
    fn fail(&mut self, source: io::Error) -> io::Error {
        self.outcome = Outcome::Failed;
        let kind = source.kind();
        let err = rc_core::Error::stream_io(source);
        tracing::warn!(
            video = %self.video,
            sent = self.sent,
            expected = self.expected,
            error = %err,
            "Transfer failed; aborting connection"
        );
        io::Error::new(kind, err)
    }
}

impl Drop for TransferGuard {
    fn drop(&mut self) {
        if self.outcome == Outcome::Streaming {
            tracing::info!(
                video = %self.video,
                sent = self.sent,
                expected = self.expected,
                "Transfer aborted by client"
            );
        }
    }
}

/// Stream exactly `expected` bytes from `reader` in `capacity`-sized reads.
///
/// Ending early yields an error instead of a clean end-of-stream, so hyper
/// closes the connection rather than leaving the client waiting for bytes
/// promised by `Content-Length`.
fn exact_length_body(
    video: VideoId,
    expected: u64,
    reader: MediaReader,
    capacity: usize,
) -> impl Stream<Item = io::Result<Bytes>> + Send + 'static {
    async_stream::stream! {
        let mut guard = TransferGuard::new(video, expected);
        let mut chunks = ReaderStream::with_capacity(reader, capacity);

        while let Some(next) = chunks.next().await {
            match next {
                Ok(chunk) => {
                    guard.sent += chunk.len() as u64;
                    yield Ok(chunk);
                }
                Err(e) => {
                    yield Err(guard.fail(e));
                    return;
                }
            }
        }

        if guard.sent < expected {
            let e = io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("storage ended after {} of {} bytes", guard.sent, expected),
            );
            yield Err(guard.fail(e));
            return;
        }

        guard.complete();
    }
}
