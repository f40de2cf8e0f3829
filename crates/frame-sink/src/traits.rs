//! FrameSink trait definition.

use anyhow::Result;
use frame_types::Frame;

/// Trait for forwarding frames to the visualization front end.
///
/// Implementations accept one frame per call. A returned error means the
/// front end is gone or broken; callers treat it as fatal to the stream.
#[async_trait::async_trait]
pub trait FrameSink: Send + Sync {
    /// Deliver a single frame.
    async fn send_frame(&self, frame: &Frame) -> Result<()>;
}
