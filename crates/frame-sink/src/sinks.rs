//! Built-in sink implementations.

use crate::traits::FrameSink;
use anyhow::{anyhow, Context, Result};
use frame_types::Frame;
use std::io::Write;
use std::sync::Mutex;

/// Writes each frame as one line of JSON.
///
/// Used by the CLI to put frames on stdout, and handy for piping into
/// anything that speaks NDJSON.
pub struct JsonlSink<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonlSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }
}

impl JsonlSink<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

#[async_trait::async_trait]
impl<W: Write + Send> FrameSink for JsonlSink<W> {
    async fn send_frame(&self, frame: &Frame) -> Result<()> {
        let line = serde_json::to_string(&frame.to_json()).context("failed to encode frame")?;
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| anyhow!("frame writer poisoned"))?;
        writeln!(writer, "{line}").context("failed to write frame")?;
        Ok(())
    }
}

/// Accumulates frames in memory.
///
/// For tests and demos; `frames()` hands back a snapshot of everything
/// delivered so far.
#[derive(Default)]
pub struct MemorySink {
    frames: Mutex<Vec<Frame>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> Vec<Frame> {
        match self.frames.lock() {
            Ok(frames) => frames.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.frames().len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames().is_empty()
    }
}

#[async_trait::async_trait]
impl FrameSink for MemorySink {
    async fn send_frame(&self, frame: &Frame) -> Result<()> {
        let mut frames = self
            .frames
            .lock()
            .map_err(|_| anyhow!("frame store poisoned"))?;
        frames.push(frame.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use frame_types::{FieldValue, FlatField};

    fn sample_frame() -> Frame {
        let event_time = DateTime::from_timestamp_millis(1_700_000_000_000).unwrap();
        let mut frame = Frame::new(event_time, 0, 5);
        frame.push_field(FlatField::new("count", FieldValue::Int(9)));
        frame
    }

    #[tokio::test]
    async fn test_jsonl_sink_writes_one_line_per_frame() {
        let sink = JsonlSink::new(Vec::new());
        sink.send_frame(&sample_frame()).await.unwrap();
        sink.send_frame(&sample_frame()).await.unwrap();

        let written = sink.writer.into_inner().unwrap();
        let text = String::from_utf8(written).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);

        let decoded: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(decoded["_offset"], 5);
        assert_eq!(decoded["count"], 9);
    }

    #[tokio::test]
    async fn test_memory_sink_accumulates() {
        let sink = MemorySink::new();
        assert!(sink.is_empty());

        sink.send_frame(&sample_frame()).await.unwrap();
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.frames()[0].offset, 5);
    }
}
