//! Outbound frame delivery.
//!
//! `FrameSink` is the seam between the streaming pipeline and whatever
//! transports frames to the front end. Stream drivers take the trait
//! generically, so swapping the delivery mechanism never touches the
//! pipeline itself.

pub mod sinks;
pub mod traits;

pub use sinks::{JsonlSink, MemorySink};
pub use traits::FrameSink;
