//! Tabular frame model for kafka-frames.
//!
//! This crate defines the record types the rest of the workspace exchanges:
//! - `FieldValue` / `FlatField`: one scalar output column with a dotted key path
//! - `Frame`: a single tabular record with fixed system fields followed by
//!   the flattened payload fields
//! - `flatten_json`: deterministic flattening of nested JSON payloads
//!
//! It deliberately has no broker or sink dependencies so both sides of the
//! pipeline can share it.

pub mod flatten;
pub mod record;

pub use flatten::flatten_json;
pub use record::{FieldValue, FlatField, Frame};
