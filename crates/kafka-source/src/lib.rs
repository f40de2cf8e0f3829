//! Kafka consumer bridge for kafka-frames.
//!
//! This crate owns everything that talks to the broker:
//! - `BridgeConfig`: connection settings and their translation to client
//!   configuration (SASL mechanism selection, TLS policy, manual commits)
//! - `Client`: one consumer-group subscription with subscribe/read/close
//!   operations, bridging callback-driven delivery into a pull-based reader
//!   through a single-slot channel and a broadcast-once shutdown signal
//! - starting-offset seeding from a one-hour look-back window, best effort
//!
//! Payloads leave this crate as raw bytes; decoding and flattening happen
//! downstream so a malformed message never disturbs the subscription.

pub mod client;
pub mod config;
pub mod error;

mod handler;
mod seeder;

pub use client::{Client, Message};
pub use config::{BridgeConfig, AUTH_NONE, FALLBACK_IDENTITY};
pub use error::{Error, Result};
