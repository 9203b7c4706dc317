//! hubwire runtime - transport start handshake coordination
//!
//! This crate decides whether one attempt to start a streaming transport
//! succeeded, failed or timed out, and guarantees the outcome is reported
//! exactly once no matter which trigger fires first:
//!
//! - **Gate**: exactly-once admission shared by every trigger
//! - **Deadline**: cancelable single-shot connect timer
//! - **Signal**: bridge from the connection's disconnect token
//! - **Start**: the `start` request and its `{"Response":"started"}` check
//! - **Handshake**: the coordinator composing all of the above
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────┐
//! │       owning connection      │  retries, transport fallback
//! └──────────────┬───────────────┘
//!                │ ConnectionLike + HttpClient
//! ┌──────────────▼───────────────┐
//! │      HandshakeCoordinator    │
//! │  ┌──────────┐ ┌───────────┐  │
//! │  │ Deadline │ │  Signal   │  │  failure triggers
//! │  └────┬─────┘ └─────┬─────┘  │
//! │       └──► Gate ◄───┘ ◄── Start (success / rejection)
//! │              │               │
//! │        Outcome slot          │
//! └──────────────┬───────────────┘
//!                ▼
//!        HandshakeOutcome.await
//! ```
//!
//! The crate performs no network I/O itself; the owning connection supplies
//! an [`HttpClient`] for the start request.

pub mod config;
pub mod connection;
pub mod deadline;
pub mod error;
pub mod gate;
pub mod handshake;
pub mod signal;
pub mod start;
mod trigger;

// Re-export key types at crate root
pub use config::ConnectionConfig;
pub use connection::{ClientConnection, ConnectionLike, HttpClient, start_query};
pub use deadline::{DeadlineHandle, start_after};
pub use error::{Error, FailureCause, HandshakeError, Result};
pub use gate::ExactlyOnceGate;
pub use handshake::{FailureObserver, HandshakeBuilder, HandshakeCoordinator, HandshakeOutcome, Outcome};
pub use signal::{SignalSubscription, on_signal};
pub use start::request_start;
pub use tokio_util::sync::CancellationToken;
