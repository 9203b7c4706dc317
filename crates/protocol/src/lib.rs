//! Wire types for the hubwire streaming protocol.
//!
//! This crate contains the serde-serializable shapes exchanged with the server
//! while a transport starts up. They represent the "protocol layer" only: the
//! shapes of data as they appear on the wire.
//!
//! # Design Philosophy
//!
//! Types in this crate are:
//! - **Pure data**: No behavior beyond serialization/deserialization
//! - **Stable**: Changes only when the wire protocol changes
//!
//! The handshake logic that consumes these types lives in `hubwire-runtime`.

pub mod start;
pub mod transport;

pub use start::*;
pub use transport::*;
