//! Chronicle Core — shared event sourcing abstractions.
//!
//! This crate defines the fundamental types and traits that the event store
//! engine and all domain crates depend on. It contains no storage code.

pub mod aggregate;
pub mod clock;
pub mod command;
pub mod error;
pub mod event;
pub mod store;
