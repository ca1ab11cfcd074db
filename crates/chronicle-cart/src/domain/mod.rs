//! Domain model for the shopping cart context.

pub mod aggregates;
pub mod commands;
pub mod events;
