//! Chronicle — shopping cart bounded context.
//!
//! Demonstrates the event-sourcing contracts over the Chronicle store:
//! command validation in [`domain::aggregates::CartAggregate`] and
//! read-side replay in [`application::query_handlers::CartItemsQuery`].

pub mod application;
pub mod domain;
