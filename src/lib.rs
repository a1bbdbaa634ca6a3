//! Flight Search CLI Library
//!
//! Round-trip flight search: trip validation, cache key derivation, a
//! persistent result cache, the offer provider client, and the orchestrator
//! that ties them together.

pub mod cache;
pub mod catalog;
pub mod cli;
pub mod client;
pub mod key;
pub mod offers;
pub mod orchestrator;
pub mod query;
pub mod render;
