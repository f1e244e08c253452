//! Core types and trait definitions for the Kokuhito case tracker.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod case;
pub mod directory;
pub mod error;
pub mod link;
pub mod person;
pub mod session;
pub mod stats;
pub mod store;
pub mod view;

pub use error::{Error, Result};
