//! Core types and trait definitions for the Hifz memorization tracker.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod error;
pub mod progress;
pub mod quran;
pub mod roster;
pub mod store;

pub use error::{Error, Result};
