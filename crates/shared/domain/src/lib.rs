//! # Domain Models
//!
//! This crate contains pure domain types with minimal dependencies (`serde`, `bitflags`).
//! Keep it lean: no I/O, no hydration, no normalization. Just the flag vocabulary
//! and the configuration shape shared by every other crate.

pub mod config;
pub mod constants;
pub mod flags;
