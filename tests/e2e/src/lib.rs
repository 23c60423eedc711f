//! End-to-end test support for Lexicon
//!
//! - [`harness`]: isolated databases and a steerable clock
//! - [`mocks`]: vocabulary fixtures and pre-built scenarios

pub mod harness;
pub mod mocks;
