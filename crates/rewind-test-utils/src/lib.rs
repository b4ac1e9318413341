//! Test utilities and scripted timeline fixtures for Rewind development.
//!
//! [`ScriptBuilder`] assembles a [`Timeline`](rewind_core::Timeline)
//! directly from per-slice actions, bypassing the action builder, so that
//! playback and resolution can be tested in isolation. [`fixtures`] holds
//! the canonical scenarios shared by tests and benchmarks.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;
mod script;

pub use script::ScriptBuilder;
