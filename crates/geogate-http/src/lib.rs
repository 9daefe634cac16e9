//! GeoGate HTTP - REST adapters for the facility API
//!
//! Implements the target directory, radius settings, attendance and task
//! ports over HTTP. Response bodies are normalized by [`parse`] before they
//! reach the rest of the system.

pub mod client;
pub mod parse;

pub use client::HttpBackend;
