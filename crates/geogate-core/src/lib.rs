//! GeoGate Core - Domain models, error taxonomy, and configuration
//!
//! This crate contains the value types shared by every geogate crate and the
//! port definitions for the external collaborators (position source, target
//! directory, radius settings, attendance and task backends).

pub mod config;
pub mod error;
pub mod models;
pub mod ports;

pub use error::{ConfigError, GeogateError, PositionError, Result};
