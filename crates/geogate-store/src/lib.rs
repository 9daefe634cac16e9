//! GeoGate Store - In-memory collaborator adapters
//!
//! This crate provides in-memory implementations of every port in
//! `geogate_core::ports`, for development and testing.

pub mod memory;

pub use memory::{
    AttendanceCall, FixedPositionSource, MemoryAttendanceBackend, MemoryTaskBackend,
    StaticRadiusSource, StaticTargetDirectory,
};
