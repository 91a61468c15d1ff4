//! gymplan - Multi-week gym plan tracker
//!
//! Plans are week 1 targets plus per-week increments; the engine projects
//! them to any week and sizes the volume charts.

pub mod engine;
pub mod models;
pub mod store;
pub mod tui;

pub use store::Snapshot;
