//! LaunchLedger: analytics over a historical record of rocket launches.
//!
//! The crate is organized as:
//!
//! - [`models`]: validated domain records (rockets, providers, launches,
//!   users).
//! - [`db`]: the [`db::Store`] gateway and its SQLite implementation.
//! - [`analytics`]: the ranking engine answering the six queries.
//! - [`api`]: the HTTP surface over store and engine.

pub mod analytics;
pub mod api;
pub mod db;
pub mod models;
