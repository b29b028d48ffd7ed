//! Domain models for LaunchLedger.
//!
//! # Core Concepts
//!
//! ## Launch Records
//!
//! - [`LaunchServiceProvider`]: An organization operating launch vehicles,
//!   owning a set of [`Rocket`]s.
//! - [`Rocket`]: A launch vehicle, back-referencing its manufacturer.
//! - [`Launch`]: One flight of a rocket: date, site, orbit, price, outcome.
//!
//! ## Accounts
//!
//! - [`User`]: An operator account, identified by email.
//!
//! Every model validates at construction and on every `with_*` update, so a
//! value that exists is fully valid. Records compare by natural key, never
//! by store-assigned id; grouping, deduplication, and upsert semantics all
//! rely on that.

mod launch;
mod provider;
mod rocket;
mod user;
mod validation;

pub use launch::*;
pub use provider::*;
pub use rocket::*;
pub use user::*;
pub use validation::*;
