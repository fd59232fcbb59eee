//! Mira Illustrative Decorators
//!
//! Decorators that consume the mirror layer's public contract:
//! - **Attribute markers**: `readonly`, `enumerable`, `nonconfigurable`
//! - **Method wrapping**: call logging via a [`CallLog`]
//! - **Accessor memoization**: per-instance getter caching
//! - **Metadata tagging**: record key/value metadata for a class
//! - **Service provision**: a [`ServiceRegistry`] with a `provide` class
//!   decorator (`services` module)
//!
//! Each function returns a closure compatible with
//! `mira_mirrors::Decoration`, so the decorators compose in an ordered
//! pipeline. Shared state (the call log, memoization tables, the service
//! table) lives in explicit objects handed to the decorator factory; there
//! are no process-wide tables.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod services;
pub mod standard;

pub use services::ServiceRegistry;
pub use standard::{enumerable, logged, memoized, nonconfigurable, readonly, tagged, CallLog};
