//! Pure policy evaluation (no IO).
//!
//! Input: a policy record plus the schema registry and rule catalog loaded elsewhere.
//! Output: an ALLOWED/DENIED decision or a typed evaluation error.

#![forbid(unsafe_code)]

pub mod binder;
pub mod error;
pub mod formula;
pub mod rules;
pub mod schema;
pub mod solver;
pub mod store;

mod engine;

#[cfg(test)]
mod proptest;
#[cfg(test)]
mod test_support;

pub use binder::{bind, Binding, Environment};
pub use engine::{Engine, Strategy};
pub use error::EvalError;
pub use rules::{verify_catalog, Rule, RuleCatalog};
pub use schema::{PolicySchema, SchemaRegistry};
pub use store::{InMemoryRepository, PolicyRepository, StoreError};
