//! Data structures for the game world
//!
//! Crises, their solutions and Plan B chains, plus the catalog they are
//! loaded into.

pub mod catalog;
pub mod crisis;

pub use catalog::{CatalogError, CrisisCatalog, BUILTIN_CATALOG, DEFAULT_MAX_PLAN_B_DEPTH};
pub use crisis::{Crisis, Outcome, PlanBChain, Solution};
