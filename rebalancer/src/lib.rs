//! fireplan-rebalancer: rebalancing planner on top of the fireplan engine.
//!
//! Loads a positions/targets snapshot through a repository, runs the
//! allocation engine, checks the targets for sanity, reports class drift
//! and keeps an audit trail of every run.

pub mod audit;
pub mod checks;
pub mod config;
pub mod drift;
pub mod error;
pub mod plan;
pub mod report;
pub mod snapshot;
