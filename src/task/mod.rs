//! Task tracking for Tasx.
//!
//! Tasks are listed, created, advanced through their status lifecycle, and
//! deleted against either the remote task API or a local store. The module
//! follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
