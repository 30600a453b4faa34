//! Step definitions for task client BDD scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
