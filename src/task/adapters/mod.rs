//! Adapter implementations for task tracking ports.

pub mod http;
pub mod local;
