//! Tasx: a small task tracker client.
//!
//! This crate lists, creates, advances, and deletes task records against a
//! four-endpoint task API or a local stand-in store, and keeps the cached
//! list a front-end renders.
//!
//! # Architecture
//!
//! Tasx follows hexagonal architecture principles:
//!
//! - **Domain**: Task records and the status lifecycle, free of I/O
//! - **Ports**: Abstract trait interfaces for task storage
//! - **Adapters**: The HTTP client and the local store
//!
//! # Modules
//!
//! - [`task`]: Task domain, store port, adapters, and services
//! - [`config`]: Startup configuration and backend selection

pub mod config;
pub mod task;
