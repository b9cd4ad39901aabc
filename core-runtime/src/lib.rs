//! # Core Runtime Module
//!
//! Foundational runtime infrastructure for the fitness sync core:
//! - Logging and tracing infrastructure
//! - Configuration and dependency injection
//! - Event bus system
//!
//! ## Overview
//!
//! The sync engine is built from a [`CoreConfig`](config::CoreConfig) holding
//! the host's bridge implementations, logs through `tracing` as configured by
//! [`logging`], and publishes progress on an [`EventBus`](events::EventBus).

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use error::{Error, Result};
