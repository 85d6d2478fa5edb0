//! unified-agents: one HTTP API for creating voice agents on Vapi and Retell
//!
//! A standardized agent-creation request is validated, routed to the adapter
//! for the requested platform, translated into that vendor's wire format, and
//! the vendor's answer is normalized back into a single response shape.

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::too_many_lines)]

pub mod agents;
pub mod cli;
pub mod config;
pub mod error;
pub mod server;
pub mod services;

// Re-exports for convenience
pub use error::{GatewayError, Result};
