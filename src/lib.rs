//! Storefront API — margin simulation and lead capture backend
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod simulator;
pub mod leads;
pub mod listing;
pub mod server;
