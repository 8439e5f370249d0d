//! Library exports for pillbug, shared between the binary and tests.

pub mod client;
pub mod config;
pub mod models;
pub mod notify;
pub mod session;
pub mod startup;
pub mod state;
pub mod store;
pub mod utils;
