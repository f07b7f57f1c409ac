//! Handycraft store server library.
//!
//! The HTTP API, JSON-file persistence and domain services live here so the
//! binary, the CLI and the integration tests all drive the same code.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
