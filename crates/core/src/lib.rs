//! Handycraft Core - Shared domain types.
//!
//! This crate provides the types used across all Handycraft components:
//! - `server` - JSON API, admin console API and static site
//! - `cli` - Command-line tools for data maintenance
//!
//! # Architecture
//!
//! The core crate contains only types and pure domain logic - no file I/O,
//! no HTTP. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, emails, statuses and inventory

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
