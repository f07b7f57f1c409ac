//! Core types for Handycraft.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod inventory;
pub mod price;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use inventory::{DEFAULT_VARIANT, Inventory};
pub use price::Price;
pub use status::*;
