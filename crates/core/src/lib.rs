//! Brewdesk Core - Shared types library.
//!
//! This crate provides the domain vocabulary used across the Brewdesk workspace:
//! - `server` - The point-of-sale HTTP backend
//! - `cli` - Command-line tools for migrations, seeding and reports
//!
//! # Architecture
//!
//! The core crate contains only types and parsing rules - no I/O, no database
//! access, no HTTP. With the `sqlite` feature enabled, typed IDs additionally
//! implement the `sqlx` encode/decode traits so they can be bound directly.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, money, emails, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
