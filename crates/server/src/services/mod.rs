//! Business logic services for the point-of-sale backend.
//!
//! # Services
//!
//! - `auth` - Member registration and password login
//! - `orders` - Order request validation and placement
//! - `seed` - Reference data and demo order generation

pub mod auth;
pub mod orders;
pub mod seed;
