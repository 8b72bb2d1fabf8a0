//! API Routes
//!
//! Route handlers organized by functionality.

pub mod cookies;
pub mod health;
pub mod profiles;
