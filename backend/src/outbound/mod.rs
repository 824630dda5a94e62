//! Outbound adapters implementing the driven ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel
//! - **memory**: a lock-guarded in-memory store for development and tests
//! - **security**: Argon2 password hashing
//!
//! Adapters translate between domain types and infrastructure
//! representations and hold no business rules.

pub mod memory;
pub mod persistence;
pub mod security;
