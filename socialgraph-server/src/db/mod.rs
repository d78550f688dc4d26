//! Database layer - connection pool, migrations and stores
//!
//! # Design Principles
//!
//! - Connection pool (max 5 connections by default)
//! - Rely on DB constraints, handle conflicts - no check-then-insert
//! - Transactions for multi-step operations
//! - One `SocialStore` trait in front of Postgres and the in-memory store

pub mod memory;
pub mod migrations;
pub mod pool;
pub mod repos;
pub mod store;

pub use memory::MemoryStore;
pub use pool::{create_pool, create_pool_with_options};
pub use store::{PgStore, SocialStore, StoreError};
