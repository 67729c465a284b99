//! # planpal-db
//!
//! Database layer implementing the store and lookup traits with PostgreSQL
//! via SQLx.
//!
//! ## Overview
//!
//! This crate provides PostgreSQL implementations for the ports defined in
//! `planpal-core`. It handles:
//!
//! - Connection pool management
//! - Database models with SQLx `FromRow` derives
//! - Entity ↔ Model mappers
//! - The message store, membership gate and event directory
//!
//! ## Usage
//!
//! ```rust,ignore
//! use planpal_db::pool::{create_pool, DatabaseConfig};
//! use planpal_db::repositories::PgMessageRepository;
//! use planpal_core::MessageRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env();
//!     let pool = create_pool(&config).await?;
//!     let messages = PgMessageRepository::new(pool);
//!
//!     // Use the store...
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, create_pool_from_env, DatabaseConfig, PgPool};
pub use repositories::{PgEventDirectory, PgMembershipGate, PgMessageRepository};
