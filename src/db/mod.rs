//! Database layer
//!
//! SQLite access for the Tribune platform:
//! - connection pool creation (`pool`)
//! - embedded code-based migrations (`migrations`)
//! - trait-based repositories (`repositories`)

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{create_pool, create_test_pool};
