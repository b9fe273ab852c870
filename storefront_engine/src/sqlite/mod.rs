//! SQLite database module for the storefront event pipeline.

mod sqlite_impl;

pub mod db;
pub use sqlite_impl::SqliteDatabase;
