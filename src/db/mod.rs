//! Database module
//!
//! Handles SQLite connection and migrations.

pub mod connection;
pub mod migrations;

pub use connection::{Database, DbError, DbResult};

/// Open an in-memory database with the schema applied
pub fn open_in_memory() -> DbResult<Database> {
    let database = Database::in_memory()?;
    database.with_conn(migrations::run_migrations)?;
    Ok(database)
}
