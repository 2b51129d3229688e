//! Storage backends.
//!
//! [`MemoryStore`] backs tests and dry runs; [`SqliteStore`] (behind the
//! `sqlite` feature) persists harvest state across runs.

mod memory;
#[cfg(feature = "sqlite")]
mod sqlite;

pub use memory::MemoryStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;
