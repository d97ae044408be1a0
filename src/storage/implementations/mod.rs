pub mod memory_storage;
pub use memory_storage::MemoryStorage;
pub use super::sqlite_storage::SqliteStorage;
