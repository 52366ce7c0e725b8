pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod repository;

pub use manager::{ConnectSettings, DatabaseError, DatabaseManager};
pub use memory::MemoryTabStore;
pub use postgres::PgTabStore;
pub use repository::{RepositoryError, TabRepository, TabStore};
