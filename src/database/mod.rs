pub mod connection;
pub mod matchdays;
pub mod matches;
pub mod players;
pub mod setup;
pub mod store;

pub use connection::{DbConn, DbPool, create_memory_pool, create_pool, get_connection};
pub use store::SqliteStore;
