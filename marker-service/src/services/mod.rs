pub mod database;
pub mod memory;
pub mod store;

pub use database::{MongoDb, MongoMarkerStore};
pub use memory::InMemoryMarkerStore;
pub use store::{MarkerStore, StoreError};
