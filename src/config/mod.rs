pub mod schema;

pub use schema::{Config, ContentConfig, StorageConfig, WritebackConfig};
