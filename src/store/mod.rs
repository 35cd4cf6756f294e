pub mod documents;
pub mod pool_store;
pub mod settings_store;

pub use documents::{DocumentStore, MemoryDocuments};
pub use pool_store::{PoolStore, POOLS_KEY};
pub use settings_store::{SettingsStore, SETTINGS_KEY};
