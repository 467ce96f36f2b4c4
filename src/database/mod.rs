mod marketplace_store;
mod memory_store;

pub use marketplace_store::{MarketplaceStore, StoreError};
pub use memory_store::InMemoryStore;
