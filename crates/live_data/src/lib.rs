// crates/live_data/src/lib.rs

pub mod bridge;
pub mod memory;
pub mod store;

pub use bridge::{LiveAnswer, LiveDataBridge, NO_ACTIVE_EVENTS};
pub use memory::{InMemoryStore, LiveFixtures};
pub use store::LiveDataStore;
