// crates/buffering/src/lib.rs

pub mod history;

pub use history::{HistoryBuffer, HistoryMetrics};

pub const DEFAULT_MAX_HISTORY: usize = 20;
