// crates/core/src/lib.rs
pub mod intent;
pub mod message;
pub mod records;
pub mod result;

pub use intent::*;
pub use message::*;
pub use records::*;
pub use result::*;
