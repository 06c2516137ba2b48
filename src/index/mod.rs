//! Location index maintenance

pub mod guard;
pub mod proximity;
pub mod store;

pub use guard::{guarded_insert, guarded_remove};
pub use proximity::{ProximityIndex, META_TYPE, QUERY_OPTIONS, UNBOUNDED_SIZE};
pub use store::{LocationStore, MemoryStore};
