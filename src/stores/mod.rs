//! Storage implementations for the catalog harvesting pipeline.
//!
//! Available backends:
//! - `MemoryRepository` - in-memory storage (always available, tests/demos)
//! - `sqlite`/`postgres` backends would live here behind the matching
//!   `sqlx` feature, following the same `Repository` contract; not shipped
//!   in this crate (§9 "storage backend").

pub mod memory;

pub use memory::MemoryRepository;
