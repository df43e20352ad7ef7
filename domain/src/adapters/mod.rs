//! Adapters that live inside the domain crate for convenience.
//!
//! The in-memory store backs unit tests, the demo CLI, and the server's
//! `STORAGE_PROVIDER=memory` mode. Durable storage lives in separate crates.

pub mod memory_repo;
