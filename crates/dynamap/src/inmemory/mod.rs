//! In-memory storage backend for testing.
//!
//! Evaluates the structured requests built by `dynamap_core` (key conditions,
//! ordering, limits, exclusive start keys, `SET` and `ADD` actions) against
//! tables held in memory. Nothing is persisted.
//!
//! # Example
//!
//! ```rust,ignore
//! use dynamap::{ClientHandle, InMemoryExecutor};
//!
//! let handle = ClientHandle::with_executor(InMemoryExecutor::new());
//! ```

mod executor;

pub use executor::InMemoryExecutor;
