//! dynamap_client - CLI for provisioning and inspecting dynamap tables.
//!
//! Entities are described in a JSON schema file keyed by entity name, in the
//! same camelCase layout as [`EntityMetadata`](dynamap::EntityMetadata).

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;

pub use commands::{execute, load_registry};
pub use error::{ClientError, Result};
