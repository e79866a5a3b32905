//! Storage Adapters
//!
//! Implementations of the TokenStore port for persisting the session token.
//!
//! ## Available Adapters
//!
//! - **FileTokenStore** - Stores the token as a YAML file on disk
//! - **InMemoryTokenStore** - Keeps the token in memory (testing/ephemeral runs)
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{FileTokenStore, InMemoryTokenStore};
//!
//! // CLI: survives restarts
//! let store = FileTokenStore::new(".mindmorph/session.yaml");
//!
//! // Testing: in-memory storage
//! let store = InMemoryTokenStore::new();
//! ```

mod file_token_store;
mod in_memory_token_store;

pub use file_token_store::FileTokenStore;
pub use in_memory_token_store::InMemoryTokenStore;
