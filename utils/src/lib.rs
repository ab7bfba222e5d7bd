//! Shared infrastructure utilities.
//!
//! - **`atomic_write`**: Crash-safe file persistence (temp + rename) used by the
//!   result history.

pub mod atomic_write;

pub use atomic_write::{atomic_write, recover_bak_file, remove_if_exists};
