//! Match-3 (workspace facade crate).
//!
//! Re-exports the workspace members under one roof so binaries, integration
//! tests and benches can use `match3::{core, input, term, types}`.

pub use match3_core as core;
pub use match3_input as input;
pub use match3_term as term;
pub use match3_types as types;
