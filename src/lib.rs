//! Gem Match (workspace facade crate).
//!
//! Re-exports the `gem_match::{core,input,term,types}` API whose
//! implementation lives in dedicated crates under `crates/`.

pub use gem_match_core as core;
pub use gem_match_input as input;
pub use gem_match_term as term;
pub use gem_match_types as types;
