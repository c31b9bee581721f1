//! Generic utility primitives with zero domain knowledge.
//!
//! - `json` - JSON pointer edits and merge patch
//! - `parser` - Text extraction from process output
//! - `shell` - Shell quoting for displayed command lines
//! - `template` - `{{placeholder}}` rendering

pub mod json;
pub mod parser;
pub mod shell;
pub mod template;
