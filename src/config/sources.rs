//! File sources, in the order they are layered.

pub mod global_file;
pub mod workspace_file;
