//! Run-length compression of movement commands.

mod core;

pub use core::{COMMAND_SEPARATOR, assemble, command_lines};
