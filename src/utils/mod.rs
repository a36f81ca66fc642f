//! Utility modules.

pub mod file;
pub mod text;

pub use file::{calculate_checksum, file_extension, file_name};
pub use text::{char_len, preview};
