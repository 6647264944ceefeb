//! Small helpers with no store or network dependency.

pub mod dark_mode;
pub mod debounce;
pub mod format;

pub use debounce::{Debouncer, debounce};
