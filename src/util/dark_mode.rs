//! Process-wide dark mode flag.
//!
//! The store mirrors its `dark_mode` field here on every change so
//! renderers without store access (terminal styling, log output) can pick a
//! theme.

#[cfg(test)]
#[path = "dark_mode_test.rs"]
mod dark_mode_test;

use std::sync::atomic::{AtomicBool, Ordering};

static DARK_MODE: AtomicBool = AtomicBool::new(false);

/// Set the process-wide flag.
pub fn apply(enabled: bool) {
    DARK_MODE.store(enabled, Ordering::Relaxed);
}

#[must_use]
pub fn is_enabled() -> bool {
    DARK_MODE.load(Ordering::Relaxed)
}

/// Theme name for a flag value: `"dark"` or `"light"`.
#[must_use]
pub fn theme_for(enabled: bool) -> &'static str {
    if enabled { "dark" } else { "light" }
}

/// Theme name for the current process-wide flag.
#[must_use]
pub fn theme_name() -> &'static str {
    theme_for(is_enabled())
}
