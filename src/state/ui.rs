#[cfg(test)]
#[path = "ui_test.rs"]
mod ui_test;

/// Dashboard chrome: loading spinner, error banner, panels, theme.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UiState {
    pub loading: bool,
    /// Last coordinator failure, shown until the next fetch starts.
    pub error: Option<String>,
    pub dark_mode: bool,
    pub chat_open: bool,
    pub sidebar_open: bool,
}
