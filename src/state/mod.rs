//! Application state store.
//!
//! DESIGN
//! ======
//! State is split by domain (`data`, `ui`, `chat`, `map`) and aggregated in
//! [`AppState`]. Every mutation is a named `&mut self` action on
//! `AppState`, so actions are plain functions testable without a runtime.
//!
//! [`Store`] is the cloneable handle shared by coordinators, the chat client,
//! and the view layer. Each action runs as one update under the store lock.
//! Two side channels hang off it: a `watch` of the selected site id that
//! the site-detail coordinator follows, and an optional [`PrefsFile`] kept in
//! step with the dark-mode flag and chat session id.
//!
//! The preference file is written on the calling thread after the state
//! lock is released. The record is a few dozen bytes and changes only on a
//! theme toggle or a new chat session, so the write stays synchronous.
//!
//! ERROR HANDLING
//! ==============
//! Actions cannot fail. A poisoned lock is recovered rather than propagated,
//! and a failed preference write is logged and otherwise ignored.

pub mod chat;
pub mod data;
pub mod map;
pub mod persist;
pub mod selectors;
pub mod ui;


use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tokio::sync::watch;
use tracing::warn;

use crate::net::types::{Alert, CurrentConditionsResponse, ForecastDataPoint, HistoricalDataPoint, SiteWithConditions};
use crate::util::dark_mode;
use chat::{ChatMessage, ChatState, ChatTurn};
use data::{DataState, SelectedSite};
use map::{MapViewPatch, MapViewState};
use persist::{PersistedPrefs, PrefsFile};
use ui::UiState;

// =============================================================================
// APP STATE
// =============================================================================

/// The aggregate root: everything the dashboard renders.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AppState {
    pub data: DataState,
    pub ui: UiState,
    pub chat: ChatState,
    pub map: MapViewState,
}

impl AppState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The persisted subset.
    #[must_use]
    pub fn prefs(&self) -> PersistedPrefs {
        PersistedPrefs { dark_mode: self.ui.dark_mode, chat_session_id: self.chat.session_id.clone() }
    }

    // ----- data -----

    pub fn set_sites(&mut self, sites: Vec<SiteWithConditions>) {
        self.data.sites = sites;
    }

    pub fn set_alerts(&mut self, alerts: Vec<Alert>) {
        self.data.alerts = alerts;
    }

    /// Record a conditions fetch: site list, as-of date, and refresh stamp.
    pub fn apply_conditions(&mut self, response: CurrentConditionsResponse) {
        self.data.sites = response.sites;
        self.data.data_date = Some(response.data_date);
        self.data.last_updated = Some(response.updated_at);
    }

    /// Replace the selection with a fresh wrapper and open the sidebar.
    /// `None` clears the selection and leaves the sidebar alone.
    pub fn select_site(&mut self, site: Option<SiteWithConditions>) {
        match site {
            Some(site) => {
                self.data.selected = Some(SelectedSite::new(site));
                self.ui.sidebar_open = true;
            }
            None => self.data.selected = None,
        }
    }

    /// Attach history to whatever is selected. No-op without a selection.
    pub fn set_site_history(&mut self, history: Vec<HistoricalDataPoint>) {
        if let Some(selected) = self.data.selected.as_mut() {
            selected.history = Some(history);
        }
    }

    /// Attach a forecast to whatever is selected. No-op without a selection.
    pub fn set_site_forecast(&mut self, forecast: Vec<ForecastDataPoint>) {
        if let Some(selected) = self.data.selected.as_mut() {
            selected.forecast = Some(forecast);
        }
    }

    /// Attach history only if `site_id` is still the selection.
    /// Returns whether it was attached.
    pub fn attach_history(&mut self, site_id: &str, history: Vec<HistoricalDataPoint>) -> bool {
        match self.data.selected.as_mut() {
            Some(selected) if selected.id() == site_id => {
                selected.history = Some(history);
                true
            }
            _ => false,
        }
    }

    /// Attach a forecast only if `site_id` is still the selection.
    /// Returns whether it was attached.
    pub fn attach_forecast(&mut self, site_id: &str, forecast: Vec<ForecastDataPoint>) -> bool {
        match self.data.selected.as_mut() {
            Some(selected) if selected.id() == site_id => {
                selected.forecast = Some(forecast);
                true
            }
            _ => false,
        }
    }

    pub fn set_data_date(&mut self, date: impl Into<String>) {
        self.data.data_date = Some(date.into());
    }

    pub fn set_last_updated(&mut self, timestamp: impl Into<String>) {
        self.data.last_updated = Some(timestamp.into());
    }

    // ----- ui -----

    pub fn set_loading(&mut self, loading: bool) {
        self.ui.loading = loading;
    }

    /// Raise the loading flag and clear any previous error.
    pub fn begin_loading(&mut self) {
        self.ui.loading = true;
        self.ui.error = None;
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.ui.error = error;
    }

    pub fn toggle_dark_mode(&mut self) {
        self.ui.dark_mode = !self.ui.dark_mode;
    }

    pub fn set_dark_mode(&mut self, dark: bool) {
        self.ui.dark_mode = dark;
    }

    pub fn toggle_chat(&mut self) {
        self.ui.chat_open = !self.ui.chat_open;
    }

    pub fn set_chat_open(&mut self, open: bool) {
        self.ui.chat_open = open;
    }

    pub fn toggle_sidebar(&mut self) {
        self.ui.sidebar_open = !self.ui.sidebar_open;
    }

    pub fn set_sidebar_open(&mut self, open: bool) {
        self.ui.sidebar_open = open;
    }

    // ----- chat -----

    pub fn add_chat_message(&mut self, message: ChatMessage) {
        self.chat.messages.push(message);
    }

    pub fn set_chat_session_id(&mut self, session_id: Option<String>) {
        self.chat.session_id = session_id;
    }

    /// Drop the transcript and the session together.
    pub fn clear_chat(&mut self) {
        self.chat.messages.clear();
        self.chat.session_id = None;
    }

    pub fn set_chat_loading(&mut self, loading: bool) {
        self.chat.loading = loading;
    }

    /// Start an exchange: append the user message, raise loading, reset the
    /// partial buffer. Returns `None` for blank input or while a turn is in
    /// flight, leaving state untouched.
    pub fn begin_chat_turn(&mut self, content: &str) -> Option<ChatTurn> {
        let message = content.trim();
        if message.is_empty() || self.chat.loading {
            return None;
        }
        self.chat.messages.push(ChatMessage::user(message));
        self.chat.loading = true;
        self.chat.streaming.clear();
        Some(ChatTurn { message: message.to_owned(), session_id: self.chat.session_id.clone() })
    }

    pub fn append_stream_chunk(&mut self, chunk: &str) {
        self.chat.streaming.push_str(chunk);
    }

    /// Promote the partial buffer to an assistant message. A completion
    /// without a session id keeps the current session.
    pub fn complete_streamed_turn(&mut self, session_id: Option<String>) {
        let reply = std::mem::take(&mut self.chat.streaming);
        self.chat.messages.push(ChatMessage::assistant(reply));
        if session_id.is_some() {
            self.chat.session_id = session_id;
        }
        self.chat.loading = false;
    }

    /// Finish a non-streaming exchange with the full reply.
    pub fn complete_chat_turn(&mut self, reply: String, session_id: String) {
        self.chat.messages.push(ChatMessage::assistant(reply));
        self.chat.session_id = Some(session_id);
        self.chat.loading = false;
        self.chat.streaming.clear();
    }

    /// Append the fallback reply and drop any partial content.
    pub fn fail_chat_turn(&mut self) {
        self.chat.messages.push(ChatMessage::failure());
        self.chat.loading = false;
        self.chat.streaming.clear();
    }

    // ----- map -----

    pub fn set_map_view(&mut self, patch: MapViewPatch) {
        self.map.apply(patch);
    }

    pub fn fly_to_site(&mut self, site: &SiteWithConditions) {
        self.map = MapViewState::centered_on(site.site.coordinates);
    }

    pub fn reset_map_view(&mut self) {
        self.map = MapViewState::default();
    }
}

// =============================================================================
// STORE
// =============================================================================

struct StoreInner {
    state: RwLock<AppState>,
    selection: watch::Sender<Option<String>>,
    prefs: Option<PrefsFile>,
    save_lock: Mutex<()>,
}

/// Shared handle to [`AppState`]. Clone is cheap; all clones see one state.
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    /// In-memory store with nothing persisted.
    #[must_use]
    pub fn new() -> Self {
        Self::build(AppState::new(), None)
    }

    /// Store backed by a preference record, seeded from it once.
    #[must_use]
    pub fn with_persistence(file: PrefsFile) -> Self {
        let prefs = file.load();
        let mut state = AppState::new();
        state.ui.dark_mode = prefs.dark_mode;
        state.chat.session_id = prefs.chat_session_id;
        dark_mode::apply(state.ui.dark_mode);
        Self::build(state, Some(file))
    }

    fn build(state: AppState, prefs: Option<PrefsFile>) -> Self {
        let (selection, _) = watch::channel(None);
        Self { inner: Arc::new(StoreInner { state: RwLock::new(state), selection, prefs, save_lock: Mutex::new(()) }) }
    }

    /// Clone of the whole state.
    #[must_use]
    pub fn snapshot(&self) -> AppState {
        self.read(AppState::clone)
    }

    /// Run `f` against the current state under the read lock.
    pub fn read<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
        let state = self.inner.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }

    /// Receiver that observes every selection, including re-selecting the
    /// same site.
    #[must_use]
    pub fn subscribe_selection(&self) -> watch::Receiver<Option<String>> {
        self.inner.selection.subscribe()
    }

    fn update<R>(&self, f: impl FnOnce(&mut AppState) -> R) -> R {
        let (out, prefs_changed) = {
            let mut state = self.inner.state.write().unwrap_or_else(PoisonError::into_inner);
            let before = state.prefs();
            let out = f(&mut state);
            let after = state.prefs();
            if before.dark_mode != after.dark_mode {
                dark_mode::apply(after.dark_mode);
            }
            (out, before != after)
        };
        if prefs_changed {
            self.save_prefs();
        }
        out
    }

    /// Write the current preferences. Runs after the state lock is released
    /// so readers never wait on the file system; the save lock orders
    /// concurrent writers and each writes the latest state, not its own.
    fn save_prefs(&self) {
        let Some(file) = &self.inner.prefs else {
            return;
        };
        let _writer = self.inner.save_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let prefs = self.read(AppState::prefs);
        if let Err(e) = file.save(&prefs) {
            warn!(error = %e, path = %file.path().display(), "preference write failed");
        }
    }

    // ----- data -----

    pub fn set_sites(&self, sites: Vec<SiteWithConditions>) {
        self.update(|s| s.set_sites(sites));
    }

    pub fn set_alerts(&self, alerts: Vec<Alert>) {
        self.update(|s| s.set_alerts(alerts));
    }

    pub fn apply_conditions(&self, response: CurrentConditionsResponse) {
        self.update(|s| s.apply_conditions(response));
    }

    /// See [`AppState::select_site`]. Also notifies selection subscribers.
    pub fn select_site(&self, site: Option<SiteWithConditions>) {
        let id = site.as_ref().map(|s| s.id().to_owned());
        self.update(|s| {
            s.select_site(site);
            self.inner.selection.send_replace(id);
        });
    }

    /// Select by id from the loaded site list. Returns false if unknown.
    pub fn select_site_by_id(&self, site_id: &str) -> bool {
        let site = self.read(|s| selectors::site_by_id(&s.data.sites, site_id).cloned());
        let found = site.is_some();
        if found {
            self.select_site(site);
        }
        found
    }

    pub fn set_site_history(&self, history: Vec<HistoricalDataPoint>) {
        self.update(|s| s.set_site_history(history));
    }

    pub fn set_site_forecast(&self, forecast: Vec<ForecastDataPoint>) {
        self.update(|s| s.set_site_forecast(forecast));
    }

    pub fn attach_history(&self, site_id: &str, history: Vec<HistoricalDataPoint>) -> bool {
        self.update(|s| s.attach_history(site_id, history))
    }

    pub fn attach_forecast(&self, site_id: &str, forecast: Vec<ForecastDataPoint>) -> bool {
        self.update(|s| s.attach_forecast(site_id, forecast))
    }

    pub fn set_data_date(&self, date: impl Into<String>) {
        self.update(|s| s.set_data_date(date));
    }

    pub fn set_last_updated(&self, timestamp: impl Into<String>) {
        self.update(|s| s.set_last_updated(timestamp));
    }

    // ----- ui -----

    pub fn set_loading(&self, loading: bool) {
        self.update(|s| s.set_loading(loading));
    }

    pub fn begin_loading(&self) {
        self.update(AppState::begin_loading);
    }

    pub fn set_error(&self, error: Option<String>) {
        self.update(|s| s.set_error(error));
    }

    pub fn toggle_dark_mode(&self) {
        self.update(AppState::toggle_dark_mode);
    }

    pub fn set_dark_mode(&self, dark: bool) {
        self.update(|s| s.set_dark_mode(dark));
    }

    pub fn toggle_chat(&self) {
        self.update(AppState::toggle_chat);
    }

    pub fn set_chat_open(&self, open: bool) {
        self.update(|s| s.set_chat_open(open));
    }

    pub fn toggle_sidebar(&self) {
        self.update(AppState::toggle_sidebar);
    }

    pub fn set_sidebar_open(&self, open: bool) {
        self.update(|s| s.set_sidebar_open(open));
    }

    // ----- chat -----

    pub fn add_chat_message(&self, message: ChatMessage) {
        self.update(|s| s.add_chat_message(message));
    }

    pub fn set_chat_session_id(&self, session_id: Option<String>) {
        self.update(|s| s.set_chat_session_id(session_id));
    }

    pub fn clear_chat(&self) {
        self.update(AppState::clear_chat);
    }

    pub fn set_chat_loading(&self, loading: bool) {
        self.update(|s| s.set_chat_loading(loading));
    }

    pub fn begin_chat_turn(&self, content: &str) -> Option<ChatTurn> {
        self.update(|s| s.begin_chat_turn(content))
    }

    pub fn append_stream_chunk(&self, chunk: &str) {
        self.update(|s| s.append_stream_chunk(chunk));
    }

    pub fn complete_streamed_turn(&self, session_id: Option<String>) {
        self.update(|s| s.complete_streamed_turn(session_id));
    }

    pub fn complete_chat_turn(&self, reply: String, session_id: String) {
        self.update(|s| s.complete_chat_turn(reply, session_id));
    }

    pub fn fail_chat_turn(&self) {
        self.update(AppState::fail_chat_turn);
    }

    // ----- map -----

    pub fn set_map_view(&self, patch: MapViewPatch) {
        self.update(|s| s.set_map_view(patch));
    }

    pub fn fly_to_site(&self, site: &SiteWithConditions) {
        self.update(|s| s.fly_to_site(site));
    }

    pub fn reset_map_view(&self) {
        self.update(AppState::reset_map_view);
    }
}
