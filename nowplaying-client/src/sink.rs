//! Destinations for the final job value and for error messages
//!
//! [`MusicField`] models the composer's "current music" input: it shows a
//! loading state while a lookup runs and receives exactly one final value.

use std::sync::{Mutex, PoisonError};

/// Placeholder shown in classic mode while a lookup is running
pub const LOADING_PLACEHOLDER: &str = "Loading...";

/// Receives the final value of a session
pub trait ResultSink: Send + Sync {
    /// Called once before the job is submitted
    fn begin_loading(&self) {}

    /// Called with the final value; an empty string clears the sink
    fn write(&self, value: &str);
}

/// Receives human readable error messages
pub trait ErrorSink: Send + Sync {
    fn notify(&self, message: &str);
}

/// How the field signals a running lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadingMode {
    /// New-style post editor: field is emptied and a spinner is raised
    #[default]
    Post,
    /// Classic editor: field shows a placeholder text
    Classic,
}

#[derive(Debug, Default)]
struct FieldState {
    value: String,
    loading: bool,
    writes: usize,
}

/// In-process model of the "current music" form field
#[derive(Debug, Default)]
pub struct MusicField {
    mode: LoadingMode,
    state: Mutex<FieldState>,
}

impl MusicField {
    pub fn new(mode: LoadingMode) -> Self {
        Self {
            mode,
            state: Mutex::new(FieldState::default()),
        }
    }

    /// Creates a field that already holds text typed by the author
    pub fn with_value(mode: LoadingMode, value: impl Into<String>) -> Self {
        Self {
            mode,
            state: Mutex::new(FieldState {
                value: value.into(),
                ..FieldState::default()
            }),
        }
    }

    /// Current text of the field
    pub fn value(&self) -> String {
        self.lock().value.clone()
    }

    /// Whether the spinner is up
    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    /// Number of final values written so far
    pub fn writes(&self) -> usize {
        self.lock().writes
    }

    /// Whether a lookup should overwrite the field
    ///
    /// On page init, text already in the field is kept.
    pub fn should_refresh(&self, on_init: bool) -> bool {
        !(on_init && !self.lock().value.is_empty())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FieldState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ResultSink for MusicField {
    fn begin_loading(&self) {
        let mut state = self.lock();
        match self.mode {
            LoadingMode::Post => {
                state.value.clear();
                state.loading = true;
            }
            LoadingMode::Classic => {
                state.value = LOADING_PLACEHOLDER.to_string();
            }
        }
    }

    fn write(&self, value: &str) {
        let mut state = self.lock();
        state.value = value.to_string();
        state.loading = false;
        state.writes += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_mode_clears_and_spins() {
        let field = MusicField::with_value(LoadingMode::Post, "old");
        field.begin_loading();
        assert_eq!(field.value(), "");
        assert!(field.is_loading());

        field.write("Artist - Title");
        assert_eq!(field.value(), "Artist - Title");
        assert!(!field.is_loading());
        assert_eq!(field.writes(), 1);
    }

    #[test]
    fn test_classic_mode_shows_placeholder() {
        let field = MusicField::new(LoadingMode::Classic);
        field.begin_loading();
        assert_eq!(field.value(), LOADING_PLACEHOLDER);
        assert!(!field.is_loading());

        field.write("");
        assert_eq!(field.value(), "");
    }

    #[test]
    fn test_should_refresh() {
        let empty = MusicField::new(LoadingMode::Post);
        assert!(empty.should_refresh(true));
        assert!(empty.should_refresh(false));

        let filled = MusicField::with_value(LoadingMode::Post, "typed by hand");
        assert!(!filled.should_refresh(true));
        assert!(filled.should_refresh(false));
    }
}
