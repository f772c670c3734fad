use std::fmt;

use crate::data::dataset::Dataset;
use crate::error::{Error, Result};
use crate::model::regressor::MlpRegressor;
use crate::preprocessing::scaler::ScalerState;

// ---------------------------------------------------------------------------
// Keys
// ---------------------------------------------------------------------------

/// Names of the values a session shares between its commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKey {
    TrainSet,
    TestSet,
    ScalerState,
    TestFeaturesScaled,
    Model,
}

impl SessionKey {
    pub const ALL: [SessionKey; 5] = [
        SessionKey::TrainSet,
        SessionKey::TestSet,
        SessionKey::ScalerState,
        SessionKey::TestFeaturesScaled,
        SessionKey::Model,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionKey::TrainSet => "train_set",
            SessionKey::TestSet => "test_set",
            SessionKey::ScalerState => "scaler_state",
            SessionKey::TestFeaturesScaled => "test_features_scaled",
            SessionKey::Model => "model",
        }
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Dataset,
    Graphs,
    Training,
    Performance,
}

impl Page {
    pub const ALL: [Page; 4] = [Page::Dataset, Page::Graphs, Page::Training, Page::Performance];

    pub fn title(&self) -> &'static str {
        match self {
            Page::Dataset => "Dataset",
            Page::Graphs => "Graphs",
            Page::Training => "Training",
            Page::Performance => "Performance",
        }
    }

    fn bit(&self) -> u8 {
        match self {
            Page::Dataset => 0b0001,
            Page::Graphs => 0b0010,
            Page::Training => 0b0100,
            Page::Performance => 0b1000,
        }
    }
}

// ---------------------------------------------------------------------------
// Flash messages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashMessage {
    pub kind: FlashKind,
    pub text: String,
}

impl FlashMessage {
    pub fn success(text: impl Into<String>) -> Self {
        FlashMessage { kind: FlashKind::Success, text: text.into() }
    }
    pub fn error(text: impl Into<String>) -> Self {
        FlashMessage { kind: FlashKind::Error, text: text.into() }
    }
}

// ---------------------------------------------------------------------------
// Main state struct
// ---------------------------------------------------------------------------

/// Values shared by the commands of one session.
///
/// Getters fail with `NotInitialized(key)` while a value is unset; setters
/// overwrite unconditionally. The state is owned by its session and dropped
/// with it.
#[derive(Debug, Default)]
pub struct SessionState {
    train_set: Option<Dataset>,
    test_set: Option<Dataset>,
    scaler_state: Option<ScalerState>,
    test_features_scaled: Option<Vec<Vec<f64>>>,
    /// Only ever holds a model whose fit succeeded.
    model: Option<MlpRegressor>,
    /// One-shot message for the next front-end render.
    flash: Option<FlashMessage>,
}

fn require<T>(value: Option<&T>, key: SessionKey) -> Result<&T> {
    value.ok_or(Error::NotInitialized(key))
}

impl SessionState {
    pub fn new() -> Self {
        SessionState::default()
    }

    pub fn train_set(&self) -> Result<&Dataset> {
        require(self.train_set.as_ref(), SessionKey::TrainSet)
    }

    pub fn set_train_set(&mut self, dataset: Dataset) {
        self.train_set = Some(dataset);
    }

    pub fn test_set(&self) -> Result<&Dataset> {
        require(self.test_set.as_ref(), SessionKey::TestSet)
    }

    pub fn set_test_set(&mut self, dataset: Dataset) {
        self.test_set = Some(dataset);
    }

    pub fn scaler_state(&self) -> Result<&ScalerState> {
        require(self.scaler_state.as_ref(), SessionKey::ScalerState)
    }

    pub fn set_scaler_state(&mut self, state: ScalerState) {
        self.scaler_state = Some(state);
    }

    pub fn test_features_scaled(&self) -> Result<&[Vec<f64>]> {
        require(self.test_features_scaled.as_ref(), SessionKey::TestFeaturesScaled).map(|v| v.as_slice())
    }

    pub fn set_test_features_scaled(&mut self, features: Vec<Vec<f64>>) {
        self.test_features_scaled = Some(features);
    }

    pub fn model(&self) -> Result<&MlpRegressor> {
        require(self.model.as_ref(), SessionKey::Model)
    }

    pub fn set_model(&mut self, model: MlpRegressor) {
        self.model = Some(model);
    }

    /// Removes the current model, e.g. before a new training run.
    pub fn take_model(&mut self) -> Option<MlpRegressor> {
        self.model.take()
    }

    pub fn is_initialized(&self, key: SessionKey) -> bool {
        match key {
            SessionKey::TrainSet => self.train_set.is_some(),
            SessionKey::TestSet => self.test_set.is_some(),
            SessionKey::ScalerState => self.scaler_state.is_some(),
            SessionKey::TestFeaturesScaled => self.test_features_scaled.is_some(),
            SessionKey::Model => self.model.is_some(),
        }
    }

    pub fn initialized_keys(&self) -> Vec<SessionKey> {
        SessionKey::ALL.into_iter().filter(|k| self.is_initialized(*k)).collect()
    }

    /// Drops every value; the session starts over.
    pub fn clear(&mut self) {
        *self = SessionState::default();
    }

    /// Bitmask of reachable pages. Everything but `Performance` is always
    /// reachable; `Performance` needs a trained model.
    pub fn page_unlock_mask(&self) -> u8 {
        let mut mask = Page::Dataset.bit() | Page::Graphs.bit() | Page::Training.bit();
        if self.model.is_some() {
            mask |= Page::Performance.bit();
        }
        mask
    }

    pub fn is_unlocked(&self, page: Page) -> bool {
        self.page_unlock_mask() & page.bit() != 0
    }

    pub fn set_flash(&mut self, flash: FlashMessage) {
        self.flash = Some(flash);
    }

    /// Takes and returns the current flash message, clearing it.
    pub fn take_flash(&mut self) -> Option<FlashMessage> {
        self.flash.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::{FitOptions, ModelConfig};

    fn tiny() -> Dataset {
        Dataset::new(vec!["x".into()], "y", vec![vec![1.0]], vec![2.0]).unwrap()
    }

    #[test]
    fn unset_keys_are_not_initialized() {
        let state = SessionState::new();
        assert!(state.initialized_keys().is_empty());
        assert!(matches!(state.train_set(), Err(Error::NotInitialized(SessionKey::TrainSet))));
        assert!(matches!(state.model(), Err(Error::NotInitialized(SessionKey::Model))));
        let err = state.test_features_scaled().unwrap_err();
        assert_eq!(err.to_string(), "session key `test_features_scaled` is not initialized");
    }

    #[test]
    fn last_write_wins() {
        let mut state = SessionState::new();
        state.set_test_features_scaled(vec![vec![1.0]]);
        state.set_test_features_scaled(vec![vec![2.0], vec![3.0]]);
        assert_eq!(state.test_features_scaled().unwrap(), &[vec![2.0], vec![3.0]]);
        state.set_train_set(tiny());
        assert_eq!(
            state.initialized_keys(),
            vec![SessionKey::TrainSet, SessionKey::TestFeaturesScaled]
        );

        state.clear();
        assert!(state.initialized_keys().is_empty());
    }

    #[test]
    fn performance_page_unlocks_with_a_model() {
        let mut state = SessionState::new();
        assert!(state.is_unlocked(Page::Dataset));
        assert!(!state.is_unlocked(Page::Performance));

        state.set_model(crate::model::regressor::MlpRegressor::new(ModelConfig::default(), FitOptions::default()));
        assert!(Page::ALL.iter().all(|p| state.is_unlocked(*p)));
    }

    #[test]
    fn flash_is_one_shot() {
        let mut state = SessionState::new();
        state.set_flash(FlashMessage::success("Training complete"));
        assert_eq!(state.take_flash().map(|f| f.kind), Some(FlashKind::Success));
        assert!(state.take_flash().is_none());
    }
}
