//! The shared controller types: application mode, the context bundle passed
//! through every tick, and the capability surface the UI layer implements.
//!
//! All mutable controller state lives in one explicit [`ControllerContext`]
//! rather than in statics, so several independent instances can run side by
//! side (and tests can build as many as they like).

use log::info;

use crate::utils::inputs::{KeyboardState, PendingTriggers};
use crate::utils::touch_inputs::{GestureClassifier, GesturePolicy};
use crate::utils::trials::TrialStore;
use crate::utils::win_transition::WinTransition;

/// Application mode: the menu screen or the live game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerMode {
    Menu,
    InGame,
}

/// Feedback capability implemented by the excluded UI layer (window title,
/// DOM indicators, terminal). The core only produces values; it never
/// touches visual elements directly.
pub trait UiFeedback {
    /// Toggle a named indicator (one per command flag).
    fn set_indicator(&mut self, name: &str, active: bool);
    /// Update the trial position and short status string.
    fn set_status(&mut self, trial_index: usize, trial_count: usize, status: &str);
}

/// No-op feedback for tests and headless runs.
pub struct NullFeedback;

impl UiFeedback for NullFeedback {
    fn set_indicator(&mut self, _name: &str, _active: bool) {}
    fn set_status(&mut self, _trial_index: usize, _trial_count: usize, _status: &str) {}
}

/// Everything the control loop needs, bundled.
pub struct ControllerContext {
    pub mode: ControllerMode,
    pub keys: KeyboardState,
    pub pending: PendingTriggers,
    pub gestures: GestureClassifier,
    pub win: WinTransition,
    pub trials: TrialStore,
    /// Stage the current trial configuration before the next command write
    /// (set by manual reset and by entering the game).
    pub stage_current_config: bool,
}

impl ControllerContext {
    pub fn new(trials: TrialStore, policy: GesturePolicy) -> Self {
        Self {
            mode: ControllerMode::Menu,
            keys: KeyboardState::default(),
            pending: PendingTriggers::default(),
            gestures: GestureClassifier::new(policy),
            win: WinTransition::new(),
            trials,
            stage_current_config: false,
        }
    }

    /// Gameplay input only flows while in game and outside the win sequence.
    pub fn gameplay_active(&self) -> bool {
        self.mode == ControllerMode::InGame && self.win.is_playing()
    }

    /// Enter the game from the menu: the current trial configuration is
    /// staged with a reset pulse so the game starts on it.
    pub fn enter_game(&mut self) {
        if self.mode == ControllerMode::InGame {
            return;
        }
        info!(
            "Entering game at trial {}/{}",
            self.trials.index() + 1,
            self.trials.len()
        );
        self.mode = ControllerMode::InGame;
        self.win.force_playing();
        self.trigger_reset();
    }

    /// Back to the menu unconditionally; held keys are dropped so nothing
    /// keeps steering the game from the menu.
    pub fn exit_to_menu(&mut self) {
        if self.mode == ControllerMode::Menu {
            return;
        }
        info!("Exiting to menu");
        self.mode = ControllerMode::Menu;
        self.keys.clear();
    }

    /// Alignment check pulse (Space or tap), only meaningful mid-play.
    pub fn trigger_check(&mut self) {
        if self.gameplay_active() {
            self.pending.check_alignment = true;
        }
    }

    /// Reset pulse. Rewrites the current trial configuration and discards
    /// any win transition in flight.
    pub fn trigger_reset(&mut self) {
        self.stage_current_config = true;
        self.pending.reset = true;
        self.win.force_playing();
    }

    pub fn trigger_blank_screen(&mut self) {
        self.pending.blank_screen = true;
    }

    pub fn trigger_stop_rendering(&mut self) {
        self.pending.stop_rendering = true;
    }

    pub fn trigger_resume_rendering(&mut self) {
        self.pending.resume_rendering = true;
    }
}
