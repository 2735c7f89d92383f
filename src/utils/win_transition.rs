//! Win sequencing: win detected -> wait for the door animation -> blank the
//! screen for a fixed number of frames -> advance to the next trial.
//!
//! The whole sequence is clocked by the game-reported frame counter, never by
//! wall-clock time. The game may stall or run at a different effective rate
//! than the controller tick; comparing its own frame numbers keeps the blank
//! duration exact relative to simulated time.

use log::info;
use shared::codec::{GameStateFrame, ResetConfig};
use shared::timing::WIN_BLANK_DURATION_FRAMES;

use crate::utils::inputs::PendingTriggers;
use crate::utils::trials::TrialStore;

/// Win state machine for frame-based timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WinState {
    Playing,
    WaitingForAnimationEnd,
    BlankScreenActive,
}

#[derive(Debug, Clone)]
pub struct WinTransition {
    state: WinState,
    blank_start_frame: u64,
}

impl WinTransition {
    pub fn new() -> Self {
        Self {
            state: WinState::Playing,
            blank_start_frame: 0,
        }
    }

    pub fn state(&self) -> WinState {
        self.state
    }

    /// Gameplay input is only meaningful while no transition is in flight.
    pub fn is_playing(&self) -> bool {
        self.state == WinState::Playing
    }

    /// Any explicit restart discards an in-progress transition. A manual
    /// reset must never be blocked by a stale blank-screen wait.
    pub fn force_playing(&mut self) {
        self.state = WinState::Playing;
    }

    /// Drive the machine with this tick's decoded game state.
    ///
    /// Returns the configuration to stage into shared memory before the
    /// command write, when a step of the sequence needs one: the next trial
    /// is written together with the reset pulse so the game resets straight
    /// into it.
    pub fn update(
        &mut self,
        game: &GameStateFrame,
        trials: &mut TrialStore,
        pending: &mut PendingTriggers,
    ) -> Option<ResetConfig> {
        match self.state {
            WinState::Playing => {
                if game.has_won {
                    info!(
                        "Trial {} won! Waiting for animation to complete...",
                        trials.index() + 1
                    );
                    self.state = WinState::WaitingForAnimationEnd;
                }
                None
            }
            WinState::WaitingForAnimationEnd => {
                if game.is_animating {
                    return None;
                }
                info!(
                    "Animation complete. Activating blank screen for {} frames",
                    WIN_BLANK_DURATION_FRAMES
                );
                let next = trials.peek_next().reset_config();
                pending.reset = true;
                pending.blank_screen = true;
                pending.stop_rendering = true;
                self.blank_start_frame = game.frame_number;
                self.state = WinState::BlankScreenActive;
                Some(next)
            }
            WinState::BlankScreenActive => {
                let frames_elapsed = game.frame_number.saturating_sub(self.blank_start_frame);
                if frames_elapsed < WIN_BLANK_DURATION_FRAMES {
                    return None;
                }
                info!("Blank screen complete ({} frames). Resuming.", frames_elapsed);
                // blank_screen toggles the overlay off again.
                pending.blank_screen = true;
                pending.resume_rendering = true;
                trials.advance();
                self.state = WinState::Playing;
                None
            }
        }
    }

    /// Short operator-facing label for the status surface.
    pub fn status_label(&self, current_frame: u64) -> String {
        match self.state {
            WinState::Playing => "Playing".to_string(),
            WinState::WaitingForAnimationEnd => "Wait Anim".to_string(),
            WinState::BlankScreenActive => format!(
                "Blank {}/{}",
                current_frame.saturating_sub(self.blank_start_frame),
                WIN_BLANK_DURATION_FRAMES
            ),
        }
    }
}

impl Default for WinTransition {
    fn default() -> Self {
        Self::new()
    }
}
