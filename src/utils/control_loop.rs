//! The fixed-period tick driving the bridge: decode game state, run the win
//! sequence, stage configuration, fuse inputs, write the command frame,
//! clear one-shots, push status to the UI surface.
//!
//! The loop never blocks and never aborts: until the shared region exists a
//! tick is simply a no-op, checked every tick rather than treated as an
//! error path.

use shared::codec::{self, CommandFrame, GameStateFrame};
use shared::split_regions;

use crate::utils::inputs::fuse_inputs;
use crate::utils::objects::{ControllerContext, ControllerMode, UiFeedback};

pub struct ControlLoop {
    pub ctx: ControllerContext,
}

impl ControlLoop {
    pub fn new(ctx: ControllerContext) -> Self {
        Self { ctx }
    }

    /// One command tick over the mapped region. `memory` is the whole shared
    /// region (commands + game structure); `now_secs` is the controller
    /// clock used for gesture momentum.
    pub fn tick(&mut self, memory: Option<&mut [u8]>, now_secs: f32, ui: &mut dyn UiFeedback) {
        let Some(bytes) = memory else {
            // Shared memory not mapped yet; try again next tick.
            return;
        };
        let (commands_region, game_region) = split_regions(bytes);
        let game = codec::decode_game_state(game_region);

        // Win sequencing only runs in game; the menu never advances trials.
        let mut staged_config = None;
        if self.ctx.mode == ControllerMode::InGame {
            staged_config = self
                .ctx
                .win
                .update(&game, &mut self.ctx.trials, &mut self.ctx.pending);
        }

        // A manual reset rewrites the current trial, unless the win machine
        // already staged the next one this tick.
        if std::mem::take(&mut self.ctx.stage_current_config) && staged_config.is_none() {
            staged_config = Some(self.ctx.trials.current().reset_config());
        }
        if let Some(config) = staged_config {
            // Stage the configuration before the reset pulse goes out, so
            // the game resets directly into it.
            codec::encode_config(&config, game_region);
        }

        let gameplay_active = self.ctx.gameplay_active();
        let frame = fuse_inputs(
            &self.ctx.keys,
            &mut self.ctx.gestures,
            &self.ctx.pending,
            now_secs,
            gameplay_active,
        );
        codec::encode_commands(&frame, commands_region);

        // One-shot triggers are valid for exactly the frame just written.
        self.ctx.pending.clear();

        self.push_feedback(ui, &game, &frame);
    }

    fn push_feedback(&self, ui: &mut dyn UiFeedback, game: &GameStateFrame, frame: &CommandFrame) {
        let status = match self.ctx.mode {
            ControllerMode::Menu => "Menu".to_string(),
            ControllerMode::InGame if !self.ctx.win.is_playing() => {
                self.ctx.win.status_label(game.frame_number)
            }
            ControllerMode::InGame => {
                if game.has_won {
                    if game.win_time > 0.0 {
                        format!("WINNER! ({:.2}s)", game.win_time)
                    } else {
                        "WINNER!".to_string()
                    }
                } else if game.is_animating {
                    "Animating...".to_string()
                } else {
                    "Ready".to_string()
                }
            }
        };
        ui.set_status(self.ctx.trials.index(), self.ctx.trials.len(), &status);

        ui.set_indicator("rotate_left", frame.rotate_left);
        ui.set_indicator("rotate_right", frame.rotate_right);
        ui.set_indicator("zoom_in", frame.zoom_in);
        ui.set_indicator("zoom_out", frame.zoom_out);
        ui.set_indicator("check_alignment", frame.check_alignment);
        ui.set_indicator("reset", frame.reset);
        ui.set_indicator("blank_screen", frame.blank_screen);
        ui.set_indicator("stop_rendering", frame.stop_rendering);
        ui.set_indicator("resume_rendering", frame.resume_rendering);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::objects::NullFeedback;
    use crate::utils::touch_inputs::GesturePolicy;
    use crate::utils::trials::TrialStore;
    use shared::SHARED_MEMORY_SIZE;

    fn control_loop() -> ControlLoop {
        ControlLoop::new(ControllerContext::new(
            TrialStore::default(),
            GesturePolicy::default(),
        ))
    }

    fn written_commands(memory: &mut [u8]) -> CommandFrame {
        let (commands, _) = split_regions(memory);
        codec::decode_commands(commands)
    }

    #[test]
    fn tick_without_memory_is_a_no_op() {
        let mut cl = control_loop();
        cl.ctx.enter_game();
        cl.tick(None, 0.0, &mut NullFeedback);
        // Nothing consumed the pending reset; it fires once memory exists.
        assert!(cl.ctx.pending.reset);

        let mut memory = [0u8; SHARED_MEMORY_SIZE];
        cl.tick(Some(&mut memory), 0.016, &mut NullFeedback);
        assert!(written_commands(&mut memory).reset);
    }

    #[test]
    fn one_shots_clear_on_the_next_tick() {
        let mut cl = control_loop();
        cl.ctx.enter_game();
        let mut memory = [0u8; SHARED_MEMORY_SIZE];

        cl.tick(Some(&mut memory), 0.0, &mut NullFeedback);
        assert!(written_commands(&mut memory).reset);

        cl.tick(Some(&mut memory), 0.016, &mut NullFeedback);
        let frame = written_commands(&mut memory);
        assert!(!frame.reset);
        assert!(!frame.check_alignment);
    }

    #[test]
    fn held_key_persists_across_ticks_while_one_shots_do_not() {
        let mut cl = control_loop();
        cl.ctx.enter_game();
        cl.ctx.keys.rotate_right = true;
        cl.ctx.pending.check_alignment = true;
        let mut memory = [0u8; SHARED_MEMORY_SIZE];

        cl.tick(Some(&mut memory), 0.0, &mut NullFeedback);
        let frame = written_commands(&mut memory);
        assert!(frame.rotate_right && frame.check_alignment);

        cl.tick(Some(&mut memory), 0.016, &mut NullFeedback);
        let frame = written_commands(&mut memory);
        assert!(frame.rotate_right);
        assert!(!frame.check_alignment);
    }

    #[test]
    fn manual_reset_stages_current_trial_config() {
        let mut cl = control_loop();
        cl.ctx.enter_game();
        let mut memory = [0u8; SHARED_MEMORY_SIZE];
        cl.tick(Some(&mut memory), 0.0, &mut NullFeedback);

        let (_, game_region) = split_regions(&mut memory);
        let echoed = codec::decode_game_state(game_region).config;
        assert_eq!(echoed.seed, 69);
        assert_eq!(echoed.target_door, 5);
    }

    #[test]
    fn menu_mode_writes_idle_frames() {
        let mut cl = control_loop();
        cl.ctx.keys.rotate_left = true;
        let mut memory = [0u8; SHARED_MEMORY_SIZE];
        cl.tick(Some(&mut memory), 0.0, &mut NullFeedback);
        assert_eq!(written_commands(&mut memory), CommandFrame::default());
    }
}
