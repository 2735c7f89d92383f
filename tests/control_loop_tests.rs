//! End-to-end tests of the bridge tick pipeline over an in-memory shared
//! region, with the game node stood in by writing state frames through the
//! codec the way the real node does.

use monkey_controller::utils::{
    control_loop::ControlLoop,
    objects::{ControllerContext, NullFeedback},
    touch_inputs::GesturePolicy,
    trials::TrialStore,
};
use shared::codec::{self, CommandFrame};
use shared::{split_regions, SHARED_MEMORY_SIZE};

fn three_trial_store() -> TrialStore {
    let lines = r#"{"seed": 101, "pyramid_type": 0, "base_radius": 2.5, "height": 4.0, "start_orient": 0.0, "target_door": 5, "colors": [[1.0,0.2,0.2,1.0],[0.2,0.5,1.0,1.0],[0.2,1.0,0.3,1.0]]}
{"seed": 202, "pyramid_type": 1, "base_radius": 3.0, "height": 5.0, "start_orient": 0.5, "target_door": 2, "colors": [[1.0,0.2,0.2,1.0],[0.2,0.5,1.0,1.0],[0.2,1.0,0.3,1.0]]}
{"seed": 303, "pyramid_type": 0, "base_radius": 2.0, "height": 3.5, "start_orient": 1.0, "target_door": 0, "colors": [[1.0,0.2,0.2,1.0],[0.2,0.5,1.0,1.0],[0.2,1.0,0.3,1.0]]}"#;
    TrialStore::from_reader(lines.as_bytes())
}

fn in_game_loop() -> ControlLoop {
    let mut control = ControlLoop::new(ControllerContext::new(
        three_trial_store(),
        GesturePolicy::default(),
    ));
    control.ctx.enter_game();
    control
}

/// Emulate the game node writing its per-frame state, preserving whatever
/// configuration the controller staged (the node echoes it back).
fn emit_engine_state(memory: &mut [u8], frame_number: u64, has_won: bool, is_animating: bool) {
    let (_, game_region) = split_regions(memory);
    let mut state = codec::decode_game_state(game_region);
    state.frame_number = frame_number;
    state.has_won = has_won;
    state.is_animating = is_animating;
    state.phase = if has_won { codec::PHASE_WON } else { codec::PHASE_PLAYING };
    codec::encode_game_state(&state, game_region);
}

fn written_commands(memory: &mut [u8]) -> CommandFrame {
    let (commands_region, _) = split_regions(memory);
    codec::decode_commands(commands_region)
}

fn staged_seed(memory: &mut [u8]) -> u64 {
    let (_, game_region) = split_regions(memory);
    codec::decode_game_state(game_region).config.seed
}

#[test]
fn win_sequence_runs_frame_exact_over_shared_memory() {
    let mut control = in_game_loop();
    let mut memory = [0u8; SHARED_MEMORY_SIZE];
    let mut ui = NullFeedback;

    // Entering the game staged trial 1 with a reset pulse.
    emit_engine_state(&mut memory, 1, false, false);
    control.tick(Some(&mut memory), 0.0, &mut ui);
    assert!(written_commands(&mut memory).reset);
    assert_eq!(staged_seed(&mut memory), 101);

    // A few quiet frames; the one-shot reset must not repeat.
    for frame in 2..100u64 {
        emit_engine_state(&mut memory, frame, false, false);
        control.tick(Some(&mut memory), frame as f32 * 0.016, &mut ui);
        assert_eq!(written_commands(&mut memory), CommandFrame::default());
    }

    // Win at frame 100, door animation still running.
    emit_engine_state(&mut memory, 100, true, true);
    control.tick(Some(&mut memory), 1.6, &mut ui);
    assert_eq!(written_commands(&mut memory), CommandFrame::default());

    // Animation ends at frame 110: next trial staged, reset+blank+stop pulse.
    emit_engine_state(&mut memory, 110, true, false);
    control.tick(Some(&mut memory), 1.76, &mut ui);
    let frame = written_commands(&mut memory);
    assert!(frame.reset && frame.blank_screen && frame.stop_rendering);
    assert!(!frame.resume_rendering);
    assert_eq!(staged_seed(&mut memory), 202);
    assert_eq!(control.ctx.trials.index(), 0);

    // Pulses live exactly one tick.
    emit_engine_state(&mut memory, 111, false, false);
    control.tick(Some(&mut memory), 1.78, &mut ui);
    assert_eq!(written_commands(&mut memory), CommandFrame::default());

    // 59 frames into the blank: still dark.
    emit_engine_state(&mut memory, 169, false, false);
    control.tick(Some(&mut memory), 2.7, &mut ui);
    assert_eq!(written_commands(&mut memory), CommandFrame::default());
    assert_eq!(control.ctx.trials.index(), 0);

    // Frame 170 = blank start + 60: blank toggled off, rendering resumed,
    // store advanced exactly once.
    emit_engine_state(&mut memory, 170, false, false);
    control.tick(Some(&mut memory), 2.72, &mut ui);
    let frame = written_commands(&mut memory);
    assert!(frame.blank_screen && frame.resume_rendering);
    assert!(!frame.reset && !frame.stop_rendering);
    assert_eq!(control.ctx.trials.index(), 1);

    // And the sequence is over.
    emit_engine_state(&mut memory, 171, false, false);
    control.tick(Some(&mut memory), 2.74, &mut ui);
    assert_eq!(written_commands(&mut memory), CommandFrame::default());
}

#[test]
fn manual_reset_during_blank_returns_to_current_trial() {
    let mut control = in_game_loop();
    let mut memory = [0u8; SHARED_MEMORY_SIZE];
    let mut ui = NullFeedback;

    emit_engine_state(&mut memory, 10, true, false);
    control.tick(Some(&mut memory), 0.0, &mut ui);
    emit_engine_state(&mut memory, 11, true, false);
    control.tick(Some(&mut memory), 0.016, &mut ui);
    assert!(written_commands(&mut memory).blank_screen);

    // Operator hits reset mid-blank: back to playing on the current trial,
    // current config staged again.
    control.ctx.trigger_reset();
    emit_engine_state(&mut memory, 12, false, false);
    control.tick(Some(&mut memory), 0.032, &mut ui);
    let frame = written_commands(&mut memory);
    assert!(frame.reset);
    assert_eq!(staged_seed(&mut memory), 101);
    assert_eq!(control.ctx.trials.index(), 0);

    // The abandoned blank wait never fires.
    emit_engine_state(&mut memory, 500, false, false);
    control.tick(Some(&mut memory), 0.048, &mut ui);
    assert_eq!(written_commands(&mut memory), CommandFrame::default());
}

#[test]
fn three_spaced_taps_produce_three_check_pulses() {
    let mut control = in_game_loop();
    let mut memory = [0u8; SHARED_MEMORY_SIZE];
    let mut ui = NullFeedback;

    emit_engine_state(&mut memory, 1, false, false);
    control.tick(Some(&mut memory), 0.0, &mut ui);

    let mut pulses = 0;
    for i in 0..3 {
        let t0 = 1.0 + i as f32 * 0.4;
        control.ctx.gestures.on_pointer_down(7, 300.0, 100.0, t0);
        control.ctx.gestures.on_pointer_move(7, 304.0, 103.0, t0 + 0.05);
        control.ctx.gestures.on_pointer_up(7, t0 + 0.1);

        control.tick(Some(&mut memory), t0 + 0.11, &mut ui);
        let frame = written_commands(&mut memory);
        assert!(!frame.rotate_left && !frame.rotate_right);
        assert!(!frame.zoom_in && !frame.zoom_out);
        if frame.check_alignment {
            pulses += 1;
        }

        // The pulse is gone on the following tick.
        control.tick(Some(&mut memory), t0 + 0.13, &mut ui);
        assert!(!written_commands(&mut memory).check_alignment);
    }
    assert_eq!(pulses, 3);
}

#[test]
fn swipe_flows_into_rotate_flags_until_momentum_expires() {
    let mut control = in_game_loop();
    let mut memory = [0u8; SHARED_MEMORY_SIZE];
    let mut ui = NullFeedback;

    emit_engine_state(&mut memory, 1, false, false);
    control.tick(Some(&mut memory), 0.0, &mut ui);

    control.ctx.gestures.on_pointer_down(3, 100.0, 100.0, 1.0);
    control.ctx.gestures.on_pointer_move(3, 150.0, 100.0, 1.02);
    control.tick(Some(&mut memory), 1.03, &mut ui);
    assert!(written_commands(&mut memory).rotate_right);

    // Well past the momentum grace window with no further motion.
    control.tick(Some(&mut memory), 1.5, &mut ui);
    assert!(!written_commands(&mut memory).rotate_right);
}
