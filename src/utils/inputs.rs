//! Keyboard state and input fusion.
//!
//! Keyboard directions are level-triggered (held down = active); gesture
//! directions come from the classifier. Each tick the fusion step ORs the
//! two per axis and folds in the pending one-shot triggers, producing the
//! command frame the codec writes out.

use shared::codec::CommandFrame;

use crate::utils::touch_inputs::{GestureClassifier, GestureDirections};

/// Level-triggered directional keys: set on keydown, cleared on keyup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyboardState {
    pub rotate_left: bool,
    pub rotate_right: bool,
    pub zoom_in: bool,
    pub zoom_out: bool,
}

impl KeyboardState {
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// One-shot triggers waiting to be sent. Set by key edges, tap resolution,
/// or the win machine; the control loop clears them right after they are
/// written into a frame, whatever their source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PendingTriggers {
    pub check_alignment: bool,
    pub reset: bool,
    pub blank_screen: bool,
    pub stop_rendering: bool,
    pub resume_rendering: bool,
}

impl PendingTriggers {
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Rising-edge debounce for one-shot keys: a held key fires once.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeDetector {
    was_down: bool,
}

impl EdgeDetector {
    pub fn rising(&mut self, down: bool) -> bool {
        let fired = down && !self.was_down;
        self.was_down = down;
        fired
    }
}

/// Merge keyboard edge-state and gesture output into one authoritative
/// command frame for this tick.
///
/// Directional axes and the alignment check are suppressed unless gameplay
/// is active (in-game and not inside the win sequence); the control one-shots
/// always pass through so a reset or resume is never swallowed. The pending
/// tap is drained either way so a pulse from a stale gesture cannot fire
/// after gameplay resumes.
pub fn fuse_inputs(
    keys: &KeyboardState,
    gestures: &mut GestureClassifier,
    pending: &PendingTriggers,
    now: f32,
    gameplay_active: bool,
) -> CommandFrame {
    let dirs = if gameplay_active {
        gestures.directions(now)
    } else {
        GestureDirections::default()
    };
    let tap = gestures.take_tap();

    CommandFrame {
        rotate_left: gameplay_active && (keys.rotate_left || dirs.rotate_left),
        rotate_right: gameplay_active && (keys.rotate_right || dirs.rotate_right),
        zoom_in: gameplay_active && (keys.zoom_in || dirs.zoom_in),
        zoom_out: gameplay_active && (keys.zoom_out || dirs.zoom_out),
        check_alignment: gameplay_active && (pending.check_alignment || tap),
        reset: pending.reset,
        blank_screen: pending.blank_screen,
        stop_rendering: pending.stop_rendering,
        resume_rendering: pending.resume_rendering,
    }
}
