//! Touch input handling for mobile/touchscreen support.
//! Implements swipe gestures for pyramid rotation, pinch for camera zoom,
//! and tap for the alignment check.
//!
//! Classification is event-driven rather than tick-driven: pointer events
//! re-evaluate the session immediately so gestures feel responsive, and the
//! control loop samples the resulting direction vector once per command tick.

use log::debug;

use crate::utils::constants::gesture_constants::{
    MOMENTUM_GRACE_SECS, PINCH_SENSITIVITY_PX, SWIPE_LOCK_THRESHOLD_PX, SWIPE_SENSITIVITY_PX,
    TAP_MAX_DISTANCE_PX, TAP_MAX_DURATION_SECS,
};

/// Tuning policy for gesture classification.
///
/// The observed controller variants (momentum swipe, basic threshold,
/// dead-zone tuning) are all reachable by constructing different policies;
/// there is one classifier.
#[derive(Debug, Clone, Copy)]
pub struct GesturePolicy {
    /// Manhattan displacement from the origin that locks a session to Swipe
    pub swipe_lock_threshold_px: f32,
    /// Euclidean movement that disqualifies a tap
    pub tap_max_distance_px: f32,
    /// Maximum press duration for a tap
    pub tap_max_duration_secs: f32,
    /// Per-sample delta needed to drive a rotation direction
    pub swipe_sensitivity_px: f32,
    /// Per-sample change of finger distance needed to drive a zoom direction
    pub pinch_sensitivity_px: f32,
    /// Hold the last non-zero direction this long after motion stops.
    /// None disables momentum: any sub-sensitivity sample zeroes the output.
    pub momentum_grace_secs: Option<f32>,
}

impl Default for GesturePolicy {
    fn default() -> Self {
        Self {
            swipe_lock_threshold_px: SWIPE_LOCK_THRESHOLD_PX,
            tap_max_distance_px: TAP_MAX_DISTANCE_PX,
            tap_max_duration_secs: TAP_MAX_DURATION_SECS,
            swipe_sensitivity_px: SWIPE_SENSITIVITY_PX,
            pinch_sensitivity_px: PINCH_SENSITIVITY_PX,
            momentum_grace_secs: Some(MOMENTUM_GRACE_SECS),
        }
    }
}

impl GesturePolicy {
    /// The plain threshold variant: no momentum, directions zero as soon as
    /// motion drops below sensitivity.
    pub fn basic_threshold() -> Self {
        Self {
            momentum_grace_secs: None,
            ..Self::default()
        }
    }
}

/// Classification of a single-finger session. Once a session reaches `Swipe`
/// it never goes back; tap is only possible from `TapCandidate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GestureLock {
    /// Fresh contact that has not moved beyond the tap distance
    TapCandidate,
    /// Moved too far to tap, not far enough to swipe
    Undecided,
    /// Committed to a swipe for the rest of the contact
    Swipe,
}

/// One single-finger gesture attempt.
#[derive(Debug, Clone, Copy)]
struct TouchSession {
    id: u64,
    origin: (f32, f32),
    origin_time: f32,
    last: (f32, f32),
    lock: GestureLock,
}

/// One two-finger pinch. Extra contacts beyond the first two are ignored.
#[derive(Debug, Clone, Copy)]
struct PinchSession {
    ids: [u64; 2],
    last: [(f32, f32); 2],
}

impl PinchSession {
    fn distance(&self) -> f32 {
        let dx = self.last[0].0 - self.last[1].0;
        let dy = self.last[0].1 - self.last[1].1;
        (dx * dx + dy * dy).sqrt()
    }
}

#[derive(Debug, Clone, Copy)]
enum ContactState {
    Idle,
    Single(TouchSession),
    Pinch(PinchSession),
}

/// Directional output vector, sampled by the fusion step each tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GestureDirections {
    pub rotate_left: bool,
    pub rotate_right: bool,
    pub zoom_in: bool,
    pub zoom_out: bool,
}

impl GestureDirections {
    pub fn is_zero(&self) -> bool {
        !(self.rotate_left || self.rotate_right || self.zoom_in || self.zoom_out)
    }
}

/// State machine turning raw pointer events into discrete command intents.
pub struct GestureClassifier {
    policy: GesturePolicy,
    state: ContactState,
    /// Last direction driven by an above-sensitivity sample
    held: GestureDirections,
    /// Timestamp of that sample, for momentum expiry
    held_since: f32,
    pending_tap: bool,
}

impl GestureClassifier {
    pub fn new(policy: GesturePolicy) -> Self {
        Self {
            policy,
            state: ContactState::Idle,
            held: GestureDirections::default(),
            held_since: 0.0,
            pending_tap: false,
        }
    }

    /// Current direction output. With momentum enabled the last non-zero
    /// direction survives until the grace window runs out, which smooths the
    /// gap between discrete move events and the command tick.
    pub fn directions(&self, now: f32) -> GestureDirections {
        if self.held.is_zero() {
            return self.held;
        }
        match self.policy.momentum_grace_secs {
            Some(grace) if now - self.held_since > grace => GestureDirections::default(),
            _ => self.held,
        }
    }

    /// Consume the pending tap pulse, if any. One tap emits exactly one pulse.
    pub fn take_tap(&mut self) -> bool {
        std::mem::take(&mut self.pending_tap)
    }

    pub fn on_pointer_down(&mut self, id: u64, x: f32, y: f32, time: f32) {
        match self.state {
            ContactState::Idle => {
                self.state = ContactState::Single(TouchSession {
                    id,
                    origin: (x, y),
                    origin_time: time,
                    last: (x, y),
                    lock: GestureLock::TapCandidate,
                });
            }
            ContactState::Single(session) => {
                if session.id == id {
                    return;
                }
                // A second finger always preempts the single-finger session
                // and clears any swipe output already being emitted.
                debug!("Second contact {} locks pinch", id);
                self.state = ContactState::Pinch(PinchSession {
                    ids: [session.id, id],
                    last: [session.last, (x, y)],
                });
                self.clear_held();
            }
            // Third and later contacts fall back to the first two.
            ContactState::Pinch(_) => {}
        }
    }

    pub fn on_pointer_move(&mut self, id: u64, x: f32, y: f32, time: f32) {
        match self.state {
            ContactState::Idle => {}
            ContactState::Single(mut session) => {
                if session.id != id {
                    return;
                }
                let (dx, dy) = (x - session.last.0, y - session.last.1);
                session.last = (x, y);

                // Lock bookkeeping against the origin, not the last sample:
                // a tap dies on total travel, a swipe locks on accumulated
                // Manhattan displacement.
                let (ox, oy) = session.origin;
                let travel = ((x - ox).powi(2) + (y - oy).powi(2)).sqrt();
                if session.lock == GestureLock::TapCandidate
                    && travel > self.policy.tap_max_distance_px
                {
                    session.lock = GestureLock::Undecided;
                }
                let manhattan = (x - ox).abs() + (y - oy).abs();
                if session.lock != GestureLock::Swipe
                    && manhattan > self.policy.swipe_lock_threshold_px
                {
                    debug!("Contact {} locked to swipe", id);
                    session.lock = GestureLock::Swipe;
                }

                let swiping = session.lock == GestureLock::Swipe;
                self.state = ContactState::Single(session);
                if swiping {
                    self.sample_swipe(dx, dy, time);
                }
            }
            ContactState::Pinch(mut pinch) => {
                let Some(slot) = pinch.ids.iter().position(|&p| p == id) else {
                    return;
                };
                let before = pinch.distance();
                pinch.last[slot] = (x, y);
                let delta = pinch.distance() - before;
                self.state = ContactState::Pinch(pinch);
                self.sample_pinch(delta, time);
            }
        }
    }

    pub fn on_pointer_up(&mut self, id: u64, time: f32) {
        match self.state {
            ContactState::Idle => {}
            ContactState::Single(session) => {
                if session.id != id {
                    return;
                }
                // Tap resolves only here: the session must never have locked
                // away from tap candidacy and must have been short enough.
                if session.lock == GestureLock::TapCandidate
                    && time - session.origin_time <= self.policy.tap_max_duration_secs
                {
                    debug!("Tap detected on contact {}", id);
                    self.pending_tap = true;
                }
                self.state = ContactState::Idle;
                self.clear_held();
            }
            ContactState::Pinch(pinch) => {
                let Some(slot) = pinch.ids.iter().position(|&p| p == id) else {
                    return;
                };
                // Losing one finger of a pinch starts a fresh single-finger
                // session at the remaining contact. It is a swipe candidate
                // with a reset origin, never a tap candidate: a tap must be
                // a clean press.
                let keep = 1 - slot;
                self.state = ContactState::Single(TouchSession {
                    id: pinch.ids[keep],
                    origin: pinch.last[keep],
                    origin_time: time,
                    last: pinch.last[keep],
                    lock: GestureLock::Undecided,
                });
                self.clear_held();
            }
        }
    }

    /// Cancelled contacts are never interpreted.
    pub fn on_pointer_cancel(&mut self, _id: u64) {
        self.state = ContactState::Idle;
        self.pending_tap = false;
        self.clear_held();
    }

    fn clear_held(&mut self) {
        self.held = GestureDirections::default();
    }

    /// Dominant-axis sampling: horizontal deltas rotate, vertical deltas
    /// zoom. Swipe up = zoom in; screen Y grows downward, so the sign is
    /// inverted.
    fn sample_swipe(&mut self, dx: f32, dy: f32, time: f32) {
        if dx.abs() >= dy.abs() {
            if dx.abs() > self.policy.swipe_sensitivity_px {
                self.held = GestureDirections {
                    rotate_left: dx < 0.0,
                    rotate_right: dx > 0.0,
                    ..Default::default()
                };
                self.held_since = time;
            } else {
                self.decay(time);
            }
        } else if dy.abs() > self.policy.swipe_sensitivity_px {
            self.held = GestureDirections {
                zoom_in: dy < 0.0,
                zoom_out: dy > 0.0,
                ..Default::default()
            };
            self.held_since = time;
        } else {
            self.decay(time);
        }
    }

    /// Same policy applied to inter-finger distance: spreading zooms in.
    fn sample_pinch(&mut self, delta: f32, time: f32) {
        if delta.abs() > self.policy.pinch_sensitivity_px {
            self.held = GestureDirections {
                zoom_in: delta > 0.0,
                zoom_out: delta < 0.0,
                ..Default::default()
            };
            self.held_since = time;
        } else {
            self.decay(time);
        }
    }

    /// A sub-sensitivity sample: without momentum the direction dies now,
    /// with momentum it survives until the grace window is spent.
    fn decay(&mut self, time: f32) {
        match self.policy.momentum_grace_secs {
            None => self.clear_held(),
            Some(grace) => {
                if time - self.held_since > grace {
                    self.clear_held();
                }
            }
        }
    }
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::new(GesturePolicy::default())
    }
}
