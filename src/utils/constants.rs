
/// Gesture classification
pub mod gesture_constants {
    pub const TAP_MAX_DURATION_SECS: f32 = 0.3; // Maximum duration for a tap
    pub const TAP_MAX_DISTANCE_PX: f32 = 20.0; // Maximum movement for a tap (in pixels)

    // Manhattan displacement from the touch origin before the session locks
    // to a swipe. Below this the contact stays undecided and emits nothing.
    pub const SWIPE_LOCK_THRESHOLD_PX: f32 = 30.0;

    // Per-sample delta needed to register a direction change.
    pub const SWIPE_SENSITIVITY_PX: f32 = 2.0;
    pub const PINCH_SENSITIVITY_PX: f32 = 3.0;

    // How long the last non-zero direction is held after motion stops, to
    // avoid flicker from discrete sampling.
    pub const MOMENTUM_GRACE_SECS: f32 = 0.1;
}

/// Control loop
pub mod loop_constants {
    /// Command tick period (~60 Hz)
    pub const TICK_PERIOD_MS: u64 = 16;
}

/// Trial files
pub mod trial_constants {
    /// Newline-delimited JSON trial file, searched next to the executable
    /// and in the parent directory.
    pub const TRIALS_FILE: &str = "trials.jsonl";
}
