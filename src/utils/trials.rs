//! Trial sequencing: load trial configurations from a JSONL file and cycle
//! through them, wrapping around at the end.

use log::{info, warn};
use serde::Deserialize;
use shared::codec::ResetConfig;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::utils::constants::trial_constants::TRIALS_FILE;

/// Trial configuration from JSONL file
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TrialConfig {
    pub seed: u64,
    pub pyramid_type: u32,
    pub base_radius: f32,
    pub height: f32,
    pub start_orient: f32,
    pub target_door: u32,
    pub colors: [[f32; 4]; 3],
}

impl Default for TrialConfig {
    fn default() -> Self {
        Self {
            seed: 69,
            pyramid_type: 0,
            base_radius: 2.5,
            height: 4.0,
            start_orient: 0.0,
            target_door: 5,
            colors: [
                [1.0, 0.2, 0.2, 1.0], // Red
                [0.2, 0.5, 1.0, 1.0], // Blue
                [0.2, 1.0, 0.3, 1.0], // Green
            ],
        }
    }
}

impl TrialConfig {
    /// The shape the codec stages into shared memory before a reset.
    pub fn reset_config(&self) -> ResetConfig {
        ResetConfig {
            seed: self.seed,
            pyramid_type: self.pyramid_type,
            base_radius: self.base_radius,
            height: self.height,
            start_orient: self.start_orient,
            target_door: self.target_door,
            colors: self.colors,
        }
    }
}

/// Ordered, cyclic list of trials plus the current index.
///
/// The list is never empty: loading falls back to a single default trial, so
/// `current` and `advance` always have something to return.
#[derive(Debug, Clone)]
pub struct TrialStore {
    trials: Vec<TrialConfig>,
    index: usize,
}

impl TrialStore {
    pub fn new(trials: Vec<TrialConfig>) -> Self {
        let trials = if trials.is_empty() {
            warn!("Empty trial list, using default config");
            vec![TrialConfig::default()]
        } else {
            trials
        };
        Self { trials, index: 0 }
    }

    /// Load trials from the usual file locations, falling back to the
    /// default trial. Never an error: a missing or unreadable file is an
    /// operational condition, not a fatal one.
    pub fn load() -> Self {
        // Try relative to executable first, then parent directory
        let paths = [
            Path::new(TRIALS_FILE).to_path_buf(),
            Path::new("..").join(TRIALS_FILE),
        ];

        for path in &paths {
            if let Ok(file) = File::open(path) {
                let trials = parse_lines(file);
                if !trials.is_empty() {
                    crate::console_line!("Loaded {} trials from {:?}", trials.len(), path);
                    return Self::new(trials);
                }
            }
        }

        crate::console_line!("Failed to load {}, using default config", TRIALS_FILE);
        Self::new(Vec::new())
    }

    /// Parse newline-delimited JSON trials. Blank and malformed lines are
    /// skipped; an entirely unusable input yields the default trial.
    pub fn from_reader<R: Read>(reader: R) -> Self {
        Self::new(parse_lines(reader))
    }

    pub fn len(&self) -> usize {
        self.trials.len()
    }

    pub fn is_empty(&self) -> bool {
        false // guaranteed by construction
    }

    /// Current trial index (always in range).
    pub fn index(&self) -> usize {
        self.index % self.trials.len()
    }

    pub fn current(&self) -> &TrialConfig {
        &self.trials[self.index()]
    }

    /// The trial that `advance` would move to. The win sequence stages this
    /// configuration before pulsing reset so the game resets straight into it.
    pub fn peek_next(&self) -> &TrialConfig {
        &self.trials[(self.index() + 1) % self.trials.len()]
    }

    /// Advance to the next trial (loops). Returns the new index.
    pub fn advance(&mut self) -> usize {
        self.index = (self.index() + 1) % self.trials.len();
        info!("Advancing to trial {}/{}", self.index + 1, self.trials.len());
        self.index
    }
}

impl Default for TrialStore {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

fn parse_lines<R: Read>(reader: R) -> Vec<TrialConfig> {
    let reader = BufReader::new(reader);
    let mut trials = Vec::new();

    for line in reader.lines().filter_map(Result::ok) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<TrialConfig>(line) {
            Ok(trial) => trials.push(trial),
            Err(e) => warn!("Skipping malformed trial line: {}", e),
        }
    }

    trials
}
