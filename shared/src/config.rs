use std::default::Default;

/// Width of the anchors the delta codec indexes, and the floor for `min_match`
pub const ANCHOR_WIDTH: usize = 4;

/// Contains Config properties which govern how often an object may sync
#[derive(Clone, Debug, PartialEq)]
pub struct SyncConfig {
    /// Minimum seconds between two syncs of the same object. 0 syncs on
    /// every change; `f32::MAX` effectively never syncs.
    pub sync_interval: f32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self { sync_interval: 0.1 }
    }
}

/// Contains Config properties which will be used by the delta codec
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeltaConfig {
    /// Shortest run of bytes worth encoding as a copy. Values below
    /// `ANCHOR_WIDTH` are raised to it.
    pub min_match: usize,
    /// How many earlier positions sharing an anchor are tried at each step
    pub max_candidates: usize,
}

impl DeltaConfig {
    pub fn effective_min_match(&self) -> usize {
        self.min_match.max(ANCHOR_WIDTH)
    }

    pub fn effective_max_candidates(&self) -> usize {
        self.max_candidates.max(1)
    }
}

impl Default for DeltaConfig {
    fn default() -> Self {
        Self {
            min_match: ANCHOR_WIDTH,
            max_candidates: 16,
        }
    }
}
