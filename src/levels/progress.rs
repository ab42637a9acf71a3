//! Campaign progression.
//!
//! The simulator never touches progress itself; callers feed evaluation
//! verdicts through [`record_attempt`].

use tracing::info;

/// Storage for the highest completed campaign level.
pub trait ProgressStore {
    fn highest_completed(&self) -> u32;

    /// Persist a new high-water mark.
    fn set_highest_completed(&mut self, level: u32);

    /// A level is playable once the one before it is complete.
    fn is_unlocked(&self, level: u32) -> bool {
        level <= self.highest_completed().saturating_add(1)
    }

    /// Mark `level` complete. Completing an earlier level never lowers progress.
    fn complete(&mut self, level: u32) {
        if level > self.highest_completed() {
            self.set_highest_completed(level);
        }
    }
}

/// Process-local progress, starting with only level 1 unlocked.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProgress {
    highest_completed: u32,
}

impl InMemoryProgress {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressStore for InMemoryProgress {
    fn highest_completed(&self) -> u32 {
        self.highest_completed
    }

    fn set_highest_completed(&mut self, level: u32) {
        self.highest_completed = level;
    }
}

/// Complete `level` when the attempt passed. Returns whether progress advanced.
pub fn record_attempt<S: ProgressStore + ?Sized>(store: &mut S, level: u32, passed: bool) -> bool {
    if !passed {
        return false;
    }
    let before = store.highest_completed();
    store.complete(level);
    let advanced = store.highest_completed() > before;
    if advanced {
        info!("Level {} completed, level {} unlocked", level, level.saturating_add(1));
    }
    advanced
}
