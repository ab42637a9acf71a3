//! Campaign content and progression.
//!
//! - [`catalog`] — built-in level definitions and the required-connections check
//! - [`daily`] — three catalog levels picked from the day of the year
//! - [`progress`] — `ProgressStore` trait and an in-memory implementation

pub mod catalog;
pub mod daily;
pub mod progress;

pub use catalog::{LevelConfig, NeuronSetup, RequiredConnections};
pub use daily::{daily_tasks, todays_tasks, DailyTask};
pub use progress::{record_attempt, InMemoryProgress, ProgressStore};
