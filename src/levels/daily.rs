//! Daily challenges.
//!
//! Three catalog levels are picked from the day of the year, one per
//! difficulty, so every player sees the same set on the same day.

use chrono::Datelike;

use super::catalog::LevelConfig;

/// One of the day's three challenges.
#[derive(Debug, Clone)]
pub struct DailyTask {
    pub id: String,
    pub title: String,
    pub description: String,
    /// 1 (easiest) to 3.
    pub difficulty: u8,
    pub level: LevelConfig,
}

/// Challenges for `day`, the 1-based ordinal day of the year.
pub fn daily_tasks(day: u32) -> [DailyTask; 3] {
    [
        task(day, 1, "Morning Warm-up", "Simple connection challenge", 1 + day % 5),
        task(day, 2, "Midday Challenge", "Logic puzzle", 2 + day % 4),
        task(day, 3, "Evening Expert", "Advanced network", 3 + day % 3),
    ]
}

/// Challenges for the current local date.
pub fn todays_tasks() -> [DailyTask; 3] {
    daily_tasks(chrono::Local::now().ordinal())
}

fn task(day: u32, difficulty: u8, title: &str, description: &str, level: u32) -> DailyTask {
    DailyTask {
        id: format!("daily-{}-{}", day, difficulty),
        title: title.to_string(),
        description: description.to_string(),
        difficulty,
        level: LevelConfig::for_level(level),
    }
}
