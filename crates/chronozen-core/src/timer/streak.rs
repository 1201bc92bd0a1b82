//! Day-based focus streaks.

use chrono::NaiveDate;

/// Fold one completed work session into the streak.
///
/// Returns the new streak and the date to record as the last session.
/// Consecutive calendar days extend the streak, a gap of two or more days
/// restarts it at 1, and a second session on the same day leaves it as is.
/// The distance is absolute, so a clock that moved backwards by a day still
/// counts as consecutive.
pub fn advance_streak(today: NaiveDate, last: Option<NaiveDate>, streak: u32) -> (u32, NaiveDate) {
    let next = match last {
        None => 1,
        Some(last) => match (today - last).num_days().abs() {
            0 => streak,
            1 => streak.saturating_add(1),
            _ => 1,
        },
    };
    (next, today)
}
