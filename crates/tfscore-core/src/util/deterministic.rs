//! Deterministic ranking of graded subjects.
//!
//! Ordering is part of the leaderboard contract: identical inputs always
//! produce the identical leaderboard, including the order of full ties.

use crate::config::BonusSchedule;
use crate::report::model::{RankedRow, ResultRow};

/// Sort rows by score descending, then time ascending.
///
/// Earlier submissions win ties. The sort is stable, so rows equal in both
/// fields keep their input order.
pub fn sort_results(rows: &mut [ResultRow]) {
    rows.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.time.cmp(&b.time)));
}

/// Bonus for each of the first `len` rank positions.
///
/// Non-increasing by position; zero once the budget is spent.
pub fn positional_bonuses(schedule: BonusSchedule, len: usize) -> Vec<u32> {
    let mut budget = schedule.budget;
    (0..len)
        .map(|_| {
            let bonus = budget;
            budget = budget.saturating_sub(schedule.step);
            bonus
        })
        .collect()
}

/// Rank results and hand out the positional bonus.
///
/// The bonus is applied after sorting and never reorders rows, so a lower
/// ranked row may end with a higher final score than the row above it.
pub fn rank(mut rows: Vec<ResultRow>, schedule: BonusSchedule) -> Vec<RankedRow> {
    sort_results(&mut rows);
    let bonuses = positional_bonuses(schedule, rows.len());

    rows.into_iter()
        .zip(bonuses)
        .enumerate()
        .map(|(index, (row, bonus))| RankedRow {
            rank: index + 1,
            subject: row.subject,
            base_score: row.score,
            bonus,
            score: row.score + bonus,
            time: row.time,
        })
        .collect()
}
