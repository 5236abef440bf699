use super::json::{items, text};
use super::stats::category_value;
use crate::types::LeaderboardEntry;
use config_manager::RankingPolicy;
use serde_json::Value;
use std::cmp::Ordering;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RankingError {
    #[error("Leaderboard is not sorted by {stat}: rank {rank} ({current:?}) follows {previous:?}")]
    NotSorted {
        stat: String,
        rank: u32,
        previous: Option<f64>,
        current: Option<f64>,
    },
}

/// Normalize a statistics-by-athlete payload.
///
/// The payload was requested pre-sorted, so rank is the 1-based position in
/// the received sequence. Nothing is re-ordered here; see
/// [`apply_ranking_policy`] for that.
pub fn normalize_leaderboard(payload: &Value, category: &str, stat: &str) -> Vec<LeaderboardEntry> {
    items(payload, "athletes")
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let athlete = entry.get("athlete").unwrap_or(entry);
            LeaderboardEntry {
                rank: index as u32 + 1,
                athlete_id: text(athlete, &["id"]),
                name: text(athlete, &["displayName"]),
                team: text(athlete, &["teamShortName"])
                    .or_else(|| text(athlete, &["team", "abbreviation"])),
                value: category_value(items(entry, "categories"), category, stat),
            }
        })
        .collect()
}

/// Reconcile positional ranks with the values they were sorted by
pub fn apply_ranking_policy(
    mut entries: Vec<LeaderboardEntry>,
    policy: RankingPolicy,
    stat: &str,
) -> Result<Vec<LeaderboardEntry>, RankingError> {
    match policy {
        RankingPolicy::Positional => Ok(entries),
        RankingPolicy::Verify => {
            for pair in entries.windows(2) {
                if descending(pair[0].value, pair[1].value) == Ordering::Greater {
                    return Err(RankingError::NotSorted {
                        stat: stat.to_string(),
                        rank: pair[1].rank,
                        previous: pair[0].value,
                        current: pair[1].value,
                    });
                }
            }
            Ok(entries)
        }
        RankingPolicy::Resort => {
            // Stable: ties keep upstream order
            entries.sort_by(|a, b| descending(a.value, b.value));
            for (index, entry) in entries.iter_mut().enumerate() {
                entry.rank = index as u32 + 1;
            }
            Ok(entries)
        }
    }
}

/// Higher values first, absent values last
fn descending(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
