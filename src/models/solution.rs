use crate::models::{Cost, Gene};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The record a completed solve hands back to the caller.
///
/// Generation indices are 0-based positions into the history sequences,
/// so `best_cost_history[best_cost_generation] == best_cost` and the
/// worst-side counterpart always hold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolvedProblem {
    pub id: Uuid,
    pub solved_at: DateTime<Utc>,
    /// Best tour found, as an ordered sequence of node indices.
    pub solution: Vec<Gene>,
    pub best_cost: Cost,
    pub best_cost_generation: usize,
    pub worst_cost: Cost,
    pub worst_cost_generation: usize,
    pub best_cost_history: Vec<Cost>,
    pub worst_cost_history: Vec<Cost>,
    /// Total generations processed, the seed generation included.
    pub generations: u32,
    /// Elapsed wall time of the solve in milliseconds.
    pub solved_in_ms: u64,
}
