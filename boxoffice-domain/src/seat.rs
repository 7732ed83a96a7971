use serde::{Deserialize, Serialize};

/// A single seat in the venue.
///
/// Seats are immutable once the venue is built; identity is `(row, id)`,
/// where `id` is the column index within the row. Seats with higher scores
/// are preferred when a hold is placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seat {
    /// Column index, unique and stable within a row.
    pub id: u32,
    /// Desirability score from the score model.
    pub score: f32,
    /// Row the seat belongs to.
    pub row: u32,
}

impl Seat {
    pub fn new(id: u32, score: f32, row: u32) -> Self {
        Self { id, score, row }
    }
}
