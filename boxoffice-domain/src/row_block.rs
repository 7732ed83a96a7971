use serde::{Deserialize, Serialize};

use crate::seat::Seat;

/// A block of continuous free seats: available seats that are adjacent to
/// each other within a single row.
///
/// Blocks are created when the venue is built (one full-width block per
/// row), when a larger block is split during a hold, or when released
/// seats are merged back. Seat ids inside a block are strictly increasing
/// with no gaps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowBlock {
    row: u32,
    seats: Vec<Seat>,
}

impl RowBlock {
    /// Full-width block for a freshly built row.
    pub fn full_row(row: u32, scores: &[f32]) -> Self {
        let seats = scores
            .iter()
            .enumerate()
            .map(|(index, &score)| Seat::new(index as u32, score, row))
            .collect();

        Self { row, seats }
    }

    /// Block over an existing run of seats (splits and merges).
    pub fn from_seats(row: u32, seats: Vec<Seat>) -> Self {
        Self { row, seats }
    }

    pub fn row(&self) -> u32 {
        self.row
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    pub fn into_seats(self) -> Vec<Seat> {
        self.seats
    }

    /// Number of available seats in the block.
    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    /// Id of the leftmost seat, if any.
    pub fn first_id(&self) -> Option<u32> {
        self.seats.first().map(|seat| seat.id)
    }

    /// Id of the rightmost seat, if any.
    pub fn last_id(&self) -> Option<u32> {
        self.seats.last().map(|seat| seat.id)
    }
}
