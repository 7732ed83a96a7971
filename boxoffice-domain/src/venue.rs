use std::collections::{BTreeMap, HashMap};

use crate::row_block::RowBlock;
use crate::score::seat_scores;
use crate::seat::Seat;

/// A venue is a priority-ordered collection of seat rows.
///
/// Rows are numbered from 0 (front row) upward; the lower the row index,
/// the higher its priority when seats are allocated. Each row holds a list
/// of [`RowBlock`]s — runs of adjacent free seats — kept sorted by first
/// seat id, and two blocks of the same row are never seat-adjacent (they
/// would have been merged).
#[derive(Debug)]
pub struct Venue {
    /// Free seat blocks per row, ascending row index.
    availability: BTreeMap<u32, Vec<RowBlock>>,
    /// Successfully reserved seats, keyed by confirmation code.
    reservations: HashMap<String, Vec<Seat>>,
}

impl Venue {
    /// Builds a venue with `rows` rows of `width` seats each, scored by
    /// the seat score model.
    pub fn new(rows: u32, width: u32) -> Result<Self, VenueError> {
        if rows == 0 || width == 0 {
            return Err(VenueError::InvalidDimensions { rows, width });
        }

        let scores = seat_scores(width as usize);
        let mut availability = BTreeMap::new();
        for row in 0..rows {
            availability.insert(row, vec![RowBlock::full_row(row, &scores)]);
        }

        Ok(Self {
            availability,
            reservations: HashMap::new(),
        })
    }

    /// Total number of seats currently available across all rows.
    pub fn available_seats(&self) -> usize {
        self.availability
            .values()
            .flat_map(|blocks| blocks.iter())
            .map(RowBlock::len)
            .sum()
    }

    /// Rows in ascending priority order together with their free blocks.
    pub fn rows(&self) -> impl Iterator<Item = (u32, &[RowBlock])> {
        self.availability
            .iter()
            .map(|(row, blocks)| (*row, blocks.as_slice()))
    }

    /// Removes and returns the block at `index` within `row`.
    pub fn take_block(&mut self, row: u32, index: usize) -> Option<RowBlock> {
        let blocks = self.availability.get_mut(&row)?;
        if index >= blocks.len() {
            return None;
        }

        let block = blocks.remove(index);
        if blocks.is_empty() {
            self.availability.remove(&row);
        }
        Some(block)
    }

    /// Removes and returns every free block of `row`.
    pub fn take_row_blocks(&mut self, row: u32) -> Vec<RowBlock> {
        self.availability.remove(&row).unwrap_or_default()
    }

    /// Inserts a block back into its row, keeping the row's blocks sorted
    /// by first seat id. Empty blocks are discarded.
    pub fn insert_block(&mut self, block: RowBlock) {
        if block.is_empty() {
            return;
        }

        let blocks = self.availability.entry(block.row()).or_default();
        let position = blocks
            .iter()
            .position(|existing| existing.first_id() > block.first_id())
            .unwrap_or(blocks.len());
        blocks.insert(position, block);
    }

    /// Records seats under a confirmation code.
    pub fn record_reservation(&mut self, code: String, seats: Vec<Seat>) {
        self.reservations.insert(code, seats);
    }

    /// Seats reserved under a confirmation code, if it exists.
    pub fn reserved_seats(&self, code: &str) -> Option<&[Seat]> {
        self.reservations.get(code).map(Vec::as_slice)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum VenueError {
    #[error("Invalid venue dimensions: {rows} rows x {width} seats per row")]
    InvalidDimensions { rows: u32, width: u32 },
}
