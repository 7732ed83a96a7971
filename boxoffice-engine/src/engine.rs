use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use boxoffice_domain::{RowBlock, Seat, Venue};
use chrono::Utc;
use tracing::{info, warn};

use crate::code;
use crate::config::EngineConfig;
use crate::hold::SeatHold;
use crate::sweep::{self, SweeperHandle};
use crate::validate;

/// Shared allocation state, guarded by one engine-wide lock.
///
/// Every operation that touches availability or the hold indexes runs
/// under this lock, so no caller ever observes a partially updated
/// structure. The two indexes track the same set of holds: `holds` for
/// reserve-by-id lookups, `expiry` for oldest-first expiry scans. The
/// expiry key pairs the creation timestamp with the hold id so the
/// ordering stays total when two holds share a millisecond.
struct EngineState {
    venue: Venue,
    holds: HashMap<u32, SeatHold>,
    expiry: BTreeSet<(i64, u32)>,
}

/// The seat lease manager.
///
/// Finds and holds the best available seats, reserves held seats under a
/// confirmation code, and runs a background sweep that releases holds
/// that were never reserved within the configured timeout.
pub struct AllocationEngine {
    state: Mutex<EngineState>,
    next_hold_id: AtomicU32,
    hold_timeout_ms: i64,
    sweep_interval: Duration,
    sweeper: Mutex<Option<SweeperHandle>>,
}

impl AllocationEngine {
    /// Builds the engine and spawns the expiry sweep task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(venue: Venue, config: EngineConfig) -> Arc<Self> {
        let engine = Arc::new(Self::new(venue, config));
        let handle = sweep::spawn(engine.clone());
        *engine.lock_sweeper() = Some(handle);
        engine
    }

    /// Builds the engine without the background sweep; expiry cycles must
    /// then be driven by hand. Used by tests and embedders that schedule
    /// sweeps themselves.
    pub fn new(venue: Venue, config: EngineConfig) -> Self {
        Self {
            state: Mutex::new(EngineState {
                venue,
                holds: HashMap::new(),
                expiry: BTreeSet::new(),
            }),
            next_hold_id: AtomicU32::new(0),
            hold_timeout_ms: config.hold_timeout_ms as i64,
            sweep_interval: Duration::from_millis(config.sweep_interval_ms),
            sweeper: Mutex::new(None),
        }
    }

    /// Number of seats currently available across the whole venue.
    pub fn available_seats(&self) -> usize {
        self.lock_state().venue.available_seats()
    }

    /// Finds the best block of `count` adjacent seats and holds it for
    /// the customer.
    ///
    /// Rows are scanned front to back (ascending row index). The first
    /// row with a large enough free block wins: an exact-size block is
    /// taken whole, a larger block is searched for the highest-scoring
    /// window of `count` seats and split around it. A request is only
    /// ever satisfied within a single row.
    pub fn find_and_hold(
        &self,
        count: u32,
        customer_email: &str,
    ) -> Result<SeatHold, HoldError> {
        validate::require_seat_count(count)?;
        validate::require_email(customer_email)?;

        let mut state = self.lock_state();

        let Some((row, index)) = Self::select_block(&state.venue, count as usize) else {
            return Err(HoldError::NoCapacity { requested: count });
        };
        // found under the same lock, so the block is still there
        let Some(block) = state.venue.take_block(row, index) else {
            return Err(HoldError::NoCapacity { requested: count });
        };

        let seats = if block.len() == count as usize {
            block.into_seats()
        } else {
            Self::best_window(&mut state.venue, block, count as usize)
        };

        let id = self.next_hold_id.fetch_add(1, Ordering::Relaxed) + 1;
        let hold = SeatHold {
            id,
            row,
            seats,
            created_at: Utc::now().timestamp_millis(),
            customer_email: customer_email.to_string(),
        };

        state.holds.insert(id, hold.clone());
        state.expiry.insert((hold.created_at, id));

        info!(
            hold_id = id,
            row,
            seats = hold.seats.len(),
            "seats found and held"
        );
        Ok(hold)
    }

    /// Reserves the seats of an outstanding hold and returns the
    /// confirmation code.
    ///
    /// Fails with [`HoldError::NotFound`] when the hold id does not exist
    /// — including when the hold already expired or was already reserved
    /// — and with [`HoldError::OwnerMismatch`] when the email does not
    /// match the one on the hold (compared case-insensitively).
    pub fn reserve(&self, hold_id: u32, customer_email: &str) -> Result<String, HoldError> {
        validate::require_email(customer_email)?;

        let mut state = self.lock_state();

        let owner_matches = match state.holds.get(&hold_id) {
            Some(hold) => hold.customer_email.eq_ignore_ascii_case(customer_email),
            None => {
                return Err(HoldError::NotFound(format!("seat hold {}", hold_id)));
            }
        };
        if !owner_matches {
            return Err(HoldError::OwnerMismatch);
        }

        if let Some(hold) = state.holds.remove(&hold_id) {
            state.expiry.remove(&(hold.created_at, hold.id));
            let code = code::confirmation_code();
            state.venue.record_reservation(code.clone(), hold.seats);
            info!(hold_id, code = %code, "seats reserved");
            Ok(code)
        } else {
            Err(HoldError::NotFound(format!("seat hold {}", hold_id)))
        }
    }

    /// Seats reserved under a confirmation code.
    pub fn reserved_seats(&self, code: &str) -> Result<Vec<Seat>, HoldError> {
        let state = self.lock_state();
        state
            .venue
            .reserved_seats(code)
            .map(<[Seat]>::to_vec)
            .ok_or_else(|| HoldError::NotFound(format!("confirmation code {}", code)))
    }

    /// Stops the expiry sweep and waits for it to exit.
    ///
    /// Bounded: logs and returns if the task does not stop within one
    /// sweep interval plus a grace second. Safe to call more than once;
    /// outstanding holds are left untouched.
    pub async fn shutdown(&self) {
        let Some(handle) = self.lock_sweeper().take() else {
            return;
        };
        handle.stop(self.sweep_interval + Duration::from_secs(1)).await;
    }

    /// One expiry cycle: releases every hold older than the timeout.
    ///
    /// The expiry index is ordered by creation time, so the scan stops at
    /// the first entry that has not expired yet — everything behind it is
    /// newer. Released seats are merged back into their rows.
    pub(crate) fn sweep_expired(&self) {
        let now = Utc::now().timestamp_millis();
        let mut state = self.lock_state();

        let mut expired = Vec::new();
        while let Some(&(created_at, hold_id)) = state.expiry.first() {
            if created_at + self.hold_timeout_ms > now {
                break;
            }

            state.expiry.remove(&(created_at, hold_id));
            match state.holds.remove(&hold_id) {
                Some(hold) => expired.push(hold),
                None => warn!(hold_id, "expiry entry had no matching hold, skipping"),
            }
        }

        for hold in expired {
            info!(hold_id = hold.id, row = hold.row, "releasing expired seat hold");
            Self::release(&mut state.venue, hold);
        }
    }

    pub(crate) fn sweep_interval(&self) -> Duration {
        self.sweep_interval
    }

    /// Position of the best candidate block: the first block with room
    /// for `count` seats, scanning rows front to back. Smaller blocks are
    /// left untouched.
    fn select_block(venue: &Venue, count: usize) -> Option<(u32, usize)> {
        for (row, blocks) in venue.rows() {
            for (index, block) in blocks.iter().enumerate() {
                if block.len() >= count {
                    return Some((row, index));
                }
            }
        }
        None
    }

    /// Sliding-window search for the `count` adjacent seats with the
    /// highest total score inside `block`.
    ///
    /// The running maximum is replaced whenever the current window's sum
    /// is greater *or equal*, so of two equally scored windows the later
    /// one wins. The leftover seats on either side of the chosen window
    /// go back into the venue as new blocks.
    fn best_window(venue: &mut Venue, block: RowBlock, count: usize) -> Vec<Seat> {
        let row = block.row();
        let mut seats = block.into_seats();

        let mut max_score: f32 = seats[..count].iter().map(|seat| seat.score).sum();
        let mut current = max_score;
        let mut start = 0;

        for i in count..seats.len() {
            current += seats[i].score - seats[i - count].score;
            if current >= max_score {
                max_score = current;
                start = i - count + 1;
            }
        }

        let suffix = seats.split_off(start + count);
        let window = seats.split_off(start);
        venue.insert_block(RowBlock::from_seats(row, seats));
        venue.insert_block(RowBlock::from_seats(row, suffix));

        window
    }

    /// Returns a hold's seats to the venue, merging with any adjacent
    /// free blocks of the same row.
    ///
    /// A block starting right after the released run is appended to it; a
    /// block ending right before it is prepended. Both can apply in one
    /// call. The merged run goes back as a single block, so two stored
    /// blocks of a row are never adjacent.
    fn release(venue: &mut Venue, hold: SeatHold) {
        let (Some(first), Some(last)) = (hold.seats.first(), hold.seats.last()) else {
            warn!(hold_id = hold.id, "released hold had no seats");
            return;
        };
        let first_id = first.id;
        let last_id = last.id;

        let mut merged = hold.seats;
        let mut kept = Vec::new();

        for block in venue.take_row_blocks(hold.row) {
            if block.first_id() == Some(last_id + 1) {
                merged.extend(block.into_seats());
            } else if block.last_id() == Some(first_id.wrapping_sub(1)) && first_id > 0 {
                let mut joined = block.into_seats();
                joined.append(&mut merged);
                merged = joined;
            } else {
                kept.push(block);
            }
        }

        for block in kept {
            venue.insert_block(block);
        }
        venue.insert_block(RowBlock::from_seats(hold.row, merged));
    }

    fn lock_state(&self) -> MutexGuard<'_, EngineState> {
        // a poisoned lock only means another thread panicked mid-operation;
        // the state itself is still structurally sound
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_sweeper(&self) -> MutexGuard<'_, Option<SweeperHandle>> {
        self.sweeper.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HoldError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("No row has {requested} adjacent seats available")]
    NoCapacity { requested: u32 },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Customer email does not match the email on the seat hold")]
    OwnerMismatch,
}
