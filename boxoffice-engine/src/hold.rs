use boxoffice_domain::Seat;
use serde::{Deserialize, Serialize};

/// Seats temporarily held for a customer.
///
/// A hold is created only by a successful allocation and is never mutated
/// afterwards; it is dropped when the customer reserves the seats or when
/// the expiry sweep releases them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatHold {
    /// Unique hold id, positive and never reused.
    pub id: u32,
    /// Row the held seats belong to.
    pub row: u32,
    /// Held seats, ascending by seat id.
    pub seats: Vec<Seat>,
    /// Creation time, unix milliseconds.
    pub created_at: i64,
    /// Email of the customer the seats are held for.
    pub customer_email: String,
}
