pub mod row_block;
pub mod score;
pub mod seat;
pub mod venue;

pub use row_block::RowBlock;
pub use seat::Seat;
pub use venue::{Venue, VenueError};
