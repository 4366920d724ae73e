pub mod guest;

pub use guest::{Guest, GuestRow, GuestStats, NewGuest};
