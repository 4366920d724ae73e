//! Guest list service: mints ticket codes for guests, keeps the guest list
//! and checks guests in at the entrance exactly once.

pub mod config;
pub mod handlers;
pub mod models;
pub mod registry;
pub mod routes;
pub mod store;
pub mod ticket;
pub mod utils;

pub use models::{Guest, GuestStats};
pub use registry::{CheckInOutcome, GuestRegistry};
pub use store::{GuestStore, InMemoryGuestStore, PgGuestStore};
pub use ticket::{TicketCodec, TicketId};
pub use utils::error::{AppError, GuestError};
