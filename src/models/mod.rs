pub mod booking;
pub mod review;
pub mod ticket;
pub mod user;
pub mod venue;

pub use booking::{Booking, BookingStatus};
pub use review::Review;
pub use ticket::{Ticket, TicketValidity};
pub use user::{PrivacySettings, UserProfile};
pub use venue::Venue;
