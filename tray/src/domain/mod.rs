mod availability;
mod booked_slot;
mod booking;
mod cancellation;

pub use availability::*;
pub use booked_slot::*;
pub use booking::*;
pub use cancellation::*;
