mod availability;
mod booking;
mod ids;
mod slot;

pub use availability::*;
pub use booking::*;
pub use ids::*;
pub use slot::*;
