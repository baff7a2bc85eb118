mod availability_resolver;
mod cancellation;
mod cart;
mod error;
pub mod models;
pub mod ports;
pub mod services;
mod slot_conflict;
mod slot_selection;
mod time_codec;

pub use availability_resolver::*;
pub use cancellation::*;
pub use cart::*;
pub use error::*;
pub use slot_conflict::*;
pub use slot_selection::*;
pub use time_codec::*;
