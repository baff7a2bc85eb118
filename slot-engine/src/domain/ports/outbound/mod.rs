mod marketplace;

pub use marketplace::*;
