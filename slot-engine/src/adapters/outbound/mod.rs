pub mod memory;
pub mod tray;
