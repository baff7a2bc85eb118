mod auth;
mod client;
pub mod domain;
mod tray_url;

pub(crate) use tray_url::*;

pub use auth::*;
pub use client::*;
pub use domain::*;
