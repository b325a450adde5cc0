//! Application services layer.

pub mod error;
mod lock;
pub mod store;
