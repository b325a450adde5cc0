//! postbox: an in-memory blog post API.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
