//! VIPS Review — driving prohibition review integration.

pub mod config;
pub mod error;
mod lenient;
pub mod middleware;
pub mod notify;
pub mod vips;
