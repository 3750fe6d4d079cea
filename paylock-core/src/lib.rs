#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]
#![forbid(unsafe_code)]

pub mod access;
pub mod config;
pub mod error;
pub mod events;
pub mod host;
pub mod processors;
pub mod utils;

#[cfg(test)]
mod testing;
