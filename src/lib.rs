//! XQ Keeper - end-to-end API tests for the xq-fitness services
//!
//! The `xq-keeper` binary resolves the API base URL and forwards to the
//! `xq-runner` binary, which runs the workflows in [`workflows`] against the
//! write and read services through the [`clients`] capability traits.

pub mod cli;
pub mod clients;
pub mod commands;
pub mod common;
pub mod fixtures;
pub mod testing;
pub mod workflows;

pub use common::{Error, Result};
