//! pkgalter: resolve, report, confirm and apply package alterations
//!
//! The binary wires [`cli`] to a [`engine::LocalEngine`]. Other front ends
//! can drive [`alter::alter`] with their own [`engine::Engine`] and
//! [`prompt::Prompt`] implementations.

pub mod alter;
pub mod args;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod database;
pub mod engine;
pub mod error;
pub mod layout;
pub mod package;
pub mod prompt;
pub mod report;
pub mod size;

pub use error::{AlterError, Result};
