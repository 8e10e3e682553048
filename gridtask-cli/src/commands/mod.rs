//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`grid`] - Pixel grid for a bounding box
//! - [`tasks`] - Regional analysis tasks for a job manifest
//! - [`site`] - Static site pixel tasks

pub mod common;
pub mod grid;
pub mod site;
pub mod tasks;
