//! CLI subcommands.

pub mod common;
pub mod config;
pub mod extract;
pub mod plan;
