//! Command-line interface for the CSV H3 processor

pub mod args;
pub mod commands;
