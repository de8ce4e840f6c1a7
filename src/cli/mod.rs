//! Command-line interface: argument parsing and report output

pub mod args;
pub mod output;
