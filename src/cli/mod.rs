//! Command-line interface
//!
//! Each subcommand in `main` maps to one function in [`commands`]. Commands
//! work on a fresh wallet connection per invocation.

pub mod commands;
