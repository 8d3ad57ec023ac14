//! CLI library for testing purposes

pub mod about;
pub mod commands;
pub mod info;
pub mod validation;

pub use commands::CliError;
