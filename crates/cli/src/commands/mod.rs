//! CLI commands

pub mod restore;
