//! Infrastructure adapters for git, config, and desktop integrations.

pub mod browser;
pub mod clipboard;
pub mod config;
pub mod git;
pub mod logging;
