//! Core permalink logic: remote parsing, provider lookup, and URL templating.

pub mod errors;
pub mod model;
pub mod provider;
pub mod remote;
pub mod url;
