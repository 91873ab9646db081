//! Application layer orchestrating domain logic and infrastructure.

pub mod permalink;
